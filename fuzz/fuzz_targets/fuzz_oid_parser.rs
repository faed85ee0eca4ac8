#![no_main]

use libfuzzer_sys::fuzz_target;

use snmp_agent::oid::Oid;

fuzz_target!(|data: &[u8]| {
    if let Ok(oid) = Oid::from_ber(data) {
        let encoded = oid.to_ber_smallvec();
        let _ = Oid::from_ber(&encoded);
    }

    if let Ok(s) = std::str::from_utf8(data)
        && let Ok(oid) = Oid::parse(s)
    {
        assert_eq!(Oid::parse(&oid.to_string()).ok(), Some(oid));
    }
});
