#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;

use snmp_agent::ber::Decoder;
use snmp_agent::message::Message;
use snmp_agent::pdu::MessagePdu;
use snmp_agent::varbind::decode_varbind_list;

fuzz_target!(|data: &[u8]| {
    let bytes = Bytes::copy_from_slice(data);

    // Anything that decodes must re-encode and decode to the same message.
    if let Ok((message, _rest)) = Message::decode_partial(bytes.clone()) {
        let again = Message::decode(message.encode()).expect("re-encoded message must decode");
        assert_eq!(again, message);
    }

    let mut decoder = Decoder::new(bytes.clone());
    let _ = MessagePdu::decode(&mut decoder);

    let mut decoder = Decoder::new(bytes);
    let _ = decode_varbind_list(&mut decoder);
});
