#![no_main]

use std::sync::LazyLock;

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;

use snmp_agent::{Agent, Value, oid};

static AGENT: LazyLock<Agent> = LazyLock::new(|| {
    Agent::builder()
        .communities("public", "private")
        .read_only(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), |_| Ok(Value::from("fuzz")))
        .read_only(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), |_| Ok(Value::TimeTicks(1)))
        .read_write(
            oid!(1, 3, 6, 1, 2, 1, 1, 5, 0),
            |_| Ok(Value::from("name")),
            |_, _| Ok(()),
        )
        .build()
        .expect("static registry is valid")
});

fuzz_target!(|data: &[u8]| {
    if let Ok(response) = AGENT.process_datagram(Bytes::copy_from_slice(data)) {
        assert!(response.len() <= AGENT.max_message_size());
    }
});
