//! Common test fixtures and constants.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use snmp_agent::handler::AccessError;
use snmp_agent::pdu::{MessagePdu, Pdu};
use snmp_agent::{Agent, ErrorStatus, Message, Oid, Value, VarBind, oid};

// =============================================================================
// System group OIDs (1.3.6.1.2.1.1.*)
// =============================================================================

pub fn sys_descr() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)
}
pub fn sys_object_id() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 2, 0)
}
pub fn sys_uptime() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 3, 0)
}
pub fn sys_contact() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 4, 0)
}
pub fn sys_name() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)
}

/// sysUpTime without the instance arc: 1.3.6.1.2.1.1.3
pub fn sys_uptime_object() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 3)
}

/// Never registered by any fixture agent.
pub fn nonexistent_oid() -> Oid {
    oid!(1, 3, 6, 1, 99, 99, 99, 0)
}

// =============================================================================
// Communities
// =============================================================================

pub const COMMUNITY_RO: &str = "publ";
pub const COMMUNITY_RW: &str = "priv";

// =============================================================================
// Wire fixtures
// =============================================================================

/// SNMPv1 GetRequest, community "publ", request-id 0x7425436c, binding
/// sysUpTime.0 = NULL.
pub const GET_SYS_UPTIME: [u8; 41] = [
    0x30, 0x27, 0x02, 0x01, 0x00, 0x04, 0x04, 0x70, 0x75, 0x62, 0x6c, 0xa0, 0x1c, 0x02, 0x04,
    0x74, 0x25, 0x43, 0x6c, 0x02, 0x01, 0x00, 0x02, 0x01, 0x00, 0x30, 0x0e, 0x30, 0x0c, 0x06,
    0x08, 0x2b, 0x06, 0x01, 0x02, 0x01, 0x01, 0x03, 0x00, 0x05, 0x00,
];

pub const GET_SYS_UPTIME_REQUEST_ID: i32 = 0x7425_436c;

// =============================================================================
// Agents
// =============================================================================

/// Counts setter invocations.
#[derive(Clone, Default)]
pub struct SetCounter(Arc<AtomicUsize>);

impl SetCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Agent with sysUpTime.0 = 123 (read-only) and sysName.0 (read-write,
/// strings only), communities "publ"/"priv".
pub fn test_agent(sets: &SetCounter) -> Agent {
    let sets = sets.clone();
    Agent::builder()
        .communities(COMMUNITY_RO, COMMUNITY_RW)
        .read_only(sys_uptime(), |_| Ok(Value::Integer(123)))
        .read_write(
            sys_name(),
            |_| Ok(Value::from("router")),
            move |_, value| {
                sets.bump();
                match value {
                    Value::OctetString(_) => Ok(()),
                    _ => Err(AccessError::status(
                        ErrorStatus::BadValue,
                        "sysName must be a string",
                    )),
                }
            },
        )
        .build()
        .unwrap()
}

// =============================================================================
// Message helpers
// =============================================================================

pub fn request(community: &str, pdu: MessagePdu) -> Bytes {
    Message::v1(Bytes::copy_from_slice(community.as_bytes()), pdu).encode()
}

pub fn get_request(community: &str, request_id: i32, oids: &[Oid]) -> Bytes {
    let varbinds = oids.iter().cloned().map(VarBind::null).collect();
    request(community, MessagePdu::GetRequest(Pdu::new(request_id, varbinds)))
}

pub fn get_next_request(community: &str, request_id: i32, oids: &[Oid]) -> Bytes {
    let varbinds = oids.iter().cloned().map(VarBind::null).collect();
    request(
        community,
        MessagePdu::GetNextRequest(Pdu::new(request_id, varbinds)),
    )
}

pub fn set_request(community: &str, request_id: i32, varbinds: Vec<VarBind>) -> Bytes {
    request(community, MessagePdu::SetRequest(Pdu::new(request_id, varbinds)))
}

/// Decode a response datagram and return its Response PDU.
pub fn response_pdu(data: Bytes) -> Pdu {
    match Message::decode(data).unwrap().pdu {
        MessagePdu::Response(pdu) => pdu,
        other => panic!("expected Response PDU, got {:?}", other.pdu_type()),
    }
}
