//! End-to-end request processing through `Agent::process_datagram`.

mod common;

use bytes::Bytes;
use common::*;
use snmp_agent::pdu::{GetBulkPdu, MessagePdu, Pdu, TrapV1Pdu};
use snmp_agent::{Agent, DecodeErrorKind, Error, ErrorStatus, Message, PduType, Value, VarBind, Version, oid};

#[test]
fn get_known_object() {
    let agent = test_agent(&SetCounter::default());
    let pdu = response_pdu(agent.process_datagram(Bytes::from_static(&GET_SYS_UPTIME)).unwrap());

    assert_eq!(pdu.request_id, GET_SYS_UPTIME_REQUEST_ID);
    assert_eq!(pdu.status(), ErrorStatus::NoError);
    assert_eq!(pdu.error_index, 0);
    assert_eq!(pdu.varbinds, vec![VarBind::new(sys_uptime(), Value::Integer(123))]);
}

#[test]
fn response_envelope_matches_request() {
    let agent = test_agent(&SetCounter::default());
    let response = agent.process_datagram(Bytes::from_static(&GET_SYS_UPTIME)).unwrap();
    let message = Message::decode(response).unwrap();
    assert_eq!(message.version, Version::V1);
    assert_eq!(message.community.as_ref(), COMMUNITY_RO.as_bytes());
    assert_eq!(message.pdu.pdu_type(), PduType::Response);
}

#[test]
fn get_next_from_object_prefix() {
    let agent = test_agent(&SetCounter::default());
    let pdu = response_pdu(
        agent
            .process_datagram(get_next_request(COMMUNITY_RO, 9, &[sys_uptime_object()]))
            .unwrap(),
    );

    assert_eq!(pdu.status(), ErrorStatus::NoError);
    assert_eq!(pdu.varbinds, vec![VarBind::new(sys_uptime(), Value::Integer(123))]);
}

#[test]
fn get_next_walks_registry() {
    let agent = test_agent(&SetCounter::default());
    let mut cursor = oid!(1, 3, 6, 1);
    let mut seen = Vec::new();

    loop {
        let pdu = response_pdu(
            agent
                .process_datagram(get_next_request(COMMUNITY_RO, 1, &[cursor.clone()]))
                .unwrap(),
        );
        if pdu.status() != ErrorStatus::NoError {
            assert_eq!(pdu.status(), ErrorStatus::NoSuchName);
            assert_eq!(pdu.varbinds, vec![VarBind::null(cursor)]);
            break;
        }
        cursor = pdu.varbinds[0].oid.clone();
        seen.push(cursor.clone());
    }

    assert_eq!(seen, vec![sys_uptime(), sys_name()]);
}

#[test]
fn registered_object_is_not_its_instance() {
    let agent = Agent::builder()
        .communities(COMMUNITY_RO, COMMUNITY_RW)
        .read_only(sys_uptime_object(), |_| Ok(Value::Integer(123)))
        .build()
        .unwrap();

    let pdu = response_pdu(agent.process_datagram(Bytes::from_static(&GET_SYS_UPTIME)).unwrap());
    assert_eq!(pdu.status(), ErrorStatus::NoSuchName);
    assert_eq!(pdu.error_index, 1);
}

#[test]
fn missing_object_returns_original_bindings() {
    let agent = test_agent(&SetCounter::default());
    let oids = [sys_uptime(), nonexistent_oid(), sys_name()];
    let pdu = response_pdu(
        agent
            .process_datagram(get_request(COMMUNITY_RO, 3, &oids))
            .unwrap(),
    );

    assert_eq!(pdu.status(), ErrorStatus::NoSuchName);
    assert_eq!(pdu.error_index, 2);
    let expected: Vec<VarBind> = oids.iter().cloned().map(VarBind::null).collect();
    assert_eq!(pdu.varbinds, expected);
}

#[test]
fn getter_error_status_is_reported() {
    let agent = Agent::builder()
        .communities(COMMUNITY_RO, COMMUNITY_RW)
        .read_only(sys_uptime(), |_| {
            Err(snmp_agent::AccessError::status(ErrorStatus::BadValue, "broken"))
        })
        .build()
        .unwrap();

    let pdu = response_pdu(agent.process_datagram(Bytes::from_static(&GET_SYS_UPTIME)).unwrap());
    assert_eq!(pdu.status(), ErrorStatus::BadValue);
    assert_eq!(pdu.error_index, 1);
    assert_eq!(pdu.varbinds, vec![VarBind::null(sys_uptime())]);
}

#[test]
fn untyped_getter_error_is_gen_err() {
    let agent = Agent::builder()
        .communities(COMMUNITY_RO, COMMUNITY_RW)
        .read_only(sys_uptime(), |_| {
            Err(std::io::Error::other("counter unavailable").into())
        })
        .build()
        .unwrap();

    let pdu = response_pdu(agent.process_datagram(Bytes::from_static(&GET_SYS_UPTIME)).unwrap());
    assert_eq!(pdu.status(), ErrorStatus::GenErr);
    assert_eq!(pdu.error_index, 1);
}

#[test]
fn set_with_write_community() {
    let sets = SetCounter::default();
    let agent = test_agent(&sets);
    let varbinds = vec![VarBind::new(sys_name(), Value::from("core-1"))];
    let pdu = response_pdu(
        agent
            .process_datagram(set_request(COMMUNITY_RW, 5, varbinds.clone()))
            .unwrap(),
    );

    assert_eq!(pdu.status(), ErrorStatus::NoError);
    assert_eq!(pdu.varbinds, varbinds);
    assert_eq!(sets.get(), 1);
}

#[test]
fn set_with_read_community_never_calls_setter() {
    let sets = SetCounter::default();
    let agent = test_agent(&sets);
    let varbinds = vec![
        VarBind::new(sys_name(), Value::from("core-1")),
        VarBind::new(sys_name(), Value::from("core-2")),
    ];
    let pdu = response_pdu(
        agent
            .process_datagram(set_request(COMMUNITY_RO, 5, varbinds.clone()))
            .unwrap(),
    );

    assert_eq!(pdu.status(), ErrorStatus::NoSuchName);
    assert_eq!(pdu.error_index, 1);
    assert_eq!(pdu.varbinds, varbinds);
    assert_eq!(sets.get(), 0);
}

#[test]
fn set_bad_value() {
    let sets = SetCounter::default();
    let agent = test_agent(&sets);
    let varbinds = vec![VarBind::new(sys_name(), Value::Integer(7))];
    let pdu = response_pdu(
        agent
            .process_datagram(set_request(COMMUNITY_RW, 5, varbinds.clone()))
            .unwrap(),
    );

    assert_eq!(pdu.status(), ErrorStatus::BadValue);
    assert_eq!(pdu.error_index, 1);
    assert_eq!(pdu.varbinds, varbinds);
}

#[test]
fn set_read_only_object_is_not_writable() {
    let agent = test_agent(&SetCounter::default());
    let pdu = response_pdu(
        agent
            .process_datagram(set_request(
                COMMUNITY_RW,
                5,
                vec![VarBind::new(sys_uptime(), Value::Integer(0))],
            ))
            .unwrap(),
    );
    assert_eq!(pdu.status(), ErrorStatus::NotWritable);
    assert_eq!(pdu.error_index, 1);
}

#[test]
fn wrong_community_is_dropped() {
    let agent = Agent::builder()
        .communities("public", "private")
        .read_only(sys_uptime(), |_| Ok(Value::Integer(123)))
        .build()
        .unwrap();

    let err = agent
        .process_datagram(Bytes::from_static(&GET_SYS_UPTIME))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidCommunity { .. }));
}

#[test]
fn v2c_request_is_dropped() {
    let agent = test_agent(&SetCounter::default());
    let mut wire = GET_SYS_UPTIME;
    wire[4] = 0x01;
    let err = agent
        .process_datagram(Bytes::copy_from_slice(&wire))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedVersion {
            version: Version::V2c
        }
    ));
}

#[test]
fn unserviced_pdu_kinds_are_dropped() {
    let agent = test_agent(&SetCounter::default());
    let binding = vec![VarBind::null(sys_uptime())];
    let pdus = [
        MessagePdu::Response(Pdu::new(1, binding.clone())),
        MessagePdu::TrapV1(TrapV1Pdu {
            enterprise: oid!(1, 3, 6, 1, 4, 1, 99999),
            agent_addr: [127, 0, 0, 1],
            generic_trap: 0,
            specific_trap: 0,
            time_stamp: 0,
            varbinds: Vec::new(),
        }),
        MessagePdu::GetBulkRequest(GetBulkPdu {
            request_id: 1,
            non_repeaters: 0,
            max_repetitions: 10,
            varbinds: binding.clone(),
        }),
        MessagePdu::InformRequest(Pdu::new(1, binding.clone())),
        MessagePdu::TrapV2(Pdu::new(1, binding.clone())),
    ];

    for pdu in pdus {
        let expected = pdu.pdu_type();
        let err = agent
            .process_datagram(request(COMMUNITY_RW, pdu))
            .unwrap_err();
        assert!(
            matches!(err, Error::UnsupportedPdu { pdu_type } if pdu_type == expected),
            "{expected} should be rejected, got {err}"
        );
    }
}

#[test]
fn trailing_bytes_are_dropped() {
    let agent = test_agent(&SetCounter::default());
    let mut wire = GET_SYS_UPTIME.to_vec();
    wire.push(0x00);
    let err = agent.process_datagram(Bytes::from(wire)).unwrap_err();
    assert!(matches!(
        err,
        Error::Decode {
            kind: DecodeErrorKind::TrailingBytes { count: 1 },
            ..
        }
    ));
}

#[test]
fn data_inside_message_after_pdu_is_dropped() {
    let agent = test_agent(&SetCounter::default());
    let mut wire = GET_SYS_UPTIME.to_vec();
    wire[1] = 0x29;
    wire.extend_from_slice(&[0x05, 0x00]);
    let err = agent.process_datagram(Bytes::from(wire)).unwrap_err();
    assert!(matches!(
        err,
        Error::Decode {
            kind: DecodeErrorKind::TrailingBytes { count: 2 },
            ..
        }
    ));
}

#[test]
fn padded_request_id_is_echoed() {
    let agent = test_agent(&SetCounter::default());
    // Same GetRequest with request-id 42 encoded as 02 05 00 00 00 00 2a.
    let mut wire = GET_SYS_UPTIME[..13].to_vec();
    wire.extend_from_slice(&[0x02, 0x05, 0x00, 0x00, 0x00, 0x00, 0x2A]);
    wire.extend_from_slice(&GET_SYS_UPTIME[19..]);
    wire[1] = 0x28;
    wire[12] = 0x1D;

    let pdu = response_pdu(agent.process_datagram(Bytes::from(wire)).unwrap());
    assert_eq!(pdu.request_id, 42);
    assert_eq!(pdu.varbinds, vec![VarBind::new(sys_uptime(), Value::Integer(123))]);
}

#[test]
fn oversized_request_id_is_dropped() {
    let agent = test_agent(&SetCounter::default());
    let mut wire = GET_SYS_UPTIME[..13].to_vec();
    wire.extend_from_slice(&[0x02, 0x05, 0x01, 0x00, 0x00, 0x00, 0x2A]);
    wire.extend_from_slice(&GET_SYS_UPTIME[19..]);
    wire[1] = 0x28;
    wire[12] = 0x1D;

    let err = agent.process_datagram(Bytes::from(wire)).unwrap_err();
    assert!(matches!(
        err,
        Error::Decode {
            offset: 15,
            kind: DecodeErrorKind::IntegerTooLong { length: 5 }
        }
    ));
}

#[test]
fn garbage_is_dropped() {
    let agent = test_agent(&SetCounter::default());
    for data in [&b""[..], &b"\x30"[..], &b"hello world"[..], &GET_SYS_UPTIME[..20]] {
        assert!(agent.process_datagram(Bytes::copy_from_slice(data)).is_err());
    }
}

#[test]
fn duplicate_registration_fails_build() {
    let err = Agent::builder()
        .read_only(sys_descr(), |_| Ok(Value::from("a")))
        .read_write(sys_descr(), |_| Ok(Value::from("b")), |_, _| Ok(()))
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::AlreadyRegistered { oid } if oid == sys_descr()));
}

#[test]
fn process_message_round_trips_through_codec() {
    let agent = test_agent(&SetCounter::default());
    let request = Message::decode(Bytes::from_static(&GET_SYS_UPTIME)).unwrap();
    let response = agent.process_message(&request).unwrap();
    assert_eq!(Message::decode(response.encode()).unwrap(), response);
}
