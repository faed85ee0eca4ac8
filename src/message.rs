//! Community-based message envelope.
//!
//! `SEQUENCE { version INTEGER, community OCTET STRING, pdu PDU }`
//!
//! SNMPv1 and SNMPv2c share this layout; only the version number differs.
//! SNMPv3 messages use a different envelope and are rejected as soon as the
//! version field has been read.

use bytes::Bytes;

use crate::ber::{Decoder, EncodeBuf};
use crate::error::{DecodeErrorKind, Error, Result};
use crate::pdu::MessagePdu;
use crate::version::Version;

/// A decoded SNMP message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Protocol version.
    pub version: Version,
    /// Community string, compared byte for byte.
    pub community: Bytes,
    /// Protocol data unit.
    pub pdu: MessagePdu,
}

impl Message {
    /// Create a message.
    pub fn new(version: Version, community: impl Into<Bytes>, pdu: MessagePdu) -> Self {
        Self {
            version,
            community: community.into(),
            pdu,
        }
    }

    /// Create an SNMPv1 message.
    pub fn v1(community: impl Into<Bytes>, pdu: MessagePdu) -> Self {
        Self::new(Version::V1, community, pdu)
    }

    /// Encode to BER.
    pub fn encode(&self) -> Bytes {
        let mut buf = EncodeBuf::new();

        buf.push_sequence(|buf| {
            self.pdu.encode(buf);
            buf.push_octet_string(&self.community);
            buf.push_integer(self.version.as_i32());
        });

        buf.finish()
    }

    /// Decode a complete datagram.
    ///
    /// Bytes following the top-level SEQUENCE are a decode error.
    pub fn decode(data: Bytes) -> Result<Self> {
        let total = data.len();
        let (message, rest) = Self::decode_partial(data)?;
        if !rest.is_empty() {
            let offset = total - rest.len();
            tracing::debug!(target: "snmp_agent::ber", { snmp.offset = offset, count = rest.len() }, "trailing bytes after message");
            return Err(Error::decode(
                offset,
                DecodeErrorKind::TrailingBytes { count: rest.len() },
            ));
        }
        Ok(message)
    }

    /// Decode one message from the front of `data`, returning it together
    /// with whatever follows it.
    pub fn decode_partial(data: Bytes) -> Result<(Self, Bytes)> {
        let mut decoder = Decoder::new(data);
        let mut seq = decoder.read_sequence()?;

        let version_offset = seq.offset();
        let version_num = seq.read_integer()?;
        let version = Version::from_i32(version_num).ok_or_else(|| {
            tracing::debug!(target: "snmp_agent::ber", { snmp.offset = version_offset, version = version_num }, "unknown SNMP version");
            Error::decode(version_offset, DecodeErrorKind::UnknownVersion(version_num))
        })?;

        if version == Version::V3 {
            return Err(Error::UnsupportedVersion { version });
        }

        let community = seq.read_octet_string()?;
        let pdu = MessagePdu::decode(&mut seq)?;

        seq.expect_end()?;

        let message = Message {
            version,
            community,
            pdu,
        };
        Ok((message, decoder.remaining_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorStatus;
    use crate::oid;
    use crate::pdu::{Pdu, PduType};
    use crate::value::Value;
    use crate::varbind::VarBind;

    // GetRequest, community "publ", request-id 0x7425436c, sysUpTime.0
    const GET_SYS_UPTIME: [u8; 41] = [
        0x30, 0x27, 0x02, 0x01, 0x00, 0x04, 0x04, 0x70, 0x75, 0x62, 0x6C, 0xA0, 0x1C, 0x02, 0x04,
        0x74, 0x25, 0x43, 0x6C, 0x02, 0x01, 0x00, 0x02, 0x01, 0x00, 0x30, 0x0E, 0x30, 0x0C, 0x06,
        0x08, 0x2B, 0x06, 0x01, 0x02, 0x01, 0x01, 0x03, 0x00, 0x05, 0x00,
    ];

    #[test]
    fn test_decode_v1_get() {
        let msg = Message::decode(Bytes::from_static(&GET_SYS_UPTIME)).unwrap();
        assert_eq!(msg.version, Version::V1);
        assert_eq!(msg.community.as_ref(), b"publ");
        assert_eq!(msg.pdu.pdu_type(), PduType::GetRequest);
        assert_eq!(msg.pdu.request_id(), Some(0x7425_436C));
        assert_eq!(msg.encode().as_ref(), &GET_SYS_UPTIME[..]);
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut wire = GET_SYS_UPTIME.to_vec();
        wire.extend_from_slice(&[0x00, 0x00]);

        let err = Message::decode(Bytes::from(wire.clone())).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode {
                offset: 41,
                kind: DecodeErrorKind::TrailingBytes { count: 2 }
            }
        ));

        let (msg, rest) = Message::decode_partial(Bytes::from(wire)).unwrap();
        assert_eq!(msg.community.as_ref(), b"publ");
        assert_eq!(rest.as_ref(), &[0x00, 0x00]);
    }

    #[test]
    fn test_data_after_pdu_rejected() {
        let mut wire = GET_SYS_UPTIME.to_vec();
        wire[1] = 0x29;
        wire.extend_from_slice(&[0x05, 0x00]);

        assert!(matches!(
            Message::decode(Bytes::from(wire)),
            Err(Error::Decode {
                offset: 41,
                kind: DecodeErrorKind::TrailingBytes { count: 2 }
            })
        ));
    }

    #[test]
    fn test_truncated_datagram_rejected() {
        let wire = Bytes::copy_from_slice(&GET_SYS_UPTIME[..30]);
        assert!(matches!(
            Message::decode(wire),
            Err(Error::Decode { .. })
        ));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut wire = GET_SYS_UPTIME;
        wire[4] = 0x02;
        assert!(matches!(
            Message::decode(Bytes::copy_from_slice(&wire)),
            Err(Error::Decode {
                kind: DecodeErrorKind::UnknownVersion(2),
                ..
            })
        ));
    }

    #[test]
    fn test_v3_rejected_before_envelope() {
        let mut wire = GET_SYS_UPTIME;
        wire[4] = 0x03;
        assert!(matches!(
            Message::decode(Bytes::copy_from_slice(&wire)),
            Err(Error::UnsupportedVersion {
                version: Version::V3
            })
        ));
    }

    #[test]
    fn test_v2c_decodes() {
        let mut wire = GET_SYS_UPTIME;
        wire[4] = 0x01;
        let msg = Message::decode(Bytes::copy_from_slice(&wire)).unwrap();
        assert_eq!(msg.version, Version::V2c);
    }

    #[test]
    fn test_response_encodes_and_decodes_equal() {
        let response = Message::v1(
            "publ",
            MessagePdu::Response(Pdu::response(
                0x7425_436C,
                ErrorStatus::NoError,
                0,
                vec![VarBind::new(
                    oid!(1, 3, 6, 1, 2, 1, 1, 3, 0),
                    Value::Integer(123),
                )],
            )),
        );
        assert_eq!(Message::decode(response.encode()).unwrap(), response);
    }
}
