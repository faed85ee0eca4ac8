//! Protocol data units.
//!
//! Every PDU kind an SNMP peer can put on the wire decodes into
//! [`MessagePdu`], even though the agent only services GetRequest,
//! GetNextRequest and SetRequest. Having the full set lets the dispatcher
//! reject the others with a precise [`PduType`] instead of a decode error.

use crate::ber::{Decoder, EncodeBuf, tag};
use crate::error::{DecodeErrorKind, Error, ErrorStatus, Result};
use crate::oid::Oid;
use crate::varbind::{VarBind, decode_varbind_list, encode_varbind_list};

/// PDU kind, identified by its context-specific constructed tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PduType {
    GetRequest,
    GetNextRequest,
    Response,
    SetRequest,
    TrapV1,
    GetBulkRequest,
    InformRequest,
    TrapV2,
}

impl PduType {
    /// Wire tag for this PDU kind.
    pub const fn tag(self) -> u8 {
        match self {
            PduType::GetRequest => tag::pdu::GET_REQUEST,
            PduType::GetNextRequest => tag::pdu::GET_NEXT_REQUEST,
            PduType::Response => tag::pdu::RESPONSE,
            PduType::SetRequest => tag::pdu::SET_REQUEST,
            PduType::TrapV1 => tag::pdu::TRAP_V1,
            PduType::GetBulkRequest => tag::pdu::GET_BULK_REQUEST,
            PduType::InformRequest => tag::pdu::INFORM_REQUEST,
            PduType::TrapV2 => tag::pdu::TRAP_V2,
        }
    }

    /// PDU kind for a wire tag.
    pub const fn from_tag(value: u8) -> Option<Self> {
        match value {
            tag::pdu::GET_REQUEST => Some(PduType::GetRequest),
            tag::pdu::GET_NEXT_REQUEST => Some(PduType::GetNextRequest),
            tag::pdu::RESPONSE => Some(PduType::Response),
            tag::pdu::SET_REQUEST => Some(PduType::SetRequest),
            tag::pdu::TRAP_V1 => Some(PduType::TrapV1),
            tag::pdu::GET_BULK_REQUEST => Some(PduType::GetBulkRequest),
            tag::pdu::INFORM_REQUEST => Some(PduType::InformRequest),
            tag::pdu::TRAP_V2 => Some(PduType::TrapV2),
            _ => None,
        }
    }
}

impl std::fmt::Display for PduType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PduType::GetRequest => "GetRequest",
            PduType::GetNextRequest => "GetNextRequest",
            PduType::Response => "Response",
            PduType::SetRequest => "SetRequest",
            PduType::TrapV1 => "Trap",
            PduType::GetBulkRequest => "GetBulkRequest",
            PduType::InformRequest => "InformRequest",
            PduType::TrapV2 => "SNMPv2-Trap",
        };
        f.write_str(name)
    }
}

/// Request/response PDU body shared by every kind except Trap and GetBulk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pdu {
    /// Request identifier, echoed in the response.
    pub request_id: i32,
    /// Error status (0 in requests).
    pub error_status: i32,
    /// 1-based error index (0 in requests).
    pub error_index: i32,
    /// Variable bindings.
    pub varbinds: Vec<VarBind>,
}

impl Pdu {
    /// Create a request body.
    pub fn new(request_id: i32, varbinds: Vec<VarBind>) -> Self {
        Self {
            request_id,
            error_status: 0,
            error_index: 0,
            varbinds,
        }
    }

    /// Create a response body.
    pub fn response(
        request_id: i32,
        error_status: ErrorStatus,
        error_index: i32,
        varbinds: Vec<VarBind>,
    ) -> Self {
        Self {
            request_id,
            error_status: error_status.as_i32(),
            error_index,
            varbinds,
        }
    }

    /// Error status as an enum.
    pub fn status(&self) -> ErrorStatus {
        ErrorStatus::from_i32(self.error_status)
    }

    fn encode_with_tag(&self, buf: &mut EncodeBuf, pdu_tag: u8) {
        buf.push_constructed(pdu_tag, |buf| {
            encode_varbind_list(buf, &self.varbinds);
            buf.push_integer(self.error_index);
            buf.push_integer(self.error_status);
            buf.push_integer(self.request_id);
        });
    }

    fn decode_body(body: &mut Decoder) -> Result<Self> {
        let request_id = body.read_integer()?;
        let error_status = body.read_integer()?;
        let error_index = body.read_integer()?;
        let varbinds = decode_varbind_list(body)?;
        Ok(Self {
            request_id,
            error_status,
            error_index,
            varbinds,
        })
    }
}

/// GetBulkRequest body. Decoded so that it can be rejected by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetBulkPdu {
    pub request_id: i32,
    pub non_repeaters: i32,
    pub max_repetitions: i32,
    pub varbinds: Vec<VarBind>,
}

impl GetBulkPdu {
    fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_constructed(tag::pdu::GET_BULK_REQUEST, |buf| {
            encode_varbind_list(buf, &self.varbinds);
            buf.push_integer(self.max_repetitions);
            buf.push_integer(self.non_repeaters);
            buf.push_integer(self.request_id);
        });
    }

    fn decode_body(body: &mut Decoder) -> Result<Self> {
        let request_id = body.read_integer()?;
        let non_repeaters = body.read_integer()?;
        let max_repetitions = body.read_integer()?;
        let varbinds = decode_varbind_list(body)?;
        Ok(Self {
            request_id,
            non_repeaters,
            max_repetitions,
            varbinds,
        })
    }
}

/// SNMPv1 Trap body (RFC 1157 section 4.1.6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrapV1Pdu {
    /// sysObjectID of the sending entity.
    pub enterprise: Oid,
    /// Address of the sending agent.
    pub agent_addr: [u8; 4],
    /// Generic trap code (0 coldStart .. 6 enterpriseSpecific).
    pub generic_trap: i32,
    /// Enterprise specific code.
    pub specific_trap: i32,
    /// sysUpTime at the time of the event.
    pub time_stamp: u32,
    pub varbinds: Vec<VarBind>,
}

impl TrapV1Pdu {
    fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_constructed(tag::pdu::TRAP_V1, |buf| {
            encode_varbind_list(buf, &self.varbinds);
            buf.push_unsigned32(tag::application::TIMETICKS, self.time_stamp);
            buf.push_integer(self.specific_trap);
            buf.push_integer(self.generic_trap);
            buf.push_ip_address(self.agent_addr);
            buf.push_oid(&self.enterprise);
        });
    }

    fn decode_body(body: &mut Decoder) -> Result<Self> {
        let enterprise = body.read_oid()?;
        let len = body.expect_tag(tag::application::IP_ADDRESS)?;
        let agent_addr = body.read_ip_address_value(len)?;
        let generic_trap = body.read_integer()?;
        let specific_trap = body.read_integer()?;
        let len = body.expect_tag(tag::application::TIMETICKS)?;
        let time_stamp = body.read_unsigned32_value(len)?;
        let varbinds = decode_varbind_list(body)?;
        Ok(Self {
            enterprise,
            agent_addr,
            generic_trap,
            specific_trap,
            time_stamp,
            varbinds,
        })
    }
}

/// Any PDU that can appear in a community-based message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagePdu {
    GetRequest(Pdu),
    GetNextRequest(Pdu),
    Response(Pdu),
    SetRequest(Pdu),
    TrapV1(TrapV1Pdu),
    GetBulkRequest(GetBulkPdu),
    InformRequest(Pdu),
    TrapV2(Pdu),
}

impl MessagePdu {
    /// Kind of this PDU.
    pub fn pdu_type(&self) -> PduType {
        match self {
            MessagePdu::GetRequest(_) => PduType::GetRequest,
            MessagePdu::GetNextRequest(_) => PduType::GetNextRequest,
            MessagePdu::Response(_) => PduType::Response,
            MessagePdu::SetRequest(_) => PduType::SetRequest,
            MessagePdu::TrapV1(_) => PduType::TrapV1,
            MessagePdu::GetBulkRequest(_) => PduType::GetBulkRequest,
            MessagePdu::InformRequest(_) => PduType::InformRequest,
            MessagePdu::TrapV2(_) => PduType::TrapV2,
        }
    }

    /// Request identifier, for kinds that carry one.
    pub fn request_id(&self) -> Option<i32> {
        match self {
            MessagePdu::GetRequest(pdu)
            | MessagePdu::GetNextRequest(pdu)
            | MessagePdu::Response(pdu)
            | MessagePdu::SetRequest(pdu)
            | MessagePdu::InformRequest(pdu)
            | MessagePdu::TrapV2(pdu) => Some(pdu.request_id),
            MessagePdu::GetBulkRequest(pdu) => Some(pdu.request_id),
            MessagePdu::TrapV1(_) => None,
        }
    }

    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        match self {
            MessagePdu::GetRequest(pdu)
            | MessagePdu::GetNextRequest(pdu)
            | MessagePdu::Response(pdu)
            | MessagePdu::SetRequest(pdu)
            | MessagePdu::InformRequest(pdu)
            | MessagePdu::TrapV2(pdu) => pdu.encode_with_tag(buf, self.pdu_type().tag()),
            MessagePdu::TrapV1(trap) => trap.encode(buf),
            MessagePdu::GetBulkRequest(bulk) => bulk.encode(buf),
        }
    }

    /// Decode from BER.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let offset = decoder.offset();
        let (pdu_tag, len) = decoder.read_header()?;
        let Some(pdu_type) = PduType::from_tag(pdu_tag) else {
            tracing::debug!(target: "snmp_agent::ber", { snmp.offset = offset, tag = pdu_tag }, "unknown PDU tag");
            return Err(Error::decode(
                offset,
                DecodeErrorKind::UnknownPduType(pdu_tag),
            ));
        };
        let mut body = decoder.sub_decoder(len)?;

        let pdu = match pdu_type {
            PduType::GetRequest => MessagePdu::GetRequest(Pdu::decode_body(&mut body)?),
            PduType::GetNextRequest => MessagePdu::GetNextRequest(Pdu::decode_body(&mut body)?),
            PduType::Response => MessagePdu::Response(Pdu::decode_body(&mut body)?),
            PduType::SetRequest => MessagePdu::SetRequest(Pdu::decode_body(&mut body)?),
            PduType::TrapV1 => MessagePdu::TrapV1(TrapV1Pdu::decode_body(&mut body)?),
            PduType::GetBulkRequest => {
                MessagePdu::GetBulkRequest(GetBulkPdu::decode_body(&mut body)?)
            }
            PduType::InformRequest => MessagePdu::InformRequest(Pdu::decode_body(&mut body)?),
            PduType::TrapV2 => MessagePdu::TrapV2(Pdu::decode_body(&mut body)?),
        };
        body.expect_end()?;

        Ok(pdu)
    }
}
