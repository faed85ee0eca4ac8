// The Error enum carries OIDs inline for diagnostics.
#![allow(clippy::result_large_err)]

//! # snmp-agent
//!
//! Transport-independent SNMPv1 agent engine.
//!
//! Register managed objects as OIDs bound to accessor closures, then feed
//! request datagrams to [`Agent::process_datagram`] or let
//! [`Agent::serve`] run a UDP listener.
//!
//! ## Features
//!
//! - Ordered OID registry with exact and successor (GETNEXT) lookup
//! - Read and read-write community strings
//! - SNMPv1 error model: first failure wins, original bindings returned
//! - Zero-copy BER encoding/decoding
//! - Async UDP serving loop built on Tokio
//!
//! ## Quick Start
//!
//! ```rust
//! use bytes::Bytes;
//! use snmp_agent::{Agent, ErrorStatus, Value, oid};
//! use snmp_agent::handler::AccessError;
//!
//! let agent = Agent::builder()
//!     .communities("publ", "priv")
//!     .read_only(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), |_| Ok(Value::TimeTicks(123)))
//!     .read_write(
//!         oid!(1, 3, 6, 1, 2, 1, 1, 5, 0),
//!         |_| Ok(Value::from("router")),
//!         |_, value| match value {
//!             Value::OctetString(_) => Ok(()),
//!             _ => Err(AccessError::status(ErrorStatus::BadValue, "expected a string")),
//!         },
//!     )
//!     .build()?;
//!
//! // GetRequest for sysUpTime.0 with community "publ".
//! let request = Bytes::from_static(&[
//!     0x30, 0x27, 0x02, 0x01, 0x00, 0x04, 0x04, 0x70, 0x75, 0x62, 0x6c, 0xa0, 0x1c, 0x02,
//!     0x04, 0x74, 0x25, 0x43, 0x6c, 0x02, 0x01, 0x00, 0x02, 0x01, 0x00, 0x30, 0x0e, 0x30,
//!     0x0c, 0x06, 0x08, 0x2b, 0x06, 0x01, 0x02, 0x01, 0x01, 0x03, 0x00, 0x05, 0x00,
//! ]);
//! let response = agent.process_datagram(request)?;
//! assert!(!response.is_empty());
//! # Ok::<(), snmp_agent::Error>(())
//! ```
//!
//! ## Logging
//!
//! The crate logs through `tracing` with `snmp.*` structured fields and never
//! installs a subscriber. Decoder diagnostics use the `snmp_agent::ber`
//! target:
//!
//! ```bash
//! RUST_LOG=snmp_agent=debug,snmp_agent::ber=trace snmp-agentd
//! ```

pub mod agent;
pub mod ber;
pub mod error;
pub mod handler;
pub mod message;
pub mod oid;
pub mod pdu;
pub mod prelude;
pub mod transport;
pub mod value;
pub mod varbind;
pub mod version;

#[cfg(feature = "cli")]
pub mod cli;

// Re-exports for convenience
pub use agent::{Agent, AgentBuilder, Communities};
pub use error::{DecodeErrorKind, Error, ErrorStatus, OidErrorKind, Result};
pub use handler::{AccessError, LookupMode, ManagedObject, Registry};
pub use message::Message;
pub use oid::Oid;
pub use pdu::{MessagePdu, Pdu, PduType};
pub use transport::{AgentTransport, UdpAgentTransport};
pub use value::Value;
pub use varbind::VarBind;
pub use version::Version;
