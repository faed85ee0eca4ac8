//! SNMPv1 agent.
//!
//! An [`Agent`] owns a frozen [`Registry`] of managed objects and the
//! community strings that guard it. Requests flow through four gates:
//!
//! 1. decode: malformed datagrams and trailing bytes are dropped
//! 2. version: only SNMPv1 is serviced
//! 3. community: unknown communities are dropped
//! 4. PDU kind: GetRequest, GetNextRequest and SetRequest are processed,
//!    every other kind is dropped
//!
//! A dropped request produces an [`Error`] and nothing is sent back. Anything
//! that passes the gates produces exactly one Response.
//!
//! # Example
//!
//! ```rust,no_run
//! use snmp_agent::agent::Agent;
//! use snmp_agent::transport::UdpAgentTransport;
//! use snmp_agent::{Value, oid};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> snmp_agent::Result<()> {
//! let agent = Agent::builder()
//!     .communities("publ", "priv")
//!     .read_only(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), |_| Ok(Value::TimeTicks(123)))
//!     .build()?;
//!
//! let transport = UdpAgentTransport::bind("0.0.0.0:161").await?;
//! agent.serve(&transport, CancellationToken::new()).await
//! # }
//! ```

mod access;
mod processor;

pub use access::Communities;
pub use processor::process_pdu;

use std::sync::Arc;

use bytes::Bytes;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, ErrorStatus, Result};
use crate::handler::{AccessError, Registry, Response, getter, setter};
use crate::message::Message;
use crate::oid::Oid;
use crate::pdu::{MessagePdu, Pdu};
use crate::transport::AgentTransport;
use crate::value::Value;
use crate::version::Version;

/// Largest UDP payload over IPv4.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 65507;

struct AgentInner {
    registry: Registry,
    communities: Communities,
    max_message_size: usize,
}

/// SNMPv1 agent engine.
///
/// Cheap to clone; clones share the registry. Processing holds no locks, so
/// one agent may serve datagrams from several tasks at once.
#[derive(Clone)]
pub struct Agent {
    inner: Arc<AgentInner>,
}

impl Agent {
    /// Start building an agent.
    pub fn builder() -> AgentBuilder {
        AgentBuilder::new()
    }

    /// The managed objects served by this agent.
    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    /// The configured communities.
    pub fn communities(&self) -> &Communities {
        &self.inner.communities
    }

    /// Maximum datagram size accepted and produced.
    pub fn max_message_size(&self) -> usize {
        self.inner.max_message_size
    }

    /// Process a decoded request.
    ///
    /// Returns the response message, or an error if the request must be
    /// dropped without a response.
    pub fn process_message(&self, request: &Message) -> Result<Message> {
        if request.version != Version::V1 {
            tracing::debug!(version = %request.version, "unsupported version");
            return Err(Error::UnsupportedVersion {
                version: request.version,
            });
        }

        let writable = self.inner.communities.check(&request.community)?;

        let (pdu, response) = match &request.pdu {
            MessagePdu::GetRequest(pdu) => (pdu, self.process(pdu, false, false)),
            MessagePdu::GetNextRequest(pdu) => (pdu, self.process(pdu, true, false)),
            MessagePdu::SetRequest(pdu) if writable => (pdu, self.process(pdu, false, true)),
            MessagePdu::SetRequest(pdu) => {
                tracing::debug!(
                    snmp.request_id = pdu.request_id,
                    "SET with read-only community"
                );
                (
                    pdu,
                    Response::error(ErrorStatus::NoSuchName, 1, pdu.varbinds.clone()),
                )
            }
            MessagePdu::Response(_)
            | MessagePdu::TrapV1(_)
            | MessagePdu::GetBulkRequest(_)
            | MessagePdu::InformRequest(_)
            | MessagePdu::TrapV2(_) => {
                let pdu_type = request.pdu.pdu_type();
                tracing::debug!(%pdu_type, "PDU not supported");
                return Err(Error::UnsupportedPdu { pdu_type });
            }
        };

        tracing::debug!(
            snmp.request_id = pdu.request_id,
            snmp.error_status = %response.error_status,
            snmp.error_index = response.error_index,
            varbinds = response.varbinds.len(),
            "response"
        );

        Ok(Message {
            version: request.version,
            community: request.community.clone(),
            pdu: MessagePdu::Response(Pdu::response(
                pdu.request_id,
                response.error_status,
                response.error_index,
                response.varbinds,
            )),
        })
    }

    fn process(&self, pdu: &Pdu, next: bool, mutate: bool) -> Response {
        tracing::debug!(
            snmp.request_id = pdu.request_id,
            varbinds = pdu.varbinds.len(),
            next,
            mutate,
            "request"
        );
        process_pdu(&self.inner.registry, &pdu.varbinds, next, mutate)
    }

    /// Process a raw datagram.
    ///
    /// Returns the encoded response, or an error if the datagram is dropped.
    /// A response that would exceed the maximum message size is replaced by
    /// a `tooBig` response carrying the request's bindings.
    pub fn process_datagram(&self, data: Bytes) -> Result<Bytes> {
        let max = self.inner.max_message_size;
        if data.len() > max {
            return Err(Error::MessageTooLarge {
                size: data.len(),
                max,
            });
        }

        let request = Message::decode(data)?;
        let response = self.process_message(&request)?;
        let encoded = response.encode();
        if encoded.len() <= max {
            return Ok(encoded);
        }

        tracing::debug!(size = encoded.len(), max, "response too big");
        let (MessagePdu::GetRequest(req)
        | MessagePdu::GetNextRequest(req)
        | MessagePdu::SetRequest(req)) = &request.pdu
        else {
            return Err(Error::MessageTooLarge {
                size: encoded.len(),
                max,
            });
        };
        let too_big = Message {
            pdu: MessagePdu::Response(Pdu::response(
                req.request_id,
                ErrorStatus::TooBig,
                0,
                req.varbinds.clone(),
            )),
            ..response
        };
        let encoded = too_big.encode();
        if encoded.len() > max {
            return Err(Error::MessageTooLarge {
                size: encoded.len(),
                max,
            });
        }
        Ok(encoded)
    }

    /// Serve requests from `transport` until `cancel` fires.
    ///
    /// Datagrams are handled one at a time. Dropped requests are logged at
    /// debug level; a failed send is logged and the loop carries on. A
    /// receive error ends the loop.
    pub async fn serve<T: AgentTransport>(
        &self,
        transport: &T,
        cancel: CancellationToken,
    ) -> Result<()> {
        let mut buf = vec![0u8; self.inner.max_message_size];
        tracing::info!(snmp.local_addr = %transport.local_addr(), "agent listening");

        loop {
            let (len, source) = tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("agent shutting down");
                    return Ok(());
                }
                received = transport.recv_from(&mut buf) => received?,
            };

            let data = Bytes::copy_from_slice(&buf[..len]);
            tracing::trace!(snmp.source = %source, snmp.bytes = len, "received datagram");

            let response = match self.process_datagram(data) {
                Ok(response) => response,
                Err(e) => {
                    let e = e.with_target(source);
                    tracing::debug!(snmp.source = %source, error = %e, "dropping request");
                    continue;
                }
            };

            if let Err(e) = transport.send_to(&response, source).await {
                tracing::warn!(snmp.source = %source, error = %e, "failed to send response");
            }
        }
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("objects", &self.inner.registry.len())
            .field("max_message_size", &self.inner.max_message_size)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Agent`].
///
/// Registration errors are kept and reported by [`build`](Self::build), so
/// registrations can be chained.
pub struct AgentBuilder {
    registry: Registry,
    communities: Communities,
    max_message_size: usize,
    error: Option<Error>,
}

impl AgentBuilder {
    /// Create a builder with communities `public`/`private` and no objects.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            communities: Communities::default(),
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            error: None,
        }
    }

    /// Set the read-only and read-write communities.
    pub fn communities(mut self, read: impl Into<Bytes>, write: impl Into<Bytes>) -> Self {
        self.communities = Communities::new(read, write);
        self
    }

    /// Set the maximum request and response size (default 65507).
    pub fn max_message_size(mut self, size: usize) -> Self {
        self.max_message_size = size;
        self
    }

    /// Replace the registry with one built elsewhere.
    ///
    /// Objects registered on this builder before the call are discarded.
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Register a read-only object.
    pub fn read_only<G>(mut self, oid: Oid, get: G) -> Self
    where
        G: Fn(&Oid) -> std::result::Result<Value, AccessError> + Send + Sync + 'static,
    {
        let result = self.registry.register_read_only(oid, getter(get));
        self.keep_first_error(result);
        self
    }

    /// Register a read-write object.
    pub fn read_write<G, S>(mut self, oid: Oid, get: G, set: S) -> Self
    where
        G: Fn(&Oid) -> std::result::Result<Value, AccessError> + Send + Sync + 'static,
        S: Fn(&Oid, &Value) -> std::result::Result<(), AccessError> + Send + Sync + 'static,
    {
        let result = self
            .registry
            .register_read_write(oid, getter(get), setter(set));
        self.keep_first_error(result);
        self
    }

    fn keep_first_error(&mut self, result: Result<()>) {
        if let Err(e) = result
            && self.error.is_none()
        {
            self.error = Some(e);
        }
    }

    /// Build the agent, freezing its registry.
    pub fn build(self) -> Result<Agent> {
        if let Some(e) = self.error {
            return Err(e);
        }

        tracing::debug!(
            objects = self.registry.len(),
            max_message_size = self.max_message_size,
            "agent built"
        );

        Ok(Agent {
            inner: Arc::new(AgentInner {
                registry: self.registry,
                communities: self.communities,
                max_message_size: self.max_message_size,
            }),
        })
    }
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
