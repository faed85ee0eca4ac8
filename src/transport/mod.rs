//! Transport layer for the agent.
//!
//! [`Agent::serve`](crate::agent::Agent::serve) is generic over
//! [`AgentTransport`], so the serving loop can run on a real UDP socket
//! ([`UdpAgentTransport`]) or on an in-memory transport in tests.

mod udp;

pub use udp::*;

use crate::error::Result;
use std::future::Future;
use std::net::SocketAddr;

/// Agent-side transport abstraction (listener mode).
pub trait AgentTransport: Send + Sync {
    /// Receive one datagram from any source.
    fn recv_from(&self, buf: &mut [u8])
    -> impl Future<Output = Result<(usize, SocketAddr)>> + Send;

    /// Send one datagram to a specific target.
    fn send_to(&self, data: &[u8], target: SocketAddr) -> impl Future<Output = Result<()>> + Send;

    /// Local bind address.
    fn local_addr(&self) -> SocketAddr;
}
