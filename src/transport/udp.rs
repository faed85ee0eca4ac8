//! UDP listener for the agent.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;

use super::AgentTransport;
use crate::error::{Error, Result};

/// UDP socket bound to the agent's listening address.
///
/// Cheap to clone; clones share the socket.
///
/// ```rust,no_run
/// use snmp_agent::transport::UdpAgentTransport;
///
/// # async fn example() -> snmp_agent::Result<()> {
/// let transport = UdpAgentTransport::builder()
///     .bind("0.0.0.0:161")
///     .recv_buffer_size(4 * 1024 * 1024)
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct UdpAgentTransport {
    socket: Arc<UdpSocket>,
    local_addr: SocketAddr,
}

impl UdpAgentTransport {
    /// Bind with default socket options.
    pub async fn bind(addr: impl Into<String>) -> Result<Self> {
        Self::builder().bind(addr).build().await
    }

    /// Create a builder for non-default socket options.
    pub fn builder() -> UdpAgentTransportBuilder {
        UdpAgentTransportBuilder::new()
    }
}

impl std::fmt::Debug for UdpAgentTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UdpAgentTransport")
            .field("local_addr", &self.local_addr)
            .finish()
    }
}

impl AgentTransport for UdpAgentTransport {
    async fn recv_from(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr)> {
        self.socket
            .recv_from(buf)
            .await
            .map_err(|source| Error::Io {
                target: None,
                source,
            })
    }

    async fn send_to(&self, data: &[u8], target: SocketAddr) -> Result<()> {
        let sent = self
            .socket
            .send_to(data, target)
            .await
            .map_err(|source| Error::Io {
                target: Some(target),
                source,
            })?;
        tracing::trace!(snmp.target = %target, snmp.bytes = sent, "sent datagram");
        Ok(())
    }

    fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

/// Builder for [`UdpAgentTransport`].
#[derive(Debug, Clone)]
pub struct UdpAgentTransportBuilder {
    bind_addr: String,
    recv_buffer_size: Option<usize>,
}

impl UdpAgentTransportBuilder {
    /// Create a builder bound to `0.0.0.0:161`.
    pub fn new() -> Self {
        Self {
            bind_addr: "0.0.0.0:161".into(),
            recv_buffer_size: None,
        }
    }

    /// Set the local bind address. Use `[::]:port` for dual-stack.
    pub fn bind(mut self, addr: impl Into<String>) -> Self {
        self.bind_addr = addr.into();
        self
    }

    /// Request a kernel receive buffer size (capped by `net.core.rmem_max`).
    pub fn recv_buffer_size(mut self, size: usize) -> Self {
        self.recv_buffer_size = Some(size);
        self
    }

    /// Bind the socket.
    pub async fn build(self) -> Result<UdpAgentTransport> {
        let bind_addr: SocketAddr = self.bind_addr.parse().map_err(|_| Error::Io {
            target: None,
            source: io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid bind address: {}", self.bind_addr),
            ),
        })?;

        let socket = bind_udp_socket(bind_addr, self.recv_buffer_size).map_err(|e| Error::Io {
            target: Some(bind_addr),
            source: e,
        })?;

        let local_addr = socket.local_addr().map_err(|e| Error::Io {
            target: Some(bind_addr),
            source: e,
        })?;

        tracing::debug!(snmp.local_addr = %local_addr, "agent UDP socket bound");

        Ok(UdpAgentTransport {
            socket: Arc::new(socket),
            local_addr,
        })
    }
}

impl Default for UdpAgentTransportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create and bind a non-blocking UDP socket.
///
/// IPv6 sockets are dual-stack (`IPV6_V6ONLY = false`). Address reuse is
/// enabled so a restarted agent can rebind its port immediately.
fn bind_udp_socket(addr: SocketAddr, recv_buffer_size: Option<usize>) -> io::Result<UdpSocket> {
    let domain = if addr.is_ipv6() {
        Domain::IPV6
    } else {
        Domain::IPV4
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;

    if addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }

    socket.set_reuse_address(true)?;

    if let Some(size) = recv_buffer_size {
        // Kernel caps at rmem_max; a smaller buffer is not an error.
        if let Err(e) = socket.set_recv_buffer_size(size) {
            tracing::warn!(error = %e, size, "failed to set receive buffer size");
        }
    }

    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;

    UdpSocket::from_std(socket.into())
}
