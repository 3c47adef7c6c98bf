//! UDP Transport for upstream queries (RFC 1035 §4.2.1)
//!
//! Messages are sent as-is (no framing). Every exchange binds its own
//! ephemeral socket, connected to the resolver, and drops it when the
//! exchange ends, whether it succeeded, failed or timed out.

use async_trait::async_trait;
use dns_forwarder_application::ports::UpstreamExchange;
use dns_forwarder_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::Instant;
use tracing::debug;

/// Largest reply accepted from the resolver.
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// DNS over UDP exchange with a single resolver
pub struct UdpExchange {
    server_addr: SocketAddr,
}

impl UdpExchange {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    fn io_error(&self, action: &str, e: std::io::Error) -> DomainError {
        DomainError::TransportIo {
            server: self.server_addr.to_string(),
            reason: format!("{}: {}", action, e),
        }
    }

    fn timeout_error(&self) -> DomainError {
        DomainError::TransportTimeout {
            server: self.server_addr.to_string(),
        }
    }

    async fn open_socket(&self) -> Result<UdpSocket, DomainError> {
        // Bind to ephemeral port (0 = OS assigns)
        let bind_addr = if self.server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| self.io_error("failed to bind UDP socket", e))?;
        socket
            .connect(self.server_addr)
            .await
            .map_err(|e| self.io_error("failed to connect UDP socket", e))?;
        Ok(socket)
    }
}

#[async_trait]
impl UpstreamExchange for UdpExchange {
    async fn exchange(&self, message: &[u8], timeout: Duration) -> Result<Vec<u8>, DomainError> {
        if message.len() < 2 {
            return Err(DomainError::malformed("upstream query has no id"));
        }
        let query_id = [message[0], message[1]];
        let deadline = Instant::now() + timeout;

        let socket = self.open_socket().await?;

        let bytes_sent = tokio::time::timeout_at(deadline, socket.send(message))
            .await
            .map_err(|_| self.timeout_error())?
            .map_err(|e| self.io_error("failed to send UDP query", e))?;

        debug!(server = %self.server_addr, bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        loop {
            let bytes_received = tokio::time::timeout_at(deadline, socket.recv(&mut recv_buf))
                .await
                .map_err(|_| self.timeout_error())?
                .map_err(|e| self.io_error("failed to receive UDP response", e))?;

            if bytes_received >= 2 && recv_buf[..2] == query_id {
                recv_buf.truncate(bytes_received);
                debug!(server = %self.server_addr, bytes_received, "UDP response received");
                return Ok(recv_buf);
            }

            debug!(
                server = %self.server_addr,
                bytes_received,
                "Discarding UDP datagram with unexpected id"
            );
        }
    }

    fn server(&self) -> String {
        self.server_addr.to_string()
    }
}
