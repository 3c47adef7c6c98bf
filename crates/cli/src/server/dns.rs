use dns_forwarder_infrastructure::dns::DnsServerHandler;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const RECV_BUFFER_SIZE: usize = 4096;

/// Receives client datagrams until `shutdown` fires.
///
/// Each datagram is handled in its own task. On shutdown the socket stops
/// receiving and in-flight handlers are aborted and awaited, which drops any
/// upstream socket they still hold.
pub async fn run_dns_server(
    bind_addr: String,
    handler: DnsServerHandler,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let socket_addr: SocketAddr = bind_addr.parse()?;
    let socket = Arc::new(create_udp_socket(socket_addr)?);
    let handler = Arc::new(handler);

    info!(bind_address = %socket.local_addr()?, "DNS forwarder listening");

    let mut in_flight: JoinSet<()> = JoinSet::new();
    let mut recv_buf = [0u8; RECV_BUFFER_SIZE];

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!(in_flight = in_flight.len(), "DNS server shutting down");
                break;
            }
            Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
            result = socket.recv_from(&mut recv_buf) => {
                match result {
                    Ok((n, from)) => {
                        let query: Arc<[u8]> = Arc::from(&recv_buf[..n]);
                        let handler = Arc::clone(&handler);
                        let socket = Arc::clone(&socket);
                        in_flight.spawn(async move {
                            handle_datagram(&socket, &handler, &query, from).await;
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "UDP recv error");
                    }
                }
            }
        }
    }

    in_flight.abort_all();
    while in_flight.join_next().await.is_some() {}
    info!("DNS server closed");
    Ok(())
}

async fn handle_datagram(
    socket: &UdpSocket,
    handler: &DnsServerHandler,
    query: &[u8],
    from: SocketAddr,
) {
    let Some(response) = handler.handle_datagram(query, from).await else {
        debug!(client = %from, len = query.len(), "Dropping unanswerable datagram");
        return;
    };

    if let Err(e) = socket.send_to(&response, from).await {
        warn!(client = %from, error = %e, "Failed to send response");
    }
}

fn create_udp_socket(socket_addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;

    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}
