#![allow(dead_code)]
use dns_forwarder_domain::{Message, ResourceRecord, ResponseCode};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

/// How the mock resolver answers each query it receives.
#[derive(Clone)]
pub enum MockBehavior {
    /// One A record per question, TTL 60.
    Answer(Ipv4Addr),
    /// NXDOMAIN with no answers.
    NxDomain,
    /// Never replies.
    Silent,
    /// Sends a reply with a different id first, then the real answer.
    StrayThenAnswer(Ipv4Addr),
    /// Replies with fixed bytes regardless of the query.
    Raw(Vec<u8>),
}

/// Loopback UDP resolver for transport and end-to-end tests.
pub struct MockDnsServer {
    addr: SocketAddr,
    queries: Arc<AtomicUsize>,
    peers: Arc<Mutex<Vec<SocketAddr>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(behavior: MockBehavior) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = socket.local_addr()?;
        let queries = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&queries);
        let peers = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&peers);

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            counter.fetch_add(1, Ordering::SeqCst);
                            seen.lock().unwrap().push(peer);
                            for reply in Self::build_replies(&behavior, &buf[..len]) {
                                let _ = socket.send_to(&reply, peer).await;
                            }
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            queries,
            peers,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Source address of every query received, in arrival order.
    pub fn peers(&self) -> Vec<SocketAddr> {
        self.peers.lock().unwrap().clone()
    }

    fn build_replies(behavior: &MockBehavior, query: &[u8]) -> Vec<Vec<u8>> {
        let Ok(query) = Message::decode(query) else {
            return vec![];
        };

        match behavior {
            MockBehavior::Answer(ip) => vec![Self::answer(&query, *ip)],
            MockBehavior::NxDomain => {
                let mut reply = Message::error_response(&query, ResponseCode::NxDomain);
                reply.header.ra = true;
                vec![reply.to_bytes().unwrap()]
            }
            MockBehavior::Silent => vec![],
            MockBehavior::StrayThenAnswer(ip) => {
                let mut stray = Message::response_to(&query);
                stray.header.id = query.header.id.wrapping_add(1);
                vec![stray.to_bytes().unwrap(), Self::answer(&query, *ip)]
            }
            MockBehavior::Raw(bytes) => vec![bytes.clone()],
        }
    }

    fn answer(query: &Message, ip: Ipv4Addr) -> Vec<u8> {
        let mut reply = Message::response_to(query);
        reply.header.ra = true;
        for question in &query.questions {
            reply
                .answers
                .push(ResourceRecord::a(question.name.clone(), ip, 60));
        }
        reply.to_bytes().unwrap()
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// `www.example.com A IN`, id=1, RD set.
pub const EXAMPLE_QUERY: [u8; 33] = [
    0x00, 0x01, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03, 0x77, 0x77, 0x77,
    0x07, 0x65, 0x78, 0x61, 0x6d, 0x70, 0x6c, 0x65, 0x03, 0x63, 0x6f, 0x6d, 0x00, 0x00, 0x01, 0x00,
    0x01,
];

/// Address with nothing listening, obtained by binding and releasing a port.
pub async fn unused_local_addr() -> SocketAddr {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    socket.local_addr().unwrap()
}
