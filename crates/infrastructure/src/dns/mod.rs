pub mod server;
pub mod transport;
pub mod wire_response;

pub use server::DnsServerHandler;
pub use transport::UdpExchange;
