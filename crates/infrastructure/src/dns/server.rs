use super::wire_response;
use dns_forwarder_application::use_cases::ForwardingEngine;
use dns_forwarder_domain::{DomainError, Message, ResponseCode};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Turns one client datagram into the bytes to send back, if any.
pub struct DnsServerHandler {
    engine: Arc<ForwardingEngine>,
}

impl DnsServerHandler {
    pub fn new(engine: Arc<ForwardingEngine>) -> Self {
        Self { engine }
    }

    /// Decodes, forwards and re-encodes a single query.
    ///
    /// Never fails: undecodable queries and failed upstream exchanges are
    /// answered with SERVFAIL, and `None` means the datagram is dropped
    /// because not even its id could be recovered.
    pub async fn handle_datagram(&self, bytes: &[u8], client: SocketAddr) -> Option<Vec<u8>> {
        let query = match Message::decode(bytes) {
            Ok(query) => query,
            Err(e) => {
                warn!(client = %client, len = bytes.len(), error = %e, "Malformed DNS query");
                return wire_response::build_servfail(bytes);
            }
        };

        debug!(
            client = %client,
            id = query.header.id,
            questions = query.qdcount(),
            "DNS query received"
        );

        let response = match self.engine.handle(&query).await {
            Ok(response) => response,
            Err(e) => {
                log_failure(&e, client, query.header.id);
                return servfail(&query, bytes);
            }
        };

        match response.to_bytes() {
            Ok(encoded) => {
                debug!(
                    client = %client,
                    id = response.header.id,
                    rcode = %response.header.rcode,
                    answers = response.ancount(),
                    "Sending response"
                );
                Some(encoded)
            }
            Err(e) => {
                error!(client = %client, id = query.header.id, error = %e, "Failed to encode response");
                servfail(&query, bytes)
            }
        }
    }
}

fn log_failure(e: &DomainError, client: SocketAddr, id: u16) {
    if e.is_upstream_failure() {
        warn!(client = %client, id, error = %e, "Upstream failure, answering SERVFAIL");
    } else {
        error!(client = %client, id, error = %e, "Query handling failed, answering SERVFAIL");
    }
}

fn servfail(query: &Message, raw: &[u8]) -> Option<Vec<u8>> {
    Message::error_response(query, ResponseCode::ServFail)
        .to_bytes()
        .ok()
        .or_else(|| wire_response::build_servfail(raw))
}
