#![allow(dead_code)]
use async_trait::async_trait;
use dns_forwarder_application::ports::UpstreamExchange;
use dns_forwarder_domain::{DomainError, Message, ResourceRecord, ResponseCode};
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone)]
enum Scripted {
    Answers(ResponseCode, Vec<ResourceRecord>),
    Error(DomainError),
    Raw(Vec<u8>),
    WrongId,
}

/// Upstream stand-in keyed by question name. Records every query it sees.
#[derive(Clone, Default)]
pub struct MockUpstream {
    scripts: Arc<Mutex<HashMap<String, Scripted>>>,
    received: Arc<Mutex<Vec<Message>>>,
    timeouts: Arc<Mutex<Vec<Duration>>>,
}

impl MockUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer_a(&self, domain: &str, ip: Ipv4Addr, ttl: u32) {
        let record = ResourceRecord::a(domain.parse().unwrap(), ip, ttl);
        self.script(domain, Scripted::Answers(ResponseCode::NoError, vec![record]));
    }

    pub fn answer_records(&self, domain: &str, records: Vec<ResourceRecord>) {
        self.script(domain, Scripted::Answers(ResponseCode::NoError, records));
    }

    pub fn answer_nxdomain(&self, domain: &str) {
        self.script(domain, Scripted::Answers(ResponseCode::NxDomain, vec![]));
    }

    pub fn fail(&self, domain: &str, error: DomainError) {
        self.script(domain, Scripted::Error(error));
    }

    pub fn reply_raw(&self, domain: &str, bytes: Vec<u8>) {
        self.script(domain, Scripted::Raw(bytes));
    }

    pub fn reply_wrong_id(&self, domain: &str) {
        self.script(domain, Scripted::WrongId);
    }

    pub fn call_count(&self) -> usize {
        self.received.lock().unwrap().len()
    }

    pub fn received(&self) -> Vec<Message> {
        self.received.lock().unwrap().clone()
    }

    pub fn timeouts(&self) -> Vec<Duration> {
        self.timeouts.lock().unwrap().clone()
    }

    fn script(&self, domain: &str, scripted: Scripted) {
        self.scripts
            .lock()
            .unwrap()
            .insert(domain.to_string(), scripted);
    }
}

#[async_trait]
impl UpstreamExchange for MockUpstream {
    async fn exchange(&self, message: &[u8], timeout: Duration) -> Result<Vec<u8>, DomainError> {
        let query = Message::decode(message)?;
        self.received.lock().unwrap().push(query.clone());
        self.timeouts.lock().unwrap().push(timeout);

        let domain = query
            .questions
            .first()
            .map(|q| q.name.to_string())
            .unwrap_or_default();

        let scripted = self.scripts.lock().unwrap().get(&domain).cloned();
        match scripted {
            Some(Scripted::Answers(rcode, answers)) => {
                let mut reply = Message::error_response(&query, rcode);
                reply.header.ra = true;
                reply.answers = answers;
                reply.to_bytes()
            }
            Some(Scripted::Error(error)) => Err(error),
            Some(Scripted::Raw(bytes)) => Ok(bytes),
            Some(Scripted::WrongId) => {
                let mut reply = Message::response_to(&query);
                reply.header.id = query.header.id.wrapping_add(1);
                reply.to_bytes()
            }
            None => Err(DomainError::TransportTimeout {
                server: self.server(),
            }),
        }
    }

    fn server(&self) -> String {
        "mock-upstream:53".to_string()
    }
}
