#![allow(dead_code)]
use dns_forwarder_domain::{
    DomainName, Header, Message, Opcode, Question, RecordClass, RecordType, ResourceRecord,
    ResponseCode,
};
use std::net::Ipv4Addr;

/// `www.example.com A IN`, id=1, RD set.
pub const EXAMPLE_QUERY: [u8; 33] = [
    0x00, 0x01, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03, 0x77, 0x77, 0x77,
    0x07, 0x65, 0x78, 0x61, 0x6d, 0x70, 0x6c, 0x65, 0x03, 0x63, 0x6f, 0x6d, 0x00, 0x00, 0x01, 0x00,
    0x01,
];

pub fn name(s: &str) -> DomainName {
    s.parse().unwrap()
}

pub struct MessageBuilder {
    header: Header,
    questions: Vec<Question>,
    answers: Vec<ResourceRecord>,
}

impl MessageBuilder {
    pub fn new(id: u16) -> Self {
        Self {
            header: Header {
                id,
                rd: true,
                ..Header::default()
            },
            questions: Vec::new(),
            answers: Vec::new(),
        }
    }

    pub fn response(mut self) -> Self {
        self.header.qr = true;
        self.header.ra = true;
        self
    }

    pub fn opcode(mut self, opcode: Opcode) -> Self {
        self.header.opcode = opcode;
        self
    }

    pub fn rcode(mut self, rcode: ResponseCode) -> Self {
        self.header.rcode = rcode;
        self
    }

    pub fn flags(mut self, aa: bool, tc: bool, rd: bool, ra: bool) -> Self {
        self.header.aa = aa;
        self.header.tc = tc;
        self.header.rd = rd;
        self.header.ra = ra;
        self
    }

    pub fn question(mut self, domain: &str) -> Self {
        self.questions.push(Question::a(name(domain)));
        self
    }

    pub fn typed_question(mut self, domain: &str, qtype: RecordType, qclass: RecordClass) -> Self {
        self.questions.push(Question::new(name(domain), qtype, qclass));
        self
    }

    pub fn a_record(mut self, domain: &str, ip: [u8; 4], ttl: u32) -> Self {
        self.answers
            .push(ResourceRecord::a(name(domain), Ipv4Addr::from(ip), ttl));
        self
    }

    pub fn raw_record(mut self, domain: &str, rtype: RecordType, rdata: &[u8]) -> Self {
        self.answers.push(ResourceRecord {
            name: name(domain),
            rtype,
            rclass: RecordClass::IN,
            ttl: 3600,
            rdata: rdata.to_vec(),
        });
        self
    }

    pub fn build(self) -> Message {
        Message {
            header: self.header,
            questions: self.questions,
            answers: self.answers,
        }
    }
}
