use super::{decode, encode, Header, Opcode, Question, ResourceRecord, ResponseCode};
use crate::DomainError;

/// A DNS message with question and answer sections.
///
/// Authority and additional sections are never carried: encoding always
/// writes NSCOUNT = ARCOUNT = 0.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
}

impl Message {
    pub fn new(header: Header) -> Self {
        Self {
            header,
            questions: Vec::new(),
            answers: Vec::new(),
        }
    }

    /// Standard query with recursion desired.
    pub fn query(id: u16, questions: Vec<Question>) -> Self {
        Self {
            header: Header {
                id,
                opcode: Opcode::Query,
                rd: true,
                ..Header::default()
            },
            questions,
            answers: Vec::new(),
        }
    }

    /// Empty response echoing id, opcode, RD and the questions of `query`.
    pub fn response_to(query: &Message) -> Self {
        Self {
            header: Header {
                id: query.header.id,
                qr: true,
                opcode: query.header.opcode,
                rd: query.header.rd,
                ..Header::default()
            },
            questions: query.questions.clone(),
            answers: Vec::new(),
        }
    }

    pub fn error_response(query: &Message, rcode: ResponseCode) -> Self {
        let mut response = Self::response_to(query);
        response.header.rcode = rcode;
        response
    }

    pub fn qdcount(&self) -> usize {
        self.questions.len()
    }

    pub fn ancount(&self) -> usize {
        self.answers.len()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DomainError> {
        decode(bytes)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DomainError> {
        encode(self)
    }
}
