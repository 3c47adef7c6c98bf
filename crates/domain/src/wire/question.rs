use super::{DomainName, RecordClass, RecordType};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: DomainName,
    pub qtype: RecordType,
    pub qclass: RecordClass,
}

impl Question {
    pub fn new(name: DomainName, qtype: RecordType, qclass: RecordClass) -> Self {
        Self {
            name,
            qtype,
            qclass,
        }
    }

    /// `A` question in class `IN`.
    pub fn a(name: DomainName) -> Self {
        Self::new(name, RecordType::A, RecordClass::IN)
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.qclass, self.qtype)
    }
}
