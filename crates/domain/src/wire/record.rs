use super::{DomainName, RecordClass, RecordType};
use std::net::Ipv4Addr;

/// Answer-section resource record with opaque rdata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: DomainName,
    pub rtype: RecordType,
    pub rclass: RecordClass,
    pub ttl: u32,
    pub rdata: Vec<u8>,
}

impl ResourceRecord {
    pub fn a(name: DomainName, address: Ipv4Addr, ttl: u32) -> Self {
        Self {
            name,
            rtype: RecordType::A,
            rclass: RecordClass::IN,
            ttl,
            rdata: address.octets().to_vec(),
        }
    }

    /// The IPv4 address of an `A` record with well-formed 4-byte rdata.
    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        if self.rtype != RecordType::A {
            return None;
        }
        let octets: [u8; 4] = self.rdata.as_slice().try_into().ok()?;
        Some(Ipv4Addr::from(octets))
    }
}
