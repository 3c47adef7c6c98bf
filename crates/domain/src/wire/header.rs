use std::fmt;

const QR_BIT: u16 = 0x8000;
const OPCODE_SHIFT: u16 = 11;
const OPCODE_MASK: u16 = 0x0F;
const AA_BIT: u16 = 0x0400;
const TC_BIT: u16 = 0x0200;
const RD_BIT: u16 = 0x0100;
const RA_BIT: u16 = 0x0080;
const RCODE_MASK: u16 = 0x000F;

/// Kind of query carried in the header (RFC 1035 §4.1.1, 4 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Opcode {
    #[default]
    Query,
    IQuery,
    Status,
    Reserved(u8),
}

impl Opcode {
    pub fn is_query(&self) -> bool {
        matches!(self, Opcode::Query)
    }
}

impl From<u8> for Opcode {
    fn from(value: u8) -> Self {
        match value & 0x0F {
            0 => Opcode::Query,
            1 => Opcode::IQuery,
            2 => Opcode::Status,
            other => Opcode::Reserved(other),
        }
    }
}

impl From<Opcode> for u8 {
    fn from(opcode: Opcode) -> Self {
        match opcode {
            Opcode::Query => 0,
            Opcode::IQuery => 1,
            Opcode::Status => 2,
            Opcode::Reserved(value) => value & 0x0F,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opcode::Query => write!(f, "QUERY"),
            Opcode::IQuery => write!(f, "IQUERY"),
            Opcode::Status => write!(f, "STATUS"),
            Opcode::Reserved(value) => write!(f, "OPCODE{}", value),
        }
    }
}

/// 4-bit RCODE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResponseCode {
    #[default]
    NoError,
    FormErr,
    ServFail,
    NxDomain,
    NotImp,
    Refused,
    Other(u8),
}

impl ResponseCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::FormErr => "FORMERR",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::NxDomain => "NXDOMAIN",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::Other(_) => "RCODE",
        }
    }
}

impl From<u8> for ResponseCode {
    fn from(value: u8) -> Self {
        match value & 0x0F {
            0 => ResponseCode::NoError,
            1 => ResponseCode::FormErr,
            2 => ResponseCode::ServFail,
            3 => ResponseCode::NxDomain,
            4 => ResponseCode::NotImp,
            5 => ResponseCode::Refused,
            other => ResponseCode::Other(other),
        }
    }
}

impl From<ResponseCode> for u8 {
    fn from(code: ResponseCode) -> Self {
        match code {
            ResponseCode::NoError => 0,
            ResponseCode::FormErr => 1,
            ResponseCode::ServFail => 2,
            ResponseCode::NxDomain => 3,
            ResponseCode::NotImp => 4,
            ResponseCode::Refused => 5,
            ResponseCode::Other(value) => value & 0x0F,
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseCode::Other(value) => write!(f, "RCODE{}", value),
            known => f.write_str(known.as_str()),
        }
    }
}

/// Fixed 12-byte message header without its section counts.
///
/// Counts are derived from the sections of the owning [`super::Message`]
/// when it is encoded, so they cannot drift from the real content. The
/// reserved Z bits are dropped on decode and always written as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub id: u16,
    pub qr: bool,
    pub opcode: Opcode,
    pub aa: bool,
    pub tc: bool,
    pub rd: bool,
    pub ra: bool,
    pub rcode: ResponseCode,
}

impl Header {
    pub fn from_flags(id: u16, flags: u16) -> Self {
        Self {
            id,
            qr: flags & QR_BIT != 0,
            opcode: Opcode::from(((flags >> OPCODE_SHIFT) & OPCODE_MASK) as u8),
            aa: flags & AA_BIT != 0,
            tc: flags & TC_BIT != 0,
            rd: flags & RD_BIT != 0,
            ra: flags & RA_BIT != 0,
            rcode: ResponseCode::from((flags & RCODE_MASK) as u8),
        }
    }

    pub fn flags(&self) -> u16 {
        let mut flags = (u8::from(self.opcode) as u16 & OPCODE_MASK) << OPCODE_SHIFT;
        if self.qr {
            flags |= QR_BIT;
        }
        if self.aa {
            flags |= AA_BIT;
        }
        if self.tc {
            flags |= TC_BIT;
        }
        if self.rd {
            flags |= RD_BIT;
        }
        if self.ra {
            flags |= RA_BIT;
        }
        flags | (u8::from(self.rcode) as u16 & RCODE_MASK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_query_flags() {
        let header = Header::from_flags(1, 0x0100);
        assert!(!header.qr);
        assert_eq!(header.opcode, Opcode::Query);
        assert!(header.rd);
        assert!(!header.ra);
        assert_eq!(header.rcode, ResponseCode::NoError);
        assert_eq!(header.flags(), 0x0100);
    }

    #[test]
    fn test_response_flags_bit_positions() {
        let header = Header {
            id: 0xBEEF,
            qr: true,
            opcode: Opcode::Status,
            aa: true,
            tc: true,
            rd: true,
            ra: true,
            rcode: ResponseCode::Refused,
        };
        // 1 0010 1 1 1 1 000 0101
        assert_eq!(header.flags(), 0b1001_0111_1000_0101);
        assert_eq!(Header::from_flags(0xBEEF, header.flags()), header);
    }

    #[test]
    fn test_reserved_z_bits_are_dropped() {
        let header = Header::from_flags(7, 0x8170);
        assert_eq!(header.flags(), 0x8100);
    }

    #[test]
    fn test_reserved_opcode_preserved() {
        let header = Header::from_flags(0, 0x7800);
        assert_eq!(header.opcode, Opcode::Reserved(15));
        assert_eq!(header.flags(), 0x7800);
    }

    #[test]
    fn test_response_code_display() {
        assert_eq!(ResponseCode::ServFail.to_string(), "SERVFAIL");
        assert_eq!(ResponseCode::Other(9).to_string(), "RCODE9");
    }
}
