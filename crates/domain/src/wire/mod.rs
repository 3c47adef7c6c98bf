//! DNS message codec (RFC 1035 §4.1).
//!
//! Byte layout is a hard compatibility boundary: 12-byte header, question
//! section, answer section, big-endian integers, length-prefixed labels and
//! `11xxxxxx xxxxxxxx` compression pointers.

mod decode;
mod encode;
mod header;
mod message;
mod name;
mod question;
mod record;
mod record_type;

pub use decode::{decode, parse_name, MAX_POINTER_HOPS};
pub use encode::{encode, encode_uncompressed};
pub use header::{Header, Opcode, ResponseCode};
pub use message::Message;
pub use name::{DomainName, MAX_LABEL_LEN, MAX_NAME_LEN};
pub use question::Question;
pub use record::ResourceRecord;
pub use record_type::{RecordClass, RecordType};

pub const HEADER_LEN: usize = 12;
