//! Wire format decoder (RFC 1035 §4.1).
//!
//! Works over an immutable byte view with explicit bounds checks; every
//! out-of-range read is reported as [`DomainError::MalformedMessage`].
//!
//! Only the question and answer sections are decoded. Authority and
//! additional records are left unread even when NSCOUNT / ARCOUNT are
//! non-zero, and any bytes after the answer section are ignored.

use super::{DomainName, Header, Message, Question, ResourceRecord, HEADER_LEN};
use crate::DomainError;

const POINTER_MASK: u8 = 0xC0;

/// Upper bound on compression pointers followed while decoding one name.
pub const MAX_POINTER_HOPS: usize = 64;

struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn read_bytes(&mut self, len: usize, what: &str) -> Result<&'a [u8], DomainError> {
        let end = self.pos.checked_add(len).filter(|end| *end <= self.buf.len());
        match end {
            Some(end) => {
                let bytes = &self.buf[self.pos..end];
                self.pos = end;
                Ok(bytes)
            }
            None => Err(DomainError::malformed(format!(
                "{} of {} bytes at offset {} runs past end of {}-byte message",
                what,
                len,
                self.pos,
                self.buf.len()
            ))),
        }
    }

    fn read_u16(&mut self, what: &str) -> Result<u16, DomainError> {
        let bytes = self.read_bytes(2, what)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn read_u32(&mut self, what: &str) -> Result<u32, DomainError> {
        let bytes = self.read_bytes(4, what)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_name(&mut self) -> Result<DomainName, DomainError> {
        let (name, consumed) = parse_name(self.buf, self.pos)?;
        self.pos += consumed;
        Ok(name)
    }
}

/// Decodes a complete message.
pub fn decode(buf: &[u8]) -> Result<Message, DomainError> {
    if buf.len() < HEADER_LEN {
        return Err(DomainError::malformed(format!(
            "message is {} bytes, header needs {}",
            buf.len(),
            HEADER_LEN
        )));
    }

    let mut reader = WireReader::new(buf);
    let id = reader.read_u16("id")?;
    let flags = reader.read_u16("flags")?;
    let qdcount = reader.read_u16("qdcount")?;
    let ancount = reader.read_u16("ancount")?;
    let _nscount = reader.read_u16("nscount")?;
    let _arcount = reader.read_u16("arcount")?;

    // Counts are untrusted; each entry needs at least 5 bytes.
    let room = (buf.len() - HEADER_LEN) / 5;

    let mut questions = Vec::with_capacity((qdcount as usize).min(room));
    for _ in 0..qdcount {
        questions.push(read_question(&mut reader)?);
    }

    let mut answers = Vec::with_capacity((ancount as usize).min(room));
    for _ in 0..ancount {
        answers.push(read_record(&mut reader)?);
    }

    Ok(Message {
        header: Header::from_flags(id, flags),
        questions,
        answers,
    })
}

fn read_question(reader: &mut WireReader<'_>) -> Result<Question, DomainError> {
    let name = reader.read_name()?;
    let qtype = reader.read_u16("qtype")?;
    let qclass = reader.read_u16("qclass")?;
    Ok(Question::new(name, qtype.into(), qclass.into()))
}

fn read_record(reader: &mut WireReader<'_>) -> Result<ResourceRecord, DomainError> {
    let name = reader.read_name()?;
    let rtype = reader.read_u16("type")?;
    let rclass = reader.read_u16("class")?;
    let ttl = reader.read_u32("ttl")?;
    let rdlength = reader.read_u16("rdlength")?;
    let rdata = reader.read_bytes(rdlength as usize, "rdata")?;
    Ok(ResourceRecord {
        name,
        rtype: rtype.into(),
        rclass: rclass.into(),
        ttl,
        rdata: rdata.to_vec(),
    })
}

/// Decodes the name starting at `offset` of the whole message `buf`.
///
/// Returns the name and the number of bytes it occupies at `offset`: the
/// inline labels plus either the terminating zero octet or the 2-byte
/// pointer that ends the inline part. Labels reached through pointers do
/// not count. Pointer chains are followed for at most [`MAX_POINTER_HOPS`]
/// hops and may never revisit a target offset.
pub fn parse_name(buf: &[u8], offset: usize) -> Result<(DomainName, usize), DomainError> {
    let mut name = DomainName::root();
    let mut pos = offset;
    let mut consumed = None;
    let mut visited: Vec<usize> = Vec::new();

    loop {
        let len = *buf.get(pos).ok_or_else(|| {
            DomainError::malformed(format!("name at offset {} runs past end of message", pos))
        })?;

        match len & POINTER_MASK {
            POINTER_MASK => {
                let low = *buf.get(pos + 1).ok_or_else(|| {
                    DomainError::malformed(format!("truncated compression pointer at offset {}", pos))
                })?;
                let target = (((len & !POINTER_MASK) as usize) << 8) | low as usize;

                if consumed.is_none() {
                    consumed = Some(pos + 2 - offset);
                }
                if visited.contains(&target) {
                    return Err(DomainError::malformed(format!(
                        "compression pointer loop at offset {} (target {})",
                        pos, target
                    )));
                }
                if visited.len() >= MAX_POINTER_HOPS {
                    return Err(DomainError::malformed(format!(
                        "too many compression pointers in name at offset {} (limit {})",
                        offset, MAX_POINTER_HOPS
                    )));
                }
                visited.push(target);
                pos = target;
            }
            0x00 if len == 0 => {
                if consumed.is_none() {
                    consumed = Some(pos + 1 - offset);
                }
                break;
            }
            0x00 => {
                let start = pos + 1;
                let label = buf.get(start..start + len as usize).ok_or_else(|| {
                    DomainError::malformed(format!(
                        "label of {} bytes at offset {} runs past end of message",
                        len, pos
                    ))
                })?;
                name.push_label(label).map_err(|reason| {
                    DomainError::malformed(format!("name at offset {}: {}", offset, reason))
                })?;
                pos = start + len as usize;
            }
            _ => {
                return Err(DomainError::malformed(format!(
                    "unsupported label type 0x{:02x} at offset {}",
                    len, pos
                )));
            }
        }
    }

    Ok((name, consumed.unwrap_or(1)))
}
