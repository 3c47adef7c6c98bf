use super::{DomainName, Message, HEADER_LEN};
use crate::DomainError;
use rustc_hash::FxHashMap;

/// Largest offset a 14-bit compression pointer can address.
const MAX_POINTER_OFFSET: usize = 0x3FFF;
const POINTER_TAG: u16 = 0xC000;

struct WireWriter {
    buf: Vec<u8>,
    /// Uncompressed suffix encoding -> offset where it was first written.
    names: Option<FxHashMap<Vec<u8>, u16>>,
}

impl WireWriter {
    fn new(compress: bool) -> Self {
        Self {
            buf: Vec::with_capacity(512),
            names: compress.then(FxHashMap::default),
        }
    }

    fn put_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    fn put_name(&mut self, name: &DomainName) {
        let Some(names) = self.names.as_mut() else {
            self.buf.extend_from_slice(&name.to_wire());
            return;
        };

        let wire = name.to_wire();
        let mut start = 0;
        for label in name.labels() {
            let suffix = &wire[start..];
            if let Some(&offset) = names.get(suffix) {
                self.buf.extend_from_slice(&(POINTER_TAG | offset).to_be_bytes());
                return;
            }

            let offset = self.buf.len();
            if offset <= MAX_POINTER_OFFSET {
                names.insert(suffix.to_vec(), offset as u16);
            }
            self.buf.push(label.len() as u8);
            self.buf.extend_from_slice(label);
            start += 1 + label.len();
        }
        self.buf.push(0);
    }
}

/// Encodes `message`, compressing repeated name suffixes.
pub fn encode(message: &Message) -> Result<Vec<u8>, DomainError> {
    encode_with(message, true)
}

/// Encodes `message` writing every name in full.
pub fn encode_uncompressed(message: &Message) -> Result<Vec<u8>, DomainError> {
    encode_with(message, false)
}

fn section_count(len: usize, section: &str) -> Result<u16, DomainError> {
    u16::try_from(len).map_err(|_| {
        DomainError::MessageTooLarge(format!("{} {} entries exceed 65535", len, section))
    })
}

fn encode_with(message: &Message, compress: bool) -> Result<Vec<u8>, DomainError> {
    let qdcount = section_count(message.questions.len(), "question")?;
    let ancount = section_count(message.answers.len(), "answer")?;

    let mut writer = WireWriter::new(compress);
    writer.put_u16(message.header.id);
    writer.put_u16(message.header.flags());
    writer.put_u16(qdcount);
    writer.put_u16(ancount);
    writer.put_u16(0);
    writer.put_u16(0);
    debug_assert_eq!(writer.buf.len(), HEADER_LEN);

    for question in &message.questions {
        writer.put_name(&question.name);
        writer.put_u16(question.qtype.into());
        writer.put_u16(question.qclass.into());
    }

    for record in &message.answers {
        let rdlength = u16::try_from(record.rdata.len()).map_err(|_| {
            DomainError::MessageTooLarge(format!(
                "rdata of {} bytes for {} exceeds 65535",
                record.rdata.len(),
                record.name
            ))
        })?;
        writer.put_name(&record.name);
        writer.put_u16(record.rtype.into());
        writer.put_u16(record.rclass.into());
        writer.put_u32(record.ttl);
        writer.put_u16(rdlength);
        writer.buf.extend_from_slice(&record.rdata);
    }

    Ok(writer.buf)
}
