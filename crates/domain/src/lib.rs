//! DNS Forwarder Domain Layer
pub mod config;
pub mod errors;
pub mod upstream;
pub mod wire;

pub use config::{CliOverrides, Config};
pub use errors::DomainError;
pub use upstream::UpstreamAddr;
pub use wire::{
    DomainName, Header, Message, Opcode, Question, RecordClass, RecordType, ResourceRecord,
    ResponseCode,
};
