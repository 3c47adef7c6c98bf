//! DNS Forwarder Infrastructure Layer
pub mod dns;
pub mod jobs;
