use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Malformed DNS message: {0}")]
    MalformedMessage(String),

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("DNS message too large: {0}")]
    MessageTooLarge(String),

    #[error("Transport timeout talking to {server}")]
    TransportTimeout { server: String },

    #[error("Transport error talking to {server}: {reason}")]
    TransportIo { server: String, reason: String },

    #[error("Upstream exchange for question {index} failed: {source}")]
    UpstreamFailure {
        index: usize,
        #[source]
        source: Box<DomainError>,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        DomainError::MalformedMessage(reason.into())
    }

    pub fn upstream(index: usize, source: DomainError) -> Self {
        DomainError::UpstreamFailure {
            index,
            source: Box::new(source),
        }
    }

    /// True for failures that happened while talking to the resolver,
    /// including a reply that could not be decoded.
    pub fn is_upstream_failure(&self) -> bool {
        matches!(
            self,
            DomainError::UpstreamFailure { .. }
                | DomainError::TransportTimeout { .. }
                | DomainError::TransportIo { .. }
        )
    }
}
