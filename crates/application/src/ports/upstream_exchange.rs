use async_trait::async_trait;
use dns_forwarder_domain::DomainError;
use std::time::Duration;

/// One request/one response exchange with the configured resolver.
///
/// Implementations must fail rather than hang: the wait for the reply is
/// bounded by `timeout`, and any resource opened for the exchange is released
/// before the future completes, whatever the outcome.
#[async_trait]
pub trait UpstreamExchange: Send + Sync {
    async fn exchange(&self, message: &[u8], timeout: Duration) -> Result<Vec<u8>, DomainError>;

    /// Resolver address used in logs and error messages.
    fn server(&self) -> String;
}
