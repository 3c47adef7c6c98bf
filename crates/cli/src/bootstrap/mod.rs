use anyhow::Context;
use dns_forwarder_domain::{CliOverrides, Config, UpstreamAddr};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Loads the configuration and validates it. Any failure aborts startup.
pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Resolves the configured upstream once; the address is fixed for the
/// lifetime of the process.
pub async fn resolve_upstream(config: &Config) -> anyhow::Result<SocketAddr> {
    match config.upstream_addr()? {
        UpstreamAddr::Resolved(addr) => Ok(addr),
        UpstreamAddr::Unresolved { hostname, port } => {
            let addr = tokio::net::lookup_host((hostname.as_ref(), port))
                .await
                .with_context(|| format!("Failed to resolve upstream {}:{}", hostname, port))?
                .next()
                .with_context(|| format!("Upstream {} resolved to no addresses", hostname))?;
            info!(hostname = %hostname, resolved = %addr, "Upstream resolver resolved");
            Ok(addr)
        }
    }
}
