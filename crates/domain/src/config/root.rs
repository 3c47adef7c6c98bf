use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::upstream::UpstreamConfig;
use crate::UpstreamAddr;

const LOCAL_CONFIG: &str = "dns-forwarder.toml";
const SYSTEM_CONFIG: &str = "/etc/dns-forwarder/config.toml";

/// Main configuration structure for the forwarder
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listener configuration (bind address, port, heartbeat)
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream resolver and exchange timeout
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. dns-forwarder.toml in current directory
    /// 3. /etc/dns-forwarder/config.toml
    /// 4. Default configuration
    ///
    /// Command-line overrides are applied on top of whichever source won.
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG).exists() {
            Self::from_file(LOCAL_CONFIG)?
        } else if std::path::Path::new(SYSTEM_CONFIG).exists() {
            Self::from_file(SYSTEM_CONFIG)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(resolver) = overrides.resolver {
            self.upstream.resolver = Some(resolver);
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(timeout) = overrides.query_timeout_ms {
            self.upstream.query_timeout_ms = timeout;
        }
        if let Some(interval) = overrides.heartbeat_interval_secs {
            self.server.heartbeat_interval_secs = interval;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Parsed resolver address.
    pub fn upstream_addr(&self) -> Result<UpstreamAddr, ConfigError> {
        let resolver = self.upstream.resolver.as_deref().ok_or_else(|| {
            ConfigError::Validation("No upstream resolver configured".to_string())
        })?;
        resolver
            .parse::<UpstreamAddr>()
            .map_err(|e| ConfigError::Validation(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        if self.server.bind_address.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Bind address cannot be empty".to_string(),
            ));
        }

        if self.upstream.query_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "Upstream query timeout must be greater than 0".to_string(),
            ));
        }

        self.upstream_addr()?;
        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub resolver: Option<String>,
    pub bind_address: Option<String>,
    pub dns_port: Option<u16>,
    pub query_timeout_ms: Option<u64>,
    pub heartbeat_interval_secs: Option<u64>,
    pub log_level: Option<String>,
}
