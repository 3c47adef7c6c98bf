use crate::DomainError;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

/// Address of the upstream resolver, either a literal socket address or a
/// hostname still to be resolved at startup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UpstreamAddr {
    Resolved(SocketAddr),
    Unresolved { hostname: Arc<str>, port: u16 },
}

impl UpstreamAddr {
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        match self {
            UpstreamAddr::Resolved(addr) => Some(*addr),
            UpstreamAddr::Unresolved { .. } => None,
        }
    }

    pub fn port(&self) -> u16 {
        match self {
            UpstreamAddr::Resolved(addr) => addr.port(),
            UpstreamAddr::Unresolved { port, .. } => *port,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, UpstreamAddr::Unresolved { .. })
    }

    /// Returns (hostname, port) if this address is unresolved.
    pub fn unresolved_parts(&self) -> Option<(&str, u16)> {
        match self {
            UpstreamAddr::Unresolved { hostname, port } => Some((hostname, *port)),
            UpstreamAddr::Resolved(_) => None,
        }
    }
}

impl fmt::Display for UpstreamAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamAddr::Resolved(addr) => write!(f, "{}", addr),
            UpstreamAddr::Unresolved { hostname, port } => write!(f, "{}:{}", hostname, port),
        }
    }
}

fn split_host_port(s: &str) -> Result<(&str, &str), DomainError> {
    if let Some(rest) = s.strip_prefix('[') {
        let (host, rest) = rest.split_once(']').ok_or_else(|| {
            DomainError::ConfigError(format!("Unterminated IPv6 literal in '{}'", s))
        })?;
        let port = rest.strip_prefix(':').ok_or_else(|| {
            DomainError::ConfigError(format!("Missing port in resolver address '{}'", s))
        })?;
        return Ok((host, port));
    }
    s.rsplit_once(':').ok_or_else(|| {
        DomainError::ConfigError(format!(
            "Invalid resolver address '{}'. Expected HOST:PORT",
            s
        ))
    })
}

impl FromStr for UpstreamAddr {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(addr) = s.parse::<SocketAddr>() {
            return Ok(UpstreamAddr::Resolved(addr));
        }

        let (host, port_str) = split_host_port(s)?;
        if host.is_empty() {
            return Err(DomainError::ConfigError(format!(
                "Missing host in resolver address '{}'",
                s
            )));
        }
        let port = port_str.parse::<u16>().map_err(|e| {
            DomainError::ConfigError(format!(
                "Invalid port '{}' in resolver address '{}': {}",
                port_str, s, e
            ))
        })?;

        Ok(UpstreamAddr::Unresolved {
            hostname: host.into(),
            port,
        })
    }
}
