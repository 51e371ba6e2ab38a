//! Listen address configuration, read from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use thiserror::Error;

pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid PORT {0:?}")]
    InvalidPort(String),

    #[error("invalid HOST {0:?}: expected an IP address or \"localhost\"")]
    InvalidHost(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Read `HOST` and `PORT`, falling back to defaults when unset.
    ///
    /// `HOST` must be an IP address; `localhost` is taken as the loopback
    /// address and no other name is resolved.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = match lookup("HOST") {
            Some(raw) if raw.eq_ignore_ascii_case("localhost") => DEFAULT_HOST,
            Some(raw) => raw.parse::<IpAddr>().map_err(|_| ConfigError::InvalidHost(raw))?,
            None => DEFAULT_HOST,
        };
        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };
        Ok(Self { host, port })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.addr().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn reads_host_and_port() {
        let config = ServerConfig::from_lookup(lookup(&[("HOST", "0.0.0.0"), ("PORT", "8080")])).unwrap();
        assert_eq!(config.addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn rejects_bad_port() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidPort("eighty".to_string()));
    }

    #[test]
    fn localhost_is_loopback() {
        let config = ServerConfig::from_lookup(lookup(&[("HOST", "localhost")])).unwrap();
        assert_eq!(config.host, DEFAULT_HOST);
    }

    #[test]
    fn rejects_host_names() {
        let err = ServerConfig::from_lookup(lookup(&[("HOST", "example.com")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidHost("example.com".to_string()));
        assert_eq!(
            err.to_string(),
            r#"invalid HOST "example.com": expected an IP address or "localhost""#
        );
    }
}
