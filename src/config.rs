//! Configuration types.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ConfigError;

/// Server configuration, read from `TRIAGE_*` environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub host: IpAddr,
    /// HTTP/WebSocket port.
    pub port: u16,
    /// Insert the default categories and templates on startup.
    pub seed_defaults: bool,
    /// Also write logs to daily-rotated files in this directory.
    pub log_dir: Option<PathBuf>,
    /// Recent inquiries sent to a live-feed client on connect.
    pub feed_sync_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            seed_defaults: true,
            log_dir: None,
            feed_sync_limit: 10,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            host: parse_or(&lookup, "TRIAGE_HOST", defaults.host)?,
            port: parse_or(&lookup, "TRIAGE_PORT", defaults.port)?,
            seed_defaults: parse_bool_or(&lookup, "TRIAGE_SEED", defaults.seed_defaults)?,
            log_dir: lookup("TRIAGE_LOG_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            feed_sync_limit: parse_or(&lookup, "TRIAGE_FEED_SYNC_LIMIT", defaults.feed_sync_limit)?,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{raw:?}: {e}"),
        }),
        None => Ok(default),
    }
}

fn parse_bool_or(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{raw:?} is not a boolean"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.seed_defaults);
        assert!(config.log_dir.is_none());
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn reads_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("TRIAGE_HOST", "127.0.0.1"),
            ("TRIAGE_PORT", "9000"),
            ("TRIAGE_SEED", "off"),
            ("TRIAGE_LOG_DIR", "/var/log/triage"),
            ("TRIAGE_FEED_SYNC_LIMIT", "25"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:9000");
        assert!(!config.seed_defaults);
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/triage")));
        assert_eq!(config.feed_sync_limit, 25);
    }

    #[test]
    fn rejects_bad_port() {
        let err = ServerConfig::from_lookup(lookup(&[("TRIAGE_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "TRIAGE_PORT"));
    }

    #[test]
    fn rejects_bad_bool() {
        let err = ServerConfig::from_lookup(lookup(&[("TRIAGE_SEED", "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
