//! Server configuration loaded from the environment.

use std::net::{AddrParseError, IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chat::GREETING;

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default cap on live sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value is out of range or unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
    /// The bind host is not an IP address.
    #[error("invalid host: {0}")]
    Host(#[from] AddrParseError),
}

/// Convenience result alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Runtime settings of the HTTP server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: IpAddr,
    /// Port to bind.
    pub port: u16,
    /// Directory served at `/` when set.
    pub static_dir: Option<PathBuf>,
    /// Maximum number of live sessions.
    pub max_sessions: usize,
    /// First assistant message of every session.
    pub greeting: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            static_dir: None,
            max_sessions: DEFAULT_MAX_SESSIONS,
            greeting: GREETING.to_string(),
        }
    }
}

impl ServerConfig {
    /// Load from `CHATUIX_*` environment variables, falling back to defaults.
    ///
    /// # Errors
    /// Returns an error if a variable is set to an unusable value.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to read variables.
    ///
    /// # Errors
    /// Returns an error if a variable is set to an unusable value.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("CHATUIX_HOST") {
            config.host = host.trim().parse()?;
        }
        if let Some(port) = lookup("CHATUIX_PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("CHATUIX_PORT is not a port: {port}")))?;
        }
        if let Some(dir) = lookup("CHATUIX_STATIC_DIR").filter(|d| !d.trim().is_empty()) {
            config.static_dir = Some(PathBuf::from(dir));
        }
        if let Some(max) = lookup("CHATUIX_MAX_SESSIONS") {
            config.max_sessions = max.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("CHATUIX_MAX_SESSIONS is not a count: {max}"))
            })?;
        }
        if let Some(greeting) = lookup("CHATUIX_GREETING") {
            config.greeting = greeting;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_sessions == 0 {
            return Err(ConfigError::Invalid(
                "max_sessions must be > 0".to_string(),
            ));
        }

        if self.greeting.trim().is_empty() {
            return Err(ConfigError::Invalid("greeting must not be empty".to_string()));
        }

        if let Some(dir) = &self.static_dir {
            if !dir.is_dir() {
                return Err(ConfigError::Invalid(format!(
                    "static_dir {} is not a directory",
                    dir.display()
                )));
            }
        }

        Ok(())
    }

    /// Socket address to bind.
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> ConfigResult<ServerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap_or_default();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.max_sessions, DEFAULT_MAX_SESSIONS);
        assert_eq!(config.addr().to_string(), "0.0.0.0:3000");
        assert!(config.static_dir.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("CHATUIX_HOST", "127.0.0.1"),
            ("CHATUIX_PORT", "8080"),
            ("CHATUIX_MAX_SESSIONS", "3"),
            ("CHATUIX_GREETING", "Hi!"),
        ])
        .unwrap_or_default();
        assert_eq!(config.addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.max_sessions, 3);
        assert_eq!(config.greeting, "Hi!");
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(load(&[("CHATUIX_PORT", "http")]), Err(ConfigError::Invalid(_))));
        assert!(matches!(load(&[("CHATUIX_HOST", "localhost")]), Err(ConfigError::Host(_))));
        assert!(matches!(
            load(&[("CHATUIX_MAX_SESSIONS", "0")]),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_static_dir_rejected() {
        let result = load(&[("CHATUIX_STATIC_DIR", "/definitely/not/here/chatuix")]);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
