//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `MODFINDER_*` environment variables.

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::num::ParseIntError;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    #[error("failed to parse {name} '{value}': {source}")]
    InvalidNumber {
        name: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("missing required environment variable: {name}")]
    MissingEnvVar { name: &'static str },
}

/// Default Modrinth API root
pub const DEFAULT_MODRINTH_URL: &str = "https://api.modrinth.com";

/// Default CurseForge API root
pub const DEFAULT_CURSEFORGE_URL: &str = "https://api.curseforge.com";

/// Engine and server configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// HTTP server port. Default: `3000`.
    pub port: u16,

    /// IP address to bind to. Default: `0.0.0.0`.
    pub bind_addr: IpAddr,

    /// Minimum spacing between admitted lookups. Default: 1000 ms.
    pub rate_limit: Duration,

    pub modrinth_url: String,
    pub curseforge_url: String,

    /// CurseForge is only registered when a key is present
    pub curseforge_api_key: Option<String>,

    /// Candidates requested per search. Default: `10`.
    pub search_limit: u32,

    /// Per-request timeout against the catalogs. Default: 10 s.
    pub request_timeout: Duration,

    pub user_agent: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            rate_limit: Duration::from_millis(1000),
            modrinth_url: DEFAULT_MODRINTH_URL.to_string(),
            curseforge_url: DEFAULT_CURSEFORGE_URL.to_string(),
            curseforge_api_key: None,
            search_limit: 10,
            request_timeout: Duration::from_secs(10),
            user_agent: format!("modfinder-engine/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl EngineConfig {
    const ENV_PORT: &'static str = "MODFINDER_PORT";
    const ENV_BIND_ADDR: &'static str = "MODFINDER_BIND_ADDR";
    const ENV_RATE_LIMIT_MS: &'static str = "MODFINDER_RATE_LIMIT_MS";
    const ENV_MODRINTH_URL: &'static str = "MODFINDER_MODRINTH_URL";
    const ENV_CURSEFORGE_URL: &'static str = "MODFINDER_CURSEFORGE_URL";
    const ENV_CURSEFORGE_API_KEY: &'static str = "MODFINDER_CURSEFORGE_API_KEY";
    const ENV_SEARCH_LIMIT: &'static str = "MODFINDER_SEARCH_LIMIT";
    const ENV_TIMEOUT_SECS: &'static str = "MODFINDER_TIMEOUT_SECS";
    const ENV_USER_AGENT: &'static str = "MODFINDER_USER_AGENT";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let rate_limit = Duration::from_millis(Self::parse_number_from_env(
            Self::ENV_RATE_LIMIT_MS,
            u64::try_from(defaults.rate_limit.as_millis()).unwrap_or(u64::MAX),
        )?);
        let modrinth_url = Self::parse_string_from_env(Self::ENV_MODRINTH_URL, defaults.modrinth_url);
        let curseforge_url =
            Self::parse_string_from_env(Self::ENV_CURSEFORGE_URL, defaults.curseforge_url);
        let curseforge_api_key = Self::parse_optional_string_from_env(Self::ENV_CURSEFORGE_API_KEY);
        let search_limit =
            Self::parse_number_from_env(Self::ENV_SEARCH_LIMIT, defaults.search_limit)?;
        let request_timeout = Duration::from_secs(Self::parse_number_from_env(
            Self::ENV_TIMEOUT_SECS,
            defaults.request_timeout.as_secs(),
        )?);
        let user_agent = Self::parse_string_from_env(Self::ENV_USER_AGENT, defaults.user_agent);

        Ok(Self {
            port,
            bind_addr,
            rate_limit,
            modrinth_url,
            curseforge_url,
            curseforge_api_key,
            search_limit,
            request_timeout,
            user_agent,
        })
    }

    /// CurseForge key, or the error naming the variable to set
    pub fn require_curseforge_key(&self) -> Result<&str, ConfigError> {
        self.curseforge_api_key
            .as_deref()
            .ok_or(ConfigError::MissingEnvVar {
                name: Self::ENV_CURSEFORGE_API_KEY,
            })
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => match value.parse::<u16>() {
                Ok(0) | Err(_) => Err(ConfigError::InvalidPort { value }),
                Ok(port) => Ok(port),
            },
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_number_from_env<T>(name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr<Err = ParseIntError>,
    {
        match env::var(name) {
            Ok(value) => value.trim().parse().map_err(|e| ConfigError::InvalidNumber {
                name,
                value,
                source: e,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_string_from_env(name: &str, default: String) -> String {
        env::var(name).unwrap_or(default)
    }

    fn parse_optional_string_from_env(name: &str) -> Option<String> {
        env::var(name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ALL_VARS: [&str; 9] = [
        "MODFINDER_PORT",
        "MODFINDER_BIND_ADDR",
        "MODFINDER_RATE_LIMIT_MS",
        "MODFINDER_MODRINTH_URL",
        "MODFINDER_CURSEFORGE_URL",
        "MODFINDER_CURSEFORGE_API_KEY",
        "MODFINDER_SEARCH_LIMIT",
        "MODFINDER_TIMEOUT_SECS",
        "MODFINDER_USER_AGENT",
    ];

    fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
    where
        F: FnOnce() -> R,
    {
        for name in ALL_VARS {
            env::remove_var(name);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }

        let result = f();

        for (key, _) in vars {
            env::remove_var(key);
        }
        result
    }

    #[test]
    #[serial]
    fn test_defaults() {
        let config = with_env_vars(&[], || EngineConfig::from_env().unwrap());

        assert_eq!(config.port, 3000);
        assert_eq!(config.rate_limit, Duration::from_millis(1000));
        assert_eq!(config.modrinth_url, DEFAULT_MODRINTH_URL);
        assert!(config.curseforge_api_key.is_none());
        assert_eq!(config.search_limit, 10);
        assert_eq!(config.socket_addr(), "0.0.0.0:3000");
    }

    #[test]
    #[serial]
    fn test_overrides() {
        let config = with_env_vars(
            &[
                ("MODFINDER_PORT", "8090"),
                ("MODFINDER_BIND_ADDR", "127.0.0.1"),
                ("MODFINDER_RATE_LIMIT_MS", "250"),
                ("MODFINDER_CURSEFORGE_API_KEY", "  secret  "),
                ("MODFINDER_SEARCH_LIMIT", "20"),
            ],
            || EngineConfig::from_env().unwrap(),
        );

        assert_eq!(config.socket_addr(), "127.0.0.1:8090");
        assert_eq!(config.rate_limit, Duration::from_millis(250));
        assert_eq!(config.require_curseforge_key().unwrap(), "secret");
        assert_eq!(config.search_limit, 20);
    }

    #[test]
    #[serial]
    fn test_invalid_port() {
        let err = with_env_vars(&[("MODFINDER_PORT", "0")], EngineConfig::from_env).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));

        let err = with_env_vars(&[("MODFINDER_PORT", "http")], EngineConfig::from_env).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
    }

    #[test]
    #[serial]
    fn test_invalid_number() {
        let err = with_env_vars(&[("MODFINDER_RATE_LIMIT_MS", "soon")], EngineConfig::from_env)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidNumber { name: "MODFINDER_RATE_LIMIT_MS", .. }
        ));
    }

    #[test]
    #[serial]
    fn test_search_limit_out_of_range() {
        let err = with_env_vars(&[("MODFINDER_SEARCH_LIMIT", "4294967296")], EngineConfig::from_env)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidNumber { name: "MODFINDER_SEARCH_LIMIT", .. }
        ));
    }

    #[test]
    #[serial]
    fn test_blank_curseforge_key_is_missing() {
        let config = with_env_vars(&[("MODFINDER_CURSEFORGE_API_KEY", "   ")], || {
            EngineConfig::from_env().unwrap()
        });
        assert!(matches!(
            config.require_curseforge_key(),
            Err(ConfigError::MissingEnvVar { .. })
        ));
    }
}
