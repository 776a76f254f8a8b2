use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub aws: AwsGlobalConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        self.server.socket_addr()?;
        if self.aws.credential_cache_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "aws.credential_cache_capacity".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.aws.credential_cache_ttl.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "aws.credential_cache_ttl".to_string(),
                message: "must be a non-zero duration".to_string(),
            });
        }
        if self.aws.role_session_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "aws.role_session_name".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
}

fn default_listen_address() -> String {
    "0.0.0.0:6748".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
        }
    }
}

impl ServerConfig {
    pub(crate) fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.listen_address
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
                field: "server.listen_address".to_string(),
                message: format!("'{}': {}", self.listen_address, e),
            })
    }

    pub(crate) fn with_port(&self, port: u16) -> Result<Self, ConfigError> {
        let mut addr = self.socket_addr()?;
        addr.set_port(port);
        Ok(Self {
            listen_address: addr.to_string(),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AwsGlobalConfig {
    pub region: Option<String>,
    #[serde(default = "default_role_session_name")]
    pub role_session_name: String,
    #[serde(with = "humantime_serde", default = "default_credential_cache_ttl")]
    pub credential_cache_ttl: Duration,
    #[serde(default = "default_credential_cache_capacity")]
    pub credential_cache_capacity: u64,
}

fn default_role_session_name() -> String {
    "PrometheusRdsServiceDisocvery".to_string()
}
fn default_credential_cache_ttl() -> Duration {
    Duration::from_secs(600)
}
fn default_credential_cache_capacity() -> u64 {
    1024
}

impl Default for AwsGlobalConfig {
    fn default() -> Self {
        Self {
            region: None,
            role_session_name: default_role_session_name(),
            credential_cache_ttl: default_credential_cache_ttl(),
            credential_cache_capacity: default_credential_cache_capacity(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> LogFormat {
    LogFormat::Compact
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.server.listen_address, "0.0.0.0:6748");
        assert_eq!(config.aws.credential_cache_ttl, Duration::from_secs(600));
        assert_eq!(config.aws.credential_cache_capacity, 1024);
        assert_eq!(
            config.aws.role_session_name,
            "PrometheusRdsServiceDisocvery"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [aws]
            region = "eu-west-1"
            credential_cache_ttl = "5m"

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.aws.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.aws.credential_cache_ttl, Duration::from_secs(300));
        assert_eq!(config.aws.credential_cache_capacity, 1024);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.server, ServerConfig::default());
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let mut config = AppConfig::default();
        config.aws.credential_cache_capacity = 0;
        assert_matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "aws.credential_cache_capacity"
        );
    }

    #[test]
    fn test_validate_rejects_zero_ttl() {
        let mut config = AppConfig::default();
        config.aws.credential_cache_ttl = Duration::ZERO;
        assert_matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "aws.credential_cache_ttl"
        );
    }

    #[test]
    fn test_validate_rejects_bad_listen_address() {
        let mut config = AppConfig::default();
        config.server.listen_address = "not-an-address".to_string();
        assert_matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "server.listen_address"
        );
    }

    #[test]
    fn test_port_override() {
        let server = ServerConfig::default().with_port(9100).unwrap();
        assert_eq!(server.listen_address, "0.0.0.0:9100");
    }
}
