use crate::config::models::AppConfig;
use crate::core::error::ConfigError;
use crate::ports::ConfigurationStore;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub(crate) struct TomlFileConfigAdapter {
    default_path: PathBuf,
}

impl TomlFileConfigAdapter {
    pub(crate) fn new(default_path: PathBuf) -> Self {
        Self { default_path }
    }

    fn read_toml_file<T: DeserializeOwned>(&self, file_path: &Path) -> Result<T, ConfigError> {
        debug!("Reading TOML file: {:?}", file_path);
        let content = fs::read_to_string(file_path).map_err(|e| ConfigError::ReadFile {
            path: file_path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Deserialize {
            path: file_path.to_path_buf(),
            source: Box::new(e),
        })
    }
}

impl ConfigurationStore for TomlFileConfigAdapter {
    fn load_app_config_file(&self, path: &Path) -> Result<AppConfig, ConfigError> {
        self.read_toml_file(path)
    }

    fn get_default_config_path(&self) -> PathBuf {
        self.default_path.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::models::LogFormat;
    use assert_matches::assert_matches;

    #[test]
    fn test_load_full_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rds_sd_config.toml");
        fs::write(
            &path,
            r#"
[server]
listen_address = "127.0.0.1:9000"

[aws]
region = "us-west-2"
role_session_name = "sd-session"
credential_cache_ttl = "10m"
credential_cache_capacity = 16

[logging]
level = "debug"
format = "pretty"
"#,
        )
        .unwrap();

        let adapter = TomlFileConfigAdapter::new(path.clone());
        let config = adapter.load_app_config_file(&path).unwrap();

        assert_eq!(config.server.listen_address, "127.0.0.1:9000");
        assert_eq!(config.aws.region.as_deref(), Some("us-west-2"));
        assert_eq!(config.aws.role_session_name, "sd-session");
        assert_eq!(config.aws.credential_cache_capacity, 16);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_malformed_file_is_deserialize_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[aws\nregion = ").unwrap();

        let adapter = TomlFileConfigAdapter::new(path.clone());
        assert_matches!(
            adapter.load_app_config_file(&path),
            Err(ConfigError::Deserialize { path: p, .. }) if p == path
        );
    }
}
