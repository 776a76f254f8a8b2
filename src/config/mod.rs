pub(crate) mod models;

use crate::config::models::AppConfig;
use crate::core::error::ConfigError;
use crate::ports::ConfigurationStore;
use std::path::{Path, PathBuf};
use tracing::debug;

pub(crate) const DEFAULT_CONFIG_FILE_NAME: &str = "rds_sd_config.toml";

pub(crate) fn find_config_file() -> PathBuf {
    let current_dir_path = Path::new(".").join(DEFAULT_CONFIG_FILE_NAME);
    if current_dir_path.exists() {
        return current_dir_path;
    }

    if let Some(user_config_dir) = dirs::config_dir() {
        return user_config_dir
            .join("rds-sd")
            .join(DEFAULT_CONFIG_FILE_NAME);
    }
    current_dir_path
}

/// Loads the config from `explicit_path`, or from the default location when
/// none is given. An explicit path must exist; a missing default file yields
/// the built-in defaults.
pub(crate) fn load_app_config(
    store: &dyn ConfigurationStore,
    explicit_path: Option<&Path>,
) -> Result<AppConfig, ConfigError> {
    let config = match explicit_path {
        Some(path) => store.load_app_config_file(path)?,
        None => {
            let default_path = store.get_default_config_path();
            if default_path.exists() {
                store.load_app_config_file(&default_path)?
            } else {
                debug!(
                    "No config file at {:?}, using built-in defaults.",
                    default_path
                );
                AppConfig::default()
            }
        }
    };
    config.validate()?;
    debug!(
        listen_address = %config.server.listen_address,
        credential_cache_ttl = ?config.aws.credential_cache_ttl,
        credential_cache_capacity = config.aws.credential_cache_capacity,
        "Configuration loaded."
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::config::file_store::TomlFileConfigAdapter;
    use assert_matches::assert_matches;
    use std::time::Duration;

    #[test]
    fn test_missing_default_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlFileConfigAdapter::new(dir.path().join(DEFAULT_CONFIG_FILE_NAME));

        let config = load_app_config(&store, None).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlFileConfigAdapter::new(dir.path().join(DEFAULT_CONFIG_FILE_NAME));
        let missing = dir.path().join("missing.toml");

        assert_matches!(
            load_app_config(&store, Some(&missing)),
            Err(ConfigError::ReadFile { .. })
        );
    }

    #[test]
    fn test_default_file_is_loaded_and_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "[aws]\ncredential_cache_ttl = \"90s\"\ncredential_cache_capacity = 8\n",
        )
        .unwrap();
        let store = TomlFileConfigAdapter::new(path);

        let config = load_app_config(&store, None).unwrap();
        assert_eq!(config.aws.credential_cache_ttl, Duration::from_secs(90));
        assert_eq!(config.aws.credential_cache_capacity, 8);
    }

    #[test]
    fn test_invalid_values_are_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[aws]\ncredential_cache_capacity = 0\n").unwrap();
        let store = TomlFileConfigAdapter::new(dir.path().join(DEFAULT_CONFIG_FILE_NAME));

        assert_matches!(
            load_app_config(&store, Some(&path)),
            Err(ConfigError::InvalidValue { .. })
        );
    }
}
