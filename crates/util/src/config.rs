//! Console configuration.
//!
//! A small JSON document read from `$HLLRCON_CONFIG_PATH` or
//! `<config_dir>/hllrcon/config.json`. A missing file yields defaults; a file
//! that cannot be parsed is reported with a warning and also yields defaults.
//! `HLLRCON_API_BASE` and `HLLRCON_SESSION` override the file.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::{config_root, expand_tilde};

/// Environment variable allowing callers to override the config file path.
pub const CONFIG_PATH_ENV: &str = "HLLRCON_CONFIG_PATH";
pub const API_BASE_ENV: &str = "HLLRCON_API_BASE";
pub const SESSION_ENV: &str = "HLLRCON_SESSION";

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DEFAULT_API_BASE: &str = "http://localhost:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Base URL of the administration API.
    pub api_base: String,
    /// Pre-established session credential sent as the `hll_session` cookie.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    /// Prefills for the connect form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_port: Option<u16>,
    pub allow_insecure: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            session_id: None,
            request_timeout_secs: None,
            default_host: None,
            default_port: None,
            allow_insecure: false,
        }
    }
}

impl ConsoleConfig {
    /// Load from the default location and apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&default_config_path())?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from an explicit path without consulting the environment.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match Self::load_strict(path) {
            Err(ConfigError::Serialization(error)) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Failed to parse config file; using defaults"
                );
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Like [`Self::load_from`], but an unparsable file is an error. Use
    /// before rewriting the file so its contents are never replaced by
    /// defaults.
    pub fn load_strict(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data).map_err(io_error)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Some(api_base) = non_empty_env(API_BASE_ENV) {
            self.api_base = api_base;
        }
        if let Some(session) = non_empty_env(SESSION_ENV) {
            self.session_id = Some(session);
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.filter(|secs| *secs > 0).map(Duration::from_secs)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

/// Get the default path for the configuration file.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }

    config_root().join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().expect("tempdir");
        let config = ConsoleConfig::load_from(&dir.path().join("absent.json")).expect("load");
        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn unparsable_file_yields_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{ not json").expect("write");
        assert_eq!(ConsoleConfig::load_from(&path).expect("load"), ConsoleConfig::default());
        assert!(matches!(ConsoleConfig::load_strict(&path), Err(ConfigError::Serialization(_))));
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{"default_host": "10.0.0.5", "default_port": 7779, "request_timeout_secs": 15}"#).expect("write");

        let config = ConsoleConfig::load_from(&path).expect("load");
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.default_host.as_deref(), Some("10.0.0.5"));
        assert_eq!(config.default_port, Some(7779));
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let config = ConsoleConfig {
            api_base: "https://rcon.example.com".into(),
            allow_insecure: true,
            ..Default::default()
        };
        config.save_to(&path).expect("save");
        assert_eq!(ConsoleConfig::load_from(&path).expect("load"), config);
    }

    #[test]
    fn environment_overrides_file_values() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{"api_base": "http://localhost:9000"}"#).expect("write");

        temp_env::with_vars(
            [
                (CONFIG_PATH_ENV, Some(path.to_string_lossy().to_string())),
                (API_BASE_ENV, Some("http://127.0.0.1:8080".to_string())),
                (SESSION_ENV, Some("abc123".to_string())),
            ],
            || {
                let config = ConsoleConfig::load().expect("load");
                assert_eq!(config.api_base, "http://127.0.0.1:8080");
                assert_eq!(config.session_id.as_deref(), Some("abc123"));
            },
        );
    }

    #[test]
    fn blank_environment_values_are_ignored() {
        temp_env::with_vars([(API_BASE_ENV, Some("   ")), (SESSION_ENV, None)], || {
            let mut config = ConsoleConfig::default();
            config.apply_env_overrides();
            assert_eq!(config.api_base, DEFAULT_API_BASE);
            assert_eq!(config.session_id, None);
        });
    }
}
