//! Upload destination configuration
//!
//! Built-in defaults point at the Maloo collection server. An optional TOML
//! file at `~/.config/maloo/upload.toml` overrides individual fields; a file
//! that is present but malformed is a hard error rather than being ignored.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::transfer::RemoteTarget;

/// Default service account on the collection server
pub const DEFAULT_USER: &str = "maloo";

/// Default collection server host
pub const DEFAULT_HOST: &str = "whamcloud.no-ip.org";

/// Default incoming directory, relative to the account home
pub const DEFAULT_INCOMING_DIR: &str = "incoming";

/// Default scp connection timeout
pub const DEFAULT_CONNECT_TIMEOUT_SECONDS: u32 = 30;

/// Error types for config operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Upload destination configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Service account on the collection server
    pub user: String,

    /// Collection server host
    pub host: String,

    /// Incoming directory, relative to the account home
    pub incoming_dir: String,

    /// Connection timeout passed to scp
    pub connect_timeout_seconds: u32,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            user: DEFAULT_USER.to_string(),
            host: DEFAULT_HOST.to_string(),
            incoming_dir: DEFAULT_INCOMING_DIR.to_string(),
            connect_timeout_seconds: DEFAULT_CONNECT_TIMEOUT_SECONDS,
        }
    }
}

impl UploadConfig {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    /// Parse config from a TOML string
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        let config: UploadConfig = toml::from_str(s)?;
        Ok(config)
    }

    /// Load the user config file, falling back to the built-in defaults
    pub fn load_default() -> Result<Self, ConfigError> {
        match default_config_path() {
            Some(path) if path.exists() => {
                log::debug!("Loading upload config from {}", path.display());
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// The remote target described by this config
    pub fn target(&self) -> RemoteTarget {
        RemoteTarget {
            user: self.user.clone(),
            host: self.host.clone(),
            incoming_dir: self.incoming_dir.clone(),
        }
    }
}

/// Path of the user config file (`~/.config/maloo/upload.toml`)
fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config/maloo/upload.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = UploadConfig::default();
        assert_eq!(config.user, "maloo");
        assert_eq!(config.host, "whamcloud.no-ip.org");
        assert_eq!(config.incoming_dir, "incoming");
        assert_eq!(config.connect_timeout_seconds, 30);
        assert_eq!(
            config.target().to_string(),
            "maloo@whamcloud.no-ip.org:incoming/"
        );
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = UploadConfig::from_str("host = \"logs.example.org\"").unwrap();
        assert_eq!(config.host, "logs.example.org");
        assert_eq!(config.user, "maloo");
        assert_eq!(config.incoming_dir, "incoming");
    }

    #[test]
    fn test_full_override() {
        let config = UploadConfig::from_str(
            r#"
            user = "collector"
            host = "logs.example.org"
            incoming_dir = "drop"
            connect_timeout_seconds = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.user, "collector");
        assert_eq!(config.connect_timeout_seconds, 5);
        assert_eq!(config.target().to_string(), "collector@logs.example.org:drop/");
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let err = UploadConfig::from_str("user = [").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
