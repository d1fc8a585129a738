//! Configuration module for DataShare.

use serde::Deserialize;
use std::path::Path;

use crate::{DataShareError, Result};

/// Web server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins (empty = permissive dev mode).
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Secret key for signing JWT access tokens.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Access token expiry in seconds.
    #[serde(default = "default_jwt_expiry")]
    pub jwt_token_expiry_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_jwt_secret() -> String {
    // Placeholder for development only; deployments must override this.
    "change-me-in-production".to_string()
}

fn default_jwt_expiry() -> u64 {
    3600
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            jwt_secret: default_jwt_secret(),
            jwt_token_expiry_secs: default_jwt_expiry(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/datashare.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Blob storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the upload storage directory.
    #[serde(default = "default_storage_path")]
    pub path: String,
}

fn default_storage_path() -> String {
    "data/uploads".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

/// Upload validation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Maximum upload size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
    /// MIME types that are rejected on upload.
    #[serde(default = "default_forbidden_mime_types")]
    pub forbidden_mime_types: Vec<String>,
    /// File extensions (with leading dot, case-insensitive) rejected on upload.
    #[serde(default = "default_forbidden_extensions")]
    pub forbidden_extensions: Vec<String>,
}

fn default_max_file_size() -> u64 {
    // 1 GiB
    1024 * 1024 * 1024
}

fn default_forbidden_mime_types() -> Vec<String> {
    vec![
        "application/x-msdownload".to_string(),
        "application/x-sh".to_string(),
        "application/x-bat".to_string(),
    ]
}

fn default_forbidden_extensions() -> Vec<String> {
    vec![
        ".exe".to_string(),
        ".bat".to_string(),
        ".sh".to_string(),
        ".cmd".to_string(),
    ]
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: default_max_file_size(),
            forbidden_mime_types: default_forbidden_mime_types(),
            forbidden_extensions: default_forbidden_extensions(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/datashare.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Web server settings.
    #[serde(default)]
    pub web: WebConfig,
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Blob storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Upload validation settings.
    #[serde(default)]
    pub upload: UploadConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| DataShareError::Config(e.to_string()))
    }
}
