//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Upper bound for each step of a delete (lookup, file delete, record delete).
    #[serde(default = "default_step_timeout_secs")]
    pub step_timeout_secs: u64,
    /// Maximum accepted size of a photo upload request body, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Enable the /metrics endpoint for Prometheus scraping (default: true).
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
    /// Origins allowed by CORS. Empty means any origin.
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_step_timeout_secs() -> u64 {
    10
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_metrics_enabled() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            step_timeout_secs: default_step_timeout_secs(),
            max_upload_bytes: default_max_upload_bytes(),
            metrics_enabled: default_metrics_enabled(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Get the per-step timeout as a Duration.
    pub fn step_timeout(&self) -> Duration {
        Duration::from_secs(self.step_timeout_secs)
    }
}

/// Photo storage configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Flat directory on the local filesystem.
    Filesystem {
        /// Directory holding uploaded files.
        path: PathBuf,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Filesystem {
            path: PathBuf::from("./uploads"),
        }
    }
}

/// Submission record store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RecordsConfig {
    /// SQLite database file.
    Sqlite {
        /// Database file path.
        path: PathBuf,
    },
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self::Sqlite {
            path: PathBuf::from("./data/guestbook.db"),
        }
    }
}

/// Shared-secret authentication for the `/api` routes.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Value every request must present in the `x-api-key` header.
    /// WARNING: Prefer GUESTBOOK_AUTH__API_KEY over storing it in a config file.
    pub api_key: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl AuthConfig {
    /// Create a test configuration with a fixed key.
    ///
    /// **For testing only.**
    pub fn for_testing() -> Self {
        Self {
            api_key: "test-api-key".to_string(),
        }
    }

    /// Reject keys that would make the gate meaningless.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.trim().is_empty() {
            return Err("auth.api_key must not be empty".to_string());
        }
        Ok(())
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Photo storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Record store configuration.
    #[serde(default)]
    pub records: RecordsConfig,
    /// API key configuration (required).
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Create a test configuration with sensible defaults.
    ///
    /// **For testing only.** Uses the default relative paths and a fixed API key.
    pub fn for_testing() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            records: RecordsConfig::default(),
            auth: AuthConfig::for_testing(),
        }
    }

    /// Validate cross-section invariants.
    pub fn validate(&self) -> Result<(), String> {
        self.auth.validate()?;
        if self.server.step_timeout_secs == 0 {
            return Err("server.step_timeout_secs must be greater than zero".to_string());
        }
        if self.server.max_upload_bytes == 0 {
            return Err("server.max_upload_bytes must be greater than zero".to_string());
        }
        Ok(())
    }
}
