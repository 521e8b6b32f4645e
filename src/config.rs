//! Configuration module
//!
//! Loaded from TOML (`~/.config/court-booking/config.toml` by default).
//! Every section has defaults, so a missing file or a partial file is fine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::notification::DEFAULT_CHANNELS;
use crate::domain::ClubPolicy;
use crate::infrastructure::crypto::password::DEFAULT_COST;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to render config: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub notifications: NotificationsConfig,
    pub security: SecurityConfig,
    pub seed: SeedConfig,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON snapshot holding the whole club state
    pub snapshot_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let base = dirs_next::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            snapshot_path: base.join("court-booking").join("state.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn, error (or any EnvFilter directive)
    pub level: String,
    /// "text" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    /// Every notification is recorded once per channel
    pub channels: Vec<String>,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            channels: DEFAULT_CHANNELS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub bcrypt_cost: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: DEFAULT_COST,
        }
    }
}

/// Used only when no snapshot exists yet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub admin_email: String,
    pub admin_password: String,
    pub admin_phone: String,
    pub admin_dni: String,
    pub policy: ClubPolicy,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            admin_email: "admin@club.local".to_string(),
            admin_password: "admin".to_string(),
            admin_phone: "11-0000-0000".to_string(),
            admin_dni: "12345678".to_string(),
            policy: ClubPolicy::default(),
        }
    }
}

/// Artificial latency of the stand-in collaborators
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub socio_latency_ms: u64,
    pub gateway_latency_ms: u64,
}

impl SimulationConfig {
    pub fn socio_latency(&self) -> Duration {
        Duration::from_millis(self.socio_latency_ms)
    }

    pub fn gateway_latency(&self) -> Duration {
        Duration::from_millis(self.gateway_latency_ms)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            socio_latency_ms: 450,
            gateway_latency_ms: 650,
        }
    }
}

impl AppConfig {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Ok(toml::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write this configuration as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// `~/.config/court-booking/config.toml`, or `./config.toml` when the
/// platform has no config directory.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|d| d.join("court-booking").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}
