//! Configuration for the mediator server.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use mediator_core::EngineConfig;

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Network settings.
    pub network: NetworkConfig,
    /// Filesystem roots.
    pub files: FilesConfig,
    /// Screen capture settings.
    pub screen: ScreenConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Network configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
}

/// Filesystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Root directory exposed through `/api/dir/`.
    pub base_path: PathBuf,
    /// Directory of static browser assets served at `/`. The default
    /// points at the `web/` client shipped in the repository, relative to
    /// the working directory.
    pub web_root: PathBuf,
}

/// Screen capture configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// JPEG quality (1-100).
    pub quality: u8,
    /// Maximum frames per second.
    pub fps: u8,
    /// Number of reusable frame buffers.
    pub pool_size: usize,
    /// Delay before retrying a failed capture, in milliseconds.
    pub retry_backoff_ms: u64,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
        }
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("."),
            web_root: PathBuf::from("./web"),
        }
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            quality: 80,
            fps: 15,
            pool_size: 4,
            retry_backoff_ms: 2000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl ServerConfig {
    /// Load configuration from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => {
                tracing::info!("no config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Render the default configuration as TOML.
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&Self::default())
    }

    /// Convert capture settings into an `EngineConfig`.
    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig {
            quality: self.screen.quality.clamp(1, 100),
            frame_interval: EngineConfig::interval_for_fps(self.screen.fps),
            retry_backoff: Duration::from_millis(self.screen.retry_backoff_ms),
            pool_size: self.screen.pool_size.max(1),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
