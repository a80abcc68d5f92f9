//! TOML configuration for the client.
//!
//! A missing file means "use the defaults"; any field left out of the file
//! takes its default as well, so a config file only needs the settings that
//! differ:
//!
//! ```toml
//! [network]
//! host = "192.168.1.20"
//!
//! [input]
//! queue_capacity = 16
//! ```
//!
//! Without `--config` the file is looked up in the platform config directory:
//! - Windows:  `%APPDATA%\GameScreen\config.toml`
//! - Linux:    `~/.config/gamescreen/config.toml`
//! - macOS:    `~/Library/Application Support/GameScreen/config.toml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use gamescreen_core::controller::ControllerConfig;
use gamescreen_core::domain::connection::RECONNECT_DELAY;
use gamescreen_core::domain::queue::DEFAULT_QUEUE_CAPACITY;
use gamescreen_core::protocol::{host_without_port, ws_url, DEFAULT_HTTP_PORT, DEFAULT_WS_PORT};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No `--config` was given and the platform config directory is unknown.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the peer lives and how patiently to talk to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    /// Peer host name or address.  A `:port` suffix is ignored.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port of the websocket frame stream.
    #[serde(default = "default_ws_port")]
    pub ws_port: u16,
    /// Port of the HTTP input endpoint.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Delay between a transport failure and the next connect attempt.
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
    /// Upper bound on a single input request.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputConfig {
    /// Events allowed to wait behind the in-flight request.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    /// Write the visible surface to this PNG file after each paint.
    /// Empty disables snapshots.
    #[serde(default)]
    pub snapshot_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_ws_port() -> u16 {
    DEFAULT_WS_PORT
}
fn default_http_port() -> u16 {
    DEFAULT_HTTP_PORT
}
fn default_reconnect_delay_ms() -> u64 {
    RECONNECT_DELAY.as_millis() as u64
}
fn default_request_timeout_ms() -> u64 {
    2000
}
fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            ws_port: default_ws_port(),
            http_port: default_http_port(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ── Derived values ────────────────────────────────────────────────────────────

impl ClientConfig {
    /// URL of the websocket frame stream.
    pub fn ws_url(&self) -> String {
        ws_url(&self.network.host, self.network.ws_port)
    }

    /// Base URL of the HTTP server, with a trailing slash.
    pub fn http_base_url(&self) -> String {
        format!(
            "http://{}:{}/",
            host_without_port(&self.network.host),
            self.network.http_port
        )
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.network.reconnect_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.network.request_timeout_ms)
    }

    /// Snapshot destination, if enabled.
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        if self.display.snapshot_path.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.display.snapshot_path))
        }
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            reconnect_delay: self.reconnect_delay(),
            queue_capacity: self.input.queue_capacity,
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Full path of the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot
/// be determined from the environment.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads the config at `path`, or the defaults if the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ClientConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(path: &Path, config: &ClientConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("GameScreen"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("gamescreen"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("GameScreen")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("gamescreen-config-{}-{name}", std::process::id()))
            .join("config.toml")
    }

    #[test]
    fn test_defaults_match_peer_ports() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.network.ws_port, 1148);
        assert_eq!(cfg.network.http_port, 8282);
        assert_eq!(cfg.reconnect_delay(), Duration::from_millis(250));
        assert_eq!(cfg.input.queue_capacity, 64);
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.snapshot_path(), None);
    }

    #[test]
    fn test_urls_strip_host_port() {
        // Arrange
        let mut cfg = ClientConfig::default();
        cfg.network.host = "10.1.2.3:8282".to_string();

        // Act / Assert
        assert_eq!(cfg.ws_url(), "ws://10.1.2.3:1148/");
        assert_eq!(cfg.http_base_url(), "http://10.1.2.3:8282/");
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        // Arrange
        let text = "[network]\nhost = \"gameboy.local\"\n\n[input]\nqueue_capacity = 8\n";

        // Act
        let cfg: ClientConfig = toml::from_str(text).unwrap();

        // Assert
        assert_eq!(cfg.network.host, "gameboy.local");
        assert_eq!(cfg.network.ws_port, 1148);
        assert_eq!(cfg.input.queue_capacity, 8);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_empty_file_is_default() {
        let cfg: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, ClientConfig::default());
    }

    #[test]
    fn test_controller_config_carries_tunables() {
        let mut cfg = ClientConfig::default();
        cfg.network.reconnect_delay_ms = 1000;
        cfg.input.queue_capacity = 3;

        let controller = cfg.controller_config();

        assert_eq!(controller.reconnect_delay, Duration::from_secs(1));
        assert_eq!(controller.queue_capacity, 3);
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let path = temp_path("missing");
        let cfg = load_config(&path).expect("missing file is not an error");
        assert_eq!(cfg, ClientConfig::default());
    }

    #[test]
    fn test_save_then_load_preserves_values() {
        // Arrange
        let path = temp_path("save");
        let mut cfg = ClientConfig::default();
        cfg.network.host = "192.168.0.9".to_string();
        cfg.display.snapshot_path = "/tmp/screen.png".to_string();

        // Act
        save_config(&path, &cfg).unwrap();
        let loaded = load_config(&path).unwrap();

        // Assert
        assert_eq!(loaded, cfg);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_load_malformed_file_is_parse_error() {
        let path = temp_path("malformed");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[network\nhost = ").unwrap();

        let err = load_config(&path).unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
