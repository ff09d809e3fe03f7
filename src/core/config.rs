//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.pawchat/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::api::Timeouts;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PawchatConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub player: PlayerConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
    pub chat_timeout_secs: Option<u64>,
    pub upload_timeout_secs: Option<u64>,
    pub health_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PlayerConfig {
    /// External command used for video playback (invoked with the stream URL).
    pub command: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_HEALTH_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_PLAYER_COMMAND: &str = "mpv";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub timeouts: Timeouts,
    pub player_command: String,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.pawchat/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".pawchat").join("config.toml"))
}

/// Load config from `~/.pawchat/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `PawchatConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<PawchatConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(PawchatConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(PawchatConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: PawchatConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# PawChat Configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [server]
# base_url = "http://localhost:5000/api"
# chat_timeout_secs = 120
# upload_timeout_secs = 600
# health_timeout_secs = 5

# [player]
# command = "mpv"                      # Or "vlc", "ffplay", ... (invoked with the video URL)
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_server` is the `--server` flag (None = not specified).
pub fn resolve(config: &PawchatConfig, cli_server: Option<&str>) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli_server
        .map(|s| s.to_string())
        .or_else(|| std::env::var("PAWCHAT_BASE_URL").ok())
        .or_else(|| config.server.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Player command: env → config → default
    let player_command = std::env::var("PAWCHAT_PLAYER")
        .ok()
        .or_else(|| config.player.command.clone())
        .unwrap_or_else(|| DEFAULT_PLAYER_COMMAND.to_string());

    let timeouts = Timeouts {
        health: Duration::from_secs(
            config
                .server
                .health_timeout_secs
                .unwrap_or(DEFAULT_HEALTH_TIMEOUT_SECS),
        ),
        chat: Duration::from_secs(
            config
                .server
                .chat_timeout_secs
                .unwrap_or(DEFAULT_CHAT_TIMEOUT_SECS),
        ),
        upload: Duration::from_secs(
            config
                .server
                .upload_timeout_secs
                .unwrap_or(DEFAULT_UPLOAD_TIMEOUT_SECS),
        ),
    };

    ResolvedConfig {
        base_url,
        timeouts,
        player_command,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = PawchatConfig::default();
        assert!(config.server.base_url.is_none());
        assert!(config.player.command.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = PawchatConfig::default();
        let resolved = resolve(&config, None);
        assert_eq!(resolved.base_url, DEFAULT_BASE_URL);
        assert_eq!(resolved.player_command, DEFAULT_PLAYER_COMMAND);
        assert_eq!(
            resolved.timeouts.chat,
            Duration::from_secs(DEFAULT_CHAT_TIMEOUT_SECS)
        );
        assert_eq!(
            resolved.timeouts.upload,
            Duration::from_secs(DEFAULT_UPLOAD_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = PawchatConfig {
            server: ServerConfig {
                base_url: Some("http://pet-lab:9000/api".to_string()),
                chat_timeout_secs: Some(30),
                upload_timeout_secs: Some(90),
                health_timeout_secs: Some(2),
            },
            player: PlayerConfig {
                command: Some("vlc".to_string()),
            },
        };
        let resolved = resolve(&config, None);
        assert_eq!(resolved.base_url, "http://pet-lab:9000/api");
        assert_eq!(resolved.player_command, "vlc");
        assert_eq!(resolved.timeouts.chat, Duration::from_secs(30));
        assert_eq!(resolved.timeouts.health, Duration::from_secs(2));
    }

    #[test]
    fn test_resolve_cli_server_wins() {
        let config = PawchatConfig {
            server: ServerConfig {
                base_url: Some("http://from-config:5000/api".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve(&config, Some("http://from-cli:5000/api"));
        assert_eq!(resolved.base_url, "http://from-cli:5000/api");
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[server]
base_url = "http://192.168.1.20:5000/api"
chat_timeout_secs = 60

[player]
command = "ffplay"
"#;
        let config: PawchatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.server.base_url.as_deref(),
            Some("http://192.168.1.20:5000/api")
        );
        assert_eq!(config.server.chat_timeout_secs, Some(60));
        assert!(config.server.upload_timeout_secs.is_none());
        assert_eq!(config.player.command.as_deref(), Some("ffplay"));
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing — everything else stays default
        let toml_str = r#"
[server]
base_url = "http://localhost:8080/api"
"#;
        let config: PawchatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.server.base_url.as_deref(),
            Some("http://localhost:8080/api")
        );
        assert!(config.server.chat_timeout_secs.is_none());
        assert!(config.player.command.is_none());
    }
}
