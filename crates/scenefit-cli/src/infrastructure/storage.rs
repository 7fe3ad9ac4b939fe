//! TOML-based settings persistence.
//!
//! Reads and writes [`Settings`] at the platform-appropriate config file:
//! - Windows:  `%APPDATA%\SceneFit\config.toml`
//! - Linux:    `~/.config/scenefit/config.toml`
//! - macOS:    `~/Library/Application Support/SceneFit/config.toml`
//!
//! The settings are a typed struct with every default declared exactly once
//! via serde defaults; a missing file yields the defaults and a malformed
//! file is a typed parse error at load time, not at each use site.  The
//! resize pipeline reads the settings once per invocation and never writes
//! them; only the `setup` and `configure` commands write.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The settings could not be serialized to TOML.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Settings schema ───────────────────────────────────────────────────────────

/// All persisted user settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Settings {
    #[serde(default)]
    pub connection: ConnectionSettings,
    #[serde(default)]
    pub padding: PaddingSettings,
}

/// obs-websocket server coordinates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectionSettings {
    /// Hostname or IP of the machine running OBS.
    #[serde(default = "default_host")]
    pub host: String,
    /// obs-websocket server port (OBS default 4455).
    #[serde(default = "default_port")]
    pub port: u16,
    /// obs-websocket password; empty when authentication is disabled.
    #[serde(default)]
    pub password: String,
}

/// Padding applied inside trimmed edges, in canvas-space pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct PaddingSettings {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_host() -> String {
    "localhost".to_string()
}
fn default_port() -> u16 {
    4455
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            password: String::new(),
        }
    }
}

// ── Settings repository ───────────────────────────────────────────────────────

impl Settings {
    /// Loads settings from the platform config file, returning defaults when
    /// the file does not yet exist.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] for file-system errors other than "not
    /// found" and [`SettingsError::Parse`] if the TOML is malformed.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&settings_file_path()?)
    }

    /// Loads settings from an explicit path (used directly by tests).
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(SettingsError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Persists the settings to the platform config file, creating the
    /// directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] for file-system failures or
    /// [`SettingsError::Serialize`] if serialization fails.
    pub fn save(&self) -> Result<(), SettingsError> {
        self.save_to(&settings_file_path()?)
    }

    /// Persists the settings to an explicit path (used directly by tests).
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| SettingsError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Resolves the full path of the settings file.
///
/// # Errors
///
/// Returns [`SettingsError::NoPlatformConfigDir`] if the platform base
/// directory cannot be determined from the environment.
pub fn settings_file_path() -> Result<PathBuf, SettingsError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(SettingsError::NoPlatformConfigDir)
}

/// Resolves the platform config directory for this application.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("SceneFit"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("scenefit"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("SceneFit")
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

    fn temp_settings_path(tag: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("scenefit_test_{tag}_{}", std::process::id()))
            .join("config.toml")
    }

    #[test]
    fn test_defaults_match_the_documented_values() {
        let settings = Settings::default();
        assert_eq!(settings.connection.host, "localhost");
        assert_eq!(settings.connection.port, 4455);
        assert_eq!(settings.connection.password, "");
        assert_eq!(settings.padding.x, 0.0);
        assert_eq!(settings.padding.y, 0.0);
    }

    #[test]
    fn test_load_from_missing_file_returns_defaults() {
        let path = PathBuf::from("/nonexistent/scenefit/config.toml");
        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = temp_settings_path("round_trip");
        let mut settings = Settings::default();
        settings.connection.host = "10.0.0.7".to_string();
        settings.connection.port = 4460;
        settings.connection.password = "hunter2".to_string();
        settings.padding.x = 12.5;

        settings.save_to(&path).unwrap();
        let loaded = Settings::load_from(&path).unwrap();

        assert_eq!(loaded, settings);

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_partial_toml_fills_missing_fields_with_defaults() {
        let toml_str = r#"
[connection]
host = "studio-mac.local"
"#;
        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.connection.host, "studio-mac.local");
        assert_eq!(settings.connection.port, 4455);
        assert_eq!(settings.padding.x, 0.0);
    }

    #[test]
    fn test_empty_toml_is_all_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let path = temp_settings_path("malformed");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[[[ not valid toml").unwrap();

        let result = Settings::load_from(&path);
        assert!(matches!(result, Err(SettingsError::Parse(_))));

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_padding_accepts_fractional_values() {
        let toml_str = r#"
[padding]
x = 7.25
y = 3.5
"#;
        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.padding.x, 7.25);
        assert_eq!(settings.padding.y, 3.5);
    }
}
