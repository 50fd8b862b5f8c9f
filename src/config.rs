//! Cockpit settings
//!
//! Stored as TOML under the user's config directory. A missing file degrades
//! to defaults so the cockpit always starts.

use crate::error::CockpitError;
use crate::gamepad::MappingProfile;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const CONFIG_DIR: &str = "cockpit";
const SETTINGS_FILE: &str = "settings.toml";

/// Settings shared by the gamepad poller, the key composer and the event stream
///
/// Every field has a default, so a partial TOML file only overrides what it
/// names.
///
/// # Performance Impact
///
/// - `gamepad_poll_interval_ms`: lower values react faster but sample more often
/// - `key_hold_interval_ms`: lower values produce more `held` events per key
/// - `event_buffer`: subscribers lagging by more than this many events skip ahead
///
/// # Examples
///
/// ```rust
/// use cockpit::{CockpitSettings, MappingProfile};
///
/// let settings = CockpitSettings::parse("gamepad_poll_interval_ms = 16").unwrap();
/// assert_eq!(settings.gamepad_poll_interval_ms, 16);
/// assert_eq!(settings.key_hold_interval_ms, 30);
/// assert_eq!(settings.default_profile, MappingProfile::Standard);
/// ```
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CockpitSettings {
    /// Gamepad re-sampling period
    pub gamepad_poll_interval_ms: u64,

    /// Period of `held` ticks for each held key
    pub key_hold_interval_ms: u64,

    /// How long discovery waits for a first device
    pub discovery_timeout_ms: u64,

    /// Pause between device enumerations while discovering
    pub discovery_retry_ms: u64,

    /// Profile used when discovery auto-connects the first device
    pub default_profile: MappingProfile,

    /// Capacity of the broadcast buffer behind each event stream
    pub event_buffer: usize,
}

impl Default for CockpitSettings {
    fn default() -> Self {
        Self {
            gamepad_poll_interval_ms: 50,
            key_hold_interval_ms: 30,
            discovery_timeout_ms: 2000,
            discovery_retry_ms: 100,
            default_profile: MappingProfile::Standard,
            event_buffer: 1000,
        }
    }
}

impl CockpitSettings {
    /// Default location: `<config_dir>/cockpit/settings.toml`
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| {
                warn!("No config or home directory found, using working directory");
                PathBuf::from(".")
            });
        path.push(CONFIG_DIR);
        path.push(SETTINGS_FILE);
        path
    }

    pub async fn load() -> Result<Self, CockpitError> {
        Self::load_from(&Self::default_path()).await
    }

    /// Reads settings from `path`, falling back to defaults when absent.
    pub async fn load_from(path: &Path) -> Result<Self, CockpitError> {
        let exists = tokio::fs::try_exists(path).await.map_err(|e| {
            CockpitError::ConfigError(format!("Failed to check settings file: {}", e))
        })?;
        if !exists {
            info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            CockpitError::ConfigError(format!("Failed to read settings file: {}", e))
        })?;
        let settings = Self::parse(&content)?;
        debug!("Loaded settings from {}: {:?}", path.display(), settings);
        Ok(settings)
    }

    pub fn parse(content: &str) -> Result<Self, CockpitError> {
        toml::from_str(content)
            .map_err(|e| CockpitError::ConfigError(format!("Failed to parse settings: {}", e)))
    }

    pub async fn save_to(&self, path: &Path) -> Result<(), CockpitError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                CockpitError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| CockpitError::ConfigError(format!("Failed to serialize settings: {}", e)))?;
        tokio::fs::write(path, content).await.map_err(|e| {
            CockpitError::ConfigError(format!("Failed to write settings file: {}", e))
        })?;
        info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Writes the defaults to `path` unless a file already exists there.
    pub async fn ensure_default(path: &Path) -> Result<(), CockpitError> {
        let exists = tokio::fs::try_exists(path).await.map_err(|e| {
            CockpitError::ConfigError(format!("Failed to check settings file: {}", e))
        })?;
        if exists {
            debug!("Settings already present at {}", path.display());
            return Ok(());
        }
        Self::default().save_to(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let settings = CockpitSettings::parse(
            "key_hold_interval_ms = 15\ndefault_profile = \"Alternate\"\n",
        )
        .unwrap();
        assert_eq!(settings.key_hold_interval_ms, 15);
        assert_eq!(settings.default_profile, MappingProfile::Alternate);
        assert_eq!(settings.gamepad_poll_interval_ms, 50);
        assert_eq!(settings.discovery_timeout_ms, 2000);
    }

    #[test]
    fn garbage_is_a_config_error() {
        let err = CockpitSettings::parse("gamepad_poll_interval_ms = \"fast\"").unwrap_err();
        assert!(matches!(err, CockpitError::ConfigError(_)));
    }

    #[tokio::test]
    async fn missing_file_loads_defaults_and_ensure_writes_them() {
        let mut path = std::env::temp_dir();
        path.push(format!("cockpit-settings-{}", std::process::id()));
        path.push(SETTINGS_FILE);
        let _ = tokio::fs::remove_file(&path).await;

        let loaded = CockpitSettings::load_from(&path).await.unwrap();
        assert_eq!(loaded, CockpitSettings::default());

        CockpitSettings::ensure_default(&path).await.unwrap();
        assert!(tokio::fs::try_exists(&path).await.unwrap());
        let reloaded = CockpitSettings::load_from(&path).await.unwrap();
        assert_eq!(reloaded, CockpitSettings::default());

        let _ = tokio::fs::remove_file(&path).await;
    }
}
