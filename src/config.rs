// Controller configuration and persistence
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Playback behavior knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Progress sampling cadence in milliseconds.
    pub tick_interval_ms: u64,
    /// Reload and replay the same source when it reaches end of stream.
    pub loop_on_finish: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            loop_on_finish: true,
        }
    }
}

impl ControllerConfig {
    /// Get the config file path
    pub fn config_path(app_dir: &Path) -> PathBuf {
        app_dir.join("playback.json")
    }

    pub fn tick_interval(&self) -> Duration {
        // A zero cadence would spin the tick task.
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Load config from file, or return defaults if the file doesn't exist
    pub fn load(app_dir: &Path) -> Result<Self> {
        let path = Self::config_path(app_dir);

        if !path.exists() {
            debug!("no playback config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: ControllerConfig =
            serde_json::from_str(&content).context("Failed to parse playback config")?;

        debug!("loaded playback config from {:?}", path);
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self, app_dir: &Path) -> Result<()> {
        fs::create_dir_all(app_dir).context("Failed to create config directory")?;

        let path = Self::config_path(app_dir);
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize playback config")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        debug!("saved playback config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ControllerConfig::default();
        assert_eq!(config.tick_interval_ms, 100);
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
        assert!(config.loop_on_finish);
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ControllerConfig::load(dir.path()).unwrap();
        assert_eq!(config.tick_interval_ms, 100);
        assert!(config.loop_on_finish);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let config = ControllerConfig {
            tick_interval_ms: 250,
            loop_on_finish: false,
        };
        config.save(dir.path()).unwrap();

        let loaded = ControllerConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.tick_interval_ms, 250);
        assert!(!loaded.loop_on_finish);
    }

    #[test]
    fn test_zero_cadence_is_floored() {
        let config = ControllerConfig {
            tick_interval_ms: 0,
            loop_on_finish: true,
        };
        assert_eq!(config.tick_interval(), Duration::from_millis(1));
    }
}
