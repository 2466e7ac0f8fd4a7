//! Optional RON configuration for the shell.
//!
//! A missing file means defaults. A file that cannot be read or parsed is
//! logged and also falls back to defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use stockbot_engine::{EngineConfig, FetchSettings, PrefilledSource, RunSettings};
use stockbot_logging::{bot_info, bot_warn};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PauseConfig {
    pub step_ms: u64,
    pub folder_ms: u64,
    pub image_ms: u64,
    pub row_ms: u64,
}

impl Default for PauseConfig {
    fn default() -> Self {
        let run = RunSettings::default();
        Self {
            step_ms: millis(run.step_pause),
            folder_ms: millis(run.folder_pause),
            image_ms: millis(run.image_pause),
            row_ms: millis(run.row_pause),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// File path or http(s) URL of the prefilled stock list.
    pub prefilled: String,
    pub pauses: PauseConfig,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            prefilled: "data/prefilled_stocks.json".to_string(),
            pauses: PauseConfig::default(),
            request_timeout_secs: FetchSettings::default().request_timeout.as_secs(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(ron::from_str(&content)?))
    }

    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(Some(config)) => {
                bot_info!("Loaded config from {:?}", path);
                config
            }
            Ok(None) => Self::default(),
            Err(err) => {
                bot_warn!("Ignoring config at {:?}: {}", path, err);
                Self::default()
            }
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        let run = RunSettings {
            step_pause: Duration::from_millis(self.pauses.step_ms),
            folder_pause: Duration::from_millis(self.pauses.folder_ms),
            image_pause: Duration::from_millis(self.pauses.image_ms),
            row_pause: Duration::from_millis(self.pauses.row_ms),
            ..RunSettings::default()
        };
        let fetch = FetchSettings {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..FetchSettings::default()
        };
        EngineConfig {
            run,
            fetch,
            prefilled: PrefilledSource::parse(&self.prefilled),
            ..EngineConfig::default()
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_not_an_error() {
        let temp = TempDir::new().unwrap();
        let loaded = AppConfig::load(&temp.path().join("stockbot.ron")).unwrap();
        assert!(loaded.is_none());
        assert_eq!(
            AppConfig::load_or_default(&temp.path().join("stockbot.ron")),
            AppConfig::default()
        );
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("stockbot.ron");
        fs::write(&path, "(pauses: (step_ms: 10))").unwrap();

        let config = AppConfig::load(&path).unwrap().unwrap();
        assert_eq!(config.pauses.step_ms, 10);
        assert_eq!(config.pauses.folder_ms, 500);
        assert_eq!(config.prefilled, "data/prefilled_stocks.json");

        let engine = config.engine_config();
        assert_eq!(engine.run.step_pause, Duration::from_millis(10));
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("stockbot.ron");
        fs::write(&path, "(pauses: ").unwrap();

        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Parse(_))));
        assert_eq!(AppConfig::load_or_default(&path), AppConfig::default());
    }

    #[test]
    fn url_prefilled_becomes_url_source() {
        let config = AppConfig {
            prefilled: "https://example.com/data/prefilled_stocks.json".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(
            config.engine_config().prefilled,
            PrefilledSource::Url(_)
        ));
    }
}
