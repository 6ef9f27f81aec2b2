//! Application settings
//!
//! `settings.json` in the data directory. Missing fields take their
//! defaults; a missing or unreadable file means all defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::report::PeriodSettings;

pub const APP_NAME: &str = "health-diary";
/// Overrides the data directory when set
pub const DATA_DIR_ENV: &str = "HEALTH_DIARY_DATA_DIR";
pub const SETTINGS_FILE: &str = "settings.json";
pub const DB_FILE: &str = "health_diary.db";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings I/O error: {0}")]
    Io(String),
    #[error("Settings parse error: {0}")]
    Parse(String),
    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// `$HEALTH_DIARY_DATA_DIR`, else `<local data dir>/health-diary`
pub fn default_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the database and this file; not serialized
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Log directory, `<data_dir>/logs` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
    /// Default report window in days
    pub report_days: u32,
    pub period: PeriodSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_dir: None,
            report_days: 30,
            period: PeriodSettings::default(),
        }
    }
}

impl Settings {
    pub fn path_in(data_dir: &Path) -> PathBuf {
        data_dir.join(SETTINGS_FILE)
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| self.data_dir.join("logs"))
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.report_days == 0 {
            return Err(SettingsError::Invalid("report_days must be at least 1".into()));
        }
        if self.period.closing_gap_days == 0 {
            return Err(SettingsError::Invalid("period.closing_gap_days must be at least 1".into()));
        }
        Ok(())
    }

    /// Load settings from `data_dir`; a missing file yields defaults.
    pub fn load(data_dir: &Path) -> Result<Self, SettingsError> {
        let path = Self::path_in(data_dir);
        let mut settings = if path.exists() {
            let text = std::fs::read_to_string(&path).map_err(|e| SettingsError::Io(e.to_string()))?;
            serde_json::from_str::<Settings>(&text).map_err(|e| SettingsError::Parse(e.to_string()))?
        } else {
            Settings::default()
        };
        settings.data_dir = data_dir.to_path_buf();
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is unusable
    pub fn load_or_default(data_dir: &Path) -> Self {
        match Self::load(data_dir) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to load {}: {}. Using defaults.", SETTINGS_FILE, e);
                Settings {
                    data_dir: data_dir.to_path_buf(),
                    ..Settings::default()
                }
            }
        }
    }

    /// Write settings to `<data_dir>/settings.json`, creating the directory
    pub fn save(&self) -> Result<(), SettingsError> {
        self.validate()?;
        std::fs::create_dir_all(&self.data_dir).map_err(|e| SettingsError::Io(e.to_string()))?;
        let text = serde_json::to_string_pretty(self).map_err(|e| SettingsError::Parse(e.to_string()))?;
        std::fs::write(Self::path_in(&self.data_dir), text).map_err(|e| SettingsError::Io(e.to_string()))
    }
}
