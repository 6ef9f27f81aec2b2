//! Health Diary Backend
//!
//! Layered architecture:
//! - domain: Core entities and the state transitions over them
//! - report: Aggregation over a member's history
//! - repository: Storage abstractions and the diary repository
//! - commands: Handlers used by the CLI
//! - settings: `settings.json` and data directory resolution

use std::sync::Arc;

use chrono::NaiveDate;

pub mod domain;
pub mod report;
pub mod repository;
pub mod commands;
pub mod settings;

use domain::{DomainError, DomainResult};
use repository::{DiaryRepository, SqliteStore};
use settings::Settings;

/// Application state shared across commands
pub struct AppState {
    pub diary: DiaryRepository,
    pub settings: Settings,
}

impl AppState {
    pub fn new(diary: DiaryRepository, settings: Settings) -> Self {
        Self { diary, settings }
    }
}

/// Local calendar date
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Open the SQLite-backed diary in the settings' data directory.
///
/// `confirm_reset` is asked before corrupt stored data is wiped.
pub async fn open_app<F>(settings: Settings, confirm_reset: F) -> DomainResult<AppState>
where
    F: FnOnce(&DomainError) -> bool,
{
    std::fs::create_dir_all(&settings.data_dir).map_err(|e| {
        DomainError::Internal(format!("Failed to create {}: {}", settings.data_dir.display(), e))
    })?;
    let db_path = settings.db_path();
    log::info!("Opening diary at {}", db_path.display());

    let store = SqliteStore::open(&db_path)?;
    let diary = DiaryRepository::open_or_reset(Arc::new(store), confirm_reset).await?;
    Ok(AppState::new(diary, settings))
}
