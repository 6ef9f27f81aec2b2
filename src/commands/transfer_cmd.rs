//! Commands for export, import and reset

use std::path::Path;

use crate::repository::TransferOperations;
use crate::AppState;

/// Export the whole diary as JSON
pub async fn export_data(state: &AppState) -> Result<String, String> {
    state.diary.export_snapshot().await.map_err(|e| e.to_string())
}

/// Export into a file
pub async fn export_to_file(state: &AppState, path: &Path) -> Result<(), String> {
    let json = export_data(state).await?;
    std::fs::write(path, json).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}

/// Replace the diary with an export file's contents
pub async fn import_from_file(state: &AppState, path: &Path) -> Result<(), String> {
    let json = std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    state.diary.import_snapshot(&json).await.map_err(|e| e.to_string())
}

/// Wipe every member and record
pub async fn reset_data(state: &AppState, confirmed: bool) -> Result<(), String> {
    if !confirmed {
        return Err("Reset needs confirmation".into());
    }
    state.diary.reset().await.map_err(|e| e.to_string())
}
