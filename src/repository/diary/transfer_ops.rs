//! Transfer Operations
//!
//! Whole-diary export, import and reset.

use async_trait::async_trait;

use crate::domain::{DiaryState, DomainResult, Snapshot};

/// Trait for whole-diary operations
#[async_trait]
pub trait TransferOperations {
    /// Both documents as one pretty-printed JSON file
    async fn export_snapshot(&self) -> DomainResult<String>;

    /// Replace the diary with the contents of an export file.
    ///
    /// Invalid files are rejected with `DomainError::InvalidImport` and
    /// leave the current diary untouched.
    async fn import_snapshot(&self, json: &str) -> DomainResult<()>;

    /// Drop every member and record
    async fn reset(&self) -> DomainResult<()>;
}

#[async_trait]
impl TransferOperations for super::diary_repo::DiaryRepository {
    async fn export_snapshot(&self) -> DomainResult<String> {
        let snapshot = self.read(DiaryState::snapshot).await;
        snapshot.to_export_json()
    }

    async fn import_snapshot(&self, json: &str) -> DomainResult<()> {
        let snapshot = Snapshot::from_import_json(json)?;
        log::info!(
            "Importing {} members and {} dates",
            snapshot.config.members.len(),
            snapshot.measures.len()
        );
        self.replace(DiaryState::from_snapshot(snapshot)).await
    }

    async fn reset(&self) -> DomainResult<()> {
        log::warn!("Resetting diary");
        self.replace(DiaryState::default()).await
    }
}
