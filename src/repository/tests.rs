//! Repository Integration Tests
//!
//! Tests for DiaryRepository over the in-memory and SQLite stores.

#[cfg(test)]
mod tests {
    use crate::domain::{parse_date, DomainError, DomainResult, ListEntry, NamedEntry, TrackerDraft, TrackerTemplate};
    use crate::repository::{
        DailyRecordOperations, DiaryRepository, KeyValueStore, MemberOperations, MemoryStore, SqliteStore,
        TrackerOperations, TransferOperations, CONFIG_KEY, MEASURES_KEY,
    };
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// Memory store whose writes start failing once `fail_writes` is set
    #[derive(Default)]
    struct FailingStore {
        inner: MemoryStore,
        fail_writes: AtomicBool,
    }

    impl FailingStore {
        fn check(&self) -> DomainResult<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                Err(DomainError::Internal("disk full".into()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl KeyValueStore for FailingStore {
        async fn get(&self, key: &str) -> DomainResult<Option<String>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> DomainResult<()> {
            self.check()?;
            self.inner.set(key, value).await
        }

        async fn set_many(&self, entries: &[(&str, String)]) -> DomainResult<()> {
            self.check()?;
            self.inner.set_many(entries).await
        }

        async fn remove(&self, key: &str) -> DomainResult<()> {
            self.check()?;
            self.inner.remove(key).await
        }
    }

    fn today() -> NaiveDate {
        parse_date("2024-03-10").unwrap()
    }

    async fn setup_repo(store: Arc<dyn KeyValueStore>) -> DiaryRepository {
        DiaryRepository::open(store).await.expect("Failed to open diary")
    }

    /// Anna with a weight and a snacks tracker and one opened day
    async fn populate(repo: &DiaryRepository) {
        repo.add_member("Anna", true).await.unwrap();
        repo.create_tracker("Anna", TrackerDraft::new("Weight", TrackerTemplate::UnlimitedNumber(0.0)))
            .await
            .unwrap();
        repo.create_tracker("Anna", TrackerDraft::new("Snacks", TrackerTemplate::ArrayObjects(vec![])))
            .await
            .unwrap();
        repo.open_today("Anna", today()).await.unwrap();
        repo.set_number("Anna", today(), "Weight", 61.5).await.unwrap();
        repo.append_item("Anna", today(), "Snacks", ListEntry::Object(NamedEntry::new("Cake", "one slice")))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_open_empty_store() {
        let repo = setup_repo(Arc::new(MemoryStore::new())).await;
        assert!(repo.state().await.is_empty());
        assert!(repo.selected_member().await.is_none());
    }

    #[tokio::test]
    async fn test_mutations_survive_reopen() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let repo = setup_repo(store.clone()).await;
        populate(&repo).await;

        let reopened = setup_repo(store).await;
        assert_eq!(reopened.state().await.snapshot(), repo.state().await.snapshot());

        let record = reopened.day_record("Anna", today()).await.expect("record persisted");
        assert_eq!(record.find("Weight").and_then(|r| r.value.as_number()), Some(61.5));
    }

    #[tokio::test]
    async fn test_failed_operation_writes_nothing() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let repo = setup_repo(store.clone()).await;
        populate(&repo).await;
        let before = store.get(CONFIG_KEY).await.unwrap();

        let result = repo
            .create_tracker("Anna", TrackerDraft::new("Weight", TrackerTemplate::UnlimitedNumber(0.0)))
            .await;
        assert!(matches!(result, Err(DomainError::Conflict(_))));
        assert_eq!(store.get(CONFIG_KEY).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_memory_and_storage_unchanged() {
        let store = Arc::new(FailingStore::default());
        let repo = setup_repo(store.clone()).await;
        repo.add_member("Anna", false).await.unwrap();
        repo.open_today("Anna", today()).await.unwrap();
        let state_before = repo.state().await;

        store.fail_writes.store(true, Ordering::SeqCst);
        let result = repo
            .create_tracker("Anna", TrackerDraft::new("Weight", TrackerTemplate::UnlimitedNumber(0.0)))
            .await;
        assert!(matches!(result, Err(DomainError::Internal(_))));
        assert_eq!(repo.state().await, state_before);

        store.fail_writes.store(false, Ordering::SeqCst);
        let reopened = setup_repo(store).await;
        assert_eq!(reopened.list_trackers("Anna").await.map(|t| t.len()), Some(0));
        assert_eq!(reopened.state().await.snapshot(), state_before.snapshot());
    }

    #[tokio::test]
    async fn test_sqlite_writes_both_documents_or_neither() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("health_diary.db");

        let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::open(&path).unwrap());
        let repo = setup_repo(store).await;
        repo.add_member("Anna", false).await.unwrap();
        repo.open_today("Anna", today()).await.unwrap();

        // Reject any later write of the measures row
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TRIGGER no_measures_update BEFORE UPDATE ON kv WHEN NEW.key = 'measures'
             BEGIN SELECT RAISE(ABORT, 'disk full'); END;",
        )
        .unwrap();
        drop(conn);

        let result = repo
            .create_tracker("Anna", TrackerDraft::new("Weight", TrackerTemplate::UnlimitedNumber(0.0)))
            .await;
        assert!(matches!(result, Err(DomainError::Internal(_))));

        let reopened = setup_repo(Arc::new(SqliteStore::open(&path).unwrap())).await;
        assert_eq!(reopened.list_trackers("Anna").await.map(|t| t.len()), Some(0));
        let record = reopened.day_record("Anna", today()).await.expect("record persisted");
        assert!(record.find("Weight").is_none());
    }

    #[tokio::test]
    async fn test_selection_is_not_persisted() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let repo = setup_repo(store.clone()).await;
        repo.add_member("Anna", false).await.unwrap();
        repo.add_member("Ben", false).await.unwrap();

        assert!(repo.select_member("Ben").await);
        assert!(!repo.select_member("Carl").await);
        assert_eq!(repo.selected_member().await.map(|m| m.name), Some("Ben".to_string()));

        let reopened = setup_repo(store).await;
        assert_eq!(reopened.selected_member().await.map(|m| m.name), Some("Anna".to_string()));
    }

    #[tokio::test]
    async fn test_missing_entities_are_noops() {
        let repo = setup_repo(Arc::new(MemoryStore::new())).await;
        repo.add_member("Anna", false).await.unwrap();

        assert_eq!(repo.open_today("Ghost", today()).await.unwrap(), None);
        assert!(!repo.set_number("Anna", today(), "Weight", 1.0).await.unwrap());
        assert_eq!(repo.toggle_tracker("Anna", 3).await.unwrap(), None);
        assert!(repo.list_trackers("Ghost").await.is_none());
    }

    #[tokio::test]
    async fn test_rename_member_moves_history() {
        let repo = setup_repo(Arc::new(MemoryStore::new())).await;
        populate(&repo).await;

        assert!(repo.rename_member("Anna", "Anne").await.unwrap());
        assert!(repo.day_record("Anna", today()).await.is_none());
        assert!(repo.day_record("Anne", today()).await.is_some());
        assert_eq!(repo.tracker_index("Anne", "Snacks").await, Some(1));
    }

    #[tokio::test]
    async fn test_export_import_round_trip() {
        let source = setup_repo(Arc::new(MemoryStore::new())).await;
        populate(&source).await;
        let exported = source.export_snapshot().await.unwrap();

        let target_store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let target = setup_repo(target_store.clone()).await;
        target.add_member("Someone else", false).await.unwrap();
        target.import_snapshot(&exported).await.unwrap();

        assert_eq!(target.state().await.snapshot(), source.state().await.snapshot());
        let reopened = setup_repo(target_store).await;
        assert_eq!(reopened.state().await.snapshot(), source.state().await.snapshot());
    }

    #[tokio::test]
    async fn test_rejected_import_leaves_diary_untouched() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let repo = setup_repo(store.clone()).await;
        populate(&repo).await;
        let state_before = repo.state().await;
        let measures_before = store.get(MEASURES_KEY).await.unwrap();

        for bad in [
            "not json",
            r#"{"measures": {}}"#,
            r#"{"config": {"members": {}}, "measures": {}}"#,
            r#"{"config": {"members": []}, "measures": []}"#,
            r#"{"config": {"members": [{"name": "A", "trackers": [{"name": "W", "type": "bogus", "value": 0}]}]}, "measures": {}}"#,
        ] {
            let result = repo.import_snapshot(bad).await;
            assert!(matches!(result, Err(DomainError::InvalidImport(_))), "accepted: {}", bad);
        }

        assert_eq!(repo.state().await, state_before);
        assert_eq!(store.get(MEASURES_KEY).await.unwrap(), measures_before);
    }

    #[tokio::test]
    async fn test_corrupt_store_requires_confirmation() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::with_entries([(CONFIG_KEY, "{broken")]));

        let result = DiaryRepository::open(store.clone()).await;
        assert!(matches!(result, Err(DomainError::Corrupt(_))));

        let declined = DiaryRepository::open_or_reset(store.clone(), |_| false).await;
        assert!(matches!(declined, Err(DomainError::Corrupt(_))));
        assert_eq!(store.get(CONFIG_KEY).await.unwrap().as_deref(), Some("{broken"));

        let repo = DiaryRepository::open_or_reset(store.clone(), |_| true).await.unwrap();
        assert!(repo.state().await.is_empty());
        assert_eq!(store.get(CONFIG_KEY).await.unwrap().as_deref(), Some(r#"{"members":[]}"#));
        assert_eq!(store.get(MEASURES_KEY).await.unwrap().as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let repo = setup_repo(store.clone()).await;
        populate(&repo).await;

        repo.reset().await.unwrap();
        assert!(repo.state().await.is_empty());
        assert!(setup_repo(store).await.state().await.is_empty());
    }

    #[tokio::test]
    async fn test_sqlite_store_basic() {
        let store = SqliteStore::open_in_memory().expect("Failed to init test DB");

        assert_eq!(store.get("config").await.unwrap(), None);
        store.set("config", "one").await.unwrap();
        store.set("config", "two").await.unwrap();
        assert_eq!(store.get("config").await.unwrap().as_deref(), Some("two"));
        store.remove("config").await.unwrap();
        assert_eq!(store.get("config").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sqlite_file_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("health_diary.db");

        let expected = {
            let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::open(&path).unwrap());
            let repo = setup_repo(store).await;
            populate(&repo).await;
            repo.state().await.snapshot()
        };

        let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::open(&path).unwrap());
        let repo = setup_repo(store).await;
        assert_eq!(repo.state().await.snapshot(), expected);
    }
}
