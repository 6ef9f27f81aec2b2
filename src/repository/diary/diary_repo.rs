//! Diary Repository - Loading and Persisting
//!
//! Owns the in-memory `DiaryState` and mirrors it to a `KeyValueStore`.
//! Specialized operations are in separate modules:
//! - member_ops: member add/rename/remove and tab selection
//! - tracker_ops: tracker definition CRUD
//! - record_ops: day opening and value updates
//! - transfer_ops: export, import and reset

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{measures_from_json, measures_to_json, ConfigDocument, DiaryState, DomainError, DomainResult};
use super::super::traits::KeyValueStore;

/// Storage key of the config document
pub const CONFIG_KEY: &str = "config";
/// Storage key of the measures document
pub const MEASURES_KEY: &str = "measures";

/// Key-value backed repository of the whole diary
pub struct DiaryRepository {
    store: Arc<dyn KeyValueStore>,
    state: Mutex<DiaryState>,
}

/// Read both documents; absent keys mean a fresh diary
async fn load_state(store: &dyn KeyValueStore) -> DomainResult<DiaryState> {
    let config = match store.get(CONFIG_KEY).await? {
        Some(json) => ConfigDocument::from_json(&json)?,
        None => ConfigDocument::default(),
    };
    let measures = match store.get(MEASURES_KEY).await? {
        Some(json) => measures_from_json(&json)?,
        None => Default::default(),
    };
    Ok(DiaryState::new(config, measures))
}

impl DiaryRepository {
    fn with_state(store: Arc<dyn KeyValueStore>, state: DiaryState) -> Self {
        Self {
            store,
            state: Mutex::new(state),
        }
    }

    /// Load the diary from `store`.
    ///
    /// Malformed blobs fail with `DomainError::Corrupt`; nothing is overwritten.
    pub async fn open(store: Arc<dyn KeyValueStore>) -> DomainResult<Self> {
        let state = load_state(store.as_ref()).await?;
        log::info!(
            "Diary loaded: {} members, {} dates",
            state.config.members.len(),
            state.measures.len()
        );
        Ok(Self::with_state(store, state))
    }

    /// Like `open`, but offers to start over when the stored data is corrupt.
    ///
    /// `confirm` is asked once with the load error; storage is wiped only
    /// when it returns true.
    pub async fn open_or_reset<F>(store: Arc<dyn KeyValueStore>, confirm: F) -> DomainResult<Self>
    where
        F: FnOnce(&DomainError) -> bool,
    {
        match load_state(store.as_ref()).await {
            Ok(state) => Ok(Self::with_state(store, state)),
            Err(err @ DomainError::Corrupt(_)) => {
                if !confirm(&err) {
                    return Err(err);
                }
                log::warn!("Resetting storage after load failure: {}", err);
                let state = DiaryState::default();
                write_state(store.as_ref(), &state).await?;
                Ok(Self::with_state(store, state))
            }
            Err(err) => Err(err),
        }
    }

    /// Copy of the current state
    pub async fn state(&self) -> DiaryState {
        self.state.lock().await.clone()
    }

    /// Run a read-only query against the current state
    pub async fn read<T, F>(&self, query: F) -> T
    where
        F: FnOnce(&DiaryState) -> T,
    {
        let state = self.state.lock().await;
        query(&state)
    }

    /// Apply `op` to a working copy and persist it before committing.
    ///
    /// Only the two documents are written; view state such as the selected
    /// member stays in memory. Failed operations and failed writes leave
    /// both memory and storage as they were.
    pub(super) async fn mutate<T, F>(&self, op: F) -> DomainResult<T>
    where
        F: FnOnce(&mut DiaryState) -> DomainResult<T> + Send,
        T: Send,
    {
        let mut state = self.state.lock().await;
        let mut working = state.clone();
        let result = op(&mut working)?;
        if working.config != state.config || working.measures != state.measures {
            write_state(self.store.as_ref(), &working).await?;
        }
        *state = working;
        Ok(result)
    }

    /// Swap in a whole new state and persist it
    pub(super) async fn replace(&self, next: DiaryState) -> DomainResult<()> {
        let mut state = self.state.lock().await;
        write_state(self.store.as_ref(), &next).await?;
        *state = next;
        Ok(())
    }
}

async fn write_state(store: &dyn KeyValueStore, state: &DiaryState) -> DomainResult<()> {
    let entries = [
        (CONFIG_KEY, state.config.to_json()?),
        (MEASURES_KEY, measures_to_json(&state.measures)?),
    ];
    store.set_many(&entries).await
}
