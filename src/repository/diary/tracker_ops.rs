//! Tracker Operations
//!
//! Tracker definition CRUD for one member. Trackers are addressed by their
//! index in the member's list, which is also their display order.

use async_trait::async_trait;

use crate::domain::{position_of, DomainResult, Tracker, TrackerDraft, TrackerEdit};

/// Trait for tracker definition operations
#[async_trait]
pub trait TrackerOperations {
    /// Definitions of a member, `None` for an unknown member
    async fn list_trackers(&self, member: &str) -> Option<Vec<Tracker>>;

    /// Index of a tracker by name
    async fn tracker_index(&self, member: &str, tracker: &str) -> Option<usize>;

    /// Create a tracker and backfill it into the member's history
    async fn create_tracker(&self, member: &str, draft: TrackerDraft) -> DomainResult<Option<Tracker>>;

    /// Edit name, template or icon of a tracker
    async fn edit_tracker(&self, member: &str, index: usize, edit: TrackerEdit) -> DomainResult<Option<Tracker>>;

    /// Delete a tracker together with its recorded values
    async fn delete_tracker(&self, member: &str, index: usize, confirmed: bool) -> DomainResult<Option<Tracker>>;

    /// Flip a tracker between active and inactive
    async fn toggle_tracker(&self, member: &str, index: usize) -> DomainResult<Option<bool>>;
}

#[async_trait]
impl TrackerOperations for super::diary_repo::DiaryRepository {
    async fn list_trackers(&self, member: &str) -> Option<Vec<Tracker>> {
        self.read(|state| state.member(member).map(|m| m.trackers.clone())).await
    }

    async fn tracker_index(&self, member: &str, tracker: &str) -> Option<usize> {
        self.read(|state| state.member(member).and_then(|m| position_of(&m.trackers, tracker)))
            .await
    }

    async fn create_tracker(&self, member: &str, draft: TrackerDraft) -> DomainResult<Option<Tracker>> {
        let created = self.mutate(|state| state.create_tracker(member, draft)).await?;
        if let Some(tracker) = &created {
            log::info!("Tracker '{}' ({}) created for {}", tracker.name, tracker.kind(), member);
        }
        Ok(created)
    }

    async fn edit_tracker(&self, member: &str, index: usize, edit: TrackerEdit) -> DomainResult<Option<Tracker>> {
        self.mutate(|state| state.edit_tracker(member, index, edit)).await
    }

    async fn delete_tracker(&self, member: &str, index: usize, confirmed: bool) -> DomainResult<Option<Tracker>> {
        let deleted = self.mutate(|state| state.delete_tracker(member, index, confirmed)).await?;
        if let Some(tracker) = &deleted {
            log::info!("Tracker '{}' deleted for {}", tracker.name, member);
        }
        Ok(deleted)
    }

    async fn toggle_tracker(&self, member: &str, index: usize) -> DomainResult<Option<bool>> {
        self.mutate(|state| Ok(state.toggle_tracker_active(member, index))).await
    }
}
