//! Member Operations
//!
//! Family member management on top of `DiaryRepository`.

use async_trait::async_trait;

use crate::domain::{DomainResult, Member};

/// Trait for member operations
#[async_trait]
pub trait MemberOperations {
    /// All members in tab order
    async fn list_members(&self) -> Vec<Member>;

    /// Add a member with no trackers
    async fn add_member(&self, name: &str, enable_notes: bool) -> DomainResult<Member>;

    /// Rename a member and move their history along
    async fn rename_member(&self, old: &str, new: &str) -> DomainResult<bool>;

    /// Remove a member and all of their records
    async fn remove_member(&self, name: &str, confirmed: bool) -> DomainResult<bool>;

    /// Switch the per-day note field on or off
    async fn set_notes_enabled(&self, name: &str, enabled: bool) -> DomainResult<bool>;

    /// Open a member's tab
    async fn select_member(&self, name: &str) -> bool;

    /// The member whose tab is open
    async fn selected_member(&self) -> Option<Member>;
}

#[async_trait]
impl MemberOperations for super::diary_repo::DiaryRepository {
    async fn list_members(&self) -> Vec<Member> {
        self.read(|state| state.config.members.clone()).await
    }

    async fn add_member(&self, name: &str, enable_notes: bool) -> DomainResult<Member> {
        let member = self.mutate(|state| state.add_member(name, enable_notes)).await?;
        log::info!("Member added: {}", member.name);
        Ok(member)
    }

    async fn rename_member(&self, old: &str, new: &str) -> DomainResult<bool> {
        self.mutate(|state| state.rename_member(old, new)).await
    }

    async fn remove_member(&self, name: &str, confirmed: bool) -> DomainResult<bool> {
        self.mutate(|state| state.remove_member(name, confirmed)).await
    }

    async fn set_notes_enabled(&self, name: &str, enabled: bool) -> DomainResult<bool> {
        self.mutate(|state| Ok(state.set_notes_enabled(name, enabled))).await
    }

    async fn select_member(&self, name: &str) -> bool {
        // Selection is view state and is never written to storage
        self.mutate(|state| Ok(state.select_member(name))).await.unwrap_or(false)
    }

    async fn selected_member(&self) -> Option<Member> {
        self.read(|state| state.selected_member().cloned()).await
    }
}
