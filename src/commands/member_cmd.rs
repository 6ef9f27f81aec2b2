//! Commands for Member operations
//!
//! Exposes member management to the CLI.

use crate::domain::Member;
use crate::repository::MemberOperations;
use crate::AppState;

/// List all members in tab order
pub async fn list_members(state: &AppState) -> Result<Vec<Member>, String> {
    Ok(state.diary.list_members().await)
}

/// Add a member
pub async fn add_member(state: &AppState, name: String, enable_notes: bool) -> Result<Member, String> {
    state.diary.add_member(&name, enable_notes).await.map_err(|e| e.to_string())
}

/// Rename a member; their whole history follows
pub async fn rename_member(state: &AppState, old: String, new: String) -> Result<(), String> {
    let renamed = state.diary.rename_member(&old, &new).await.map_err(|e| e.to_string())?;
    if renamed {
        Ok(())
    } else {
        Err(format!("Member {} not found", old))
    }
}

/// Remove a member and every record they have
pub async fn remove_member(state: &AppState, name: String, confirmed: bool) -> Result<(), String> {
    let removed = state.diary.remove_member(&name, confirmed).await.map_err(|e| e.to_string())?;
    if removed {
        Ok(())
    } else {
        Err(format!("Member {} not found", name))
    }
}

/// Turn the per-day note field on or off
pub async fn set_member_notes(state: &AppState, name: String, enabled: bool) -> Result<(), String> {
    let changed = state.diary.set_notes_enabled(&name, enabled).await.map_err(|e| e.to_string())?;
    if changed {
        Ok(())
    } else {
        Err(format!("Member {} not found", name))
    }
}

/// Open a member's tab
pub async fn select_member(state: &AppState, name: String) -> Result<Member, String> {
    if !state.diary.select_member(&name).await {
        return Err(format!("Member {} not found", name));
    }
    state
        .diary
        .selected_member()
        .await
        .ok_or_else(|| format!("Member {} not found", name))
}
