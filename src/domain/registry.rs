//! Tracker Definition Registry
//!
//! CRUD over a member's tracker list. Records are denormalized snapshots
//! keyed by tracker name: creation backfills every existing day, renames
//! re-key every day, deletion strips every day. Template and icon edits
//! never touch recorded days.

use super::entity::{clean_name, key_taken, DomainError, DomainResult};
use super::state::DiaryState;
use super::tracker::{Tracker, TrackerTemplate};

/// Input for creating a tracker
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerDraft {
    pub name: String,
    pub template: TrackerTemplate,
    pub icon: Option<String>,
}

impl TrackerDraft {
    pub fn new(name: impl Into<String>, template: TrackerTemplate) -> Self {
        Self {
            name: name.into(),
            template,
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Partial update of a tracker definition; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerEdit {
    pub name: Option<String>,
    pub template: Option<TrackerTemplate>,
    pub icon: Option<String>,
}

fn clean_icon(icon: Option<&str>) -> Option<String> {
    icon.map(str::trim).filter(|i| !i.is_empty()).map(str::to_string)
}

impl DiaryState {
    /// Add a tracker to a member and backfill it into every recorded day.
    ///
    /// Returns `None` when the member does not exist.
    pub fn create_tracker(&mut self, member: &str, draft: TrackerDraft) -> DomainResult<Option<Tracker>> {
        let name = clean_name(&draft.name, "Tracker")?;
        draft.template.validate()?;
        let icon = clean_icon(draft.icon.as_deref());
        let kind = draft.template.kind();
        if kind.requires_icon() && icon.is_none() {
            return Err(DomainError::InvalidInput(format!(
                "A {} tracker needs an icon",
                kind
            )));
        }

        let Some(owner) = self.member_mut(member) else {
            log::warn!("create_tracker: no member named '{}'", member);
            return Ok(None);
        };
        if key_taken(&owner.trackers, &name) {
            return Err(DomainError::Conflict(format!(
                "Tracker '{}' already exists for {}",
                name, member
            )));
        }

        let tracker = Tracker {
            name,
            template: draft.template,
            is_active: true,
            icon,
        };
        owner.trackers.push(tracker.clone());

        let backfilled = self.backfill_tracker(member, &tracker);
        log::info!(
            "Created {} tracker '{}' for {} (backfilled {} days)",
            tracker.kind(),
            tracker.name,
            member,
            backfilled
        );
        Ok(Some(tracker))
    }

    /// Edit the tracker at `index`.
    ///
    /// The kind is fixed at creation; list-shaped templates are replaced
    /// wholesale. A rename is carried into every recorded day.
    pub fn edit_tracker(&mut self, member: &str, index: usize, edit: TrackerEdit) -> DomainResult<Option<Tracker>> {
        let Some(owner) = self.member(member) else {
            log::warn!("edit_tracker: no member named '{}'", member);
            return Ok(None);
        };
        let Some(current) = owner.trackers.get(index) else {
            log::warn!("edit_tracker: {} has no tracker at index {}", member, index);
            return Ok(None);
        };

        let new_name = match edit.name.as_deref() {
            Some(raw) => {
                let name = clean_name(raw, "Tracker")?;
                if name != current.name && key_taken(&owner.trackers, &name) {
                    return Err(DomainError::Conflict(format!(
                        "Tracker '{}' already exists for {}",
                        name, member
                    )));
                }
                Some(name)
            }
            None => None,
        };
        if let Some(template) = &edit.template {
            if template.kind() != current.kind() {
                return Err(DomainError::InvalidInput(format!(
                    "Cannot change tracker '{}' from {} to {}",
                    current.name,
                    current.kind(),
                    template.kind()
                )));
            }
            template.validate()?;
        }
        let icon = clean_icon(edit.icon.as_deref());

        let old_name = current.name.clone();
        let Some(tracker) = self.member_mut(member).and_then(|m| m.trackers.get_mut(index)) else {
            return Ok(None);
        };
        if let Some(name) = new_name.clone() {
            tracker.name = name;
        }
        if let Some(template) = edit.template {
            tracker.template = template;
        }
        if icon.is_some() {
            tracker.icon = icon;
        }
        let updated = tracker.clone();

        if let Some(name) = new_name.filter(|n| *n != old_name) {
            let mut renamed = 0;
            for record in self.records_of_mut(member) {
                if let Some(snapshot) = record.find_mut(&old_name) {
                    snapshot.name = name.clone();
                    renamed += 1;
                }
            }
            log::info!("Renamed tracker '{}' to '{}' in {} days", old_name, name, renamed);
        }
        Ok(Some(updated))
    }

    /// Delete the tracker at `index` and strip it from every recorded day.
    ///
    /// Irreversible, so the caller must pass `confirmed = true`.
    pub fn delete_tracker(&mut self, member: &str, index: usize, confirmed: bool) -> DomainResult<Option<Tracker>> {
        if !confirmed {
            return Err(DomainError::InvalidInput(
                "Deleting a tracker erases its history and must be confirmed".into(),
            ));
        }
        let Some(owner) = self.member_mut(member) else {
            log::warn!("delete_tracker: no member named '{}'", member);
            return Ok(None);
        };
        if index >= owner.trackers.len() {
            log::warn!("delete_tracker: {} has no tracker at index {}", member, index);
            return Ok(None);
        }
        let removed = owner.trackers.remove(index);

        let stripped = self
            .records_of_mut(member)
            .map(|record| record.strip(&removed.name))
            .filter(|hit| *hit)
            .count();
        log::info!("Deleted tracker '{}' of {} ({} days stripped)", removed.name, member, stripped);
        Ok(Some(removed))
    }

    /// Flip the display-only active flag; returns the new value
    pub fn toggle_tracker_active(&mut self, member: &str, index: usize) -> Option<bool> {
        let tracker = self.member_mut(member).and_then(|m| m.trackers.get_mut(index));
        match tracker {
            Some(tracker) => {
                tracker.is_active = !tracker.is_active;
                Some(tracker.is_active)
            }
            None => {
                log::warn!("toggle_tracker_active: {} has no tracker at index {}", member, index);
                None
            }
        }
    }
}
