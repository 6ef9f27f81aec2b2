//! Commands for Tracker definitions
//!
//! Trackers are addressed by name here and resolved to their index
//! before reaching the repository. Template values use the settings form
//! text formats.

use crate::domain::{
    parse_check_items, parse_list, parse_set_lines, Tracker, TrackerDraft, TrackerEdit, TrackerKind, TrackerTemplate,
};
use crate::repository::TrackerOperations;
use crate::AppState;

/// Build a template of `kind` from its form text.
///
/// - unlimited-number: default value, empty for 0
/// - limited-number: scale maximum
/// - array-strings / array-objects: comma-separated names
/// - array-objects-checkbox: comma-separated `name:detail`
/// - array-objects-sets: `name|sets|reps` groups separated by `;` or newlines
pub fn template_from_form(kind: TrackerKind, raw: &str) -> Result<TrackerTemplate, String> {
    let raw = raw.trim();
    let template = match kind {
        TrackerKind::UnlimitedNumber if raw.is_empty() => TrackerTemplate::UnlimitedNumber(0.0),
        TrackerKind::UnlimitedNumber => TrackerTemplate::UnlimitedNumber(
            raw.parse().map_err(|_| format!("'{}' is not a number", raw))?,
        ),
        TrackerKind::LimitedNumber => TrackerTemplate::LimitedNumber(
            raw.parse().map_err(|_| format!("Scale maximum must be a whole number, got '{}'", raw))?,
        ),
        TrackerKind::ArrayStrings => TrackerTemplate::ArrayStrings(parse_list(raw)),
        TrackerKind::ArrayObjects => TrackerTemplate::ArrayObjects(parse_list(raw)),
        TrackerKind::ArrayObjectsCheckbox => TrackerTemplate::ArrayObjectsCheckbox(parse_check_items(raw)),
        TrackerKind::ArrayObjectsSets => {
            TrackerTemplate::ArrayObjectsSets(parse_set_lines(&raw.replace(';', "\n")).map_err(|e| e.to_string())?)
        }
    };
    template.validate().map_err(|e| e.to_string())?;
    Ok(template)
}

async fn resolve_index(state: &AppState, member: &str, tracker: &str) -> Result<usize, String> {
    state
        .diary
        .tracker_index(member, tracker)
        .await
        .ok_or_else(|| format!("{} has no tracker named {}", member, tracker))
}

/// List a member's trackers in display order
pub async fn list_trackers(state: &AppState, member: String) -> Result<Vec<Tracker>, String> {
    state
        .diary
        .list_trackers(&member)
        .await
        .ok_or_else(|| format!("Member {} not found", member))
}

/// Create a tracker
pub async fn create_tracker(
    state: &AppState,
    member: String,
    name: String,
    kind: String,
    value: String,
    icon: Option<String>,
) -> Result<Tracker, String> {
    let kind: TrackerKind = kind.parse().map_err(|e: crate::domain::DomainError| e.to_string())?;
    let template = template_from_form(kind, &value)?;

    let mut draft = TrackerDraft::new(name, template);
    if let Some(icon) = icon {
        draft = draft.with_icon(icon);
    }

    state
        .diary
        .create_tracker(&member, draft)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("Member {} not found", member))
}

/// Edit a tracker; its type never changes
pub async fn edit_tracker(
    state: &AppState,
    member: String,
    tracker: String,
    new_name: Option<String>,
    value: Option<String>,
    icon: Option<String>,
) -> Result<Tracker, String> {
    let index = resolve_index(state, &member, &tracker).await?;
    let template = match value {
        Some(raw) => {
            let kind = state
                .diary
                .list_trackers(&member)
                .await
                .and_then(|trackers| trackers.get(index).map(Tracker::kind))
                .ok_or_else(|| format!("{} has no tracker named {}", member, tracker))?;
            Some(template_from_form(kind, &raw)?)
        }
        None => None,
    };

    let edit = TrackerEdit {
        name: new_name,
        template,
        icon,
    };
    state
        .diary
        .edit_tracker(&member, index, edit)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("{} has no tracker named {}", member, tracker))
}

/// Delete a tracker and its history
pub async fn delete_tracker(state: &AppState, member: String, tracker: String, confirmed: bool) -> Result<Tracker, String> {
    let index = resolve_index(state, &member, &tracker).await?;
    state
        .diary
        .delete_tracker(&member, index, confirmed)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("{} has no tracker named {}", member, tracker))
}

/// Toggle a tracker active/inactive; returns the new state
pub async fn toggle_tracker(state: &AppState, member: String, tracker: String) -> Result<bool, String> {
    let index = resolve_index(state, &member, &tracker).await?;
    state
        .diary
        .toggle_tracker(&member, index)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("{} has no tracker named {}", member, tracker))
}
