//! Commands for daily records
//!
//! Every editing command opens (reconciles) the day first, the same way
//! a day is always shown before its values can be touched.

use chrono::NaiveDate;

use crate::domain::{CheckItem, DailyRecord, ListEntry, NamedEntry, TrackerKind, DATE_FORMAT};
use crate::repository::{DailyRecordOperations, TrackerOperations};
use crate::{today, AppState};

/// Build a list entry for a tracker of `kind` from `name:detail` text
pub fn entry_from_text(kind: TrackerKind, text: &str) -> Result<ListEntry, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("Entry cannot be empty".into());
    }
    let (name, detail) = match text.split_once(':') {
        Some((name, detail)) => (name.trim(), detail.trim()),
        None => (text, ""),
    };
    match kind {
        TrackerKind::ArrayStrings => Ok(ListEntry::Text(text.to_string())),
        TrackerKind::ArrayObjects => Ok(ListEntry::Object(NamedEntry::new(name, detail))),
        TrackerKind::ArrayObjectsCheckbox => Ok(ListEntry::Check(CheckItem::new(name, detail))),
        other => Err(format!("{} trackers do not hold entries", other)),
    }
}

/// Reconcile the given day (today when `None`) and return its date
pub async fn open_day(state: &AppState, member: String, date: Option<String>) -> Result<NaiveDate, String> {
    let today = today();
    let opened = match date {
        None => state
            .diary
            .open_today(&member, today)
            .await
            .map_err(|e| e.to_string())?
            .map(|_| today),
        Some(raw) => state.diary.open_day(&member, &raw, today).await.map_err(|e| e.to_string())?,
    };
    opened.ok_or_else(|| format!("Member {} not found", member))
}

/// The member's record for a day, opening it first
pub async fn show_day(state: &AppState, member: String, date: Option<String>) -> Result<DailyRecord, String> {
    let date = open_day(state, member.clone(), date).await?;
    state
        .diary
        .day_record(&member, date)
        .await
        .ok_or_else(|| format!("No record for {} on {}", member, date))
}

/// Dates of the member's diary, newest first
pub async fn list_days(state: &AppState, member: String) -> Result<Vec<String>, String> {
    Ok(state
        .diary
        .diary_dates(&member, today())
        .await
        .iter()
        .map(|d| d.format(DATE_FORMAT).to_string())
        .collect())
}

fn not_found(member: &str, tracker: &str, date: NaiveDate) -> String {
    format!("No {} value for {} on {}", tracker, member, date)
}

fn changed(done: bool, member: &str, tracker: &str, date: NaiveDate) -> Result<(), String> {
    if done {
        Ok(())
    } else {
        Err(not_found(member, tracker, date))
    }
}

pub async fn set_number(state: &AppState, member: String, date: Option<String>, tracker: String, value: f64) -> Result<(), String> {
    let date = open_day(state, member.clone(), date).await?;
    let done = state.diary.set_number(&member, date, &tracker, value).await.map_err(|e| e.to_string())?;
    changed(done, &member, &tracker, date)
}

pub async fn set_scale(state: &AppState, member: String, date: Option<String>, tracker: String, value: u32) -> Result<(), String> {
    let date = open_day(state, member.clone(), date).await?;
    let done = state.diary.set_scale(&member, date, &tracker, value).await.map_err(|e| e.to_string())?;
    changed(done, &member, &tracker, date)
}

/// Click on the `unit`-th icon of a scale; returns the new value
pub async fn click_scale(state: &AppState, member: String, date: Option<String>, tracker: String, unit: u32) -> Result<u32, String> {
    let date = open_day(state, member.clone(), date).await?;
    state
        .diary
        .click_scale_unit(&member, date, &tracker, unit)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| not_found(&member, &tracker, date))
}

async fn tracker_kind(state: &AppState, member: &str, tracker: &str) -> Result<TrackerKind, String> {
    state
        .diary
        .list_trackers(member)
        .await
        .and_then(|trackers| trackers.into_iter().find(|t| t.name == tracker).map(|t| t.kind()))
        .ok_or_else(|| format!("{} has no tracker named {}", member, tracker))
}

/// Append an entry to a list-shaped tracker
pub async fn add_entry(state: &AppState, member: String, date: Option<String>, tracker: String, text: String) -> Result<(), String> {
    let entry = entry_from_text(tracker_kind(state, &member, &tracker).await?, &text)?;
    let date = open_day(state, member.clone(), date).await?;
    let done = state.diary.append_item(&member, date, &tracker, entry).await.map_err(|e| e.to_string())?;
    changed(done, &member, &tracker, date)
}

/// Replace the entry at `index`
pub async fn update_entry(
    state: &AppState,
    member: String,
    date: Option<String>,
    tracker: String,
    index: usize,
    text: String,
) -> Result<(), String> {
    let entry = entry_from_text(tracker_kind(state, &member, &tracker).await?, &text)?;
    let date = open_day(state, member.clone(), date).await?;
    let done = state
        .diary
        .update_item(&member, date, &tracker, index, entry)
        .await
        .map_err(|e| e.to_string())?;
    if done {
        Ok(())
    } else {
        Err(format!("{} has no entry {} on {}", tracker, index, date))
    }
}

/// Remove the entry at `index`
pub async fn delete_entry(state: &AppState, member: String, date: Option<String>, tracker: String, index: usize) -> Result<(), String> {
    let date = open_day(state, member.clone(), date).await?;
    let done = state.diary.delete_item(&member, date, &tracker, index).await.map_err(|e| e.to_string())?;
    if done {
        Ok(())
    } else {
        Err(format!("{} has no entry {} on {}", tracker, index, date))
    }
}

/// Flip a checklist item; returns the new state
pub async fn toggle_check(state: &AppState, member: String, date: Option<String>, tracker: String, index: usize) -> Result<bool, String> {
    let date = open_day(state, member.clone(), date).await?;
    state
        .diary
        .toggle_checkbox(&member, date, &tracker, index)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("{} has no item {} on {}", tracker, index, date))
}

/// Record the actual reps of one set; `None` clears it
pub async fn set_rep(
    state: &AppState,
    member: String,
    date: Option<String>,
    tracker: String,
    group: usize,
    rep: usize,
    actual: Option<u32>,
) -> Result<(), String> {
    let date = open_day(state, member.clone(), date).await?;
    let done = state
        .diary
        .set_rep(&member, date, &tracker, group, rep, actual)
        .await
        .map_err(|e| e.to_string())?;
    if done {
        Ok(())
    } else {
        Err(format!("{} has no set {}/{} on {}", tracker, group, rep, date))
    }
}

/// Set or clear the day's note
pub async fn set_note(state: &AppState, member: String, date: Option<String>, note: Option<String>) -> Result<(), String> {
    let date = open_day(state, member.clone(), date).await?;
    let done = state.diary.set_note(&member, date, note).await.map_err(|e| e.to_string())?;
    if done {
        Ok(())
    } else {
        Err(format!("No record for {} on {}", member, date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{add_member, create_tracker};
    use crate::repository::{DiaryRepository, MemoryStore};
    use crate::settings::Settings;
    use std::sync::Arc;

    async fn setup_state() -> AppState {
        let diary = DiaryRepository::open(Arc::new(MemoryStore::new())).await.unwrap();
        AppState::new(diary, Settings::default())
    }

    #[test]
    fn test_entry_from_text() {
        assert_eq!(
            entry_from_text(TrackerKind::ArrayObjects, "Cake: one slice").unwrap(),
            ListEntry::Object(NamedEntry::new("Cake", "one slice"))
        );
        assert_eq!(
            entry_from_text(TrackerKind::ArrayStrings, "walk: 2km").unwrap(),
            ListEntry::Text("walk: 2km".into())
        );
        assert!(entry_from_text(TrackerKind::LimitedNumber, "x").is_err());
        assert!(entry_from_text(TrackerKind::ArrayObjects, "  ").is_err());
    }

    #[tokio::test]
    async fn test_editing_opens_the_day() {
        let state = setup_state().await;
        add_member(&state, "Anna".into(), true).await.unwrap();
        create_tracker(&state, "Anna".into(), "Snacks".into(), "array-objects".into(), String::new(), None)
            .await
            .unwrap();

        add_entry(&state, "Anna".into(), Some("2024-01-05".into()), "Snacks".into(), "Cake".into())
            .await
            .unwrap();
        set_note(&state, "Anna".into(), Some("2024-01-05".into()), Some("sunny".into()))
            .await
            .unwrap();

        let record = show_day(&state, "Anna".into(), Some("2024-01-05".into())).await.unwrap();
        assert_eq!(record.note.as_deref(), Some("sunny"));
        assert_eq!(record.find("Snacks").map(|r| r.value.entry_names()), Some(vec!["Cake"]));
        assert!(list_days(&state, "Anna".into()).await.unwrap().contains(&"2024-01-05".to_string()));
    }

    #[tokio::test]
    async fn test_unknown_member_is_reported() {
        let state = setup_state().await;
        let err = open_day(&state, "Ghost".into(), None).await.unwrap_err();
        assert!(err.contains("Ghost"));
    }
}
