//! Value Update Operations
//!
//! Per-kind mutations of a single day's tracker snapshot, addressed by
//! `(member, date, tracker name)`. A missing record, snapshot or list
//! index is logged and ignored (`Ok(false)` / `Ok(None)`); a value of the
//! wrong kind or out of range is rejected before anything changes.

use chrono::NaiveDate;

use super::entity::{DomainError, DomainResult};
use super::record::{NamedEntry, RecordValue};
use super::state::DiaryState;
use super::tracker::{CheckItem, TrackerKind, TrackerTemplate};

/// One entry of a list-shaped tracker
#[derive(Debug, Clone, PartialEq)]
pub enum ListEntry {
    /// `array-strings`
    Text(String),
    /// `array-objects`
    Object(NamedEntry),
    /// `array-objects-checkbox`
    Check(CheckItem),
}

impl ListEntry {
    fn kind(&self) -> TrackerKind {
        match self {
            ListEntry::Text(_) => TrackerKind::ArrayStrings,
            ListEntry::Object(_) => TrackerKind::ArrayObjects,
            ListEntry::Check(_) => TrackerKind::ArrayObjectsCheckbox,
        }
    }
}

fn wrong_kind(tracker: &str, found: TrackerKind, expected: TrackerKind) -> DomainError {
    DomainError::InvalidInput(format!(
        "Tracker '{}' is {}, not {}",
        tracker, found, expected
    ))
}

fn ensure_kind(tracker: &str, value: &RecordValue, expected: TrackerKind) -> DomainResult<()> {
    if value.kind() == expected {
        Ok(())
    } else {
        Err(wrong_kind(tracker, value.kind(), expected))
    }
}

impl DiaryState {
    fn snapshot_mut(&mut self, member: &str, date: NaiveDate, tracker: &str, op: &str) -> Option<&mut RecordValue> {
        let found = self
            .record_mut(member, date)
            .and_then(|record| record.find_mut(tracker))
            .map(|snapshot| &mut snapshot.value);
        if found.is_none() {
            log::warn!("{}: no '{}' snapshot for {} on {}", op, tracker, member, date);
        }
        found
    }

    /// Scale maximum of a `limited-number` definition
    fn scale_max(&self, member: &str, tracker: &str) -> DomainResult<Option<u32>> {
        match self.member(member).and_then(|m| m.tracker(tracker)) {
            Some(def) => match def.template {
                TrackerTemplate::LimitedNumber(max) => Ok(Some(max)),
                _ => Err(wrong_kind(tracker, def.kind(), TrackerKind::LimitedNumber)),
            },
            None => {
                log::warn!("scale: {} has no tracker named '{}'", member, tracker);
                Ok(None)
            }
        }
    }

    /// Overwrite an `unlimited-number` value
    pub fn set_number(&mut self, member: &str, date: NaiveDate, tracker: &str, value: f64) -> DomainResult<bool> {
        if !value.is_finite() {
            return Err(DomainError::InvalidInput(format!("'{}' needs a finite number", tracker)));
        }
        let Some(slot) = self.snapshot_mut(member, date, tracker, "set_number") else {
            return Ok(false);
        };
        match slot {
            RecordValue::UnlimitedNumber(current) => {
                *current = value;
                Ok(true)
            }
            other => Err(wrong_kind(tracker, other.kind(), TrackerKind::UnlimitedNumber)),
        }
    }

    /// Overwrite the current position of a `limited-number` scale
    pub fn set_scale(&mut self, member: &str, date: NaiveDate, tracker: &str, current: u32) -> DomainResult<bool> {
        let Some(max) = self.scale_max(member, tracker)? else {
            return Ok(false);
        };
        if current > max {
            return Err(DomainError::InvalidInput(format!(
                "'{}' goes up to {}, got {}",
                tracker, max, current
            )));
        }
        let Some(slot) = self.snapshot_mut(member, date, tracker, "set_scale") else {
            return Ok(false);
        };
        match slot {
            RecordValue::LimitedNumber(value) => {
                *value = current;
                Ok(true)
            }
            other => Err(wrong_kind(tracker, other.kind(), TrackerKind::LimitedNumber)),
        }
    }

    /// Click the 1-based `unit` of a scale. Clicking the first unit while
    /// the scale sits at 1 turns it back off.
    ///
    /// Returns the new current value.
    pub fn click_scale_unit(&mut self, member: &str, date: NaiveDate, tracker: &str, unit: u32) -> DomainResult<Option<u32>> {
        let Some(max) = self.scale_max(member, tracker)? else {
            return Ok(None);
        };
        if unit == 0 || unit > max {
            return Err(DomainError::InvalidInput(format!(
                "'{}' has units 1 to {}, got {}",
                tracker, max, unit
            )));
        }
        let Some(slot) = self.snapshot_mut(member, date, tracker, "click_scale_unit") else {
            return Ok(None);
        };
        match slot {
            RecordValue::LimitedNumber(current) => {
                *current = if unit == 1 && *current == 1 { 0 } else { unit };
                Ok(Some(*current))
            }
            other => Err(wrong_kind(tracker, other.kind(), TrackerKind::LimitedNumber)),
        }
    }

    /// Append an entry to a list-shaped tracker
    pub fn append_item(&mut self, member: &str, date: NaiveDate, tracker: &str, entry: ListEntry) -> DomainResult<bool> {
        let Some(slot) = self.snapshot_mut(member, date, tracker, "append_item") else {
            return Ok(false);
        };
        ensure_kind(tracker, &*slot, entry.kind())?;
        match (slot, entry) {
            (RecordValue::ArrayStrings(items), ListEntry::Text(text)) => items.push(text),
            (RecordValue::ArrayObjects(items), ListEntry::Object(obj)) => items.push(obj),
            (RecordValue::ArrayObjectsCheckbox(items), ListEntry::Check(check)) => items.push(check),
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Replace the entry at `index` of a list-shaped tracker
    pub fn update_item(
        &mut self,
        member: &str,
        date: NaiveDate,
        tracker: &str,
        index: usize,
        entry: ListEntry,
    ) -> DomainResult<bool> {
        let Some(slot) = self.snapshot_mut(member, date, tracker, "update_item") else {
            return Ok(false);
        };
        ensure_kind(tracker, &*slot, entry.kind())?;
        let replaced = match (slot, entry) {
            (RecordValue::ArrayStrings(items), ListEntry::Text(text)) => items.get_mut(index).map(|i| *i = text),
            (RecordValue::ArrayObjects(items), ListEntry::Object(obj)) => items.get_mut(index).map(|i| *i = obj),
            (RecordValue::ArrayObjectsCheckbox(items), ListEntry::Check(check)) => {
                items.get_mut(index).map(|i| *i = check)
            }
            _ => None,
        };
        if replaced.is_none() {
            log::warn!("update_item: '{}' has no entry {} for {} on {}", tracker, index, member, date);
        }
        Ok(replaced.is_some())
    }

    /// Remove the entry at `index` of a list-shaped tracker
    pub fn delete_item(&mut self, member: &str, date: NaiveDate, tracker: &str, index: usize) -> DomainResult<bool> {
        let Some(slot) = self.snapshot_mut(member, date, tracker, "delete_item") else {
            return Ok(false);
        };
        let len = match &*slot {
            RecordValue::ArrayStrings(items) => items.len(),
            RecordValue::ArrayObjects(items) => items.len(),
            RecordValue::ArrayObjectsCheckbox(items) => items.len(),
            other => {
                return Err(DomainError::InvalidInput(format!(
                    "Tracker '{}' is {}, which has no entries",
                    tracker,
                    other.kind()
                )))
            }
        };
        if index >= len {
            log::warn!("delete_item: '{}' has no entry {} for {} on {}", tracker, index, member, date);
            return Ok(false);
        }
        match slot {
            RecordValue::ArrayStrings(items) => {
                items.remove(index);
            }
            RecordValue::ArrayObjects(items) => {
                items.remove(index);
            }
            RecordValue::ArrayObjectsCheckbox(items) => {
                items.remove(index);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Invert the checked flag of a checklist entry; returns the new flag
    pub fn toggle_checkbox(&mut self, member: &str, date: NaiveDate, tracker: &str, index: usize) -> DomainResult<Option<bool>> {
        let Some(slot) = self.snapshot_mut(member, date, tracker, "toggle_checkbox") else {
            return Ok(None);
        };
        match slot {
            RecordValue::ArrayObjectsCheckbox(items) => match items.get_mut(index) {
                Some(item) => {
                    item.checked = !item.checked;
                    Ok(Some(item.checked))
                }
                None => {
                    log::warn!("toggle_checkbox: '{}' has no entry {} for {} on {}", tracker, index, member, date);
                    Ok(None)
                }
            },
            other => Err(wrong_kind(tracker, other.kind(), TrackerKind::ArrayObjectsCheckbox)),
        }
    }

    /// Record the reps achieved for one set of one exercise group
    pub fn set_rep(
        &mut self,
        member: &str,
        date: NaiveDate,
        tracker: &str,
        group: usize,
        rep: usize,
        actual: Option<u32>,
    ) -> DomainResult<bool> {
        let Some(slot) = self.snapshot_mut(member, date, tracker, "set_rep") else {
            return Ok(false);
        };
        match slot {
            RecordValue::ArrayObjectsSets(groups) => {
                match groups.get_mut(group).and_then(|g| g.actual.get_mut(rep)) {
                    Some(cell) => {
                        *cell = actual;
                        Ok(true)
                    }
                    None => {
                        log::warn!("set_rep: '{}' has no set {}/{} for {} on {}", tracker, group, rep, member, date);
                        Ok(false)
                    }
                }
            }
            other => Err(wrong_kind(tracker, other.kind(), TrackerKind::ArrayObjectsSets)),
        }
    }

    /// Set or clear the free-text note of a day
    pub fn set_note(&mut self, member: &str, date: NaiveDate, note: Option<String>) -> DomainResult<bool> {
        let Some(owner) = self.member(member) else {
            log::warn!("set_note: no member named '{}'", member);
            return Ok(false);
        };
        if !owner.enable_notes {
            return Err(DomainError::InvalidInput(format!("Notes are disabled for {}", member)));
        }
        let Some(record) = self.record_mut(member, date) else {
            log::warn!("set_note: no record for {} on {}", member, date);
            return Ok(false);
        };
        record.note = note.filter(|n| !n.trim().is_empty());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{parse_date, Member, SetTemplate, Tracker};

    fn today() -> NaiveDate {
        parse_date("2024-05-10").unwrap()
    }

    fn state() -> DiaryState {
        let mut member = Member::new("Anna");
        member.enable_notes = true;
        member.trackers.push(Tracker::new("Weight", TrackerTemplate::UnlimitedNumber(60.0)));
        member.trackers.push(Tracker::new("Water", TrackerTemplate::LimitedNumber(8)).with_icon("glass"));
        member.trackers.push(Tracker::new("Snacks", TrackerTemplate::ArrayObjects(vec![])));
        member.trackers.push(Tracker::new("Symptoms", TrackerTemplate::ArrayStrings(vec![])));
        member.trackers.push(
            Tracker::new("Pills", TrackerTemplate::ArrayObjectsCheckbox(vec![CheckItem::new("D3", "")]))
                .with_icon("pill"),
        );
        member.trackers.push(Tracker::new(
            "Gym",
            TrackerTemplate::ArrayObjectsSets(vec![SetTemplate { name: "Squats".into(), reps: vec![10, 8] }]),
        ));
        let mut state = DiaryState::default();
        state.config.members.push(member);
        state.open_today("Anna", today());
        state
    }

    fn value(state: &DiaryState, tracker: &str) -> RecordValue {
        state.record("Anna", today()).unwrap().find(tracker).unwrap().value.clone()
    }

    #[test]
    fn test_set_number() {
        let mut state = state();
        assert!(state.set_number("Anna", today(), "Weight", 59.4).unwrap());
        assert_eq!(value(&state, "Weight"), RecordValue::UnlimitedNumber(59.4));
        assert!(state.set_number("Anna", today(), "Weight", f64::INFINITY).is_err());
        assert!(state.set_number("Anna", today(), "Water", 2.0).is_err());
        assert!(!state.set_number("Anna", today(), "Height", 2.0).unwrap());
    }

    #[test]
    fn test_scale_bounds_and_reset_shortcut() {
        let mut state = state();
        assert!(state.set_scale("Anna", today(), "Water", 9).is_err());
        assert!(state.set_scale("Anna", today(), "Water", 8).unwrap());

        assert_eq!(state.click_scale_unit("Anna", today(), "Water", 1).unwrap(), Some(1));
        assert_eq!(state.click_scale_unit("Anna", today(), "Water", 1).unwrap(), Some(0));
        assert_eq!(state.click_scale_unit("Anna", today(), "Water", 3).unwrap(), Some(3));
        assert_eq!(state.click_scale_unit("Anna", today(), "Water", 3).unwrap(), Some(3));
        assert!(state.click_scale_unit("Anna", today(), "Water", 0).is_err());
        assert_eq!(value(&state, "Water"), RecordValue::LimitedNumber(3));
    }

    #[test]
    fn test_list_operations() {
        let mut state = state();
        let cake = ListEntry::Object(NamedEntry::new("Cake", "1 slice"));
        assert!(state.append_item("Anna", today(), "Snacks", cake).unwrap());
        assert!(state
            .append_item("Anna", today(), "Snacks", ListEntry::Object(NamedEntry::new("Candy", "3")))
            .unwrap());
        assert!(state
            .update_item("Anna", today(), "Snacks", 0, ListEntry::Object(NamedEntry::new("Cake", "2 slices")))
            .unwrap());
        assert!(!state
            .update_item("Anna", today(), "Snacks", 7, ListEntry::Object(NamedEntry::new("x", "")))
            .unwrap());
        assert!(state.delete_item("Anna", today(), "Snacks", 1).unwrap());
        assert_eq!(
            value(&state, "Snacks"),
            RecordValue::ArrayObjects(vec![NamedEntry::new("Cake", "2 slices")])
        );

        let wrong = state.append_item("Anna", today(), "Snacks", ListEntry::Text("Cake".into()));
        assert!(matches!(wrong, Err(DomainError::InvalidInput(_))));
        assert!(state.append_item("Anna", today(), "Symptoms", ListEntry::Text("Headache".into())).unwrap());
        assert!(state.delete_item("Anna", today(), "Weight", 0).is_err());
    }

    #[test]
    fn test_toggle_checkbox() {
        let mut state = state();
        assert_eq!(state.toggle_checkbox("Anna", today(), "Pills", 0).unwrap(), Some(true));
        assert_eq!(state.toggle_checkbox("Anna", today(), "Pills", 0).unwrap(), Some(false));
        assert_eq!(state.toggle_checkbox("Anna", today(), "Pills", 4).unwrap(), None);
        assert!(state.toggle_checkbox("Anna", today(), "Snacks", 0).is_err());
    }

    #[test]
    fn test_set_rep() {
        let mut state = state();
        assert!(state.set_rep("Anna", today(), "Gym", 0, 1, Some(7)).unwrap());
        assert!(!state.set_rep("Anna", today(), "Gym", 0, 2, Some(7)).unwrap());
        match value(&state, "Gym") {
            RecordValue::ArrayObjectsSets(groups) => {
                assert_eq!(groups[0].base, vec![10, 8]);
                assert_eq!(groups[0].actual, vec![None, Some(7)]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_set_note() {
        let mut state = state();
        assert!(state.set_note("Anna", today(), Some("Slept badly".into())).unwrap());
        assert_eq!(state.record("Anna", today()).unwrap().note.as_deref(), Some("Slept badly"));
        assert!(state.set_note("Anna", today(), Some("  ".into())).unwrap());
        assert!(state.record("Anna", today()).unwrap().note.is_none());

        state.member_mut("Anna").unwrap().enable_notes = false;
        assert!(state.set_note("Anna", today(), Some("x".into())).is_err());
    }

    #[test]
    fn test_missing_record_is_noop() {
        let mut state = state();
        let other_day = parse_date("2024-01-01").unwrap();
        let before = state.clone();
        assert!(!state.set_number("Anna", other_day, "Weight", 1.0).unwrap());
        assert!(!state.set_rep("Anna", other_day, "Gym", 0, 0, Some(1)).unwrap());
        assert_eq!(state, before);
    }
}
