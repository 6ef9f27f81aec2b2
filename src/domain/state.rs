//! Diary State
//!
//! The two persisted documents and the application state that owns them.
//! Mutations live in sibling modules as `impl DiaryState` blocks:
//! - registry: tracker definition CRUD
//! - reconcile: daily record creation and backfill
//! - values: per-kind value updates
//! - membership: member add/rename/remove

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::entity::position_of;
use super::member::Member;
use super::record::DailyRecord;

/// Records of every member for one date, keyed by member name
pub type DayRecords = BTreeMap<String, DailyRecord>;

/// Date-indexed history: `{ "YYYY-MM-DD": { memberName: DailyRecord } }`
pub type Measures = BTreeMap<NaiveDate, DayRecords>;

/// Persisted config document: `{ members: Member[] }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub members: Vec<Member>,
}

/// Export file layout, also accepted by import
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub config: ConfigDocument,
    pub measures: Measures,
}

/// In-memory application state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiaryState {
    pub config: ConfigDocument,
    pub measures: Measures,
    /// Member whose tab is open; `None` means the first member
    selected: Option<String>,
}

impl DiaryState {
    pub fn new(config: ConfigDocument, measures: Measures) -> Self {
        Self {
            config,
            measures,
            selected: None,
        }
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self::new(snapshot.config, snapshot.measures)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            config: self.config.clone(),
            measures: self.measures.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.config.members.is_empty() && self.measures.is_empty()
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        position_of(&self.config.members, name).map(|i| &self.config.members[i])
    }

    pub fn member_mut(&mut self, name: &str) -> Option<&mut Member> {
        position_of(&self.config.members, name).map(move |i| &mut self.config.members[i])
    }

    /// The member whose tab is open
    pub fn selected_member(&self) -> Option<&Member> {
        self.selected
            .as_deref()
            .and_then(|name| self.member(name))
            .or_else(|| self.config.members.first())
    }

    /// Open a member's tab; unknown names leave the selection as is
    pub fn select_member(&mut self, name: &str) -> bool {
        if self.member(name).is_none() {
            log::warn!("select_member: no member named '{}'", name);
            return false;
        }
        self.selected = Some(name.to_string());
        true
    }

    pub(crate) fn set_selected(&mut self, name: Option<String>) {
        self.selected = name;
    }

    pub(crate) fn selected_name(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn record(&self, member: &str, date: NaiveDate) -> Option<&DailyRecord> {
        self.measures.get(&date).and_then(|day| day.get(member))
    }

    pub fn record_mut(&mut self, member: &str, date: NaiveDate) -> Option<&mut DailyRecord> {
        self.measures.get_mut(&date).and_then(|day| day.get_mut(member))
    }

    /// Every record of a member in chronological order
    pub fn records_of<'a>(&'a self, member: &'a str) -> impl Iterator<Item = (NaiveDate, &'a DailyRecord)> + 'a {
        self.measures
            .iter()
            .filter_map(move |(date, day)| day.get(member).map(|record| (*date, record)))
    }

    /// Mutable walk over every record of a member
    pub(crate) fn records_of_mut<'a>(
        &'a mut self,
        member: &'a str,
    ) -> impl Iterator<Item = &'a mut DailyRecord> + 'a {
        self.measures.values_mut().filter_map(move |day| day.get_mut(member))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_measures_wire_shape() {
        let mut measures = Measures::new();
        measures
            .entry(date("2024-03-01"))
            .or_default()
            .insert("Anna".into(), DailyRecord::default());
        let value = serde_json::to_value(&measures).unwrap();
        assert_eq!(value, json!({ "2024-03-01": { "Anna": { "trackers": [] } } }));
    }

    #[test]
    fn test_selected_member_defaults_to_first() {
        let mut state = DiaryState::default();
        assert!(state.selected_member().is_none());
        state.config.members.push(Member::new("Anna"));
        state.config.members.push(Member::new("Ben"));
        assert_eq!(state.selected_member().unwrap().name, "Anna");
        assert!(state.select_member("Ben"));
        assert_eq!(state.selected_member().unwrap().name, "Ben");
        assert!(!state.select_member("Carl"));
        assert_eq!(state.selected_member().unwrap().name, "Ben");
    }

    #[test]
    fn test_records_of_is_chronological() {
        let mut state = DiaryState::default();
        for d in ["2024-03-02", "2024-03-01"] {
            state.measures.entry(date(d)).or_default().insert("Anna".into(), DailyRecord::default());
        }
        state.measures.entry(date("2024-03-03")).or_default().insert("Ben".into(), DailyRecord::default());
        let dates: Vec<_> = state.records_of("Anna").map(|(d, _)| d).collect();
        assert_eq!(dates, vec![date("2024-03-01"), date("2024-03-02")]);
    }
}
