//! Daily Record Entities
//!
//! A daily record holds one denormalized tracker snapshot per tracker
//! for a single member on a single date, plus an optional note.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entity::{position_of, Entity};
use super::tracker::{CheckItem, SetTemplate, TrackerKind};

/// Name + detail entry of an `array-objects` tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntry {
    pub name: String,
    #[serde(default)]
    pub detail: String,
}

impl NamedEntry {
    pub fn new(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail: detail.into(),
        }
    }
}

/// Recorded progress for one exercise group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetProgress {
    pub name: String,
    /// Base targets copied from the definition when the day was created
    pub base: Vec<u32>,
    /// Reps actually achieved, `None` until entered
    pub actual: Vec<Option<u32>>,
}

impl SetProgress {
    pub fn from_template(template: &SetTemplate) -> Self {
        Self {
            name: template.name.clone(),
            base: template.reps.clone(),
            actual: vec![None; template.reps.len()],
        }
    }

    /// Whether any set of the group has a recorded value
    pub fn has_progress(&self) -> bool {
        self.actual.iter().any(Option::is_some)
    }
}

/// Recorded value of a tracker for one day
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    UnlimitedNumber(f64),
    /// Current position on the scale
    LimitedNumber(u32),
    ArrayStrings(Vec<String>),
    ArrayObjects(Vec<NamedEntry>),
    ArrayObjectsCheckbox(Vec<CheckItem>),
    ArrayObjectsSets(Vec<SetProgress>),
}

impl RecordValue {
    pub fn kind(&self) -> TrackerKind {
        match self {
            RecordValue::UnlimitedNumber(_) => TrackerKind::UnlimitedNumber,
            RecordValue::LimitedNumber(_) => TrackerKind::LimitedNumber,
            RecordValue::ArrayStrings(_) => TrackerKind::ArrayStrings,
            RecordValue::ArrayObjects(_) => TrackerKind::ArrayObjects,
            RecordValue::ArrayObjectsCheckbox(_) => TrackerKind::ArrayObjectsCheckbox,
            RecordValue::ArrayObjectsSets(_) => TrackerKind::ArrayObjectsSets,
        }
    }

    /// Numeric reading for the two number kinds
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RecordValue::UnlimitedNumber(v) => Some(*v),
            RecordValue::LimitedNumber(v) => Some(f64::from(*v)),
            _ => None,
        }
    }

    /// Names of entries present in a list-shaped value
    pub fn entry_names(&self) -> Vec<&str> {
        match self {
            RecordValue::ArrayStrings(items) => items.iter().map(String::as_str).collect(),
            RecordValue::ArrayObjects(items) => items.iter().map(|e| e.name.as_str()).collect(),
            RecordValue::ArrayObjectsCheckbox(items) => items.iter().map(|e| e.name.as_str()).collect(),
            RecordValue::ArrayObjectsSets(groups) => groups.iter().map(|g| g.name.as_str()).collect(),
            RecordValue::UnlimitedNumber(_) | RecordValue::LimitedNumber(_) => Vec::new(),
        }
    }

    pub(crate) fn decode(kind: TrackerKind, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            TrackerKind::UnlimitedNumber => RecordValue::UnlimitedNumber(serde_json::from_value(value)?),
            TrackerKind::LimitedNumber => RecordValue::LimitedNumber(serde_json::from_value(value)?),
            TrackerKind::ArrayStrings => RecordValue::ArrayStrings(serde_json::from_value(value)?),
            TrackerKind::ArrayObjects => RecordValue::ArrayObjects(serde_json::from_value(value)?),
            TrackerKind::ArrayObjectsCheckbox => RecordValue::ArrayObjectsCheckbox(serde_json::from_value(value)?),
            TrackerKind::ArrayObjectsSets => RecordValue::ArrayObjectsSets(serde_json::from_value(value)?),
        })
    }

    pub(crate) fn encode(&self) -> Value {
        let encoded = match self {
            RecordValue::UnlimitedNumber(v) => serde_json::to_value(v),
            RecordValue::LimitedNumber(v) => serde_json::to_value(v),
            RecordValue::ArrayStrings(v) => serde_json::to_value(v),
            RecordValue::ArrayObjects(v) => serde_json::to_value(v),
            RecordValue::ArrayObjectsCheckbox(v) => serde_json::to_value(v),
            RecordValue::ArrayObjectsSets(v) => serde_json::to_value(v),
        };
        encoded.unwrap_or(Value::Null)
    }
}

/// Snapshot of one tracker's value on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTrackerRecord", into = "RawTrackerRecord")]
pub struct TrackerRecord {
    /// Name of the tracker this snapshot belongs to
    pub name: String,
    pub value: RecordValue,
}

impl TrackerRecord {
    pub fn new(name: impl Into<String>, value: RecordValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn kind(&self) -> TrackerKind {
        self.value.kind()
    }
}

impl Entity for TrackerRecord {
    fn key(&self) -> &str {
        &self.name
    }
}

#[derive(Serialize, Deserialize)]
struct RawTrackerRecord {
    name: String,
    #[serde(rename = "type")]
    kind: TrackerKind,
    value: Value,
}

impl TryFrom<RawTrackerRecord> for TrackerRecord {
    type Error = String;

    fn try_from(raw: RawTrackerRecord) -> Result<Self, Self::Error> {
        let value = RecordValue::decode(raw.kind, raw.value)
            .map_err(|e| format!("record '{}' has a malformed {} value: {}", raw.name, raw.kind, e))?;
        Ok(TrackerRecord { name: raw.name, value })
    }
}

impl From<TrackerRecord> for RawTrackerRecord {
    fn from(record: TrackerRecord) -> Self {
        RawTrackerRecord {
            kind: record.kind(),
            value: record.value.encode(),
            name: record.name,
        }
    }
}

/// All tracker snapshots (+ note) of one member on one date
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    #[serde(default)]
    pub trackers: Vec<TrackerRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl DailyRecord {
    pub fn find(&self, tracker: &str) -> Option<&TrackerRecord> {
        position_of(&self.trackers, tracker).map(|i| &self.trackers[i])
    }

    pub fn find_mut(&mut self, tracker: &str) -> Option<&mut TrackerRecord> {
        position_of(&self.trackers, tracker).map(move |i| &mut self.trackers[i])
    }

    pub fn contains(&self, tracker: &str) -> bool {
        self.find(tracker).is_some()
    }

    /// Remove the snapshot for a tracker, returning whether one existed
    pub fn strip(&mut self, tracker: &str) -> bool {
        let before = self.trackers.len();
        self.trackers.retain(|r| r.name != tracker);
        self.trackers.len() != before
    }
}
