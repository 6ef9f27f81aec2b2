//! Tracker Entity
//!
//! A tracker is a user-defined field schema owned by a member. Its
//! template is a closed union over the six tracker kinds; the JSON form
//! keeps the `{ name, type, value }` layout with a kind-shaped `value`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entity::{DomainError, DomainResult, Entity};
use super::record::{RecordValue, SetProgress};

/// Tracker kind determines the shape of definition and recorded values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackerKind {
    /// Free numeric value (e.g. weight)
    UnlimitedNumber,
    /// Bounded scale with a reset-to-zero shortcut (e.g. glasses of water)
    LimitedNumber,
    /// Free-text entries
    ArrayStrings,
    /// Name + detail pairs
    ArrayObjects,
    /// Name + detail + checked, built from a fixed template
    ArrayObjectsCheckbox,
    /// Named groups of rep-count targets
    ArrayObjectsSets,
}

impl TrackerKind {
    pub const ALL: [TrackerKind; 6] = [
        TrackerKind::UnlimitedNumber,
        TrackerKind::LimitedNumber,
        TrackerKind::ArrayStrings,
        TrackerKind::ArrayObjects,
        TrackerKind::ArrayObjectsCheckbox,
        TrackerKind::ArrayObjectsSets,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrackerKind::UnlimitedNumber => "unlimited-number",
            TrackerKind::LimitedNumber => "limited-number",
            TrackerKind::ArrayStrings => "array-strings",
            TrackerKind::ArrayObjects => "array-objects",
            TrackerKind::ArrayObjectsCheckbox => "array-objects-checkbox",
            TrackerKind::ArrayObjectsSets => "array-objects-sets",
        }
    }

    /// Kinds that cannot be created without an icon
    pub fn requires_icon(&self) -> bool {
        matches!(self, TrackerKind::LimitedNumber | TrackerKind::ArrayObjectsCheckbox)
    }
}

impl std::fmt::Display for TrackerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TrackerKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TrackerKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DomainError::InvalidInput(format!("Unknown tracker type '{}'", s)))
    }
}

/// A checklist entry (template and recorded form share the shape)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckItem {
    pub name: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub checked: bool,
}

impl CheckItem {
    pub fn new(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail: detail.into(),
            checked: false,
        }
    }
}

/// One exercise group: a name and the base rep target for each set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetTemplate {
    pub name: String,
    pub reps: Vec<u32>,
}

/// Definition value of a tracker, one variant per kind
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerTemplate {
    /// Reference value shown before anything is entered
    UnlimitedNumber(f64),
    /// Scale maximum
    LimitedNumber(u32),
    /// Suggestions offered while typing
    ArrayStrings(Vec<String>),
    /// Suggested entry names
    ArrayObjects(Vec<String>),
    ArrayObjectsCheckbox(Vec<CheckItem>),
    ArrayObjectsSets(Vec<SetTemplate>),
}

impl TrackerTemplate {
    pub fn kind(&self) -> TrackerKind {
        match self {
            TrackerTemplate::UnlimitedNumber(_) => TrackerKind::UnlimitedNumber,
            TrackerTemplate::LimitedNumber(_) => TrackerKind::LimitedNumber,
            TrackerTemplate::ArrayStrings(_) => TrackerKind::ArrayStrings,
            TrackerTemplate::ArrayObjects(_) => TrackerKind::ArrayObjects,
            TrackerTemplate::ArrayObjectsCheckbox(_) => TrackerKind::ArrayObjectsCheckbox,
            TrackerTemplate::ArrayObjectsSets(_) => TrackerKind::ArrayObjectsSets,
        }
    }

    /// The value a fresh daily record starts with
    pub fn default_record(&self) -> RecordValue {
        match self {
            TrackerTemplate::UnlimitedNumber(_) => RecordValue::UnlimitedNumber(0.0),
            TrackerTemplate::LimitedNumber(_) => RecordValue::LimitedNumber(0),
            TrackerTemplate::ArrayStrings(_) => RecordValue::ArrayStrings(Vec::new()),
            TrackerTemplate::ArrayObjects(_) => RecordValue::ArrayObjects(Vec::new()),
            TrackerTemplate::ArrayObjectsCheckbox(items) => RecordValue::ArrayObjectsCheckbox(
                items
                    .iter()
                    .map(|item| CheckItem {
                        checked: false,
                        ..item.clone()
                    })
                    .collect(),
            ),
            TrackerTemplate::ArrayObjectsSets(groups) => RecordValue::ArrayObjectsSets(
                groups.iter().map(SetProgress::from_template).collect(),
            ),
        }
    }

    /// Check invariants that serde cannot express
    pub fn validate(&self) -> DomainResult<()> {
        match self {
            TrackerTemplate::UnlimitedNumber(v) if !v.is_finite() => Err(DomainError::InvalidInput(
                "Default value must be a finite number".into(),
            )),
            TrackerTemplate::LimitedNumber(0) => Err(DomainError::InvalidInput(
                "Scale maximum must be at least 1".into(),
            )),
            TrackerTemplate::ArrayObjectsSets(groups) => {
                match groups.iter().find(|g| g.name.trim().is_empty()) {
                    Some(_) => Err(DomainError::InvalidInput("Set group name cannot be empty".into())),
                    None => Ok(()),
                }
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn decode(kind: TrackerKind, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            TrackerKind::UnlimitedNumber => TrackerTemplate::UnlimitedNumber(serde_json::from_value(value)?),
            TrackerKind::LimitedNumber => TrackerTemplate::LimitedNumber(serde_json::from_value(value)?),
            TrackerKind::ArrayStrings => TrackerTemplate::ArrayStrings(serde_json::from_value(value)?),
            TrackerKind::ArrayObjects => TrackerTemplate::ArrayObjects(serde_json::from_value(value)?),
            TrackerKind::ArrayObjectsCheckbox => {
                TrackerTemplate::ArrayObjectsCheckbox(serde_json::from_value(value)?)
            }
            TrackerKind::ArrayObjectsSets => TrackerTemplate::ArrayObjectsSets(serde_json::from_value(value)?),
        })
    }

    pub(crate) fn encode(&self) -> Value {
        let encoded = match self {
            TrackerTemplate::UnlimitedNumber(v) => serde_json::to_value(v),
            TrackerTemplate::LimitedNumber(v) => serde_json::to_value(v),
            TrackerTemplate::ArrayStrings(v) => serde_json::to_value(v),
            TrackerTemplate::ArrayObjects(v) => serde_json::to_value(v),
            TrackerTemplate::ArrayObjectsCheckbox(v) => serde_json::to_value(v),
            TrackerTemplate::ArrayObjectsSets(v) => serde_json::to_value(v),
        };
        encoded.unwrap_or(Value::Null)
    }
}

/// A user-defined field attached to a member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTracker", into = "RawTracker")]
pub struct Tracker {
    /// Unique within the owning member
    pub name: String,
    pub template: TrackerTemplate,
    /// Display-only flag; inactive trackers keep their history
    pub is_active: bool,
    pub icon: Option<String>,
}

impl Tracker {
    pub fn new(name: impl Into<String>, template: TrackerTemplate) -> Self {
        Self {
            name: name.into(),
            template,
            is_active: true,
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn kind(&self) -> TrackerKind {
        self.template.kind()
    }
}

impl Entity for Tracker {
    fn key(&self) -> &str {
        &self.name
    }
}

fn default_true() -> bool {
    true
}

/// Wire form of a tracker definition
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTracker {
    name: String,
    #[serde(rename = "type")]
    kind: TrackerKind,
    #[serde(default = "default_true")]
    is_active: bool,
    value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    icon: Option<String>,
}

impl TryFrom<RawTracker> for Tracker {
    type Error = String;

    fn try_from(raw: RawTracker) -> Result<Self, Self::Error> {
        let template = TrackerTemplate::decode(raw.kind, raw.value)
            .map_err(|e| format!("tracker '{}' has a malformed {} value: {}", raw.name, raw.kind, e))?;
        Ok(Tracker {
            name: raw.name,
            template,
            is_active: raw.is_active,
            icon: raw.icon,
        })
    }
}

impl From<Tracker> for RawTracker {
    fn from(tracker: Tracker) -> Self {
        RawTracker {
            kind: tracker.kind(),
            value: tracker.template.encode(),
            name: tracker.name,
            is_active: tracker.is_active,
            icon: tracker.icon,
        }
    }
}
