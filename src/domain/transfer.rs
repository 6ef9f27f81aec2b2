//! Import / Export
//!
//! Shape checks and decoding of the config and measures documents, both
//! when reading persisted blobs and when importing a user-supplied file.

use std::collections::HashSet;

use serde_json::Value;

use super::entity::{DomainError, DomainResult};
use super::legacy;
use super::state::{ConfigDocument, Measures, Snapshot};

/// Shape problems found in a config document
fn check_config_shape(config: &Value) -> Result<(), String> {
    let Some(obj) = config.as_object() else {
        return Err("config must be an object".into());
    };
    match obj.get("members") {
        Some(Value::Array(_)) => Ok(()),
        Some(_) => Err("config.members must be a list".into()),
        None => Err("config.members is missing".into()),
    }
}

fn check_measures_shape(measures: &Value) -> Result<(), String> {
    if measures.is_object() {
        Ok(())
    } else {
        Err("measures must be an object keyed by date".into())
    }
}

/// Keys that must be unique after decoding
fn check_integrity(config: &ConfigDocument) -> Result<(), String> {
    let mut members = HashSet::new();
    for member in &config.members {
        if !members.insert(member.name.as_str()) {
            return Err(format!("member '{}' appears twice", member.name));
        }
        let mut trackers = HashSet::new();
        for tracker in &member.trackers {
            if !trackers.insert(tracker.name.as_str()) {
                return Err(format!("{} has two trackers named '{}'", member.name, tracker.name));
            }
        }
    }
    Ok(())
}

impl ConfigDocument {
    /// Decode a persisted config blob
    pub fn from_json(json: &str) -> DomainResult<Self> {
        let value: Value = serde_json::from_str(json).map_err(|e| DomainError::Corrupt(format!("config: {}", e)))?;
        check_config_shape(&value).map_err(DomainError::Corrupt)?;
        let config: ConfigDocument =
            serde_json::from_value(value).map_err(|e| DomainError::Corrupt(format!("config: {}", e)))?;
        check_integrity(&config).map_err(DomainError::Corrupt)?;
        Ok(config)
    }

    pub fn to_json(&self) -> DomainResult<String> {
        serde_json::to_string(self).map_err(|e| DomainError::Internal(e.to_string()))
    }
}

/// Decode a persisted measures blob
pub fn measures_from_json(json: &str) -> DomainResult<Measures> {
    let value: Value = serde_json::from_str(json).map_err(|e| DomainError::Corrupt(format!("measures: {}", e)))?;
    check_measures_shape(&value).map_err(DomainError::Corrupt)?;
    serde_json::from_value(value).map_err(|e| DomainError::Corrupt(format!("measures: {}", e)))
}

pub fn measures_to_json(measures: &Measures) -> DomainResult<String> {
    serde_json::to_string(measures).map_err(|e| DomainError::Internal(e.to_string()))
}

impl Snapshot {
    /// Serialize both documents into a single export file
    pub fn to_export_json(&self) -> DomainResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| DomainError::Internal(e.to_string()))
    }

    /// Validate and decode an import file of the form `{ config, measures }`.
    ///
    /// Files written by the first app version (fixed member fields) are
    /// migrated to trackers first.
    pub fn from_import_json(json: &str) -> DomainResult<Self> {
        let reject = |reason: String| DomainError::InvalidImport(reason);

        let mut value: Value = serde_json::from_str(json).map_err(|e| reject(format!("not valid JSON: {}", e)))?;
        let Some(obj) = value.as_object() else {
            return Err(reject("expected an object with config and measures".into()));
        };
        let config = obj.get("config").ok_or_else(|| reject("config is missing".into()))?;
        let measures = obj.get("measures").ok_or_else(|| reject("measures is missing".into()))?;
        check_config_shape(config).map_err(reject)?;
        check_measures_shape(measures).map_err(reject)?;

        if legacy::is_legacy_config(config) {
            log::info!("Import file uses the fixed-field layout, migrating");
            value = legacy::migrate(&value).map_err(|e| reject(format!("legacy data: {}", e)))?;
        }

        let snapshot: Snapshot = serde_json::from_value(value).map_err(|e| reject(e.to_string()))?;
        check_integrity(&snapshot.config).map_err(reject)?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DiaryState, ListEntry, NamedEntry, TrackerDraft, TrackerTemplate};
    use crate::domain::parse_date;
    use serde_json::json;

    fn populated() -> Snapshot {
        let mut state = DiaryState::default();
        state.add_member("Anna", true).unwrap();
        state
            .create_tracker("Anna", TrackerDraft::new("Water", TrackerTemplate::LimitedNumber(8)).with_icon("glass"))
            .unwrap();
        state
            .create_tracker("Anna", TrackerDraft::new("Snacks", TrackerTemplate::ArrayObjects(vec!["Cake".into()])))
            .unwrap();
        let day = parse_date("2024-02-29").unwrap();
        state.reconcile_day("Anna", day);
        state.set_scale("Anna", day, "Water", 5).unwrap();
        state
            .append_item("Anna", day, "Snacks", ListEntry::Object(NamedEntry::new("Cake", "1")))
            .unwrap();
        state.set_note("Anna", day, Some("fine".into())).unwrap();
        state.snapshot()
    }

    #[test]
    fn test_export_import_round_trip() {
        let snapshot = populated();
        let json = snapshot.to_export_json().unwrap();
        let back = Snapshot::from_import_json(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_import_rejects_missing_members() {
        let err = Snapshot::from_import_json(r#"{ "config": {}, "measures": {} }"#).unwrap_err();
        assert_eq!(err, DomainError::InvalidImport("config.members is missing".into()));

        let err = Snapshot::from_import_json(r#"{ "config": { "members": {} }, "measures": {} }"#).unwrap_err();
        assert_eq!(err, DomainError::InvalidImport("config.members must be a list".into()));
    }

    #[test]
    fn test_import_rejects_bad_measures_and_json() {
        assert!(matches!(
            Snapshot::from_import_json(r#"{ "config": { "members": [] }, "measures": [] }"#),
            Err(DomainError::InvalidImport(_))
        ));
        assert!(matches!(Snapshot::from_import_json("not json"), Err(DomainError::InvalidImport(_))));
        assert!(matches!(
            Snapshot::from_import_json(r#"{ "config": { "members": [] }, "measures": { "yesterday": {} } }"#),
            Err(DomainError::InvalidImport(_))
        ));
    }

    #[test]
    fn test_import_rejects_duplicate_members() {
        let json = json!({
            "config": { "members": [{ "name": "Anna", "trackers": [] }, { "name": "Anna", "trackers": [] }] },
            "measures": {}
        });
        let err = Snapshot::from_import_json(&json.to_string()).unwrap_err();
        assert_eq!(err, DomainError::InvalidImport("member 'Anna' appears twice".into()));
    }

    #[test]
    fn test_persisted_blobs() {
        let snapshot = populated();
        let config = ConfigDocument::from_json(&snapshot.config.to_json().unwrap()).unwrap();
        assert_eq!(config, snapshot.config);
        let measures = measures_from_json(&measures_to_json(&snapshot.measures).unwrap()).unwrap();
        assert_eq!(measures, snapshot.measures);

        assert!(matches!(ConfigDocument::from_json(r#"{"members": 3}"#), Err(DomainError::Corrupt(_))));
        assert!(matches!(measures_from_json("[1,2]"), Err(DomainError::Corrupt(_))));
    }
}
