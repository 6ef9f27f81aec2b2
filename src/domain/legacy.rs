//! Fixed-Field Layout Migration
//!
//! The first version of the diary stored a fixed set of fields per member
//! (weight, water norm, sweets, activity, exercises) and per day. This
//! module rewrites such documents into the tracker layout so they can be
//! imported.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{json, Value};

use super::record::{NamedEntry, RecordValue, SetProgress, TrackerRecord};
use super::tracker::{SetTemplate, Tracker, TrackerTemplate};

pub const WEIGHT: &str = "Weight";
pub const WATER: &str = "Water";
pub const SWEETS: &str = "Sweets";
pub const ACTIVITY: &str = "Activity";
pub const EXERCISES: &str = "Exercises";

const LEGACY_FIELDS: [&str; 5] = ["weight", "waterNorm", "sweets", "activity", "exercises"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyMember {
    name: String,
    #[serde(default)]
    weight: Value,
    #[serde(default)]
    water_norm: Value,
    #[serde(default)]
    sweets: Vec<String>,
    #[serde(default)]
    activity: Vec<String>,
    #[serde(default)]
    exercises: Vec<LegacyExercise>,
}

#[derive(Debug, Deserialize)]
struct LegacyExercise {
    name: String,
    #[serde(default)]
    sets: Value,
    #[serde(default)]
    reps: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyDay {
    #[serde(default)]
    water: Value,
    #[serde(default)]
    weight: Value,
    #[serde(default)]
    sweets: Vec<LegacyEntry>,
    #[serde(default)]
    activity: Vec<LegacyEntry>,
    #[serde(default)]
    exercises: Vec<LegacyExerciseDay>,
}

/// Sweets used `amount`, activity used `details`
#[derive(Debug, Deserialize)]
struct LegacyEntry {
    #[serde(default)]
    name: String,
    #[serde(default, alias = "amount", alias = "details")]
    detail: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyExerciseDay {
    name: String,
    #[serde(default)]
    actual_reps: Vec<Value>,
}

/// Numbers and numeric strings; blanks and garbage become `None`
fn lenient_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn lenient_u32(value: &Value) -> Option<u32> {
    lenient_f64(value).filter(|v| *v >= 0.0).map(|v| v.round() as u32)
}

fn detail_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// A member object with fixed fields and no tracker list
fn is_legacy_member(member: &Value) -> bool {
    member.as_object().is_some_and(|obj| {
        !obj.contains_key("trackers") && LEGACY_FIELDS.iter().any(|field| obj.contains_key(*field))
    })
}

/// Whether a config document uses the fixed-field member layout
pub fn is_legacy_config(config: &Value) -> bool {
    config
        .get("members")
        .and_then(Value::as_array)
        .is_some_and(|members| members.iter().any(is_legacy_member))
}

impl LegacyMember {
    fn set_templates(&self) -> Vec<SetTemplate> {
        self.exercises
            .iter()
            .filter(|ex| !ex.name.trim().is_empty())
            .map(|ex| {
                let mut reps: Vec<u32> = ex.reps.iter().filter_map(lenient_u32).collect();
                if reps.is_empty() {
                    reps = vec![0; lenient_u32(&ex.sets).unwrap_or(0) as usize];
                }
                SetTemplate {
                    name: ex.name.trim().to_string(),
                    reps,
                }
            })
            .collect()
    }

    fn trackers(&self) -> Vec<Tracker> {
        let water_norm = lenient_u32(&self.water_norm).unwrap_or(8).max(1);
        vec![
            Tracker::new(WEIGHT, TrackerTemplate::UnlimitedNumber(lenient_f64(&self.weight).unwrap_or(0.0))),
            Tracker::new(WATER, TrackerTemplate::LimitedNumber(water_norm)).with_icon("glass"),
            Tracker::new(SWEETS, TrackerTemplate::ArrayObjects(self.sweets.clone())),
            Tracker::new(ACTIVITY, TrackerTemplate::ArrayObjects(self.activity.clone())),
            Tracker::new(EXERCISES, TrackerTemplate::ArrayObjectsSets(self.set_templates())),
        ]
    }

    fn migrate_day(&self, day: LegacyDay) -> Vec<TrackerRecord> {
        let water_norm = lenient_u32(&self.water_norm).unwrap_or(8).max(1);
        let entries = |list: Vec<LegacyEntry>| -> Vec<NamedEntry> {
            list.into_iter()
                .filter(|e| !e.name.trim().is_empty())
                .map(|e| NamedEntry::new(e.name.trim(), detail_text(&e.detail)))
                .collect()
        };
        let sets = self
            .set_templates()
            .iter()
            .map(|template| {
                let mut progress = SetProgress::from_template(template);
                if let Some(done) = day.exercises.iter().find(|e| e.name == template.name) {
                    for (slot, raw) in progress.actual.iter_mut().zip(&done.actual_reps) {
                        *slot = lenient_u32(raw);
                    }
                }
                progress
            })
            .collect();

        vec![
            TrackerRecord::new(WEIGHT, RecordValue::UnlimitedNumber(lenient_f64(&day.weight).unwrap_or(0.0))),
            TrackerRecord::new(
                WATER,
                RecordValue::LimitedNumber(lenient_u32(&day.water).unwrap_or(0).min(water_norm)),
            ),
            TrackerRecord::new(SWEETS, RecordValue::ArrayObjects(entries(day.sweets))),
            TrackerRecord::new(ACTIVITY, RecordValue::ArrayObjects(entries(day.activity))),
            TrackerRecord::new(EXERCISES, RecordValue::ArrayObjectsSets(sets)),
        ]
    }
}

/// Rewrite a fixed-field `{ config, measures }` document into the tracker
/// layout. Members without fixed fields are passed through with their days.
pub fn migrate(document: &Value) -> Result<Value, serde_json::Error> {
    let members = document["config"]["members"].as_array().cloned().unwrap_or_default();
    let raw_measures: BTreeMap<String, BTreeMap<String, Value>> =
        serde_json::from_value(document["measures"].clone())?;

    let mut legacy_members = BTreeMap::new();
    let mut new_members = Vec::with_capacity(members.len());
    for raw in members {
        if !is_legacy_member(&raw) {
            new_members.push(raw);
            continue;
        }
        let member: LegacyMember = serde_json::from_value(raw)?;
        new_members.push(json!({
            "name": member.name,
            "trackers": member.trackers(),
            "enableNotes": false,
        }));
        legacy_members.insert(member.name.clone(), member);
    }

    let mut new_measures = serde_json::Map::new();
    for (date, day) in raw_measures {
        let mut records = serde_json::Map::new();
        for (name, raw) in day {
            let migrated = match legacy_members.get(&name) {
                Some(member) => {
                    let legacy_day: LegacyDay = serde_json::from_value(raw)?;
                    json!({ "trackers": member.migrate_day(legacy_day) })
                }
                None => raw,
            };
            records.insert(name, migrated);
        }
        new_measures.insert(date, Value::Object(records));
    }

    log::info!("Migrated {} fixed-field members", legacy_members.len());
    Ok(json!({
        "config": { "members": new_members },
        "measures": new_measures,
    }))
}
