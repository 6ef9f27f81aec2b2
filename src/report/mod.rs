//! Reporting
//!
//! Best-effort aggregation of one tracker over the window
//! `[today - days, today]`, starting no earlier than the member's first
//! record. What gets computed depends on the tracker kind.

mod period;

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::domain::{DiaryState, RecordValue, TrackerKind};

pub use period::{detect_periods, Period, PeriodSettings, PeriodStats};

/// Arithmetic mean over days with a non-zero value
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MeanReport {
    pub days_recorded: u32,
    pub mean: Option<f64>,
}

/// Per-name count of days an entry was present (or checked)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntryReport {
    pub days_with_entries: u32,
    pub counts: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ReportBody {
    Mean(MeanReport),
    Scale { mean: MeanReport, periods: PeriodStats },
    Entries(EntryReport),
    Checklist(EntryReport),
    Sets(EntryReport),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub member: String,
    pub tracker: String,
    pub tracker_type: TrackerKind,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub body: ReportBody,
}

/// Collects per-day values into one of the report shapes
#[derive(Default)]
struct Accumulator {
    numbers: Vec<f64>,
    scale: Vec<u32>,
    entries: EntryReport,
}

impl Accumulator {
    fn count_names<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        let unique: BTreeSet<&str> = names.into_iter().filter(|n| !n.trim().is_empty()).collect();
        if unique.is_empty() {
            return;
        }
        self.entries.days_with_entries += 1;
        for name in unique {
            *self.entries.counts.entry(name.to_string()).or_default() += 1;
        }
    }

    fn add(&mut self, value: Option<&RecordValue>) {
        match value {
            Some(RecordValue::UnlimitedNumber(v)) => {
                if *v != 0.0 {
                    self.numbers.push(*v);
                }
            }
            Some(RecordValue::LimitedNumber(v)) => {
                self.scale.push(*v);
                if *v != 0 {
                    self.numbers.push(f64::from(*v));
                }
            }
            Some(RecordValue::ArrayObjectsCheckbox(items)) => {
                self.count_names(items.iter().filter(|i| i.checked).map(|i| i.name.as_str()));
            }
            Some(RecordValue::ArrayObjectsSets(groups)) => {
                self.count_names(groups.iter().filter(|g| g.has_progress()).map(|g| g.name.as_str()));
            }
            Some(list @ (RecordValue::ArrayStrings(_) | RecordValue::ArrayObjects(_))) => {
                self.count_names(list.entry_names());
            }
            None => self.scale.push(0),
        }
    }

    fn mean(&self) -> MeanReport {
        let mean = if self.numbers.is_empty() {
            None
        } else {
            Some(self.numbers.iter().sum::<f64>() / self.numbers.len() as f64)
        };
        MeanReport {
            days_recorded: self.numbers.len() as u32,
            mean,
        }
    }
}

/// Build the report for one tracker of one member.
///
/// Returns `None` when the member or tracker does not exist.
pub fn generate_report(
    state: &DiaryState,
    member: &str,
    tracker: &str,
    days: u32,
    today: NaiveDate,
    settings: &PeriodSettings,
) -> Option<Report> {
    let Some(definition) = state.member(member).and_then(|m| m.tracker(tracker)) else {
        log::warn!("generate_report: {} has no tracker named '{}'", member, tracker);
        return None;
    };
    let kind = definition.kind();
    let requested = today.checked_sub_days(Days::new(u64::from(days))).unwrap_or(NaiveDate::MIN);
    // Days before the first record hold nothing
    let first_record = state
        .measures
        .iter()
        .find(|(_, day)| day.contains_key(member))
        .map_or(today, |(date, _)| (*date).min(today));
    let from = requested.max(first_record);

    let mut acc = Accumulator::default();
    for date in from.iter_days().take_while(|d| *d <= today) {
        let value = state
            .record(member, date)
            .and_then(|record| record.find(tracker))
            .map(|snapshot| &snapshot.value)
            .filter(|value| value.kind() == kind);
        acc.add(value);
    }

    let body = match kind {
        TrackerKind::UnlimitedNumber => ReportBody::Mean(acc.mean()),
        TrackerKind::LimitedNumber => ReportBody::Scale {
            mean: acc.mean(),
            periods: detect_periods(from, &acc.scale, settings),
        },
        TrackerKind::ArrayStrings | TrackerKind::ArrayObjects => ReportBody::Entries(acc.entries),
        TrackerKind::ArrayObjectsCheckbox => ReportBody::Checklist(acc.entries),
        TrackerKind::ArrayObjectsSets => ReportBody::Sets(acc.entries),
    };

    Some(Report {
        member: member.to_string(),
        tracker: tracker.to_string(),
        tracker_type: kind,
        from,
        to: today,
        body,
    })
}
