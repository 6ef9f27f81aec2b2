//! Daily Record Reconciler
//!
//! Guarantees that a viewed day holds a snapshot for every active
//! tracker. Stale snapshots are left alone; only tracker deletion
//! removes them.

use chrono::NaiveDate;

use super::entity::{DomainError, DomainResult};
use super::record::TrackerRecord;
use super::state::DiaryState;
use super::tracker::Tracker;

/// Date format used for record keys and user input
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date typed by the user
pub fn parse_date(raw: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| DomainError::InvalidInput(format!("'{}' is not a date in YYYY-MM-DD format", raw.trim())))
}

impl DiaryState {
    /// Create the member's record for `date` if needed and insert defaults
    /// for any active tracker it lacks.
    ///
    /// Returns the number of snapshots inserted, or `None` when the member
    /// does not exist. Running it twice inserts nothing the second time.
    pub fn reconcile_day(&mut self, member: &str, date: NaiveDate) -> Option<usize> {
        let Some(owner) = self.member(member) else {
            log::warn!("reconcile_day: no member named '{}'", member);
            return None;
        };
        let active: Vec<Tracker> = owner.active_trackers().cloned().collect();

        let record = self
            .measures
            .entry(date)
            .or_default()
            .entry(member.to_string())
            .or_default();

        let mut inserted = 0;
        for tracker in &active {
            if !record.contains(&tracker.name) {
                record
                    .trackers
                    .push(TrackerRecord::new(tracker.name.clone(), tracker.template.default_record()));
                inserted += 1;
            }
        }
        if inserted > 0 {
            log::debug!("Reconciled {} on {}: {} snapshots added", member, date, inserted);
        }
        Some(inserted)
    }

    /// Lazily create today's record when the diary is viewed
    pub fn open_today(&mut self, member: &str, today: NaiveDate) -> Option<usize> {
        self.reconcile_day(member, today)
    }

    /// Open a past day typed by the user. Malformed or future dates are
    /// rejected before anything changes.
    pub fn open_retrospective(&mut self, member: &str, raw_date: &str, today: NaiveDate) -> DomainResult<Option<NaiveDate>> {
        let date = parse_date(raw_date)?;
        if date > today {
            return Err(DomainError::InvalidInput(format!(
                "{} is in the future; only past days can be filled in",
                date
            )));
        }
        Ok(self.reconcile_day(member, date).map(|_| date))
    }

    /// Insert a new tracker's default into every existing record of the member
    pub(crate) fn backfill_tracker(&mut self, member: &str, tracker: &Tracker) -> usize {
        let mut backfilled = 0;
        for record in self.records_of_mut(member) {
            if !record.contains(&tracker.name) {
                record
                    .trackers
                    .push(TrackerRecord::new(tracker.name.clone(), tracker.template.default_record()));
                backfilled += 1;
            }
        }
        backfilled
    }

    /// Dates shown in the diary: today first, then every recorded day newest first
    pub fn diary_dates(&self, member: &str, today: NaiveDate) -> Vec<NaiveDate> {
        let mut dates = vec![today];
        let mut recorded: Vec<NaiveDate> = self
            .records_of(member)
            .map(|(date, _)| date)
            .filter(|date| *date != today)
            .collect();
        recorded.reverse();
        dates.extend(recorded);
        dates
    }
}
