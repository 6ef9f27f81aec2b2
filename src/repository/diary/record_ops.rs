//! Daily Record Operations
//!
//! Opening diary days and editing the values recorded on them.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{DailyRecord, DomainResult, ListEntry};

/// Trait for daily record operations
#[async_trait]
pub trait DailyRecordOperations {
    /// Reconcile today's record; returns how many snapshots were added
    async fn open_today(&self, member: &str, today: NaiveDate) -> DomainResult<Option<usize>>;

    /// Reconcile a past day given as `YYYY-MM-DD`
    async fn open_day(&self, member: &str, raw_date: &str, today: NaiveDate) -> DomainResult<Option<NaiveDate>>;

    /// Dates shown in the member's diary, newest first
    async fn diary_dates(&self, member: &str, today: NaiveDate) -> Vec<NaiveDate>;

    /// The member's record for one date
    async fn day_record(&self, member: &str, date: NaiveDate) -> Option<DailyRecord>;

    async fn set_number(&self, member: &str, date: NaiveDate, tracker: &str, value: f64) -> DomainResult<bool>;

    async fn set_scale(&self, member: &str, date: NaiveDate, tracker: &str, current: u32) -> DomainResult<bool>;

    /// Click on the `unit`-th icon of a scale; returns the new value
    async fn click_scale_unit(&self, member: &str, date: NaiveDate, tracker: &str, unit: u32) -> DomainResult<Option<u32>>;

    async fn append_item(&self, member: &str, date: NaiveDate, tracker: &str, entry: ListEntry) -> DomainResult<bool>;

    async fn update_item(
        &self,
        member: &str,
        date: NaiveDate,
        tracker: &str,
        index: usize,
        entry: ListEntry,
    ) -> DomainResult<bool>;

    async fn delete_item(&self, member: &str, date: NaiveDate, tracker: &str, index: usize) -> DomainResult<bool>;

    /// Flip one checklist item; returns the new checked state
    async fn toggle_checkbox(&self, member: &str, date: NaiveDate, tracker: &str, index: usize) -> DomainResult<Option<bool>>;

    /// Record (or clear) the actual reps of one set
    async fn set_rep(
        &self,
        member: &str,
        date: NaiveDate,
        tracker: &str,
        group: usize,
        rep: usize,
        actual: Option<u32>,
    ) -> DomainResult<bool>;

    async fn set_note(&self, member: &str, date: NaiveDate, note: Option<String>) -> DomainResult<bool>;
}

#[async_trait]
impl DailyRecordOperations for super::diary_repo::DiaryRepository {
    async fn open_today(&self, member: &str, today: NaiveDate) -> DomainResult<Option<usize>> {
        self.mutate(|state| Ok(state.open_today(member, today))).await
    }

    async fn open_day(&self, member: &str, raw_date: &str, today: NaiveDate) -> DomainResult<Option<NaiveDate>> {
        self.mutate(|state| state.open_retrospective(member, raw_date, today)).await
    }

    async fn diary_dates(&self, member: &str, today: NaiveDate) -> Vec<NaiveDate> {
        self.read(|state| state.diary_dates(member, today)).await
    }

    async fn day_record(&self, member: &str, date: NaiveDate) -> Option<DailyRecord> {
        self.read(|state| state.record(member, date).cloned()).await
    }

    async fn set_number(&self, member: &str, date: NaiveDate, tracker: &str, value: f64) -> DomainResult<bool> {
        self.mutate(|state| state.set_number(member, date, tracker, value)).await
    }

    async fn set_scale(&self, member: &str, date: NaiveDate, tracker: &str, current: u32) -> DomainResult<bool> {
        self.mutate(|state| state.set_scale(member, date, tracker, current)).await
    }

    async fn click_scale_unit(&self, member: &str, date: NaiveDate, tracker: &str, unit: u32) -> DomainResult<Option<u32>> {
        self.mutate(|state| state.click_scale_unit(member, date, tracker, unit)).await
    }

    async fn append_item(&self, member: &str, date: NaiveDate, tracker: &str, entry: ListEntry) -> DomainResult<bool> {
        self.mutate(|state| state.append_item(member, date, tracker, entry)).await
    }

    async fn update_item(
        &self,
        member: &str,
        date: NaiveDate,
        tracker: &str,
        index: usize,
        entry: ListEntry,
    ) -> DomainResult<bool> {
        self.mutate(|state| state.update_item(member, date, tracker, index, entry)).await
    }

    async fn delete_item(&self, member: &str, date: NaiveDate, tracker: &str, index: usize) -> DomainResult<bool> {
        self.mutate(|state| state.delete_item(member, date, tracker, index)).await
    }

    async fn toggle_checkbox(&self, member: &str, date: NaiveDate, tracker: &str, index: usize) -> DomainResult<Option<bool>> {
        self.mutate(|state| state.toggle_checkbox(member, date, tracker, index)).await
    }

    async fn set_rep(
        &self,
        member: &str,
        date: NaiveDate,
        tracker: &str,
        group: usize,
        rep: usize,
        actual: Option<u32>,
    ) -> DomainResult<bool> {
        self.mutate(|state| state.set_rep(member, date, tracker, group, rep, actual)).await
    }

    async fn set_note(&self, member: &str, date: NaiveDate, note: Option<String>) -> DomainResult<bool> {
        self.mutate(|state| state.set_note(member, date, note)).await
    }
}
