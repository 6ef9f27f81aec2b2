//! Diary Repository Module
//!
//! This module provides the diary repository split into specialized sub-modules:
//! - diary_repo: Loading, persisting and the mutation pipeline
//! - member_ops: Member management
//! - tracker_ops: Tracker definition CRUD
//! - record_ops: Day opening and value updates
//! - transfer_ops: Export, import and reset

mod diary_repo;
mod member_ops;
mod tracker_ops;
mod record_ops;
mod transfer_ops;

pub use diary_repo::{DiaryRepository, CONFIG_KEY, MEASURES_KEY};

// Re-export all operation traits so they can be used by importing DiaryRepository
pub use member_ops::MemberOperations;
pub use tracker_ops::TrackerOperations;
pub use record_ops::DailyRecordOperations;
pub use transfer_ops::TransferOperations;
