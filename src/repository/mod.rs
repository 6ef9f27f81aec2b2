//! Repository Layer
//!
//! Storage abstractions and the diary repository built on them.

mod traits;
mod memory_store;
mod sqlite_store;
mod diary;

#[cfg(test)]
mod tests;

pub use traits::KeyValueStore;
pub use memory_store::MemoryStore;
pub use sqlite_store::SqliteStore;
pub use diary::{
    DailyRecordOperations, DiaryRepository, MemberOperations, TrackerOperations, TransferOperations, CONFIG_KEY,
    MEASURES_KEY,
};
