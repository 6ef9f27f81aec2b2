//! Domain Layer
//!
//! Contains all domain entities and the pure state transitions over them.
//! This layer does no I/O (except logging through the `log` facade).

mod entity;
mod tracker;
mod record;
mod member;
mod state;
mod registry;
mod reconcile;
mod values;
mod membership;
mod transfer;
mod forms;
pub mod legacy;

pub use entity::{clean_name, key_taken, position_of, DomainError, DomainResult, Entity};
pub use tracker::{CheckItem, SetTemplate, Tracker, TrackerKind, TrackerTemplate};
pub use record::{DailyRecord, NamedEntry, RecordValue, SetProgress, TrackerRecord};
pub use member::Member;
pub use state::{ConfigDocument, DayRecords, DiaryState, Measures, Snapshot};
pub use registry::{TrackerDraft, TrackerEdit};
pub use reconcile::{parse_date, DATE_FORMAT};
pub use values::ListEntry;
pub use transfer::{measures_from_json, measures_to_json};
pub use forms::{parse_check_items, parse_list, parse_named_entries, parse_set_lines};
