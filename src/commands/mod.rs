//! Commands Layer
//!
//! Handlers that bridge the CLI to the diary repository.
//! Errors are returned as display strings.

mod member_cmd;
mod tracker_cmd;
mod record_cmd;
mod report_cmd;
mod transfer_cmd;

pub use member_cmd::*;
pub use tracker_cmd::*;
pub use record_cmd::*;
pub use report_cmd::*;
pub use transfer_cmd::*;
