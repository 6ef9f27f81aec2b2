//! Commands for reports

use crate::report::{generate_report, Report};
use crate::{today, AppState};

/// Report on one tracker over the last `days` days (settings default when `None`)
pub async fn tracker_report(state: &AppState, member: String, tracker: String, days: Option<u32>) -> Result<Report, String> {
    let days = days.unwrap_or(state.settings.report_days);
    let period = state.settings.period;
    state
        .diary
        .read(|diary| generate_report(diary, &member, &tracker, days, today(), &period))
        .await
        .ok_or_else(|| format!("{} has no tracker named {}", member, tracker))
}
