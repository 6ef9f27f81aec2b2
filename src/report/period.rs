//! Period Statistics
//!
//! Cycle detection over a `limited-number` history. Consecutive active
//! (non-zero) days form a period; a period closes once `closing_gap_days`
//! have passed since its last active day.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Tunables of the period heuristic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodSettings {
    /// Days after the last active day at which a period is closed
    pub closing_gap_days: u32,
}

impl Default for PeriodSettings {
    fn default() -> Self {
        Self { closing_gap_days: 9 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Period {
    pub start: NaiveDate,
    /// Days from start to the last active day, inclusive
    pub length: u32,
    /// Already running on the first day of the window; real start unknown
    pub truncated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeriodStats {
    pub closed: Vec<Period>,
    /// Period still running at the end of the window
    pub open: Option<Period>,
    /// Days between consecutive known period starts
    pub cycle_gaps: Vec<u32>,
    /// Mean length of closed, untruncated periods
    pub average_length: Option<f64>,
    pub average_cycle: Option<f64>,
}

fn mean(values: &[u32]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().map(|v| f64::from(*v)).sum::<f64>() / values.len() as f64)
    }
}

/// Detect periods in `daily`, where `daily[i]` is the value recorded on
/// `window_start + i` days (days without a record count as zero).
pub fn detect_periods(window_start: NaiveDate, daily: &[u32], settings: &PeriodSettings) -> PeriodStats {
    let gap = settings.closing_gap_days.max(1) as usize;
    let to_period = |start: usize, last: usize| Period {
        start: window_start + Days::new(start as u64),
        length: (last - start + 1) as u32,
        truncated: start == 0,
    };

    let mut closed = Vec::new();
    let mut starts = Vec::new();
    // (start index, last active index)
    let mut running: Option<(usize, usize)> = None;

    for (i, value) in daily.iter().enumerate() {
        if let Some((start, last)) = running {
            if i - last >= gap {
                closed.push(to_period(start, last));
                running = None;
            }
        }
        if *value > 0 {
            running = match running {
                Some((start, _)) => Some((start, i)),
                None => {
                    starts.push(i);
                    Some((i, i))
                }
            };
        }
    }

    let cycle_gaps: Vec<u32> = starts
        .iter()
        .filter(|start| **start != 0)
        .collect::<Vec<_>>()
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) as u32)
        .collect();
    let lengths: Vec<u32> = closed.iter().filter(|p| !p.truncated).map(|p| p.length).collect();

    PeriodStats {
        average_length: mean(&lengths),
        average_cycle: mean(&cycle_gaps),
        open: running.map(|(start, last)| to_period(start, last)),
        closed,
        cycle_gaps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day0() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_single_closed_period_with_gap_to_next_start() {
        let history = [0, 0, 3, 2, 1, 0, 0, 0, 0, 0, 0, 0, 0, 4, 2, 0];
        let stats = detect_periods(day0(), &history, &PeriodSettings::default());

        assert_eq!(
            stats.closed,
            vec![Period { start: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(), length: 3, truncated: false }]
        );
        assert_eq!(stats.cycle_gaps, vec![11]);
        assert_eq!(stats.average_length, Some(3.0));
        assert_eq!(stats.average_cycle, Some(11.0));
        let open = stats.open.unwrap();
        assert_eq!(open.start, NaiveDate::from_ymd_opt(2024, 1, 14).unwrap());
        assert_eq!(open.length, 2);
    }

    #[test]
    fn test_short_gap_keeps_period_open() {
        let history = [0, 2, 0, 0, 1, 0];
        let stats = detect_periods(day0(), &history, &PeriodSettings::default());
        assert!(stats.closed.is_empty());
        assert_eq!(stats.open.unwrap().length, 4);
    }

    #[test]
    fn test_trailing_zeros_close_the_last_period() {
        let mut history = vec![0, 1, 1];
        history.extend(std::iter::repeat(0).take(9));
        let stats = detect_periods(day0(), &history, &PeriodSettings::default());
        assert_eq!(stats.closed.len(), 1);
        assert!(stats.open.is_none());
    }

    #[test]
    fn test_truncated_first_period_is_excluded() {
        let history = [2, 1, 0, 0, 0, 1, 1, 0, 0, 0, 1];
        let settings = PeriodSettings { closing_gap_days: 3 };
        let stats = detect_periods(day0(), &history, &settings);

        assert_eq!(stats.closed.len(), 2);
        assert!(stats.closed[0].truncated);
        assert_eq!(stats.average_length, Some(2.0));
        assert_eq!(stats.cycle_gaps, vec![5]);
    }

    #[test]
    fn test_no_data() {
        let stats = detect_periods(day0(), &[0, 0, 0], &PeriodSettings::default());
        assert_eq!(stats, PeriodStats::default());
        assert_eq!(detect_periods(day0(), &[], &PeriodSettings::default()), PeriodStats::default());
    }
}
