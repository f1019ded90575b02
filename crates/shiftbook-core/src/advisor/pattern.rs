//! Work pattern extraction.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::score::compute_fatigue_score;
use crate::calendar::Calendar;

/// Summary of a work calendar used to drive suggestions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkPattern {
    /// Longest run of contiguous dates with hours worked
    pub consecutive_work_days: u32,
    /// Dates with hours worked
    pub total_work_days: u32,
    /// Dates recorded with zero hours
    pub rest_days: u32,
    /// Mean hours over work days, rounded to one decimal
    pub avg_hours: f64,
    /// Fatigue index (0-100)
    pub fatigue_score: u8,
}

/// Derive a [`WorkPattern`] from a calendar.
///
/// A streak is broken by a zero-hour record and by any date missing from
/// the calendar. The fatigue score is computed from the unrounded average;
/// only the reported `avg_hours` is rounded.
pub fn analyze_work_pattern(calendar: &Calendar) -> WorkPattern {
    if calendar.is_empty() {
        return WorkPattern::default();
    }

    let mut max_run = 0u32;
    let mut run = 0u32;
    let mut work_days = 0u32;
    let mut total_hours = 0.0;
    let mut previous: Option<NaiveDate> = None;

    for (date, record) in calendar {
        let follows_previous = previous.map_or(true, |p| p.succ_opt() == Some(*date));
        if !follows_previous {
            max_run = max_run.max(run);
            run = 0;
        }

        if record.is_work_day() {
            run += 1;
            work_days += 1;
            total_hours += record.hours;
        } else {
            max_run = max_run.max(run);
            run = 0;
        }
        previous = Some(*date);
    }
    max_run = max_run.max(run);

    let avg_hours = if work_days > 0 {
        total_hours / f64::from(work_days)
    } else {
        0.0
    };

    WorkPattern {
        consecutive_work_days: max_run,
        total_work_days: work_days,
        rest_days: calendar.len() as u32 - work_days,
        avg_hours: round_one_decimal(avg_hours),
        fatigue_score: compute_fatigue_score(max_run, avg_hours),
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::WorkRecord;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn calendar(entries: &[(u32, f64)]) -> Calendar {
        entries
            .iter()
            .map(|&(day, hours)| (d(day), WorkRecord::new(hours)))
            .collect()
    }

    #[test]
    fn test_empty_calendar_yields_zero_pattern() {
        let pattern = analyze_work_pattern(&Calendar::new());
        assert_eq!(pattern, WorkPattern::default());
        assert_eq!(pattern.fatigue_score, 0);
        assert_eq!(pattern.avg_hours, 0.0);
    }

    #[test]
    fn test_week_then_rest_day() {
        let mut entries: Vec<(u32, f64)> = (1..=7).map(|day| (day, 8.0)).collect();
        entries.push((8, 0.0));
        let pattern = analyze_work_pattern(&calendar(&entries));

        assert_eq!(pattern.consecutive_work_days, 7);
        assert_eq!(pattern.total_work_days, 7);
        assert_eq!(pattern.rest_days, 1);
        assert_eq!(pattern.avg_hours, 8.0);
        assert_eq!(pattern.fatigue_score, 55);
    }

    #[test]
    fn test_run_ending_on_last_date_counts() {
        let pattern = analyze_work_pattern(&calendar(&[
            (1, 8.0),
            (2, 0.0),
            (3, 8.0),
            (4, 8.0),
            (5, 8.0),
        ]));
        assert_eq!(pattern.consecutive_work_days, 3);
    }

    #[test]
    fn test_missing_date_breaks_run() {
        let pattern = analyze_work_pattern(&calendar(&[
            (1, 8.0),
            (2, 8.0),
            (4, 8.0),
            (5, 8.0),
            (6, 8.0),
        ]));
        assert_eq!(pattern.consecutive_work_days, 3);
        assert_eq!(pattern.total_work_days, 5);
        assert_eq!(pattern.rest_days, 0);
    }

    #[test]
    fn test_run_across_month_boundary_is_contiguous() {
        let cal: Calendar = [
            (NaiveDate::from_ymd_opt(2024, 1, 30).unwrap(), WorkRecord::new(8.0)),
            (NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(), WorkRecord::new(8.0)),
            (NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(), WorkRecord::new(8.0)),
        ]
        .into_iter()
        .collect();
        assert_eq!(analyze_work_pattern(&cal).consecutive_work_days, 3);
    }

    #[test]
    fn test_only_rest_days() {
        let pattern = analyze_work_pattern(&calendar(&[(1, 0.0), (2, 0.0)]));
        assert_eq!(pattern.total_work_days, 0);
        assert_eq!(pattern.rest_days, 2);
        assert_eq!(pattern.avg_hours, 0.0);
        assert_eq!(pattern.fatigue_score, 0);
    }

    #[test]
    fn test_score_uses_unrounded_average() {
        // 8.96 reports as 9.0 but stays in the 8h tier: 15 + 4.8 -> 20
        let pattern = analyze_work_pattern(&calendar(&[(1, 8.96), (3, 8.96)]));
        assert_eq!(pattern.avg_hours, 9.0);
        assert_eq!(pattern.fatigue_score, 20);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(WorkPattern::default()).unwrap();
        assert!(json.get("consecutiveWorkDays").is_some());
        assert!(json.get("fatigueScore").is_some());
    }
}
