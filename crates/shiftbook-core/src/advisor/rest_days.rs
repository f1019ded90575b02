//! Rest-day placement within a month.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{days_in_month, Calendar};
use crate::error::ValidationError;

/// Streak length at which the following break is suggested as a rest day.
const REST_AFTER_STREAK: u32 = 5;
/// Streak length at which the suggestion becomes high priority.
const HIGH_PRIORITY_STREAK: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestPriority {
    Medium,
    High,
}

/// A date on which resting is recommended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestDaySuggestion {
    /// The first non-work date after the streak
    pub date: NaiveDate,
    pub reason: String,
    pub priority: RestPriority,
    /// Length of the streak that precedes `date`
    pub streak: u32,
}

/// Suggest rest days for `(year, month)`.
///
/// Walks every day of the month. Each day with hours worked extends the
/// streak; a day without a record or with zero hours ends it, and if the
/// streak was at least five days long that day is suggested. A streak
/// still running on the last day of the month produces nothing.
///
/// # Errors
/// Returns [`ValidationError::InvalidValue`] if `month` is not in `1..=12`.
pub fn suggest_rest_days(
    calendar: &Calendar,
    year: i32,
    month: u32,
) -> Result<Vec<RestDaySuggestion>, ValidationError> {
    let days = days_in_month(year, month)
        .ok_or_else(|| ValidationError::invalid("month", format!("{month} is not in 1..=12")))?;

    let mut suggestions = Vec::new();
    let mut streak = 0u32;

    for day in 1..=days {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            continue;
        };

        if calendar.hours_on(date) > 0.0 {
            streak += 1;
            continue;
        }

        if streak >= REST_AFTER_STREAK {
            let priority = if streak >= HIGH_PRIORITY_STREAK {
                RestPriority::High
            } else {
                RestPriority::Medium
            };
            suggestions.push(RestDaySuggestion {
                date,
                reason: format!("Rest recommended after {streak} consecutive work days"),
                priority,
                streak,
            });
        }
        streak = 0;
    }

    Ok(suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::WorkRecord;

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn worked(month: u32, days: impl IntoIterator<Item = u32>) -> Calendar {
        days.into_iter()
            .map(|day| (d(month, day), WorkRecord::new(8.0)))
            .collect()
    }

    #[test]
    fn test_five_day_streak_suggests_following_day() {
        let out = suggest_rest_days(&worked(3, 1..=5), 2024, 3).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].date, d(3, 6));
        assert_eq!(out[0].priority, RestPriority::Medium);
        assert_eq!(out[0].streak, 5);
        assert!(out[0].reason.contains('5'));
    }

    #[test]
    fn test_seven_day_streak_is_high_priority() {
        let out = suggest_rest_days(&worked(3, 2..=8), 2024, 3).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].date, d(3, 9));
        assert_eq!(out[0].priority, RestPriority::High);
    }

    #[test]
    fn test_short_streaks_are_ignored() {
        let out = suggest_rest_days(&worked(3, [1, 2, 3, 4, 6, 7, 8, 9]), 2024, 3).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_zero_hour_record_breaks_streak() {
        let mut cal = worked(3, 1..=6);
        cal.insert(d(3, 7), WorkRecord::rest());
        cal.insert(d(3, 8), WorkRecord::new(8.0));
        let out = suggest_rest_days(&cal, 2024, 3).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].date, d(3, 7));
        assert_eq!(out[0].streak, 6);
    }

    #[test]
    fn test_streak_reaching_month_end_is_not_flushed() {
        // April has 30 days; 26..=30 is a five-day streak with no break after it
        let out = suggest_rest_days(&worked(4, 26..=30), 2024, 4).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_multiple_streaks_in_date_order() {
        let cal = worked(1, (1..=5).chain(10..=17));
        let out = suggest_rest_days(&cal, 2024, 1).unwrap();
        assert_eq!(
            out.iter().map(|s| s.date).collect::<Vec<_>>(),
            vec![d(1, 6), d(1, 18)]
        );
        assert_eq!(out[1].priority, RestPriority::High);
    }

    #[test]
    fn test_leap_day_is_walked() {
        let out = suggest_rest_days(&worked(2, 24..=28), 2024, 2).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].date, d(2, 29));
    }

    #[test]
    fn test_other_months_are_ignored() {
        let out = suggest_rest_days(&worked(3, 1..=10), 2024, 4).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_invalid_month_is_rejected() {
        let err = suggest_rest_days(&Calendar::new(), 2024, 13).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { .. }));
    }
}
