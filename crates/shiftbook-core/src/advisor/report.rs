//! Full analysis report.

use serde::{Deserialize, Serialize};

use super::pattern::{analyze_work_pattern, WorkPattern};
use super::suggestions::{
    generate_suggestions, Suggestion, FATIGUE_ALERT_SCORE, FATIGUE_CAUTION_SCORE,
};
use crate::calendar::Calendar;

const DEFAULT_SUMMARY_MESSAGE: &str = "Healthy schedule";

/// Overall state of a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStatus {
    Good,
    Warning,
    Danger,
}

impl SummaryStatus {
    pub fn from_score(fatigue_score: u8) -> Self {
        if fatigue_score >= FATIGUE_ALERT_SCORE {
            SummaryStatus::Danger
        } else if fatigue_score >= FATIGUE_CAUTION_SCORE {
            SummaryStatus::Warning
        } else {
            SummaryStatus::Good
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub status: SummaryStatus,
    /// Message of the first suggestion
    pub message: String,
}

/// Pattern, suggestions and summary for one calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullAnalysis {
    pub pattern: WorkPattern,
    pub suggestions: Vec<Suggestion>,
    pub summary: AnalysisSummary,
}

/// Analyze a calendar end to end.
pub fn full_analysis(calendar: &Calendar) -> FullAnalysis {
    let pattern = analyze_work_pattern(calendar);
    let suggestions = generate_suggestions(&pattern);

    let message = suggestions
        .first()
        .map(|s| s.message.clone())
        .unwrap_or_else(|| DEFAULT_SUMMARY_MESSAGE.to_string());

    FullAnalysis {
        summary: AnalysisSummary {
            status: SummaryStatus::from_score(pattern.fatigue_score),
            message,
        },
        pattern,
        suggestions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::SuggestionLevel;
    use crate::calendar::WorkRecord;
    use chrono::NaiveDate;

    fn streak(days: u32, hours: f64) -> Calendar {
        (1..=days)
            .map(|day| {
                (
                    NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
                    WorkRecord::new(hours),
                )
            })
            .collect()
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(SummaryStatus::from_score(0), SummaryStatus::Good);
        assert_eq!(SummaryStatus::from_score(59), SummaryStatus::Good);
        assert_eq!(SummaryStatus::from_score(60), SummaryStatus::Warning);
        assert_eq!(SummaryStatus::from_score(79), SummaryStatus::Warning);
        assert_eq!(SummaryStatus::from_score(80), SummaryStatus::Danger);
    }

    #[test]
    fn test_pattern_matches_standalone_analysis() {
        let cal = streak(9, 9.5);
        let report = full_analysis(&cal);
        assert_eq!(report.pattern, analyze_work_pattern(&cal));
        assert_eq!(report.suggestions, generate_suggestions(&report.pattern));
    }

    #[test]
    fn test_heavy_calendar_is_danger() {
        // 9 days at 10h: 40 + 40 + 10
        let report = full_analysis(&streak(9, 10.0));
        assert_eq!(report.pattern.fatigue_score, 90);
        assert_eq!(report.summary.status, SummaryStatus::Danger);
        assert_eq!(report.summary.message, report.suggestions[0].message);
        assert_eq!(report.suggestions[0].level, SuggestionLevel::High);
    }

    #[test]
    fn test_empty_calendar_is_good() {
        let report = full_analysis(&Calendar::new());
        assert_eq!(report.summary.status, SummaryStatus::Good);
        assert_eq!(report.suggestions.len(), 1);
        assert_eq!(report.summary.message, report.suggestions[0].message);
    }
}
