//! Fatigue advisor.
//!
//! Scores how tiring a work calendar is and turns the result into
//! human-readable scheduling suggestions. Every function here is pure:
//! the caller supplies the [`Calendar`](crate::Calendar) and owns it for the
//! duration of the call.
//!
//! - [`compute_fatigue_score`]: 0-100 index from streak length and average hours
//! - [`analyze_work_pattern`]: derives a [`WorkPattern`] from a calendar
//! - [`generate_suggestions`]: ordered advice for a pattern
//! - [`suggest_rest_days`]: dates in a month where a break follows a long streak
//! - [`full_analysis`]: all of the above plus a one-line summary

mod pattern;
mod report;
mod rest_days;
mod score;
mod suggestions;

pub use pattern::{analyze_work_pattern, WorkPattern};
pub use report::{full_analysis, AnalysisSummary, FullAnalysis, SummaryStatus};
pub use rest_days::{suggest_rest_days, RestDaySuggestion, RestPriority};
pub use score::compute_fatigue_score;
pub use suggestions::{
    generate_suggestions, Suggestion, SuggestionLevel, FATIGUE_ALERT_SCORE, FATIGUE_CAUTION_SCORE,
};
