//! Suggestion rules.
//!
//! Rules are evaluated in a fixed order and every matching rule contributes
//! one suggestion, so the output order is part of the contract. The two
//! fatigue rules are mutually exclusive.

use serde::{Deserialize, Serialize};

use super::pattern::WorkPattern;

/// Fatigue score at or above which an immediate rest day is advised.
pub const FATIGUE_ALERT_SCORE: u8 = 80;
/// Fatigue score at or above which rest within a few days is advised.
pub const FATIGUE_CAUTION_SCORE: u8 = 60;

const LONG_STREAK_DAYS: u32 = 6;
const LONG_SHIFT_HOURS: f64 = 9.0;
const MIN_REST_DAYS: u32 = 4;
const BUSY_PERIOD_WORK_DAYS: u32 = 20;

/// Severity of a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionLevel {
    Good,
    Low,
    Medium,
    High,
}

/// A piece of scheduling advice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub level: SuggestionLevel,
    /// Display glyph
    pub icon: String,
    pub title: String,
    pub message: String,
}

impl Suggestion {
    fn new(level: SuggestionLevel, icon: &str, title: &str, message: impl Into<String>) -> Self {
        Self {
            level,
            icon: icon.to_string(),
            title: title.to_string(),
            message: message.into(),
        }
    }
}

struct SuggestionRule {
    applies: fn(&WorkPattern) -> bool,
    build: fn(&WorkPattern) -> Suggestion,
}

const RULES: &[SuggestionRule] = &[
    SuggestionRule {
        applies: fatigue_alert,
        build: fatigue_alert_suggestion,
    },
    SuggestionRule {
        applies: fatigue_caution,
        build: fatigue_caution_suggestion,
    },
    SuggestionRule {
        applies: long_streak,
        build: long_streak_suggestion,
    },
    SuggestionRule {
        applies: long_shifts,
        build: long_shifts_suggestion,
    },
    SuggestionRule {
        applies: too_few_rest_days,
        build: too_few_rest_days_suggestion,
    },
];

fn fatigue_alert(p: &WorkPattern) -> bool {
    p.fatigue_score >= FATIGUE_ALERT_SCORE
}

fn fatigue_alert_suggestion(_: &WorkPattern) -> Suggestion {
    Suggestion::new(
        SuggestionLevel::High,
        "⚠️",
        "Fatigue alert",
        "Your fatigue score is very high. Schedule a rest day immediately.",
    )
}

fn fatigue_caution(p: &WorkPattern) -> bool {
    (FATIGUE_CAUTION_SCORE..FATIGUE_ALERT_SCORE).contains(&p.fatigue_score)
}

fn fatigue_caution_suggestion(_: &WorkPattern) -> Suggestion {
    Suggestion::new(
        SuggestionLevel::Medium,
        "💤",
        "Rest soon",
        "Schedule at least one rest day within the next 3 days.",
    )
}

fn long_streak(p: &WorkPattern) -> bool {
    p.consecutive_work_days >= LONG_STREAK_DAYS
}

fn long_streak_suggestion(p: &WorkPattern) -> Suggestion {
    Suggestion::new(
        SuggestionLevel::High,
        "📅",
        "Long work streak",
        format!(
            "Worked {} consecutive days. A day off is recommended.",
            p.consecutive_work_days
        ),
    )
}

fn long_shifts(p: &WorkPattern) -> bool {
    p.avg_hours > LONG_SHIFT_HOURS
}

fn long_shifts_suggestion(p: &WorkPattern) -> Suggestion {
    Suggestion::new(
        SuggestionLevel::Medium,
        "⏰",
        "Long shifts",
        format!(
            "Average of {} hours per shift exceeds the threshold. Consider adjusting shifts.",
            p.avg_hours
        ),
    )
}

fn too_few_rest_days(p: &WorkPattern) -> bool {
    p.rest_days < MIN_REST_DAYS && p.total_work_days > BUSY_PERIOD_WORK_DAYS
}

fn too_few_rest_days_suggestion(_: &WorkPattern) -> Suggestion {
    Suggestion::new(
        SuggestionLevel::Low,
        "🌴",
        "Not enough rest",
        "Few rest days this period. Schedule more time off.",
    )
}

fn healthy_suggestion() -> Suggestion {
    Suggestion::new(
        SuggestionLevel::Good,
        "✅",
        "Healthy schedule",
        "Your schedule looks healthy. Keep it up!",
    )
}

/// Turn a pattern into advice, in rule order.
///
/// Never returns an empty list: when no rule matches, a single `Good`
/// suggestion is returned.
pub fn generate_suggestions(pattern: &WorkPattern) -> Vec<Suggestion> {
    let mut suggestions: Vec<Suggestion> = RULES
        .iter()
        .filter(|rule| (rule.applies)(pattern))
        .map(|rule| (rule.build)(pattern))
        .collect();

    if suggestions.is_empty() {
        suggestions.push(healthy_suggestion());
    }
    suggestions
}
