//! Fatigue score.

const MAX_SCORE: f64 = 100.0;

/// Points added per hour the average shift runs past eight hours.
const OVERTIME_POINTS_PER_HOUR: f64 = 5.0;

/// Compute the fatigue index (0-100) for a streak length and average shift.
///
/// Three components are summed:
/// - streak: 40 for 7+ days, 25 for 5+, 10 for 3+
/// - average-hours tier: 40 for 10h+, 30 for 9h+, 15 for 8h+
/// - overtime: 5 points per hour above 8, on top of the tier
///
/// The sum is clamped to `[0, 100]` and rounded half up.
pub fn compute_fatigue_score(consecutive_work_days: u32, avg_hours: f64) -> u8 {
    let streak_points = match consecutive_work_days {
        7.. => 40.0,
        5..=6 => 25.0,
        3..=4 => 10.0,
        _ => 0.0,
    };

    let tier_points = if avg_hours >= 10.0 {
        40.0
    } else if avg_hours >= 9.0 {
        30.0
    } else if avg_hours >= 8.0 {
        15.0
    } else {
        0.0
    };

    let overtime_points = f64::max(0.0, avg_hours - 8.0) * OVERTIME_POINTS_PER_HOUR;

    let score = (streak_points + tier_points + overtime_points).clamp(0.0, MAX_SCORE);
    score.round() as u8
}
