//! Payroll arithmetic.
//!
//! Base pay, overtime premiums, holiday pay and seniority-level progress for
//! hourly staff. All amounts are in the same currency unit as the hourly
//! rate; totals that are shown to the user are rounded to whole units.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::calendar::Calendar;
use crate::error::ValidationError;

/// Hourly rate for each seniority step (0-8).
pub const DEFAULT_SALARY_TABLE: [u32; 9] = [253, 260, 269, 278, 286, 291, 302, 309, 358];

/// Hourly rate at the top step.
pub const DEFAULT_HOURLY_RATE: f64 = 358.0;
pub const DEFAULT_BASE_MULTIPLIER: f64 = 1.667;
pub const DEFAULT_OVERTIME_MULTIPLIER: f64 = 2.667;

/// Hours counted at the base multiplier per day.
pub const BASE_HOURS_PER_DAY: f64 = 8.0;

/// Hours of service needed to advance one step.
pub const HOURS_PER_LEVEL: f64 = 1040.0;
pub const MAX_LEVEL: u32 = 8;

/// Statutory overtime premiums.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OvertimeRates {
    /// Regular day, first two overtime hours
    pub regular_first_two: f64,
    /// Regular day, beyond two overtime hours
    pub regular_after: f64,
    pub rest_day: f64,
    pub holiday: f64,
}

pub const OVERTIME_RATES: OvertimeRates = OvertimeRates {
    regular_first_two: 1.34,
    regular_after: 1.67,
    rest_day: 1.67,
    holiday: 2.0,
};

/// Kind of day overtime was worked on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    #[default]
    Regular,
    Rest,
    Holiday,
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DayType::Regular => "regular",
            DayType::Rest => "rest",
            DayType::Holiday => "holiday",
        };
        f.write_str(s)
    }
}

impl FromStr for DayType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "regular" => Ok(DayType::Regular),
            "rest" => Ok(DayType::Rest),
            "holiday" => Ok(DayType::Holiday),
            other => Err(ValidationError::invalid(
                "day_type",
                format!("'{other}' is not one of regular, rest, holiday"),
            )),
        }
    }
}

/// Overtime pay for `overtime_hours` on a day of `day_type`.
pub fn overtime_pay(base_rate: f64, overtime_hours: f64, day_type: DayType) -> f64 {
    match day_type {
        DayType::Regular => {
            let first_two = overtime_hours.min(2.0);
            let remaining = (overtime_hours - 2.0).max(0.0);
            first_two * base_rate * OVERTIME_RATES.regular_first_two
                + remaining * base_rate * OVERTIME_RATES.regular_after
        }
        DayType::Rest => overtime_hours * base_rate * OVERTIME_RATES.rest_day,
        DayType::Holiday => overtime_hours * base_rate * OVERTIME_RATES.holiday,
    }
}

/// Inputs for a single-shift pay calculation with handbook multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CustomRates {
    pub rate: f64,
    pub base_hours: f64,
    pub overtime_hours: f64,
    pub base_multiplier: f64,
    pub overtime_multiplier: f64,
}

impl Default for CustomRates {
    fn default() -> Self {
        Self {
            rate: DEFAULT_HOURLY_RATE,
            base_hours: BASE_HOURS_PER_DAY,
            overtime_hours: 0.0,
            base_multiplier: DEFAULT_BASE_MULTIPLIER,
            overtime_multiplier: DEFAULT_OVERTIME_MULTIPLIER,
        }
    }
}

/// Human-readable formulas behind a [`PayBreakdown`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayDetails {
    pub base: String,
    pub overtime: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayBreakdown {
    pub base_pay: i64,
    pub overtime_pay: i64,
    pub total_pay: i64,
    pub details: PayDetails,
}

/// Pay for one shift using explicit multipliers.
///
/// The total is rounded from the unrounded parts, so it can differ by one
/// from `base_pay + overtime_pay`.
pub fn custom_rate_pay(rates: &CustomRates) -> PayBreakdown {
    let base = rates.base_hours * rates.rate * rates.base_multiplier;
    let overtime = rates.overtime_hours * rates.rate * rates.overtime_multiplier;

    PayBreakdown {
        base_pay: round_currency(base),
        overtime_pay: round_currency(overtime),
        total_pay: round_currency(base + overtime),
        details: PayDetails {
            base: format!(
                "{}h × {} × {}",
                rates.base_hours, rates.rate, rates.base_multiplier
            ),
            overtime: format!(
                "{}h × {} × {}",
                rates.overtime_hours, rates.rate, rates.overtime_multiplier
            ),
        },
    }
}

/// Progress towards the next seniority step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub current_level: u32,
    pub next_level: u32,
    /// Hours accumulated within the current level
    pub progress: f64,
    /// Hours left until the next level
    pub remaining: f64,
    /// 0-100
    pub progress_percent: f64,
    pub is_max_level: bool,
}

pub fn level_info(total_hours: f64, current_step: u32) -> LevelInfo {
    let current_level_hours = f64::from(current_step) * HOURS_PER_LEVEL;
    let next_level_hours = f64::from(current_step + 1) * HOURS_PER_LEVEL;

    let progress = total_hours - current_level_hours;
    let remaining = next_level_hours - total_hours;

    LevelInfo {
        current_level: current_step,
        next_level: current_step + 1,
        progress: progress.max(0.0),
        remaining: remaining.max(0.0),
        progress_percent: (progress / HOURS_PER_LEVEL * 100.0).clamp(0.0, 100.0),
        is_max_level: current_step >= MAX_LEVEL,
    }
}

/// Hourly rate and multipliers applied to a month of shifts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayRates {
    pub hourly_rate: f64,
    pub base_multiplier: f64,
    pub overtime_multiplier: f64,
}

impl Default for PayRates {
    fn default() -> Self {
        Self {
            hourly_rate: DEFAULT_HOURLY_RATE,
            base_multiplier: DEFAULT_BASE_MULTIPLIER,
            overtime_multiplier: DEFAULT_OVERTIME_MULTIPLIER,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlySalary {
    /// Rounded to one decimal
    pub total_hours: f64,
    /// Rounded to one decimal
    pub total_overtime: f64,
    pub base_pay: i64,
    pub overtime_pay: i64,
    pub total_pay: i64,
}

/// Salary for every record in `calendar`.
///
/// Each day contributes at most eight hours at the base multiplier; the
/// record's overtime hours are paid at the overtime multiplier.
pub fn monthly_salary(calendar: &Calendar, rates: &PayRates) -> MonthlySalary {
    let mut total_hours = 0.0;
    let mut total_overtime = 0.0;
    let mut base = 0.0;
    let mut overtime = 0.0;

    for (_, record) in calendar {
        total_hours += record.hours;
        total_overtime += record.overtime_hours;
        base += record.hours.min(BASE_HOURS_PER_DAY) * rates.hourly_rate * rates.base_multiplier;
        overtime += record.overtime_hours * rates.hourly_rate * rates.overtime_multiplier;
    }

    MonthlySalary {
        total_hours: round_one_decimal(total_hours),
        total_overtime: round_one_decimal(total_overtime),
        base_pay: round_currency(base),
        overtime_pay: round_currency(overtime),
        total_pay: round_currency(base + overtime),
    }
}

/// Pay for `hours` worked, doubled on a national holiday.
pub fn holiday_pay(is_national_holiday: bool, hours: f64, rate: f64) -> f64 {
    if is_national_holiday {
        hours * rate * 2.0
    } else {
        hours * rate
    }
}

/// Hourly rate from [`DEFAULT_SALARY_TABLE`] for a seniority step.
pub fn rate_for_step(step: u32) -> Option<u32> {
    DEFAULT_SALARY_TABLE.get(step as usize).copied()
}

fn round_currency(value: f64) -> i64 {
    value.round() as i64
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::WorkRecord;
    use chrono::NaiveDate;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_regular_overtime_splits_at_two_hours() {
        assert!(approx(overtime_pay(100.0, 1.0, DayType::Regular), 134.0));
        assert!(approx(overtime_pay(100.0, 2.0, DayType::Regular), 268.0));
        assert!(approx(overtime_pay(100.0, 3.0, DayType::Regular), 268.0 + 167.0));
        assert!(approx(overtime_pay(100.0, 0.0, DayType::Regular), 0.0));
    }

    #[test]
    fn test_rest_and_holiday_overtime_are_flat() {
        assert!(approx(overtime_pay(100.0, 3.0, DayType::Rest), 501.0));
        assert!(approx(overtime_pay(100.0, 3.0, DayType::Holiday), 600.0));
    }

    #[test]
    fn test_day_type_parses_case_insensitively() {
        assert_eq!("Holiday".parse::<DayType>().unwrap(), DayType::Holiday);
        assert_eq!("rest".parse::<DayType>().unwrap(), DayType::Rest);
        assert!("weekend".parse::<DayType>().is_err());
    }

    #[test]
    fn test_custom_rate_defaults() {
        let pay = custom_rate_pay(&CustomRates::default());
        // 8 * 358 * 1.667 = 4774.288
        assert_eq!(pay.base_pay, 4774);
        assert_eq!(pay.overtime_pay, 0);
        assert_eq!(pay.total_pay, 4774);
        assert_eq!(pay.details.base, "8h × 358 × 1.667");
    }

    #[test]
    fn test_custom_rate_with_overtime() {
        let pay = custom_rate_pay(&CustomRates {
            overtime_hours: 2.0,
            ..CustomRates::default()
        });
        // 2 * 358 * 2.667 = 1909.572
        assert_eq!(pay.overtime_pay, 1910);
        assert_eq!(pay.total_pay, 6684);
    }

    #[test]
    fn test_level_progress_midway() {
        let info = level_info(1560.0, 1);
        assert_eq!(info.current_level, 1);
        assert_eq!(info.next_level, 2);
        assert!(approx(info.progress, 520.0));
        assert!(approx(info.remaining, 520.0));
        assert!(approx(info.progress_percent, 50.0));
        assert!(!info.is_max_level);
    }

    #[test]
    fn test_level_progress_is_clamped() {
        let behind = level_info(100.0, 2);
        assert_eq!(behind.progress, 0.0);
        assert_eq!(behind.progress_percent, 0.0);

        let ahead = level_info(5000.0, 1);
        assert_eq!(ahead.remaining, 0.0);
        assert_eq!(ahead.progress_percent, 100.0);

        assert!(level_info(0.0, 8).is_max_level);
    }

    #[test]
    fn test_monthly_salary_caps_base_hours() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
        let cal: Calendar = [
            (d(1), WorkRecord::with_overtime(10.0, 2.0)),
            (d(2), WorkRecord::new(6.0)),
            (d(3), WorkRecord::rest()),
        ]
        .into_iter()
        .collect();
        let rates = PayRates {
            hourly_rate: 100.0,
            base_multiplier: 1.5,
            overtime_multiplier: 2.0,
        };
        let salary = monthly_salary(&cal, &rates);
        assert_eq!(salary.total_hours, 16.0);
        assert_eq!(salary.total_overtime, 2.0);
        // (8 + 6) * 100 * 1.5
        assert_eq!(salary.base_pay, 2100);
        assert_eq!(salary.overtime_pay, 400);
        assert_eq!(salary.total_pay, 2500);
    }

    #[test]
    fn test_empty_month_pays_nothing() {
        assert_eq!(
            monthly_salary(&Calendar::new(), &PayRates::default()),
            MonthlySalary::default()
        );
    }

    #[test]
    fn test_holiday_pay_doubles() {
        assert!(approx(holiday_pay(true, 8.0, 100.0), 1600.0));
        assert!(approx(holiday_pay(false, 8.0, 100.0), 800.0));
    }

    #[test]
    fn test_salary_table_lookup() {
        assert_eq!(rate_for_step(0), Some(253));
        assert_eq!(rate_for_step(8), Some(358));
        assert_eq!(rate_for_step(9), None);
    }
}
