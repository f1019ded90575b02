use clap::Subcommand;
use serde::Serialize;
use shiftbook_core::calendar::{parse_date, parse_month};
use shiftbook_core::payroll::{
    custom_rate_pay, holiday_pay, level_info, monthly_salary, overtime_pay, rate_for_step,
    CustomRates, DayType, LevelInfo,
};
use shiftbook_core::{Config, ShiftDb};

use super::print_json;

#[derive(Subcommand)]
pub enum PayAction {
    /// Salary for one month of stored shifts
    Monthly {
        /// Month (YYYY-MM)
        #[arg(long)]
        month: String,
    },
    /// Overtime pay for a number of hours
    Overtime {
        /// Overtime hours
        hours: f64,
        /// regular, rest or holiday
        #[arg(long, default_value_t = DayType::Regular)]
        day_type: DayType,
        /// Hourly rate; defaults to pay.hourly_rate
        #[arg(long)]
        rate: Option<f64>,
    },
    /// Pay for one shift with explicit multipliers
    Custom {
        #[arg(long, default_value_t = 0.0)]
        overtime_hours: f64,
        /// Defaults to pay.base_hours
        #[arg(long)]
        base_hours: Option<f64>,
        /// Defaults to pay.hourly_rate
        #[arg(long)]
        rate: Option<f64>,
        /// Defaults to pay.base_multiplier
        #[arg(long)]
        base_multiplier: Option<f64>,
        /// Defaults to pay.overtime_multiplier
        #[arg(long)]
        overtime_multiplier: Option<f64>,
    },
    /// Progress towards the next seniority step
    Level {
        /// Total hours worked; defaults to every stored shift
        #[arg(long)]
        total_hours: Option<f64>,
        /// Current step; defaults to pay.current_step
        #[arg(long)]
        step: Option<u32>,
    },
    /// Pay for hours worked on a date, doubled on national holidays
    Holiday {
        /// Date (YYYY-MM-DD)
        date: String,
        hours: f64,
        /// Defaults to pay.hourly_rate
        #[arg(long)]
        rate: Option<f64>,
    },
}

#[derive(Serialize)]
struct AmountOutput {
    pay: f64,
}

/// Level progress with the table rates of the current and next step.
#[derive(Serialize)]
struct LevelOutput {
    #[serde(flatten)]
    info: LevelInfo,
    current_rate: Option<u32>,
    next_rate: Option<u32>,
}

#[derive(Serialize)]
struct HolidayPayOutput {
    date: String,
    is_holiday: bool,
    pay: f64,
}

pub fn run(action: PayAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    match action {
        PayAction::Monthly { month } => {
            let (year, month) = parse_month(&month)?;
            let db = ShiftDb::open()?;
            let calendar = db.calendar_for_month(year, month)?;
            print_json(&monthly_salary(&calendar, &config.pay.rates()))?;
        }
        PayAction::Overtime {
            hours,
            day_type,
            rate,
        } => {
            let rate = rate.unwrap_or(config.pay.hourly_rate);
            print_json(&AmountOutput {
                pay: overtime_pay(rate, hours, day_type),
            })?;
        }
        PayAction::Custom {
            overtime_hours,
            base_hours,
            rate,
            base_multiplier,
            overtime_multiplier,
        } => {
            let rates = CustomRates {
                rate: rate.unwrap_or(config.pay.hourly_rate),
                base_hours: base_hours.unwrap_or(config.pay.base_hours),
                overtime_hours,
                base_multiplier: base_multiplier.unwrap_or(config.pay.base_multiplier),
                overtime_multiplier: overtime_multiplier.unwrap_or(config.pay.overtime_multiplier),
            };
            print_json(&custom_rate_pay(&rates))?;
        }
        PayAction::Level { total_hours, step } => {
            let total_hours = match total_hours {
                Some(hours) => hours,
                None => ShiftDb::open()?.calendar()?.iter().map(|(_, r)| r.hours).sum(),
            };
            let step = step.unwrap_or(config.pay.current_step);
            let info = level_info(total_hours, step);
            print_json(&LevelOutput {
                current_rate: rate_for_step(info.current_level),
                next_rate: rate_for_step(info.next_level),
                info,
            })?;
        }
        PayAction::Holiday { date, hours, rate } => {
            let date = parse_date(&date)?;
            let is_holiday = ShiftDb::open()?.is_holiday(date)?;
            let rate = rate.unwrap_or(config.pay.hourly_rate);
            print_json(&HolidayPayOutput {
                date: date.to_string(),
                is_holiday,
                pay: holiday_pay(is_holiday, hours, rate),
            })?;
        }
    }
    Ok(())
}
