use clap::Subcommand;
use shiftbook_core::calendar::{parse_date, parse_month};
use shiftbook_core::{ShiftDb, ShiftEntry};

use super::print_json;

#[derive(Subcommand)]
pub enum ShiftAction {
    /// Record the shift for a date, replacing any existing one
    Set {
        /// Date (YYYY-MM-DD)
        date: String,
        /// Hours worked; 0 marks a rest day
        hours: f64,
        /// Overtime hours
        #[arg(long, default_value_t = 0.0)]
        overtime: f64,
        /// Shift code (e.g. "A", "N")
        #[arg(long = "type", default_value = "")]
        shift_type: String,
        /// Display name
        #[arg(long, default_value = "")]
        name: String,
        /// Free-form note
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Show the shift for a date
    Get {
        /// Date (YYYY-MM-DD)
        date: String,
    },
    /// List shifts
    List {
        /// Only this month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
    },
    /// Delete the shift for a date
    Delete {
        /// Date (YYYY-MM-DD)
        date: String,
    },
}

pub fn run(action: ShiftAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = ShiftDb::open()?;
    match action {
        ShiftAction::Set {
            date,
            hours,
            overtime,
            shift_type,
            name,
            description,
        } => {
            let mut entry = ShiftEntry::new(parse_date(&date)?, hours);
            entry.overtime_hours = overtime;
            entry.shift_type = shift_type;
            entry.name = name;
            entry.description = description;
            let stored = db.save_shift(&entry)?;
            print_json(&stored)?;
        }
        ShiftAction::Get { date } => {
            let date = parse_date(&date)?;
            match db.get_shift(date)? {
                Some(entry) => print_json(&entry)?,
                None => return Err(format!("no shift recorded for {date}").into()),
            }
        }
        ShiftAction::List { month } => {
            let shifts = match month {
                Some(month) => {
                    let (year, month) = parse_month(&month)?;
                    db.shifts_in_month(year, month)?
                }
                None => db.all_shifts()?,
            };
            print_json(&shifts)?;
        }
        ShiftAction::Delete { date } => {
            let date = parse_date(&date)?;
            if !db.delete_shift(date)? {
                return Err(format!("no shift recorded for {date}").into());
            }
            println!("deleted {date}");
        }
    }
    Ok(())
}
