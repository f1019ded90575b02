use clap::Subcommand;
use shiftbook_core::calendar::parse_date;
use shiftbook_core::ShiftDb;

use super::print_json;

#[derive(Subcommand)]
pub enum HolidayAction {
    /// Mark a date as a national holiday
    Add {
        /// Date (YYYY-MM-DD)
        date: String,
        /// Holiday name
        name: String,
    },
    /// List holidays
    List,
    /// Remove a holiday
    Delete {
        /// Date (YYYY-MM-DD)
        date: String,
    },
}

pub fn run(action: HolidayAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = ShiftDb::open()?;
    match action {
        HolidayAction::Add { date, name } => {
            let date = parse_date(&date)?;
            db.save_holiday(date, &name)?;
            println!("holiday {date}: {name}");
        }
        HolidayAction::List => {
            print_json(&db.all_holidays()?)?;
        }
        HolidayAction::Delete { date } => {
            let date = parse_date(&date)?;
            if !db.delete_holiday(date)? {
                return Err(format!("no holiday on {date}").into());
            }
            println!("deleted {date}");
        }
    }
    Ok(())
}
