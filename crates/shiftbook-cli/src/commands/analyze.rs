use clap::Subcommand;
use shiftbook_core::calendar::parse_month;
use shiftbook_core::{
    analyze_work_pattern, full_analysis, generate_suggestions, suggest_rest_days, Calendar,
    ShiftDb,
};

use super::print_json;

#[derive(Subcommand)]
pub enum AnalyzeAction {
    /// Work pattern and fatigue score
    Pattern {
        /// Only this month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
    },
    /// Scheduling suggestions
    Suggest {
        /// Only this month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
    },
    /// Recommended rest days for a month
    RestDays {
        #[arg(long)]
        year: i32,
        /// Month number (1-12)
        #[arg(long)]
        month: u32,
    },
    /// Pattern, suggestions and summary
    Full {
        /// Only this month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
    },
}

fn load_calendar(db: &ShiftDb, month: Option<&str>) -> Result<Calendar, Box<dyn std::error::Error>> {
    match month {
        Some(month) => {
            let (year, month) = parse_month(month)?;
            Ok(db.calendar_for_month(year, month)?)
        }
        None => Ok(db.calendar()?),
    }
}

pub fn run(action: AnalyzeAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = ShiftDb::open()?;
    match action {
        AnalyzeAction::Pattern { month } => {
            let calendar = load_calendar(&db, month.as_deref())?;
            print_json(&analyze_work_pattern(&calendar))?;
        }
        AnalyzeAction::Suggest { month } => {
            let calendar = load_calendar(&db, month.as_deref())?;
            let pattern = analyze_work_pattern(&calendar);
            print_json(&generate_suggestions(&pattern))?;
        }
        AnalyzeAction::RestDays { year, month } => {
            let calendar = db.calendar()?;
            print_json(&suggest_rest_days(&calendar, year, month)?)?;
        }
        AnalyzeAction::Full { month } => {
            let calendar = load_calendar(&db, month.as_deref())?;
            print_json(&full_analysis(&calendar))?;
        }
    }
    Ok(())
}
