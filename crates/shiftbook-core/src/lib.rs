//! # Shiftbook Core Library
//!
//! This library provides the core logic for Shiftbook, a shift-work
//! calendar with a fatigue advisor. It follows a CLI-first layout: every
//! operation is available through the standalone `shiftbook` binary, which
//! is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Advisor**: pure functions that score fatigue from a work calendar and
//!   turn the score into suggestions and rest-day recommendations
//! - **Payroll**: overtime, step-based hourly rates and monthly salary math
//! - **Storage**: SQLite-backed shifts, settings and holidays plus a TOML
//!   configuration file
//! - **Sync**: last-writer-wins synchronization with a per-user cloud document
//!
//! ## Key Components
//!
//! - [`Calendar`]: date-ordered map of worked hours, the advisor's only input
//! - [`full_analysis`]: pattern, suggestions and summary in one call
//! - [`ShiftDb`]: local persistence
//! - [`Config`]: application configuration management
//! - [`CloudClient`]: cloud document store client

pub mod advisor;
pub mod calendar;
pub mod error;
pub mod payroll;
pub mod storage;
pub mod sync;

pub use advisor::{
    analyze_work_pattern, compute_fatigue_score, full_analysis, generate_suggestions,
    suggest_rest_days, AnalysisSummary, FullAnalysis, RestDaySuggestion, RestPriority,
    Suggestion, SuggestionLevel, SummaryStatus, WorkPattern,
};
pub use calendar::{Calendar, WorkRecord};
pub use error::{ConfigError, CoreError, DatabaseError, SyncError, ValidationError};
pub use payroll::{DayType, LevelInfo, MonthlySalary, PayBreakdown, PayRates};
pub use storage::{Config, ShiftDb, ShiftEntry};
pub use sync::{CloudClient, SyncOutcome, SyncSnapshot, SyncStatus};
