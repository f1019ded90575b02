//! SQLite storage for shifts, settings and holidays.
//!
//! Provides persistent storage for:
//! - One shift entry per calendar date
//! - User settings (JSON values, synced to the cloud)
//! - Named holidays
//! - Key-value store for internal state such as the last sync time

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use super::data_dir;
use super::migrations;
use crate::calendar::{date_key, Calendar, WorkRecord};
use crate::error::{CoreError, DatabaseError, Result, ValidationError};
use crate::sync::SyncSnapshot;

/// A stored shift for one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftEntry {
    pub date: NaiveDate,
    /// Short shift code, e.g. "A" or "N"
    #[serde(default, alias = "type")]
    pub shift_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hours: f64,
    #[serde(default, alias = "overtime")]
    pub overtime_hours: f64,
    #[serde(default, alias = "desc")]
    pub description: String,
    pub updated_at: DateTime<Utc>,
}

impl ShiftEntry {
    /// A shift of `hours` on `date`, stamped now.
    pub fn new(date: NaiveDate, hours: f64) -> Self {
        Self {
            date,
            shift_type: String::new(),
            name: String::new(),
            hours,
            overtime_hours: 0.0,
            description: String::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn work_record(&self) -> WorkRecord {
        WorkRecord::with_overtime(self.hours, self.overtime_hours)
    }
}

/// SQLite database for shift data.
pub struct ShiftDb {
    conn: Connection,
}

impl ShiftDb {
    /// Open the database at `~/.config/shiftbook/shiftbook.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("shiftbook.db");
        Self::open_at(&path)
    }

    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "opening shift database");
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Insert or replace the shift for `entry.date`.
    ///
    /// Negative hours are stored as zero. Returns the entry as stored.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub fn save_shift(&self, entry: &ShiftEntry) -> Result<ShiftEntry> {
        let mut stored = entry.clone();
        stored.hours = sanitize_hours(entry.hours);
        stored.overtime_hours = sanitize_hours(entry.overtime_hours);

        self.conn.execute(
            "INSERT OR REPLACE INTO shifts
                (date, shift_type, name, hours, overtime_hours, description, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                date_key(stored.date),
                stored.shift_type,
                stored.name,
                stored.hours,
                stored.overtime_hours,
                stored.description,
                stored.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(stored)
    }

    /// # Errors
    /// Returns an error if the query fails or the row cannot be decoded.
    pub fn get_shift(&self, date: NaiveDate) -> Result<Option<ShiftEntry>> {
        let row = self
            .conn
            .query_row(
                "SELECT date, shift_type, name, hours, overtime_hours, description, updated_at
                 FROM shifts WHERE date = ?1",
                params![date_key(date)],
                ShiftRow::from_row,
            )
            .optional()?;
        row.map(ShiftRow::into_entry).transpose()
    }

    /// All shifts in ascending date order.
    ///
    /// # Errors
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn all_shifts(&self) -> Result<Vec<ShiftEntry>> {
        self.query_shifts(
            "SELECT date, shift_type, name, hours, overtime_hours, description, updated_at
             FROM shifts ORDER BY date",
            [],
        )
    }

    /// Shifts within `(year, month)`, in date order.
    ///
    /// # Errors
    /// Returns a validation error for a month outside `1..=12`.
    pub fn shifts_in_month(&self, year: i32, month: u32) -> Result<Vec<ShiftEntry>> {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::invalid("month", format!("{month} is not in 1..=12")).into());
        }
        let prefix = format!("{year:04}-{month:02}-%");
        self.query_shifts(
            "SELECT date, shift_type, name, hours, overtime_hours, description, updated_at
             FROM shifts WHERE date LIKE ?1 ORDER BY date",
            params![prefix],
        )
    }

    fn query_shifts<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<ShiftEntry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, ShiftRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(ShiftRow::into_entry).collect()
    }

    /// Delete the shift for `date`. Returns whether a row was removed.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub fn delete_shift(&self, date: NaiveDate) -> Result<bool> {
        let n = self
            .conn
            .execute("DELETE FROM shifts WHERE date = ?1", params![date_key(date)])?;
        Ok(n > 0)
    }

    /// Every stored shift as a work calendar.
    ///
    /// # Errors
    /// Returns an error if the shifts cannot be read.
    pub fn calendar(&self) -> Result<Calendar> {
        Ok(self
            .all_shifts()?
            .iter()
            .map(|s| (s.date, s.work_record()))
            .collect())
    }

    /// Work calendar for `(year, month)`.
    ///
    /// # Errors
    /// Returns an error if the shifts cannot be read or the month is invalid.
    pub fn calendar_for_month(&self, year: i32, month: u32) -> Result<Calendar> {
        Ok(self
            .shifts_in_month(year, month)?
            .iter()
            .map(|s| (s.date, s.work_record()))
            .collect())
    }

    /// Store a setting value.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub fn set_setting(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value.to_string(), Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// # Errors
    /// Returns an error if the query fails or the stored value is not JSON.
    pub fn get_setting(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        raw.map(|s| decode_setting(&s)).transpose()
    }

    /// # Errors
    /// Returns an error if the query fails or a stored value is not JSON.
    pub fn all_settings(&self) -> Result<BTreeMap<String, serde_json::Value>> {
        let mut stmt = self.conn.prepare("SELECT key, value FROM settings")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter()
            .map(|(k, v)| decode_setting(&v).map(|v| (k, v)))
            .collect()
    }

    /// # Errors
    /// Returns an error if the write fails.
    pub fn save_holiday(&self, date: NaiveDate, name: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO holidays (date, name) VALUES (?1, ?2)",
            params![date_key(date), name],
        )?;
        Ok(())
    }

    /// # Errors
    /// Returns an error if the delete fails.
    pub fn delete_holiday(&self, date: NaiveDate) -> Result<bool> {
        let n = self
            .conn
            .execute("DELETE FROM holidays WHERE date = ?1", params![date_key(date)])?;
        Ok(n > 0)
    }

    /// # Errors
    /// Returns an error if the query fails or a stored date is malformed.
    pub fn all_holidays(&self) -> Result<BTreeMap<NaiveDate, String>> {
        let mut stmt = self.conn.prepare("SELECT date, name FROM holidays ORDER BY date")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter()
            .map(|(d, name)| parse_stored_date("holidays", &d).map(|d| (d, name)))
            .collect()
    }

    /// Whether `date` is a recorded holiday.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn is_holiday(&self, date: NaiveDate) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM holidays WHERE date = ?1",
            params![date_key(date)],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Remove all shifts, settings and holidays.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub fn clear_all(&self) -> Result<()> {
        self.conn.execute_batch(
            "DELETE FROM shifts;
             DELETE FROM settings;
             DELETE FROM holidays;",
        )?;
        Ok(())
    }

    /// Everything that is synced, in one snapshot.
    ///
    /// # Errors
    /// Returns an error if any table cannot be read.
    pub fn export_snapshot(&self) -> Result<SyncSnapshot> {
        Ok(SyncSnapshot {
            shifts: self
                .all_shifts()?
                .into_iter()
                .map(|s| (s.date, s))
                .collect(),
            settings: self.all_settings()?,
            holidays: self.all_holidays()?,
        })
    }

    /// Replace shifts, settings and holidays with the snapshot's contents.
    ///
    /// Runs in a single transaction; on error nothing changes.
    ///
    /// # Errors
    /// Returns an error if any write fails.
    pub fn import_snapshot(&self, snapshot: &SyncSnapshot) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(
            "DELETE FROM shifts;
             DELETE FROM settings;
             DELETE FROM holidays;",
        )?;

        let now = Utc::now().to_rfc3339();
        for entry in snapshot.shifts.values() {
            tx.execute(
                "INSERT INTO shifts
                    (date, shift_type, name, hours, overtime_hours, description, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    date_key(entry.date),
                    entry.shift_type,
                    entry.name,
                    sanitize_hours(entry.hours),
                    sanitize_hours(entry.overtime_hours),
                    entry.description,
                    entry.updated_at.to_rfc3339(),
                ],
            )?;
        }
        for (key, value) in &snapshot.settings {
            tx.execute(
                "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)",
                params![key, value.to_string(), now],
            )?;
        }
        for (date, name) in &snapshot.holidays {
            tx.execute(
                "INSERT INTO holidays (date, name) VALUES (?1, ?2)",
                params![date_key(*date), name],
            )?;
        }

        tx.commit()?;
        tracing::debug!(
            shifts = snapshot.shifts.len(),
            settings = snapshot.settings.len(),
            holidays = snapshot.holidays.len(),
            "imported snapshot"
        );
        Ok(())
    }

    /// Get a value from the kv store.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?)
    }

    /// Set a value in the kv store.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Raw column values of a `shifts` row.
struct ShiftRow {
    date: String,
    shift_type: String,
    name: String,
    hours: f64,
    overtime_hours: f64,
    description: String,
    updated_at: String,
}

impl ShiftRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            date: row.get(0)?,
            shift_type: row.get(1)?,
            name: row.get(2)?,
            hours: row.get(3)?,
            overtime_hours: row.get(4)?,
            description: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    fn into_entry(self) -> Result<ShiftEntry> {
        let date = parse_stored_date("shifts", &self.date)?;
        let updated_at = DateTime::parse_from_rfc3339(&self.updated_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| DatabaseError::CorruptValue {
                table: "shifts",
                column: "updated_at",
                message: format!("'{}': {e}", self.updated_at),
            })?;

        Ok(ShiftEntry {
            date,
            shift_type: self.shift_type,
            name: self.name,
            hours: self.hours,
            overtime_hours: self.overtime_hours,
            description: self.description,
            updated_at,
        })
    }
}

fn parse_stored_date(table: &'static str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
        CoreError::from(DatabaseError::CorruptValue {
            table,
            column: "date",
            message: format!("'{raw}': {e}"),
        })
    })
}

fn decode_setting(raw: &str) -> Result<serde_json::Value> {
    serde_json::from_str(raw).map_err(|e| {
        CoreError::from(DatabaseError::CorruptValue {
            table: "settings",
            column: "value",
            message: e.to_string(),
        })
    })
}

fn sanitize_hours(hours: f64) -> f64 {
    if hours.is_finite() && hours > 0.0 {
        hours
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    #[test]
    fn test_save_and_get_shift() {
        let db = ShiftDb::open_memory().unwrap();
        let mut entry = ShiftEntry::new(d(1, 2), 8.5);
        entry.shift_type = "A".into();
        entry.overtime_hours = 0.5;
        db.save_shift(&entry).unwrap();

        let stored = db.get_shift(d(1, 2)).unwrap().unwrap();
        assert_eq!(stored.shift_type, "A");
        assert_eq!(stored.hours, 8.5);
        assert_eq!(stored.overtime_hours, 0.5);
        assert!(db.get_shift(d(1, 3)).unwrap().is_none());
    }

    #[test]
    fn test_save_replaces_existing_date() {
        let db = ShiftDb::open_memory().unwrap();
        db.save_shift(&ShiftEntry::new(d(1, 2), 8.0)).unwrap();
        db.save_shift(&ShiftEntry::new(d(1, 2), 4.0)).unwrap();
        assert_eq!(db.all_shifts().unwrap().len(), 1);
        assert_eq!(db.get_shift(d(1, 2)).unwrap().unwrap().hours, 4.0);
    }

    #[test]
    fn test_negative_hours_are_stored_as_zero() {
        let db = ShiftDb::open_memory().unwrap();
        let stored = db.save_shift(&ShiftEntry::new(d(1, 2), -3.0)).unwrap();
        assert_eq!(stored.hours, 0.0);
        assert_eq!(db.get_shift(d(1, 2)).unwrap().unwrap().hours, 0.0);
    }

    #[test]
    fn test_updated_at_round_trips() {
        let db = ShiftDb::open_memory().unwrap();
        let mut entry = ShiftEntry::new(d(1, 2), 8.0);
        entry.updated_at = Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap();
        db.save_shift(&entry).unwrap();
        assert_eq!(db.get_shift(d(1, 2)).unwrap().unwrap(), entry);
    }

    #[test]
    fn test_month_queries_filter_by_month() {
        let db = ShiftDb::open_memory().unwrap();
        for (m, day) in [(1, 31), (2, 1), (2, 29), (3, 1)] {
            db.save_shift(&ShiftEntry::new(d(m, day), 8.0)).unwrap();
        }
        let feb = db.shifts_in_month(2024, 2).unwrap();
        assert_eq!(
            feb.iter().map(|s| s.date).collect::<Vec<_>>(),
            vec![d(2, 1), d(2, 29)]
        );
        assert_eq!(db.calendar_for_month(2024, 2).unwrap().len(), 2);
        assert_eq!(db.calendar().unwrap().len(), 4);
        assert!(db.shifts_in_month(2024, 13).is_err());
    }

    #[test]
    fn test_delete_shift_reports_removal() {
        let db = ShiftDb::open_memory().unwrap();
        db.save_shift(&ShiftEntry::new(d(1, 2), 8.0)).unwrap();
        assert!(db.delete_shift(d(1, 2)).unwrap());
        assert!(!db.delete_shift(d(1, 2)).unwrap());
    }

    #[test]
    fn test_settings_store_json_values() {
        let db = ShiftDb::open_memory().unwrap();
        db.set_setting("theme", &serde_json::json!("dark")).unwrap();
        db.set_setting("step", &serde_json::json!(3)).unwrap();
        assert_eq!(db.get_setting("theme").unwrap(), Some(serde_json::json!("dark")));
        assert!(db.get_setting("missing").unwrap().is_none());
        assert_eq!(db.all_settings().unwrap().len(), 2);
    }

    #[test]
    fn test_holidays_roundtrip() {
        let db = ShiftDb::open_memory().unwrap();
        db.save_holiday(d(1, 1), "New Year").unwrap();
        db.save_holiday(d(10, 10), "National Day").unwrap();
        let holidays = db.all_holidays().unwrap();
        assert_eq!(holidays.get(&d(1, 1)).map(String::as_str), Some("New Year"));
        assert!(db.is_holiday(d(10, 10)).unwrap());
        assert!(db.delete_holiday(d(10, 10)).unwrap());
        assert!(!db.is_holiday(d(10, 10)).unwrap());
    }

    #[test]
    fn test_clear_all_empties_user_tables() {
        let db = ShiftDb::open_memory().unwrap();
        db.save_shift(&ShiftEntry::new(d(1, 2), 8.0)).unwrap();
        db.set_setting("k", &serde_json::json!(1)).unwrap();
        db.save_holiday(d(1, 1), "New Year").unwrap();
        db.kv_set("last_sync", "x").unwrap();

        db.clear_all().unwrap();

        assert!(db.all_shifts().unwrap().is_empty());
        assert!(db.all_settings().unwrap().is_empty());
        assert!(db.all_holidays().unwrap().is_empty());
        assert_eq!(db.kv_get("last_sync").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_snapshot_export_import() {
        let source = ShiftDb::open_memory().unwrap();
        source.save_shift(&ShiftEntry::new(d(1, 2), 8.0)).unwrap();
        source.set_setting("rate", &serde_json::json!(358)).unwrap();
        source.save_holiday(d(1, 1), "New Year").unwrap();
        let snapshot = source.export_snapshot().unwrap();

        let target = ShiftDb::open_memory().unwrap();
        target.save_shift(&ShiftEntry::new(d(5, 5), 6.0)).unwrap();
        target.import_snapshot(&snapshot).unwrap();

        assert_eq!(target.export_snapshot().unwrap(), snapshot);
        assert!(target.get_shift(d(5, 5)).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_date_is_reported() {
        let db = ShiftDb::open_memory().unwrap();
        db.conn
            .execute(
                "INSERT INTO shifts (date, updated_at) VALUES ('not-a-date', '2024-01-01T00:00:00Z')",
                [],
            )
            .unwrap();
        let err = db.all_shifts().unwrap_err();
        assert!(matches!(
            err,
            CoreError::Database(DatabaseError::CorruptValue { table: "shifts", .. })
        ));
    }

    #[test]
    fn test_on_disk_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shiftbook.db");
        {
            let db = ShiftDb::open_at(&path).unwrap();
            db.save_shift(&ShiftEntry::new(d(1, 2), 7.5)).unwrap();
        }
        let db = ShiftDb::open_at(&path).unwrap();
        assert_eq!(db.get_shift(d(1, 2)).unwrap().unwrap().hours, 7.5);
    }

    #[test]
    fn test_kv_store() {
        let db = ShiftDb::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
    }
}
