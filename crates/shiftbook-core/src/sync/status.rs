//! Sync bookkeeping stored alongside local data.

use chrono::{DateTime, Utc};

use super::types::SyncStatus;
use crate::error::Result;
use crate::storage::{ShiftDb, SyncConfig};

/// kv key holding the RFC 3339 time of the last successful sync.
pub const LAST_SYNC_KEY: &str = "last_sync";

/// Remember that a sync finished at `at`.
///
/// # Errors
/// Returns an error if the kv write fails.
pub fn record_sync(db: &ShiftDb, at: DateTime<Utc>) -> Result<()> {
    db.kv_set(LAST_SYNC_KEY, &at.to_rfc3339())
}

/// Build the current [`SyncStatus`].
///
/// # Errors
/// Returns an error if the kv store cannot be read.
pub fn sync_status(config: &SyncConfig, db: &ShiftDb) -> Result<SyncStatus> {
    let last_sync_at = db.kv_get(LAST_SYNC_KEY)?.and_then(|raw| {
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| tracing::warn!("ignoring unreadable {LAST_SYNC_KEY} '{raw}': {e}"))
            .ok()
    });

    Ok(SyncStatus {
        logged_in: config.user_id.is_some(),
        user_id: config.user_id.clone(),
        last_sync_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_before_first_sync() {
        let db = ShiftDb::open_memory().unwrap();
        let status = sync_status(&SyncConfig::default(), &db).unwrap();
        assert!(!status.logged_in);
        assert!(status.last_sync_at.is_none());
    }

    #[test]
    fn test_status_after_sync() {
        let db = ShiftDb::open_memory().unwrap();
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        record_sync(&db, at).unwrap();

        let cfg = SyncConfig {
            user_id: Some("alice".into()),
            ..SyncConfig::default()
        };
        let status = sync_status(&cfg, &db).unwrap();
        assert!(status.logged_in);
        assert_eq!(status.user_id.as_deref(), Some("alice"));
        assert_eq!(status.last_sync_at, Some(at));
    }

    #[test]
    fn test_unreadable_timestamp_is_ignored() {
        let db = ShiftDb::open_memory().unwrap();
        db.kv_set(LAST_SYNC_KEY, "yesterday").unwrap();
        let status = sync_status(&SyncConfig::default(), &db).unwrap();
        assert!(status.last_sync_at.is_none());
    }
}
