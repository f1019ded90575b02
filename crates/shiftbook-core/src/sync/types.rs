//! Core types for cloud synchronization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::snapshot::SyncSnapshot;

/// Result of a full download-merge-upload round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncOutcome {
    /// State now stored both locally and in the cloud.
    pub snapshot: SyncSnapshot,
    /// True when the cloud had no document and local data was uploaded as-is.
    pub cloud_was_empty: bool,
    pub synced_at: DateTime<Utc>,
}

/// Current sync status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncStatus {
    /// Whether a user id is configured.
    pub logged_in: bool,
    pub user_id: Option<String>,
    /// Last successful sync timestamp.
    pub last_sync_at: Option<DateTime<Utc>>,
}

/// Sync error types.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Sync not configured: {0}")]
    NotConfigured(String),

    #[error("Invalid sync endpoint '{endpoint}': {message}")]
    InvalidEndpoint { endpoint: String, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Cloud store returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_status_default() {
        let status = SyncStatus::default();
        assert!(!status.logged_in);
        assert!(status.user_id.is_none());
        assert!(status.last_sync_at.is_none());
    }

    #[test]
    fn test_http_error_message() {
        let err = SyncError::Http {
            status: 503,
            body: "unavailable".into(),
        };
        assert_eq!(err.to_string(), "Cloud store returned HTTP 503: unavailable");
    }
}
