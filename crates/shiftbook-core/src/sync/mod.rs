//! Cloud synchronization.
//!
//! Shifts, settings and holidays are exchanged with a per-user JSON document
//! in a cloud store. Merging is last-writer-wins per shift date; there is no
//! conflict resolution beyond that. Pay settings ride along in the
//! snapshot's `settings` map.

mod client;
mod settings;
mod snapshot;
mod status;
mod types;

pub use client::CloudClient;
pub use settings::{apply_settings, apply_snapshot, config_settings, local_snapshot};
pub use snapshot::{merge_snapshots, sanitize_user_id, SyncSnapshot};
pub use status::{record_sync, sync_status, LAST_SYNC_KEY};
pub use types::{SyncError, SyncOutcome, SyncStatus};
