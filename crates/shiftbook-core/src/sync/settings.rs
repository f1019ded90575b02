//! Pay settings carried in the snapshot's `settings` map.
//!
//! Only `[pay]` values travel between devices; `[sync]` holds per-device
//! credentials and stays local. Documents written by the mobile app use
//! camelCase names, which are accepted on the way in.

use std::collections::BTreeMap;

use serde_json::Value;

use super::snapshot::SyncSnapshot;
use crate::error::Result;
use crate::storage::{Config, ShiftDb};

/// Synced config keys and the camelCase name older documents use for each.
const SYNCED_KEYS: [(&str, &str); 5] = [
    ("pay.hourly_rate", "hourlyRate"),
    ("pay.base_hours", "baseHours"),
    ("pay.base_multiplier", "baseMultiplier"),
    ("pay.overtime_multiplier", "overtimeMultiplier"),
    ("pay.current_step", "currentStep"),
];

/// Synced config values keyed by their dot path.
pub fn config_settings(config: &Config) -> BTreeMap<String, Value> {
    SYNCED_KEYS
        .iter()
        .filter_map(|(key, _)| Some((key.to_string(), config.get_value(key)?)))
        .collect()
}

/// Apply synced values from `settings` to `config` in memory.
///
/// The dot-path key wins over its camelCase alias. Values that do not fit
/// the field are skipped with a warning. Returns the keys that changed.
pub fn apply_settings(config: &mut Config, settings: &BTreeMap<String, Value>) -> Vec<String> {
    let mut changed = Vec::new();

    for (key, alias) in SYNCED_KEYS {
        let Some(value) = settings.get(key).or_else(|| settings.get(alias)) else {
            continue;
        };
        if config.get_value(key).as_ref() == Some(value) {
            continue;
        }

        let raw = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        match config.apply(key, &raw) {
            Ok(()) => changed.push(key.to_string()),
            Err(e) => tracing::warn!("ignoring synced setting {key}: {e}"),
        }
    }

    changed
}

/// Local state to send: stored shifts, holidays and settings, with the
/// current pay config laid over the stored settings.
///
/// # Errors
/// Returns an error if the database cannot be read.
pub fn local_snapshot(db: &ShiftDb, config: &Config) -> Result<SyncSnapshot> {
    let mut snapshot = db.export_snapshot()?;
    snapshot.settings.extend(config_settings(config));
    Ok(snapshot)
}

/// Store a snapshot received from the cloud and apply its pay settings to
/// `config`. The caller saves the config.
///
/// # Errors
/// Returns an error if the database import fails.
pub fn apply_snapshot(
    db: &ShiftDb,
    config: &mut Config,
    snapshot: &SyncSnapshot,
) -> Result<Vec<String>> {
    db.import_snapshot(snapshot)?;
    let changed = apply_settings(config, &snapshot.settings);
    if !changed.is_empty() {
        tracing::debug!(?changed, "applied synced settings");
    }
    Ok(changed)
}
