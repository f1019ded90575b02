//! Syncable state and the last-writer-wins merge.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::storage::ShiftEntry;

/// Characters not allowed in a cloud document id.
const FORBIDDEN_ID_CHARS: [char; 5] = ['.', '#', '$', '[', ']'];

/// Everything that is synced between devices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncSnapshot {
    #[serde(default)]
    pub shifts: BTreeMap<NaiveDate, ShiftEntry>,
    #[serde(default, alias = "config")]
    pub settings: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub holidays: BTreeMap<NaiveDate, String>,
}

impl SyncSnapshot {
    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty() && self.settings.is_empty() && self.holidays.is_empty()
    }
}

/// Merge local state into the cloud copy.
///
/// - shifts: the local entry wins when the cloud has none for that date or
///   the local `updated_at` is strictly newer
/// - settings: local values overwrite cloud values key by key
/// - holidays: union of both, the cloud name wins on conflict
pub fn merge_snapshots(local: &SyncSnapshot, cloud: &SyncSnapshot) -> SyncSnapshot {
    let mut merged = cloud.clone();

    for (date, local_shift) in &local.shifts {
        let keep_cloud = cloud
            .shifts
            .get(date)
            .is_some_and(|c| c.updated_at >= local_shift.updated_at);
        if !keep_cloud {
            merged.shifts.insert(*date, local_shift.clone());
        }
    }

    for (key, value) in &local.settings {
        merged.settings.insert(key.clone(), value.clone());
    }

    for (date, name) in &local.holidays {
        merged
            .holidays
            .entry(*date)
            .or_insert_with(|| name.clone());
    }

    merged
}

/// Turn an e-mail address into a cloud document id.
pub fn sanitize_user_id(email: &str) -> String {
    email
        .trim()
        .chars()
        .map(|c| if FORBIDDEN_ID_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn shift(day: u32, hours: f64, stamp_hour: u32) -> ShiftEntry {
        let mut entry = ShiftEntry::new(d(day), hours);
        entry.updated_at = Utc.with_ymd_and_hms(2024, 3, day, stamp_hour, 0, 0).unwrap();
        entry
    }

    fn snapshot(shifts: Vec<ShiftEntry>) -> SyncSnapshot {
        SyncSnapshot {
            shifts: shifts.into_iter().map(|s| (s.date, s)).collect(),
            ..SyncSnapshot::default()
        }
    }

    #[test]
    fn test_newer_local_shift_wins() {
        let local = snapshot(vec![shift(1, 8.0, 12)]);
        let cloud = snapshot(vec![shift(1, 6.0, 9)]);
        let merged = merge_snapshots(&local, &cloud);
        assert_eq!(merged.shifts[&d(1)].hours, 8.0);
    }

    #[test]
    fn test_newer_cloud_shift_wins() {
        let local = snapshot(vec![shift(1, 8.0, 9)]);
        let cloud = snapshot(vec![shift(1, 6.0, 12)]);
        let merged = merge_snapshots(&local, &cloud);
        assert_eq!(merged.shifts[&d(1)].hours, 6.0);
    }

    #[test]
    fn test_equal_timestamps_keep_cloud() {
        let local = snapshot(vec![shift(1, 8.0, 9)]);
        let cloud = snapshot(vec![shift(1, 6.0, 9)]);
        assert_eq!(merge_snapshots(&local, &cloud).shifts[&d(1)].hours, 6.0);
    }

    #[test]
    fn test_disjoint_shifts_are_unioned() {
        let local = snapshot(vec![shift(1, 8.0, 9)]);
        let cloud = snapshot(vec![shift(2, 6.0, 9)]);
        let merged = merge_snapshots(&local, &cloud);
        assert_eq!(merged.shifts.len(), 2);
    }

    #[test]
    fn test_local_settings_override_cloud() {
        let mut local = SyncSnapshot::default();
        local.settings.insert("rate".into(), serde_json::json!(300));
        let mut cloud = SyncSnapshot::default();
        cloud.settings.insert("rate".into(), serde_json::json!(358));
        cloud.settings.insert("theme".into(), serde_json::json!("dark"));

        let merged = merge_snapshots(&local, &cloud);
        assert_eq!(merged.settings["rate"], serde_json::json!(300));
        assert_eq!(merged.settings["theme"], serde_json::json!("dark"));
    }

    #[test]
    fn test_holidays_union_with_cloud_names() {
        let mut local = SyncSnapshot::default();
        local.holidays.insert(d(1), "Local name".into());
        local.holidays.insert(d(2), "Only local".into());
        let mut cloud = SyncSnapshot::default();
        cloud.holidays.insert(d(1), "Cloud name".into());

        let merged = merge_snapshots(&local, &cloud);
        assert_eq!(merged.holidays[&d(1)], "Cloud name");
        assert_eq!(merged.holidays[&d(2)], "Only local");
    }

    #[test]
    fn test_user_id_replaces_forbidden_chars() {
        assert_eq!(sanitize_user_id("alice.smith@example.com"), "alice_smith@example_com");
        assert_eq!(sanitize_user_id(" a#b$c[d]e "), "a_b_c_d_e");
    }

    #[test]
    fn test_snapshot_json_uses_iso_date_keys() {
        let snap = snapshot(vec![shift(5, 8.0, 9)]);
        let json = serde_json::to_value(&snap).unwrap();
        assert!(json["shifts"].get("2024-03-05").is_some());
        let back: SyncSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let snap: SyncSnapshot = serde_json::from_str("{}").unwrap();
        assert!(snap.is_empty());
    }
}
