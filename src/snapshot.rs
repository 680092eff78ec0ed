//! Launch-time ordering and artifact persistence
//!
//! A snapshot is a region's instance list sorted by launch time, rendered
//! as a JSON array and written to a per-region file derived from the output
//! template.

use crate::collector::InstanceRecord;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Placeholder in the output template replaced with the region name
pub const REGION_PLACEHOLDER: &str = "<region>";

/// Resolve the artifact path for a region from the configured template.
pub fn artifact_path(template: &str, region: &str) -> PathBuf {
    PathBuf::from(template.replace(REGION_PLACEHOLDER, region))
}

/// Sort instances by launch time, oldest first.
///
/// The sort is stable, so instances sharing a launch timestamp keep the
/// order in which the API returned them.
pub fn sort_by_launch_time(records: &mut [InstanceRecord]) {
    records.sort_by_key(|r| r.launch_time);
}

/// Render a record list as a JSON array string.
///
/// Records are serialized one at a time; a record that fails to serialize
/// is logged and skipped rather than failing the whole snapshot. An empty
/// list renders as `[]`.
pub fn render_snapshot(records: &[InstanceRecord]) -> String {
    let mut values = Vec::with_capacity(records.len());
    for record in records {
        match serde_json::to_value(record) {
            Ok(value) => values.push(value),
            Err(e) => {
                warn!(
                    instance_id = %record.instance_id,
                    error = %e,
                    "Skipping unserializable instance record"
                );
            }
        }
    }
    serde_json::Value::Array(values).to_string()
}

/// Write a region's snapshot to disk, replacing any previous artifact.
pub fn write_snapshot(path: &Path, records: &[InstanceRecord]) -> Result<()> {
    let rendered = render_snapshot(records);
    std::fs::write(path, rendered)
        .with_context(|| format!("Failed to write snapshot {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn record_at(id: &str, hour: u32) -> InstanceRecord {
        InstanceRecord {
            instance_id: id.to_string(),
            image_id: "ami-12345678".to_string(),
            instance_type: "t3.micro".to_string(),
            state: "running".to_string(),
            monitoring_state: "disabled".to_string(),
            launch_time: Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap(),
            availability_zone: None,
            private_ip: None,
            public_ip: None,
            tags: BTreeMap::new(),
        }
    }

    #[test]
    fn artifact_path_substitutes_region() {
        assert_eq!(
            artifact_path("<region>.json", "us-east-1"),
            PathBuf::from("us-east-1.json")
        );
        assert_eq!(
            artifact_path("out/<region>/instances.json", "eu-west-1"),
            PathBuf::from("out/eu-west-1/instances.json")
        );
    }

    #[test]
    fn artifact_path_without_placeholder_is_shared() {
        assert_eq!(
            artifact_path("inventory.json", "us-east-1"),
            PathBuf::from("inventory.json")
        );
    }

    #[test]
    fn sorts_oldest_first() {
        let mut records = vec![record_at("i-new", 12), record_at("i-old", 3), record_at("i-mid", 8)];
        sort_by_launch_time(&mut records);

        let ids: Vec<_> = records.iter().map(|r| r.instance_id.as_str()).collect();
        assert_eq!(ids, vec!["i-old", "i-mid", "i-new"]);
    }

    #[test]
    fn equal_launch_times_keep_arrival_order() {
        let mut records = vec![
            record_at("i-first", 5),
            record_at("i-second", 5),
            record_at("i-third", 5),
        ];
        sort_by_launch_time(&mut records);

        let ids: Vec<_> = records.iter().map(|r| r.instance_id.as_str()).collect();
        assert_eq!(ids, vec!["i-first", "i-second", "i-third"]);
    }

    #[test]
    fn empty_list_renders_empty_array() {
        assert_eq!(render_snapshot(&[]), "[]");
    }

    #[test]
    fn rendered_snapshot_is_a_json_array_in_order() {
        let records = vec![record_at("i-old", 3), record_at("i-new", 12)];
        let rendered = render_snapshot(&records);

        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        let array = parsed.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[0]["instanceId"], "i-old");
        assert_eq!(array[1]["instanceId"], "i-new");
    }

    #[test]
    fn write_snapshot_replaces_previous_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("us-east-1.json");

        write_snapshot(&path, &[record_at("i-1", 1), record_at("i-2", 2)]).unwrap();
        write_snapshot(&path, &[record_at("i-3", 3)]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
        let array = parsed.as_array().unwrap();
        assert_eq!(array.len(), 1);
        assert_eq!(array[0]["instanceId"], "i-3");
    }

    #[test]
    fn write_snapshot_fails_for_missing_directory() {
        let err = write_snapshot(Path::new("/nonexistent/dir/us-east-1.json"), &[]).unwrap_err();
        assert!(err.to_string().contains("Failed to write snapshot"));
    }
}
