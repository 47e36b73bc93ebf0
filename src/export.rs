//! Local CSV export of stored snapshots.

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::debug;

use crate::store::{DATE_FORMAT, PriceSnapshot};

/// One exported row, dates formatted the way the store encodes them.
#[derive(Serialize)]
struct SnapshotRow {
    id: u64,
    date: String,
    u91: Option<f64>,
    u95: Option<f64>,
    u98: Option<f64>,
    diesel: Option<f64>,
}

impl From<&PriceSnapshot> for SnapshotRow {
    fn from(snapshot: &PriceSnapshot) -> Self {
        Self {
            id: snapshot.id,
            date: snapshot.date.format(DATE_FORMAT).to_string(),
            u91: snapshot.u91,
            u95: snapshot.u95,
            u98: snapshot.u98,
            diesel: snapshot.diesel,
        }
    }
}

/// Appends a snapshot as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_snapshot(path: &str, snapshot: &PriceSnapshot) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(SnapshotRow::from(snapshot))?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuel::Fuel;
    use chrono::NaiveDate;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample() -> PriceSnapshot {
        let mut snap = PriceSnapshot::new(3, NaiveDate::from_ymd_opt(2023, 6, 5).unwrap());
        snap.set_price(Fuel::U98, 1650.0);
        snap
    }

    #[test]
    fn test_append_snapshot_creates_file() {
        let path = temp_path("fuel_price_notifier_test_create.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        append_snapshot(&path, &sample()).unwrap();

        assert!(Path::new(&path).exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("05/06/2023"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_snapshot_writes_header_once() {
        let path = temp_path("fuel_price_notifier_test_header.csv");
        let _ = fs::remove_file(&path);

        append_snapshot(&path, &sample()).unwrap();
        append_snapshot(&path, &sample()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // Header line should appear exactly once
        let header_count = content.lines().filter(|l| l.contains("date")).count();
        assert_eq!(header_count, 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_snapshot_two_rows() {
        let path = temp_path("fuel_price_notifier_test_rows.csv");
        let _ = fs::remove_file(&path);

        append_snapshot(&path, &sample()).unwrap();
        append_snapshot(&path, &sample()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // 1 header + 2 data rows
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);

        fs::remove_file(&path).unwrap();
    }
}
