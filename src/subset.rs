//! The derived subset CSV: good, complete rows with a fixed column set.

use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use indicatif::ProgressBar;

use crate::{
    deserialise::deserialise,
    reading::{SubsetRecord, SUBSET_COLUMNS},
};

/// Writes `records` with a header row and no index column. Missing values are
/// left empty.
pub fn write_subset(records: &[SubsetRecord], file_path: &Path) -> Result<()> {
    let file = File::create(file_path).with_context(|| format!("Creating {}", file_path.display()))?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);

    writer.write_record(SUBSET_COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}

pub fn read_subset(file_path: &Path, progress: &ProgressBar) -> Result<Vec<SubsetRecord>> {
    let file = File::open(file_path).with_context(|| format!("Opening {}", file_path.display()))?;

    deserialise(file, progress)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn record() -> SubsetRecord {
        SubsetRecord {
            phtsinsitutp: Some(8.07),
            tco2: Some(2011.3),
            cruise: Some(270.0),
            year: Some(1993.0),
            latitude: Some(-55.25),
            longitude: Some(-30.5),
            depth: Some(4.0),
            ..Default::default()
        }
    }

    #[test]
    fn should_write_fixed_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("subset.csv");

        write_subset(&[], &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.trim_end(), SUBSET_COLUMNS.join(","));
    }

    #[test]
    fn should_leave_missing_values_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("subset.csv");

        write_subset(&[record()], &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let row: Vec<&str> = text.lines().nth(1).unwrap().split(',').collect();
        assert_eq!(row.len(), SUBSET_COLUMNS.len());
        assert_eq!(row[0], "");
        assert_eq!(row[1], "8.07");
        assert_eq!(row[6], "270.0");
    }

    #[test]
    fn should_read_back_what_was_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("subset.csv");
        let rows = vec![record(), SubsetRecord::default()];

        write_subset(&rows, &path).unwrap();
        let read = read_subset(&path, &ProgressBar::hidden()).unwrap();

        assert_eq!(read, rows);
    }
}
