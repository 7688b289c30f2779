//! Generic function for deserialising CSV rows into typed records.

use std::io::Read;

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use serde::de::DeserializeOwned;

const PROGRESS_EVERY: usize = 10_000;

/// Deserialises every row of a headed CSV stream, matching columns by header
/// name. Columns the record type does not name are ignored.
pub fn deserialise<R, I>(reader: I, progress: &ProgressBar) -> Result<Vec<R>>
where
    R: DeserializeOwned,
    I: Read,
{
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let mut records = Vec::new();
    for (i, result) in rdr.deserialize().enumerate() {
        // Header is line 1
        let record: R = result.with_context(|| format!("Parsing CSV line {}", i + 2))?;
        records.push(record);

        if (i + 1) % PROGRESS_EVERY == 0 {
            progress.set_position((i + 1) as u64);
        }
    }
    progress.set_position(records.len() as u64);

    Ok(records)
}

// -- Tests -------------------------------------------------------------------
