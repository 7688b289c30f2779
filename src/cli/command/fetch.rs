//! Download the GLODAPv2 merged master file and save the good, complete rows.

use std::fs;

use anyhow::{Context, Result};
use tracing::info;

use crate::{
    cli::{create_download_bar, create_spinner, set_download_length},
    config::PipelineConfig,
    deserialise::deserialise,
    download::{ensure_archive, with_member},
    reading::{apply_quality_flags, drop_incomplete, MasterRecord, SubsetRecord, FLAGGED, REQUIRED},
    subset::write_subset,
};

pub async fn fetch(config: &PipelineConfig) -> Result<String> {
    download_archive(config).await?;

    let records = read_master(config)?;
    let subset = clean(records);

    let bar = create_spinner("Saving data subset...".to_string());
    write_subset(&subset, &config.subset_path)?;
    bar.finish_with_message("Data subset saved");

    if !config.leave_zip {
        fs::remove_file(&config.archive_path)
            .with_context(|| format!("Removing {}", config.archive_path.display()))?;
        info!(path = %config.archive_path.display(), "Removed archive");
    }

    Ok(config.subset_path.to_string_lossy().to_string())
}

async fn download_archive(config: &PipelineConfig) -> Result<()> {
    let bar = create_download_bar("Downloading GLODAPv2...".to_string());

    let downloaded = ensure_archive(&config.archive_url, &config.archive_path, |blocks, block_size, total_size| {
        let transferred = blocks * block_size;
        match total_size {
            Some(total) => {
                set_download_length(&bar, total);
                bar.set_position(transferred.min(total));
            }
            None => bar.set_position(transferred),
        }
    })
    .await;

    match &downloaded {
        Ok(true) => bar.finish_with_message("GLODAPv2 downloaded"),
        _ => bar.finish_and_clear(),
    }

    downloaded.map(|_| ())
}

fn read_master(config: &PipelineConfig) -> Result<Vec<MasterRecord>> {
    let bar = create_spinner("Reading data...".to_string());
    let records = with_member(&config.archive_path, &config.member_name, |member| {
        deserialise::<MasterRecord, _>(member, &bar)
    })?;
    bar.finish_with_message(format!("Read {} rows", records.len()));

    Ok(records)
}

/// Applies the quality flags and keeps rows carrying every required variable.
fn clean(mut records: Vec<MasterRecord>) -> Vec<SubsetRecord> {
    info!("Selecting 'good' (flag == 2) data");
    let cleared = apply_quality_flags(&mut records, &FLAGGED);
    info!(cleared, "Cleared values with a bad or missing flag");

    drop_incomplete(records, &REQUIRED)
        .into_iter()
        .map(SubsetRecord::from)
        .collect()
}

// -- Tests -------------------------------------------------------------------
