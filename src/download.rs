//! Fetches the GLODAP archive and opens the CSV inside it.

use std::{
    fs::File,
    io::{BufReader, Read, Write},
    path::Path,
};

use anyhow::{anyhow, Context, Error, Result};
use futures::StreamExt;
use tempfile::NamedTempFile;
use tracing::info;
use zip::ZipArchive;

/// Units reported to the progress callback.
pub const BLOCK_SIZE: u64 = 8192;

/// Downloads `url` to `file_path` unless the file is already present.
///
/// `progress` is called with `(blocks_transferred, block_size, total_size)`.
/// Returns `true` if a download happened.
pub async fn ensure_archive<F>(url: &str, file_path: &Path, progress: F) -> Result<bool>
where
    F: FnMut(u64, u64, Option<u64>),
{
    if file_path.exists() {
        info!(path = %file_path.display(), "Found GLODAPv2 archive");
        return Ok(false);
    }

    info!(%url, "Fetching GLODAPv2 archive");
    download_with_progress(url, file_path, progress).await?;

    Ok(true)
}

/// Streams `url` into a temporary file beside `file_path`, then moves it into place.
pub async fn download_with_progress<F>(url: &str, file_path: &Path, mut progress: F) -> Result<(), Error>
where
    F: FnMut(u64, u64, Option<u64>),
{
    let response = reqwest::get(url)
        .await
        .map_err(|e| Error::msg(format!("Failed to download file: {}", e)))?;

    if !response.status().is_success() {
        return Err(Error::msg(format!("Failed to download file: {}", response.status())));
    }

    let total_size = response.content_length();
    let dir = match file_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    let mut downloaded = 0u64;
    let mut stream = response.bytes_stream();

    progress(0, BLOCK_SIZE, total_size);
    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| Error::msg(format!("Error reading chunk: {}", e)))?;
        file.write_all(&chunk)?;
        downloaded += chunk.len() as u64;
        progress(downloaded.div_ceil(BLOCK_SIZE), BLOCK_SIZE, total_size);
    }

    file.flush()?;
    file.persist(file_path)
        .map_err(|e| anyhow!("Could not save {}: {}", file_path.display(), e))?;

    Ok(())
}

/// Opens the archive member called exactly `member` and hands it to `read`.
pub fn with_member<T, F>(zip_path: &Path, member: &str, read: F) -> Result<T>
where
    F: FnOnce(&mut dyn Read) -> Result<T>,
{
    let file = File::open(zip_path).with_context(|| format!("Opening {}", zip_path.display()))?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;

    let mut entry = archive
        .by_name(member)
        .with_context(|| format!("`{}` not found in {}", member, zip_path.display()))?;

    read(&mut entry)
}

// -- Tests -------------------------------------------------------------------
