//! Command line interface.

pub mod command;

use std::{path::PathBuf, sync::OnceLock, time::Duration};

use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::{
    config::PipelineConfig,
    grid::{LonConvention, YearMonth},
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Contains the commands
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (default: <config dir>/glodap/config.toml, if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Deepest sample in metres kept in the surface product
    #[arg(long, global = true)]
    pub surface_depth: Option<f64>,

    /// First month of the grid, YYYY-MM
    #[arg(long, global = true)]
    pub start: Option<YearMonth>,

    /// Last month of the grid, YYYY-MM
    #[arg(long, global = true)]
    pub end: Option<YearMonth>,

    /// Longitude convention, `0-360` or `-180-180`
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub lon_convention: Option<LonConvention>,

    /// Log filter, e.g. `info` or `glodap=debug`
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download GLODAPv2 and write the quality-controlled subset
    Fetch {
        /// Delete the archive once the subset is written
        #[arg(long)]
        remove_zip: bool,
    },
    /// Derive surface pCO2 from the subset
    Surface {},
    /// Grid surface pCO2 onto a monthly 1° grid
    Grid {},
}

impl Cli {
    /// Settings file values with command line overrides applied.
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = PipelineConfig::load(self.config.as_deref())?;

        if let Some(depth) = self.surface_depth {
            config.surface_depth = depth;
        }
        if let Some(start) = self.start {
            config.start = start;
        }
        if let Some(end) = self.end {
            config.end = end;
        }
        if let Some(convention) = self.lon_convention {
            config.lon_convention = convention;
        }
        if let Commands::Fetch { remove_zip: true } = self.command {
            config.leave_zip = false;
        }

        Ok(config)
    }
}

/// Bars drawn by the commands. Logging suspends these while it writes.
pub fn progress() -> &'static MultiProgress {
    static PROGRESS: OnceLock<MultiProgress> = OnceLock::new();
    PROGRESS.get_or_init(MultiProgress::new)
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = progress().add(ProgressBar::new_spinner().with_message(message));
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

/// Creates a progress bar.
pub fn create_progress_bar(size: u64, message: String) -> ProgressBar {
    progress().add(
        ProgressBar::new(size)
            .with_message(message)
            .with_style(bar_style("[{eta_precise}] {bar:40.cyan/blue} {msg}", "##-")),
    )
}

/// Creates a byte-counting bar that starts as a spinner until the size is known.
pub fn create_download_bar(message: String) -> ProgressBar {
    let bar = create_spinner(message);
    bar.set_style(bar_style("{spinner} {msg} {bytes}", "=> "));

    bar
}

/// Switches a download bar to a sized bar once the total is known.
pub fn set_download_length(bar: &ProgressBar, total_size: u64) {
    if bar.length() != Some(total_size) {
        bar.set_length(total_size);
        bar.set_style(bar_style(
            "{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%) {eta}",
            "=> ",
        ));
    }
}

fn bar_style(template: &str, progress_chars: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars(progress_chars)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn should_override_config_from_flags() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "surface_depth = 10.0\nstart = \"1990-01\"").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let cli = Cli::try_parse_from([
            "glodap",
            "grid",
            "--config",
            &path,
            "--start",
            "2000-06",
            "--lon-convention",
            "-180-180",
        ])
        .unwrap();
        let config = cli.pipeline_config().unwrap();

        assert_eq!(config.surface_depth, 10.0);
        assert_eq!(config.start, YearMonth { year: 2000, month: 6 });
        assert_eq!(config.lon_convention, LonConvention::PlusMinus180);
        assert!(config.leave_zip);
    }

    #[test]
    fn should_remove_zip_when_asked() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_string_lossy().to_string();

        let cli = Cli::try_parse_from(["glodap", "fetch", "--remove-zip", "--config", &path]).unwrap();

        assert!(!cli.pipeline_config().unwrap().leave_zip);
    }

    #[test]
    fn should_reject_bad_month_flag() {
        assert!(Cli::try_parse_from(["glodap", "grid", "--end", "2018-13"]).is_err());
    }

    #[test]
    fn should_switch_download_bar_to_sized() {
        let pb = create_download_bar("Downloading GLODAPv2...".to_string());

        set_download_length(&pb, 1000);
        pb.set_position(500);

        assert_eq!(pb.length(), Some(1000));
        assert_eq!(pb.position(), 500);
        pb.finish_and_clear();
    }
}
