//! Pipeline settings, read from an optional TOML file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::{
    chemistry::DEFAULT_TOTAL_BORON,
    grid::{LonConvention, YearMonth},
    reading::DEFAULT_SURFACE_DEPTH,
};

pub const GLODAP_URL: &str = "http://cdiac.ornl.gov/ftp/oceans/GLODAPv2/Data_Products/data_product/GLODAPv2%20Merged%20Master%20File.csv.zip";
pub const ARCHIVE_FILE: &str = "GLODAPv2 Merged Master File.csv.zip";
pub const MEMBER_NAME: &str = "GLODAPv2 Merged Master File.csv";
pub const SUBSET_FILE: &str = "GLODAPv2_pH_DIC_ALK_subset.csv";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub archive_url: String,
    pub archive_path: PathBuf,
    /// CSV member inside the archive, matched by exact name.
    pub member_name: String,
    pub subset_path: PathBuf,
    pub surface_path: PathBuf,
    pub gridded_path: PathBuf,
    /// Keep the archive after the subset is written.
    pub leave_zip: bool,
    pub surface_depth: f64,
    pub start: YearMonth,
    pub end: YearMonth,
    pub lon_convention: LonConvention,
    pub total_boron: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            archive_url: GLODAP_URL.to_string(),
            archive_path: PathBuf::from(ARCHIVE_FILE),
            member_name: MEMBER_NAME.to_string(),
            subset_path: PathBuf::from(SUBSET_FILE),
            surface_path: PathBuf::from("glodap-surface-spco2.parquet"),
            gridded_path: PathBuf::from("glodap-spco2-monthly-1deg.parquet"),
            leave_zip: true,
            surface_depth: DEFAULT_SURFACE_DEPTH,
            start: YearMonth { year: 1982, month: 1 },
            end: YearMonth { year: 2018, month: 12 },
            lon_convention: LonConvention::ZeroTo360,
            total_boron: DEFAULT_TOTAL_BORON,
        }
    }
}

impl PipelineConfig {
    /// Loads `path`, or the user config file if there is one, or the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => match user_config_path().filter(|p| p.exists()) {
                Some(p) => Self::from_file(&p),
                None => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("Reading config {}", path.display()))?;
        let config = toml::from_str(&text).with_context(|| format!("Parsing config {}", path.display()))?;
        debug!(path = %path.display(), "Loaded config");

        Ok(config)
    }
}

/// `<config dir>/glodap/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("glodap").join("config.toml"))
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn should_default_to_original_run() {
        let c = PipelineConfig::default();

        assert_eq!(c.surface_depth, 20.0);
        assert_eq!(c.start.to_string(), "1982-01");
        assert_eq!(c.end.to_string(), "2018-12");
        assert_eq!(c.lon_convention, LonConvention::ZeroTo360);
        assert_eq!(c.total_boron, 415.7);
        assert_eq!(c.subset_path, PathBuf::from("GLODAPv2_pH_DIC_ALK_subset.csv"));
    }

    #[test]
    fn should_override_from_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "surface_depth = 10.0\nstart = \"1990-03\"\nlon_convention = \"-180-180\"\nleave_zip = false"
        )
        .unwrap();

        let c = PipelineConfig::load(Some(file.path())).unwrap();

        assert_eq!(c.surface_depth, 10.0);
        assert_eq!(c.start, YearMonth { year: 1990, month: 3 });
        assert_eq!(c.end, YearMonth { year: 2018, month: 12 });
        assert_eq!(c.lon_convention, LonConvention::PlusMinus180);
        assert!(!c.leave_zip);
    }

    #[test]
    fn should_reject_bad_month() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "end = \"2018-13\"").unwrap();

        assert!(PipelineConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn should_reject_unknown_key() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "surface_dpeth = 10.0").unwrap();

        assert!(PipelineConfig::load(Some(file.path())).is_err());
    }
}
