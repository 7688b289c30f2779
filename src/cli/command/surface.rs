//! Derive surface pCO2 from the saved subset.

use anyhow::Result;
use tracing::info;

use crate::{
    chemistry::{CarbonateSolver, PhDicSolver},
    cli::create_spinner,
    config::PipelineConfig,
    parquet,
    reading::{
        derive_observations, drop_incomplete, drop_invalid_dates, shallowest_per_profile,
        within_surface_layer, SurfaceRecord, REQUIRED,
    },
    subset::read_subset,
};

pub fn surface(config: &PipelineConfig) -> Result<String> {
    let records = surface_records(config, &PhDicSolver)?;
    parquet::save_surface(&records, &config.surface_path)?;

    Ok(config.surface_path.to_string_lossy().to_string())
}

/// Reads the subset and reduces it to one near-surface pCO2 sample per profile.
pub fn surface_records<S: CarbonateSolver>(config: &PipelineConfig, solver: &S) -> Result<Vec<SurfaceRecord>> {
    let bar = create_spinner("Reading data subset...".to_string());
    let records = read_subset(&config.subset_path, &bar)?;
    bar.finish_with_message(format!("Read {} rows", records.len()));

    let records = drop_incomplete(records, &REQUIRED);
    let dated = drop_invalid_dates(records);

    let bar = create_spinner("Calculating pCO2...".to_string());
    let observations = derive_observations(dated, solver, config.lon_convention, config.total_boron);
    bar.finish_with_message(format!("Calculated pCO2 for {} samples", observations.len()));

    let shallowest = shallowest_per_profile(observations);
    let surface = within_surface_layer(shallowest, config.surface_depth);
    info!(
        profiles = surface.len(),
        surface_depth = config.surface_depth,
        "Selected surface samples"
    );

    Ok(surface)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use std::path::Path;

    use tempfile::TempDir;

    use super::*;
    use crate::{reading::SubsetRecord, subset::write_subset};

    fn sample(station: f64, depth: f64, day: f64, longitude: f64) -> SubsetRecord {
        SubsetRecord {
            phtsinsitutp: Some(8.1),
            tco2: Some(2000.0),
            talk: Some(2300.0),
            temperature: Some(25.0),
            salinity: Some(35.0),
            cruise: Some(270.0),
            station: Some(station),
            cast: Some(1.0),
            year: Some(1993.0),
            month: Some(4.0),
            day: Some(day),
            hour: Some(12.0),
            latitude: Some(-40.0),
            longitude: Some(longitude),
            pressure: Some(depth),
            depth: Some(depth),
            silicate: Some(2.0),
            phosphate: Some(0.5),
            ..Default::default()
        }
    }

    fn config_in(dir: &Path) -> PipelineConfig {
        PipelineConfig {
            subset_path: dir.join("subset.csv"),
            surface_path: dir.join("surface.parquet"),
            ..Default::default()
        }
    }

    #[test]
    fn should_reduce_subset_to_surface() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        let rows = vec![
            sample(1.0, 15.0, 10.0, -30.0),
            sample(1.0, 5.0, 10.0, -30.0),
            sample(1.0, 40.0, 10.0, -30.0),
            // whole profile below the surface layer
            sample(2.0, 35.0, 11.0, 200.0),
            // April 31st
            sample(3.0, 2.0, 31.0, 10.0),
        ];
        write_subset(&rows, &config.subset_path).unwrap();

        let surface = surface_records(&config, &PhDicSolver).unwrap();

        assert_eq!(surface.len(), 1);
        assert_eq!(surface[0].depth, 5.0);
        assert_eq!(surface[0].lon, 330.0);
        assert!(surface[0].spco2 > 330.0 && surface[0].spco2 < 360.0);
    }

    #[test]
    fn should_save_surface_product() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        write_subset(&[sample(1.0, 3.0, 10.0, 100.0)], &config.subset_path).unwrap();

        let saved = surface(&config).unwrap();

        assert!(Path::new(&saved).exists());
    }

    #[test]
    fn should_fail_without_subset() {
        let dir = TempDir::new().unwrap();

        assert!(surface(&config_in(dir.path())).is_err());
    }
}
