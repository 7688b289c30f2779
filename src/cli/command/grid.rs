//! Grid surface pCO2 onto the monthly 1° frame.

use anyhow::Result;
use tracing::info;

use crate::{
    chemistry::PhDicSolver,
    cli::create_spinner,
    config::PipelineConfig,
    error::GridError,
    grid::{match_ungridded_to_gridded, GridTemplate, GriddedField},
    parquet,
    reading::SurfaceRecord,
};

use super::surface::surface_records;

const VARIABLE_NAME: &str = "spco2";

pub fn grid(config: &PipelineConfig) -> Result<String> {
    let records = surface_records(config, &PhDicSolver)?;

    let bar = create_spinner("Gridding surface pCO2...".to_string());
    let template = GridTemplate::monthly(config.start, config.end, config.lon_convention)?;
    let field = grid_surface(&records, &template)?;
    bar.finish_with_message("Surface pCO2 gridded");

    let (months, lats, lons) = template.shape();
    info!(
        cells = field.populated_count(),
        months,
        lats,
        lons,
        start = %config.start,
        end = %config.end,
        "Matched observations to grid"
    );

    parquet::save_gridded(&field, &config.gridded_path)?;

    Ok(config.gridded_path.to_string_lossy().to_string())
}

pub fn grid_surface(records: &[SurfaceRecord], template: &GridTemplate) -> Result<GriddedField, GridError> {
    let values: Vec<f64> = records.iter().map(|r| r.spco2).collect();
    let times: Vec<_> = records.iter().map(|r| r.time).collect();
    let lats: Vec<f64> = records.iter().map(|r| r.lat).collect();
    let lons: Vec<f64> = records.iter().map(|r| r.lon).collect();

    match_ungridded_to_gridded(&values, &times, &lats, &lons, template, Some(VARIABLE_NAME))
}

// -- Tests -------------------------------------------------------------------
