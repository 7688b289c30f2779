//! Bins point observations onto a gridded frame and summarises each cell.
//!
//! Every axis is cut into right-closed bins whose edges sit halfway between
//! neighbouring centres, with the outer edges pushed out by half the outer gap.
//! A point lands in bin `i` when `edge[i] < x <= edge[i + 1]`; points outside
//! the outer edges are dropped.

use chrono::NaiveDateTime;
use ndarray::Array3;
use tracing::debug;

use super::template::{GridAxes, GridTemplate};
use crate::{
    error::GridError,
    group::{group_reduce, summarise},
};

const FALLBACK_NAME: &str = "out";

type Cell = (usize, usize, usize);

/// Per-cell mean and sample standard deviation, co-indexed with a template.
///
/// Cells without observations hold `NaN`.
#[derive(Debug, Clone)]
pub struct GriddedField {
    pub name: String,
    pub axes: GridAxes,
    pub mean: Array3<f64>,
    pub std: Array3<f64>,
}

impl GriddedField {
    pub fn mean_name(&self) -> String {
        format!("{}_mean", self.name)
    }

    pub fn std_name(&self) -> String {
        format!("{}_std", self.name)
    }

    pub fn mean_at(&self, it: usize, iy: usize, ix: usize) -> Option<f64> {
        self.mean.get([it, iy, ix]).copied().filter(|v| !v.is_nan())
    }

    pub fn std_at(&self, it: usize, iy: usize, ix: usize) -> Option<f64> {
        self.std.get([it, iy, ix]).copied().filter(|v| !v.is_nan())
    }

    /// Cells that received at least one observation, in `(time, lat, lon)` order.
    pub fn populated_cells(&self) -> impl Iterator<Item = (Cell, f64, Option<f64>)> + '_ {
        self.mean
            .indexed_iter()
            .filter_map(|((it, iy, ix), _)| {
                let m = self.mean_at(it, iy, ix)?;
                Some(((it, iy, ix), m, self.std_at(it, iy, ix)))
            })
    }

    pub fn populated_count(&self) -> usize {
        self.mean.iter().filter(|m| !m.is_nan()).count()
    }
}

/// Matches flat `(value, time, lat, lon)` observations to `template`.
///
/// `name` labels the outputs (`<name>_mean`, `<name>_std`) and defaults to `out`.
pub fn match_ungridded_to_gridded(
    values: &[f64],
    times: &[NaiveDateTime],
    lats: &[f64],
    lons: &[f64],
    template: &GridTemplate,
    name: Option<&str>,
) -> Result<GriddedField, GridError> {
    let axes = &template.axes;
    let time_axis: Vec<f64> = axes.time.iter().map(|t| epoch_seconds(*t)).collect();

    check_axis("time", &time_axis)?;
    check_axis("latitude", &axes.lat)?;
    check_axis("longitude", &axes.lon)?;

    if template.values.dim() != template.shape() {
        return Err(GridError::TemplateShape {
            values: template.values.dim(),
            axes: template.shape(),
        });
    }

    if times.len() != values.len() || lats.len() != values.len() || lons.len() != values.len() {
        return Err(GridError::LengthMismatch {
            values: values.len(),
            times: times.len(),
            lats: lats.len(),
            lons: lons.len(),
        });
    }

    let tbins = bin_edges(&time_axis);
    let ybins = bin_edges(&axes.lat);
    let xbins = bin_edges(&axes.lon);

    let binned: Vec<(Cell, f64)> = values
        .iter()
        .zip(times)
        .zip(lats)
        .zip(lons)
        .filter_map(|(((&v, &t), &y), &x)| {
            let it = assign_bin(&tbins, epoch_seconds(t))?;
            let iy = assign_bin(&ybins, y)?;
            let ix = assign_bin(&xbins, x)?;
            Some(((it, iy, ix), v))
        })
        .collect();

    debug!(
        binned = binned.len(),
        dropped = values.len() - binned.len(),
        "Assigned observations to grid cells"
    );

    let cells = group_reduce(
        binned,
        |(cell, _)| Some(*cell),
        |group| summarise(group.into_iter().map(|(_, v)| v)),
    );

    debug!(
        cells = cells.len(),
        busiest = cells.values().map(|s| s.count).max().unwrap_or(0),
        "Summarised grid cells"
    );

    let mut mean = Array3::from_elem(template.shape(), f64::NAN);
    let mut std = mean.clone();

    for ((it, iy, ix), summary) in cells {
        mean[[it, iy, ix]] = summary.mean;
        if let Some(s) = summary.std {
            std[[it, iy, ix]] = s;
        }
    }

    Ok(GriddedField {
        name: name.unwrap_or(FALLBACK_NAME).to_string(),
        axes: axes.clone(),
        mean,
        std,
    })
}

/// N + 1 edges for N strictly increasing centres.
///
/// Callers must have passed the axis through `check_axis`, which guarantees N >= 2.
fn bin_edges(centres: &[f64]) -> Vec<f64> {
    let n = centres.len();
    let mut edges = Vec::with_capacity(n + 1);

    edges.push(centres[0] - (centres[1] - centres[0]) / 2.0);
    for pair in centres.windows(2) {
        edges.push(pair[1] - (pair[1] - pair[0]) / 2.0);
    }
    edges.push(centres[n - 1] + (centres[n - 1] - centres[n - 2]) / 2.0);

    edges
}

/// Index of the right-closed bin containing `x`, if any.
fn assign_bin(edges: &[f64], x: f64) -> Option<usize> {
    if !x.is_finite() {
        return None;
    }

    match edges.partition_point(|&e| e < x) {
        0 => None,
        i if i == edges.len() => None,
        i => Some(i - 1),
    }
}

fn check_axis(axis: &'static str, centres: &[f64]) -> Result<(), GridError> {
    if centres.len() < 2 {
        return Err(GridError::AxisTooShort {
            axis,
            len: centres.len(),
        });
    }
    if centres.windows(2).any(|pair| !(pair[1] > pair[0])) {
        return Err(GridError::NotIncreasing(axis));
    }

    Ok(())
}

fn epoch_seconds(t: NaiveDateTime) -> f64 {
    t.and_utc().timestamp_millis() as f64 / 1000.0
}

// -- Tests -------------------------------------------------------------------
