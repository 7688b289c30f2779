//! Empty `time × lat × lon` frames at 1° and monthly resolution.

use std::{fmt, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime};
use ndarray::Array3;
use serde::Deserialize;

use crate::error::GridError;

const N_LAT: usize = 180;
const N_LON: usize = 360;
const MID_MONTH_DAY: u32 = 15;

/// Longitude range shared by a grid and the points matched against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum LonConvention {
    /// `[0, 360)`, the GLODAP surface product default.
    #[default]
    ZeroTo360,
    /// `(-180, 180]`
    PlusMinus180,
}

impl LonConvention {
    /// Centre of the westernmost 1° bin.
    fn first_centre(self) -> f64 {
        match self {
            LonConvention::ZeroTo360 => 0.5,
            LonConvention::PlusMinus180 => -179.5,
        }
    }

    /// Shifts a longitude by a full turn if it lies outside this convention.
    pub fn normalize(self, lon: f64) -> f64 {
        match self {
            LonConvention::ZeroTo360 if lon < 0.0 => lon + 360.0,
            LonConvention::PlusMinus180 if lon > 180.0 => lon - 360.0,
            _ => lon,
        }
    }
}

impl FromStr for LonConvention {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0-360" | "0360" => Ok(LonConvention::ZeroTo360),
            "-180-180" | "180" => Ok(LonConvention::PlusMinus180),
            other => Err(GridError::InvalidConvention(other.to_string())),
        }
    }
}

impl TryFrom<String> for LonConvention {
    type Error = GridError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for LonConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LonConvention::ZeroTo360 => write!(f, "0-360"),
            LonConvention::PlusMinus180 => write!(f, "-180-180"),
        }
    }
}

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, GridError> {
        if (1..=12).contains(&month) {
            Ok(YearMonth { year, month })
        } else {
            Err(GridError::InvalidYearMonth(format!("{year}-{month:02}")))
        }
    }

    fn months_since_epoch(self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    fn mid_month(months: i64) -> Option<NaiveDateTime> {
        let year = i32::try_from(months.div_euclid(12)).ok()?;
        let month = months.rem_euclid(12) as u32 + 1;
        NaiveDate::from_ymd_opt(year, month, MID_MONTH_DAY)?.and_hms_opt(0, 0, 0)
    }
}

impl FromStr for YearMonth {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GridError::InvalidYearMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;

        YearMonth::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for YearMonth {
    type Error = GridError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Coordinate axes of a gridded frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GridAxes {
    pub time: Vec<NaiveDateTime>,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
}

impl GridAxes {
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.time.len(), self.lat.len(), self.lon.len())
    }
}

/// A coordinate frame with every cell set to `0.0`.
///
/// The zeros are a placeholder, not "no data": the matcher writes its own
/// arrays and marks empty cells as missing.
#[derive(Debug, Clone)]
pub struct GridTemplate {
    pub axes: GridAxes,
    pub values: Array3<f64>,
}

impl GridTemplate {
    pub fn new(axes: GridAxes) -> Self {
        let values = Array3::zeros(axes.shape());
        GridTemplate { axes, values }
    }

    /// Builds the monthly 1° frame from `start` to `end` inclusive, with time
    /// stamps on the 15th of each month.
    pub fn monthly(
        start: YearMonth,
        end: YearMonth,
        convention: LonConvention,
    ) -> Result<Self, GridError> {
        if end < start {
            return Err(GridError::EmptyTimeRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        let time = (start.months_since_epoch()..=end.months_since_epoch())
            .map(YearMonth::mid_month)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| GridError::InvalidYearMonth(end.to_string()))?;
        let lat = (0..N_LAT).map(|i| -89.5 + i as f64).collect();
        let first = convention.first_centre();
        let lon = (0..N_LON).map(|i| first + i as f64).collect();

        Ok(GridTemplate::new(GridAxes { time, lat, lon }))
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        self.axes.shape()
    }
}

// -- Tests -------------------------------------------------------------------
