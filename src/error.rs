//! Errors raised by grid construction and the point-to-grid matcher.

/// Structural problems with a target grid or with the points matched against it.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("{0} axis is not strictly increasing")]
    NotIncreasing(&'static str),
    #[error("{axis} axis needs at least 2 values to derive bin edges, got {len}")]
    AxisTooShort { axis: &'static str, len: usize },
    #[error("input lengths differ: {values} values, {times} times, {lats} latitudes, {lons} longitudes")]
    LengthMismatch {
        values: usize,
        times: usize,
        lats: usize,
        lons: usize,
    },
    #[error("template values have shape {values:?} but its axes give {axes:?}")]
    TemplateShape {
        values: (usize, usize, usize),
        axes: (usize, usize, usize),
    },
    #[error("end month {end} is before start month {start}")]
    EmptyTimeRange { start: String, end: String },
    #[error("`{0}` is not a year-month, expected YYYY-MM")]
    InvalidYearMonth(String),
    #[error("`{0}` is not a longitude convention, expected `0-360` or `-180-180`")]
    InvalidConvention(String),
}
