//! Regular monthly 1° grids and the matcher that bins point observations onto them.

pub mod matcher;
pub mod template;

pub use matcher::{match_ungridded_to_gridded, GriddedField};
pub use template::{GridTemplate, LonConvention, YearMonth};
