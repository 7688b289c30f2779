//! Handles serialising and saving data to disk in the _parquet_ file format.

pub mod gridded;
pub mod surface;

pub use gridded::save_gridded;
pub use surface::save_surface;
