//! GLODAP observation records and the cleaning stages applied to them.

pub mod quality;
pub mod record;
pub mod surface;

pub use quality::{apply_quality_flags, drop_incomplete, drop_invalid_dates, FLAGGED, REQUIRED};
pub use record::{MasterRecord, SubsetRecord, SUBSET_COLUMNS};
pub use surface::{
    derive_observations, shallowest_per_profile, within_surface_layer, SurfaceRecord,
    DEFAULT_SURFACE_DEPTH,
};
