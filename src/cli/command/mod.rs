pub mod fetch;
pub mod grid;
pub mod surface;

pub use fetch::fetch;
pub use grid::grid;
pub use surface::surface;
