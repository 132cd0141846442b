//! Store map: zones, the tile grid, and the built-in layout

pub mod grid;
pub mod layout;
pub mod zone;

pub use grid::{Cell, Grid, MAX_TARGET_ATTEMPTS};
pub use layout::{store_regions, STORE_LAYOUT};
pub use zone::Zone;
