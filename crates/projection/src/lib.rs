//! Map projections for positioning heatmap points on screen.
//!
//! Implements spherical Web Mercator from scratch and a simple viewport
//! model on top of it.

pub mod mercator;
pub mod viewport;

pub use mercator::{WebMercator, MAX_LATITUDE, TILE_SIZE};
pub use viewport::Viewport;
