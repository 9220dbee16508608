//! Common types shared across the heatmap crates.

pub mod bounds;
pub mod error;
pub mod options;
pub mod point;

pub use bounds::GeoBounds;
pub use error::{HeatmapError, HeatmapResult};
pub use options::{
    Color, Gradient, GradientStop, IntensityCap, OptionsChange, OptionsUpdate, RenderOptions,
};
pub use point::{Blob, HeatPoint, LatLng, PixelPoint, DEFAULT_INTENSITY};
