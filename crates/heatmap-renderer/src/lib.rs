//! Raster painting for geographic heatmaps.
//!
//! - `stamp`: blurred-disk stamp shared by every blob
//! - `palette`: 256-entry colour table built from a gradient
//! - `surface`: the drawing target abstraction and its tiny-skia implementation
//! - `painter`: the two-pass stamp-then-recolour renderer
//! - `png`: PNG encoding of rendered rasters

pub mod painter;
pub mod palette;
pub mod png;
pub mod stamp;
pub mod surface;

pub use painter::{HeatmapPainter, PainterStyle};
pub use palette::{render_gradient_strip, Palette, PALETTE_SIZE};
pub use stamp::StampImage;
pub use surface::{PixmapSurface, RasterSnapshot, RasterSurface};
