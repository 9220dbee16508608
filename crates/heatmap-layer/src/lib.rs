//! Density heatmap layer for interactive maps.
//!
//! Weighted geographic points are binned into screen-space blobs on every
//! render and painted by `heatmap-renderer`. The host map stays outside the
//! crate: it implements [`MapView`], drives the layer through [`MapLayer`]
//! and pumps deferred work from a [`FrameScheduler`].
//!
//! ```ignore
//! use heatmap_layer::{heatmap_layer, MapLayer, QueueScheduler};
//!
//! let frames = QueueScheduler::new();
//! let mut layer = heatmap_layer(points, RenderOptions::default(), frames.clone())?;
//! layer.on_attach(&viewport)?;
//!
//! layer.add_point((51.5, -0.09, 0.8));
//! for frame in frames.take_frames() {
//!     layer.on_frame(frame, &viewport);
//! }
//! ```

pub mod aggregate;
pub mod crossfade;
pub mod host;
pub mod layer;
pub mod scheduler;

pub use aggregate::{aggregate, auto_max, zoom_attenuation, Aggregation, EPSILON};
pub use crossfade::{Crossfade, RasterPlacement};
pub use host::{MapEvent, MapEventKind, MapLayer, MapView};
pub use layer::HeatmapLayer;
pub use scheduler::{FrameHandle, FrameScheduler, QueueScheduler, TimerHandle};

use heatmap_common::{HeatPoint, HeatmapResult, RenderOptions};
use heatmap_renderer::PixmapSurface;

/// Create a layer backed by an in-memory tiny-skia surface.
pub fn heatmap_layer<I, P>(
    points: I,
    options: RenderOptions,
    scheduler: impl FrameScheduler + 'static,
) -> HeatmapResult<HeatmapLayer<PixmapSurface>>
where
    I: IntoIterator<Item = P>,
    P: Into<HeatPoint>,
{
    HeatmapLayer::new(points, options, PixmapSurface::new(0, 0), Box::new(scheduler))
}
