//! Capabilities exchanged with the host map widget.
//!
//! The host implements [`MapView`] and feeds [`MapEvent`]s to any registered
//! [`MapLayer`]. The layer never holds on to the map between calls; every
//! callback receives the view it should read from.

use heatmap_common::{GeoBounds, HeatmapResult, LatLng, PixelPoint};
use projection::Viewport;

/// Read-only view of the host map's current state.
pub trait MapView {
    /// Viewport size in pixels.
    fn viewport_size(&self) -> (u32, u32);

    fn zoom(&self) -> f64;

    fn max_zoom(&self) -> f64;

    /// Geographic coordinate to viewport pixel.
    fn project_to_viewport(&self, coord: LatLng) -> PixelPoint;

    /// Geographic coordinate to world pixel at `zoom`. Stable across pans.
    fn project_to_world(&self, coord: LatLng, zoom: f64) -> PixelPoint;

    /// Geographic region currently visible.
    fn visible_bounds(&self) -> GeoBounds;

    /// World pixel (at the current zoom) of the viewport's top-left corner.
    fn viewport_origin(&self) -> PixelPoint {
        let probe = LatLng::new(0.0, 0.0);
        self.project_to_world(probe, self.zoom()) - self.project_to_viewport(probe)
    }
}

/// Change notifications delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    /// A pan gesture finished.
    PanEnd,
    /// An animated zoom transition is about to run.
    ZoomStart,
    /// One frame of an animated zoom: the zoom and centre the map is
    /// animating towards.
    ZoomFrame { zoom: f64, center: LatLng },
    /// The zoom transition settled.
    ZoomEnd,
}

impl MapEvent {
    pub fn kind(&self) -> MapEventKind {
        match self {
            MapEvent::PanEnd => MapEventKind::PanEnd,
            MapEvent::ZoomStart => MapEventKind::ZoomStart,
            MapEvent::ZoomFrame { .. } => MapEventKind::ZoomFrame,
            MapEvent::ZoomEnd => MapEventKind::ZoomEnd,
        }
    }
}

/// Event discriminant used for subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapEventKind {
    PanEnd,
    ZoomStart,
    ZoomFrame,
    ZoomEnd,
}

/// Something a host map can attach and drive.
///
/// The host subscribes the layer to [`MapLayer::events`] when calling
/// `on_attach` and unsubscribes it when calling `on_detach`.
pub trait MapLayer {
    fn on_attach(&mut self, map: &dyn MapView) -> HeatmapResult<()>;

    fn on_detach(&mut self);

    /// Events this layer wants to receive while attached.
    fn events(&self) -> &'static [MapEventKind];

    fn handle_event(&mut self, event: &MapEvent, map: &dyn MapView);
}

impl MapView for Viewport {
    fn viewport_size(&self) -> (u32, u32) {
        self.size()
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    fn project_to_viewport(&self, coord: LatLng) -> PixelPoint {
        Viewport::project_to_viewport(self, coord)
    }

    fn project_to_world(&self, coord: LatLng, zoom: f64) -> PixelPoint {
        Viewport::project_to_world(self, coord, zoom)
    }

    fn visible_bounds(&self) -> GeoBounds {
        self.bounds()
    }

    fn viewport_origin(&self) -> PixelPoint {
        self.top_left()
    }
}
