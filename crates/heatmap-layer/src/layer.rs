//! The heatmap layer: owns the points and options, coalesces redraws and
//! keeps the raster aligned with the host map.

use crate::aggregate::{aggregate, Aggregation};
use crate::crossfade::{Crossfade, RasterPlacement};
use crate::host::{MapEvent, MapEventKind, MapLayer, MapView};
use crate::scheduler::{FrameHandle, FrameScheduler, TimerHandle};
use heatmap_common::{
    GeoBounds, HeatPoint, HeatmapResult, LatLng, OptionsChange, OptionsUpdate, PixelPoint,
    RenderOptions,
};
use heatmap_renderer::{HeatmapPainter, PainterStyle, PixmapSurface, RasterSurface};
use std::time::Duration;

const SUBSCRIBED_EVENTS: &[MapEventKind] = &[
    MapEventKind::PanEnd,
    MapEventKind::ZoomStart,
    MapEventKind::ZoomFrame,
    MapEventKind::ZoomEnd,
];

/// A density heatmap drawn over a host map.
///
/// Mutations never render directly: they request a frame from the
/// scheduler, and all requests made before that frame fires collapse into a
/// single render that reads the map as it is when the frame runs.
pub struct HeatmapLayer<S: RasterSurface = PixmapSurface> {
    points: Vec<HeatPoint>,
    options: RenderOptions,
    painter: HeatmapPainter<S>,
    scheduler: Box<dyn FrameScheduler>,

    attached: bool,
    pending_frame: Option<FrameHandle>,
    animating: bool,

    /// World pixel of the raster's top-left corner when it was rendered
    origin: PixelPoint,
    origin_zoom: f64,
    placement: RasterPlacement,
    crossfade: Option<Crossfade>,
}

impl<S: RasterSurface> HeatmapLayer<S> {
    /// Create a detached layer drawing on `surface`.
    ///
    /// Fails if the surface cannot provide pixel access.
    pub fn new<I, P>(
        points: I,
        options: RenderOptions,
        surface: S,
        scheduler: Box<dyn FrameScheduler>,
    ) -> HeatmapResult<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<HeatPoint>,
    {
        let painter = HeatmapPainter::new(surface, PainterStyle::from(&options))?;

        Ok(Self {
            points: points.into_iter().map(Into::into).collect(),
            options,
            painter,
            scheduler,
            attached: false,
            pending_frame: None,
            animating: false,
            origin: PixelPoint::default(),
            origin_zoom: 0.0,
            placement: RasterPlacement::identity(),
            crossfade: None,
        })
    }

    // ------------------------------------------------------------------
    // Data and options
    // ------------------------------------------------------------------

    /// Replace every point.
    pub fn set_points<I, P>(&mut self, points: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<HeatPoint>,
    {
        self.points = points.into_iter().map(Into::into).collect();
        self.redraw();
    }

    /// Append one point.
    pub fn add_point(&mut self, point: impl Into<HeatPoint>) {
        self.points.push(point.into());
        self.redraw();
    }

    pub fn points(&self) -> &[HeatPoint] {
        &self.points
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Merge a partial update into the options and redraw.
    ///
    /// Style changes are forwarded to the painter, which rebuilds the
    /// affected caches on its next draw.
    pub fn set_options(&mut self, update: OptionsUpdate) -> OptionsChange {
        let change = self.options.merge(update);

        if change.geometry {
            self.painter
                .set_radius(self.options.radius, self.options.blur);
        }
        if change.min_opacity {
            self.painter.set_min_opacity(self.options.min_opacity);
        }
        if change.gradient {
            self.painter.set_gradient(self.options.gradient.clone());
        }

        tracing::debug!(
            geometry = change.geometry,
            gradient = change.gradient,
            normalization = change.normalization,
            "heatmap options updated"
        );
        self.redraw();
        change
    }

    /// Smallest region covering every point; empty when there are none.
    pub fn bounding_region(&self) -> GeoBounds {
        GeoBounds::from_points(self.points.iter().map(|p| (p.lat, p.lng)))
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Ask for a render on the next frame.
    ///
    /// No-op while detached, while a frame is already pending or while a
    /// zoom animation is running.
    pub fn redraw(&mut self) {
        if !self.attached || self.pending_frame.is_some() || self.animating {
            tracing::trace!(
                attached = self.attached,
                pending = self.pending_frame.is_some(),
                animating = self.animating,
                "redraw coalesced"
            );
            return;
        }
        self.pending_frame = Some(self.scheduler.request_frame());
    }

    /// Deliver a fired frame. Returns the aggregation if it rendered.
    ///
    /// Frames arriving during a zoom animation are dropped; the zoom end
    /// renders instead.
    pub fn on_frame(&mut self, handle: FrameHandle, map: &dyn MapView) -> Option<Aggregation> {
        if self.pending_frame != Some(handle) {
            tracing::trace!(handle = handle.0, "ignoring stale frame");
            return None;
        }
        self.pending_frame = None;
        if self.animating {
            tracing::trace!(handle = handle.0, "dropping frame during zoom animation");
            return None;
        }
        self.render(map)
    }

    /// Deliver a fired timer. Returns true if it ended the crossfade.
    pub fn on_timer(&mut self, handle: TimerHandle) -> bool {
        match &self.crossfade {
            Some(fade) if fade.timer == handle => {
                self.crossfade = None;
                tracing::trace!("crossfade finished");
                true
            }
            _ => false,
        }
    }

    /// Recompute and paint immediately against the current map state.
    ///
    /// Draw failures are logged; `None` means the viewport has no area.
    pub fn render(&mut self, map: &dyn MapView) -> Option<Aggregation> {
        match self.try_render(map) {
            Ok(aggregation) => aggregation,
            Err(e) => {
                tracing::warn!(error = %e, "heatmap render failed");
                None
            }
        }
    }

    fn try_render(&mut self, map: &dyn MapView) -> HeatmapResult<Option<Aggregation>> {
        let size = map.viewport_size();
        if self.painter.surface().size() != size {
            self.painter.resize(size.0, size.1);
        }

        let Some(aggregation) = aggregate(&self.points, &self.options, map) else {
            tracing::trace!("viewport has no area, skipping render");
            return Ok(None);
        };

        self.origin = map.viewport_origin();
        self.origin_zoom = map.zoom();
        self.placement = RasterPlacement::identity();

        self.painter.draw(&aggregation.blobs)?;

        tracing::debug!(
            points = self.points.len(),
            blobs = aggregation.blobs.len(),
            effective_max = aggregation.effective_max,
            attenuation = aggregation.attenuation,
            "heatmap rendered"
        );
        Ok(Some(aggregation))
    }

    // ------------------------------------------------------------------
    // Compositing state
    // ------------------------------------------------------------------

    /// Where the current raster belongs relative to the viewport.
    pub fn placement(&self) -> RasterPlacement {
        self.placement
    }

    /// Placement of the current raster in `map` as it is now, e.g. after a
    /// pan that has not been re-rendered yet.
    pub fn placement_in(&self, map: &dyn MapView) -> RasterPlacement {
        RasterPlacement::between(self.origin, self.origin_zoom, map.viewport_origin(), map.zoom())
    }

    pub fn crossfade(&self) -> Option<&Crossfade> {
        self.crossfade.as_ref()
    }

    pub fn painter(&self) -> &HeatmapPainter<S> {
        &self.painter
    }

    pub fn surface(&self) -> &S {
        self.painter.surface()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending_frame.is_some()
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Encode the current raster as an indexed PNG.
    pub fn export_png(&mut self) -> HeatmapResult<Vec<u8>> {
        self.painter.export_png()
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    fn cancel_frame(&mut self) {
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    fn cancel_crossfade(&mut self) {
        if let Some(fade) = self.crossfade.take() {
            self.scheduler.cancel_timer(fade.timer);
        }
    }

    fn zoom_frame(&mut self, zoom: f64, center: LatLng, map: &dyn MapView) {
        let (width, height) = map.viewport_size();
        let half = PixelPoint::new(width as f64 / 2.0, height as f64 / 2.0);
        let top_left = map.project_to_world(center, zoom) - half;
        self.placement = RasterPlacement::between(self.origin, self.origin_zoom, top_left, zoom);
    }

    fn zoom_end(&mut self, map: &dyn MapView) {
        self.animating = false;
        self.cancel_crossfade();

        if self.options.crossfade_ms > 0 {
            let duration = Duration::from_millis(self.options.crossfade_ms);
            let timer = self.scheduler.start_timer(duration);
            self.crossfade = Some(Crossfade::new(
                self.painter.snapshot(),
                self.placement,
                duration,
                timer,
            ));
        }

        self.cancel_frame();
        self.render(map);
    }
}

impl<S: RasterSurface> MapLayer for HeatmapLayer<S> {
    fn on_attach(&mut self, map: &dyn MapView) -> HeatmapResult<()> {
        self.attached = true;
        self.animating = false;
        let (width, height) = map.viewport_size();
        self.painter.resize(width, height);
        self.origin = map.viewport_origin();
        self.origin_zoom = map.zoom();
        self.placement = RasterPlacement::identity();

        tracing::debug!(width, height, zoom = self.origin_zoom, "heatmap layer attached");
        self.try_render(map).map(|_| ())
    }

    fn on_detach(&mut self) {
        self.cancel_frame();
        self.cancel_crossfade();
        self.painter.release();
        self.attached = false;
        self.animating = false;
        tracing::debug!("heatmap layer detached");
    }

    fn events(&self) -> &'static [MapEventKind] {
        SUBSCRIBED_EVENTS
    }

    fn handle_event(&mut self, event: &MapEvent, map: &dyn MapView) {
        if !self.attached {
            return;
        }

        match *event {
            MapEvent::PanEnd => self.redraw(),
            MapEvent::ZoomStart => {
                self.animating = true;
                self.cancel_frame();
                self.cancel_crossfade();
            }
            MapEvent::ZoomFrame { zoom, center } => self.zoom_frame(zoom, center, map),
            MapEvent::ZoomEnd => self.zoom_end(map),
        }
    }
}
