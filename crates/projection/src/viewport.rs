//! A rectangular map viewport over the Web Mercator world.

use crate::mercator::WebMercator;
use heatmap_common::{GeoBounds, LatLng, PixelPoint};
use serde::{Deserialize, Serialize};

/// The visible part of the map: a centre, a zoom and a pixel size.
///
/// Viewport pixels have their origin at the top-left corner of the visible
/// area. Panning moves that origin across world-pixel space; zooming rescales
/// world-pixel space around the centre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
    pub width: u32,
    pub height: u32,
    pub min_zoom: f64,
    pub max_zoom: f64,
    #[serde(default)]
    pub projection: WebMercator,
}

impl Viewport {
    /// Create a viewport with the usual slippy-map zoom range (0..=18).
    pub fn new(center: LatLng, zoom: f64, width: u32, height: u32) -> Self {
        Self {
            center: LatLng::new(center.lat, center.lng),
            zoom,
            width,
            height,
            min_zoom: 0.0,
            max_zoom: 18.0,
            projection: WebMercator::default(),
        }
    }

    pub fn with_max_zoom(mut self, max_zoom: f64) -> Self {
        self.max_zoom = max_zoom;
        self
    }

    /// Size of the viewport in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn half_size(&self) -> PixelPoint {
        PixelPoint::new(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// World pixel (at the current zoom) of the viewport's top-left corner.
    pub fn top_left(&self) -> PixelPoint {
        self.projection.project(self.center, self.zoom) - self.half_size()
    }

    /// Geographic coordinate to world pixel at an arbitrary zoom.
    pub fn project_to_world(&self, coord: LatLng, zoom: f64) -> PixelPoint {
        self.projection.project(coord, zoom)
    }

    /// Geographic coordinate to viewport pixel.
    pub fn project_to_viewport(&self, coord: LatLng) -> PixelPoint {
        self.projection.project(coord, self.zoom) - self.top_left()
    }

    /// Viewport pixel to geographic coordinate.
    pub fn unproject_viewport(&self, point: PixelPoint) -> LatLng {
        self.projection
            .unproject(point + self.top_left(), self.zoom)
    }

    /// Geographic region currently visible.
    pub fn bounds(&self) -> GeoBounds {
        let north_west = self.unproject_viewport(PixelPoint::new(0.0, 0.0));
        let south_east =
            self.unproject_viewport(PixelPoint::new(self.width as f64, self.height as f64));
        GeoBounds::new(south_east.lat, north_west.lng, north_west.lat, south_east.lng)
    }

    /// Move the viewport by a pixel offset (positive x pans east, y south).
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let center = self.projection.project(self.center, self.zoom) + PixelPoint::new(dx, dy);
        self.center = self.projection.unproject(center, self.zoom);
    }

    pub fn set_center(&mut self, center: LatLng) {
        self.center = LatLng::new(center.lat, center.lng);
    }

    /// Change zoom, clamped to the viewport's zoom range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}
