//! Spherical Web Mercator (EPSG:3857) in world-pixel units.
//!
//! World pixels are the coordinate space of a slippy map: at zoom `z` the
//! whole world is a square of `tile_size * 2^z` pixels, origin at the
//! north-west corner (lat 85.05°, lng -180°), y growing southward. A point's
//! world-pixel position depends only on the zoom, never on where the
//! viewport currently sits, which is what makes it a stable space for
//! spatial binning.

use heatmap_common::{LatLng, PixelPoint};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Latitude at which the Mercator square is cut off.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Standard slippy-map tile size in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Convert latitude (degrees) to the normalized Mercator Y coordinate.
///
/// The result is in radians of the Mercator plane: 0 at the equator,
/// positive northward, ±π at the cut-off latitude.
pub fn lat_to_mercator_y(lat: f64) -> f64 {
    let lat_rad = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    ((PI / 4.0) + (lat_rad / 2.0)).tan().ln()
}

/// Convert a normalized Mercator Y coordinate back to latitude (degrees).
pub fn mercator_y_to_lat(y: f64) -> f64 {
    (2.0 * y.exp().atan() - PI / 2.0).to_degrees()
}

/// Web Mercator projection to world pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WebMercator {
    pub tile_size: f64,
}

impl Default for WebMercator {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
        }
    }
}

impl WebMercator {
    pub fn new(tile_size: f64) -> Self {
        Self { tile_size }
    }

    /// Side length of the world square at `zoom`, in pixels.
    pub fn world_size(&self, zoom: f64) -> f64 {
        self.tile_size * 2f64.powf(zoom)
    }

    /// Ratio between world pixel sizes at two zoom levels.
    pub fn zoom_scale(&self, to_zoom: f64, from_zoom: f64) -> f64 {
        2f64.powf(to_zoom - from_zoom)
    }

    /// Geographic coordinate to world pixel at `zoom`.
    pub fn project(&self, coord: LatLng, zoom: f64) -> PixelPoint {
        let size = self.world_size(zoom);
        let x = (coord.lng + 180.0) / 360.0 * size;
        let y = (0.5 - lat_to_mercator_y(coord.lat) / (2.0 * PI)) * size;
        PixelPoint::new(x, y)
    }

    /// World pixel at `zoom` back to a geographic coordinate.
    pub fn unproject(&self, point: PixelPoint, zoom: f64) -> LatLng {
        let size = self.world_size(zoom);
        let lng = point.x / size * 360.0 - 180.0;
        let lat = mercator_y_to_lat((0.5 - point.y / size) * 2.0 * PI);
        LatLng::new(lat, lng)
    }
}
