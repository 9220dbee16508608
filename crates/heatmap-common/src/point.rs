//! Geographic and pixel-space point types.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Intensity assigned to points that do not carry one.
pub const DEFAULT_INTENSITY: f64 = 1.0;

/// A geographic coordinate with an optional intensity attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub intensity: Option<f64>,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            intensity: None,
        }
    }

    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = Some(intensity);
        self
    }
}

/// A weighted geographic point in the heatmap dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatPoint {
    pub lat: f64,
    pub lng: f64,
    #[serde(default = "default_intensity")]
    pub intensity: f64,
}

fn default_intensity() -> f64 {
    DEFAULT_INTENSITY
}

impl HeatPoint {
    pub fn new(lat: f64, lng: f64, intensity: f64) -> Self {
        Self {
            lat,
            lng,
            intensity,
        }
    }

    /// The point's coordinate without its weight.
    pub fn lat_lng(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

impl From<(f64, f64)> for HeatPoint {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng, DEFAULT_INTENSITY)
    }
}

impl From<(f64, f64, f64)> for HeatPoint {
    fn from((lat, lng, intensity): (f64, f64, f64)) -> Self {
        Self::new(lat, lng, intensity)
    }
}

impl From<[f64; 2]> for HeatPoint {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self::new(lat, lng, DEFAULT_INTENSITY)
    }
}

impl From<[f64; 3]> for HeatPoint {
    fn from([lat, lng, intensity]: [f64; 3]) -> Self {
        Self::new(lat, lng, intensity)
    }
}

impl From<LatLng> for HeatPoint {
    fn from(coord: LatLng) -> Self {
        Self::new(
            coord.lat,
            coord.lng,
            coord.intensity.unwrap_or(DEFAULT_INTENSITY),
        )
    }
}

/// A position in some pixel space (viewport or world).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for PixelPoint {
    type Output = PixelPoint;

    fn add(self, rhs: PixelPoint) -> PixelPoint {
        PixelPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for PixelPoint {
    type Output = PixelPoint;

    fn sub(self, rhs: PixelPoint) -> PixelPoint {
        PixelPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for PixelPoint {
    type Output = PixelPoint;

    fn mul(self, rhs: f64) -> PixelPoint {
        PixelPoint::new(self.x * rhs, self.y * rhs)
    }
}

/// A screen-space aggregate consumed by the painter.
///
/// `intensity` is normalised against the dataset maximum, so it is nominally
/// within `[0, 1]` but may exceed 1 under a manual cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blob {
    pub x: f32,
    pub y: f32,
    pub intensity: f32,
}

impl Blob {
    pub fn new(x: f32, y: f32, intensity: f32) -> Self {
        Self { x, y, intensity }
    }
}
