//! Geographic bounding regions.

use serde::{Deserialize, Serialize};

/// A geographic bounding region in decimal degrees.
///
/// `GeoBounds::empty()` is the explicitly invalid region: its south edge lies
/// north of its north edge, so it contains nothing until extended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    /// Create a new region from its edges.
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// The empty (invalid) region.
    pub fn empty() -> Self {
        Self {
            south: f64::INFINITY,
            west: f64::INFINITY,
            north: f64::NEG_INFINITY,
            east: f64::NEG_INFINITY,
        }
    }

    /// Smallest region covering every `(lat, lng)` pair.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut bounds = Self::empty();
        for (lat, lng) in points {
            bounds.extend(lat, lng);
        }
        bounds
    }

    /// Whether this region encloses at least one coordinate.
    pub fn is_valid(&self) -> bool {
        self.south <= self.north && self.west <= self.east
    }

    /// Grow the region to include a coordinate.
    pub fn extend(&mut self, lat: f64, lng: f64) {
        self.south = self.south.min(lat);
        self.north = self.north.max(lat);
        self.west = self.west.min(lng);
        self.east = self.east.max(lng);
    }

    /// Latitude span in degrees.
    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    /// Longitude span in degrees.
    pub fn lng_span(&self) -> f64 {
        self.east - self.west
    }

    /// Region grown outward by the given number of degrees on every side.
    pub fn pad_degrees(&self, d_lat: f64, d_lng: f64) -> Self {
        Self {
            south: self.south - d_lat,
            west: self.west - d_lng,
            north: self.north + d_lat,
            east: self.east + d_lng,
        }
    }

    /// Check if a coordinate lies inside the region (edges inclusive).
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.south && lat <= self.north && lng >= self.west && lng <= self.east
    }

    /// Geographic centre of the region.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }
}

impl Default for GeoBounds {
    fn default() -> Self {
        Self::empty()
    }
}
