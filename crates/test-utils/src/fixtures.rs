//! Common test fixtures for heatmap tests.
//!
//! Pre-defined datasets and viewports that recur across the suite.

use heatmap_common::{GeoBounds, HeatPoint, LatLng};
use projection::Viewport;

/// Common geographic regions for testing.
pub mod regions {
    use heatmap_common::GeoBounds;

    /// Central London, a few kilometres across
    pub const LONDON: GeoBounds = GeoBounds {
        south: 51.45,
        west: -0.2,
        north: 51.55,
        east: 0.0,
    };

    /// Continental United States
    pub const CONUS: GeoBounds = GeoBounds {
        south: 20.0,
        west: -130.0,
        north: 55.0,
        east: -60.0,
    };
}

/// Three weighted points in central London; the third is the hotspot.
pub fn london_points() -> Vec<HeatPoint> {
    vec![
        HeatPoint::new(51.5, -0.09, 0.8),
        HeatPoint::new(51.51, -0.1, 0.5),
        HeatPoint::new(51.49, -0.08, 1.0),
    ]
}

/// An 800x600 viewport centred on the London points.
pub fn london_viewport(zoom: f64) -> Viewport {
    Viewport::new(LatLng::new(51.5, -0.09), zoom, 800, 600)
}

/// Bounds of the London points, for sanity checks.
pub fn london_bounds() -> GeoBounds {
    GeoBounds::from_points(london_points().iter().map(|p| (p.lat, p.lng)))
}
