//! Projection and spatial binning of heat points into pixel blobs.
//!
//! Every render rebuilds the grid from scratch:
//!
//! 1. Pad the visible bounds by the blob's full radius so points just
//!    outside the viewport still paint their edge into it.
//! 2. Attenuate intensities by zoom: `v = 2^-clamp(max_zoom - zoom, 0, 12)`.
//! 3. Normalise against the maximum attenuated intensity of the whole
//!    dataset (or a manual cap), so colours do not shift while panning.
//! 4. Bin the points on a grid keyed in world pixels (stable under pans) and
//!    emit one intensity-weighted centroid per non-empty cell.

use crate::host::MapView;
use heatmap_common::{Blob, GeoBounds, HeatPoint, IntensityCap, RenderOptions};
use std::collections::HashMap;

/// Lower bound of the normalisation factor.
pub const EPSILON: f64 = 1e-10;

/// Number of zoom levels after which attenuation stops decaying.
pub const MAX_ATTENUATION_LEVELS: f64 = 12.0;

/// Result of binning one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    /// Blobs in the order their cells were first hit
    pub blobs: Vec<Blob>,
    /// Normalisation factor, always > 0
    pub effective_max: f64,
    /// Zoom attenuation `v`
    pub attenuation: f64,
    /// Grid cell side in world pixels
    pub cell_size: f64,
    /// Visible bounds grown by the full blob radius
    pub padded_bounds: GeoBounds,
}

/// Intensity multiplier at `zoom` when full intensity is reached at
/// `max_zoom`. Halves per level below `max_zoom`, bottoming out after
/// twelve levels.
pub fn zoom_attenuation(max_zoom: f64, zoom: f64) -> f64 {
    2f64.powf(-(max_zoom - zoom).clamp(0.0, MAX_ATTENUATION_LEVELS))
}

/// Maximum attenuated intensity over the whole dataset, floored at
/// [`EPSILON`].
pub fn auto_max(points: &[HeatPoint], attenuation: f64) -> f64 {
    points
        .iter()
        .map(|p| p.intensity * attenuation)
        .fold(0.0, f64::max)
        .max(EPSILON)
}

/// Running sums for one grid cell.
#[derive(Debug, Default, Clone, Copy)]
struct Cell {
    weighted_x: f64,
    weighted_y: f64,
    weight: f64,
    sum_x: f64,
    sum_y: f64,
    count: u32,
}

impl Cell {
    fn add(&mut self, x: f64, y: f64, weight: f64) {
        self.weighted_x += x * weight;
        self.weighted_y += y * weight;
        self.weight += weight;
        self.sum_x += x;
        self.sum_y += y;
        self.count += 1;
    }

    fn blob(&self, effective_max: f64) -> Blob {
        if self.weight > 0.0 {
            Blob::new(
                (self.weighted_x / self.weight) as f32,
                (self.weighted_y / self.weight) as f32,
                (self.weight / effective_max) as f32,
            )
        } else {
            // Zero-weight cells still mark where the points are.
            let n = self.count.max(1) as f64;
            Blob::new((self.sum_x / n) as f32, (self.sum_y / n) as f32, 0.0)
        }
    }
}

/// Project and bin `points` for the current state of `map`.
///
/// Returns `None` when the viewport has no area yet.
pub fn aggregate<M>(points: &[HeatPoint], options: &RenderOptions, map: &M) -> Option<Aggregation>
where
    M: MapView + ?Sized,
{
    let (width, height) = map.viewport_size();
    if width == 0 || height == 0 {
        return None;
    }

    let full = options.full_radius();
    let bounds = map.visible_bounds();
    let padded_bounds = bounds.pad_degrees(
        full * bounds.lat_span() / height as f64,
        full * bounds.lng_span() / width as f64,
    );

    let zoom = map.zoom();
    let max_zoom = options.max_zoom.unwrap_or_else(|| map.max_zoom());
    let attenuation = zoom_attenuation(max_zoom, zoom);

    let effective_max = match options.max {
        IntensityCap::Fixed(cap) => cap.max(EPSILON),
        IntensityCap::Auto => auto_max(points, attenuation),
    };

    let cell_size = (options.radius / 2.0).floor().max(1.0);
    let mut index: HashMap<(i64, i64), usize> = HashMap::new();
    let mut cells: Vec<Cell> = Vec::new();

    for point in points {
        if !padded_bounds.contains(point.lat, point.lng) {
            continue;
        }

        let coord = point.lat_lng();
        let world = map.project_to_world(coord, zoom);
        let view = map.project_to_viewport(coord);
        let key = (
            (world.x / cell_size).floor() as i64,
            (world.y / cell_size).floor() as i64,
        );

        let slot = *index.entry(key).or_insert_with(|| {
            cells.push(Cell::default());
            cells.len() - 1
        });
        cells[slot].add(view.x, view.y, point.intensity * attenuation);
    }

    let blobs = cells.iter().map(|c| c.blob(effective_max)).collect();

    Some(Aggregation {
        blobs,
        effective_max,
        attenuation,
        cell_size,
        padded_bounds,
    })
}
