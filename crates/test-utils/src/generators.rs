//! Seeded point generators for property-style tests and benchmarks.
//!
//! Every generator takes an explicit seed so failures reproduce.

use heatmap_common::{GeoBounds, HeatPoint};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniformly scattered points with intensities in `[0, max_intensity)`.
///
/// # Example
///
/// ```
/// use test_utils::{random_points, regions};
///
/// let points = random_points(7, 100, regions::LONDON, 2.0);
/// assert_eq!(points.len(), 100);
/// assert!(points.iter().all(|p| regions::LONDON.contains(p.lat, p.lng)));
/// ```
pub fn random_points(
    seed: u64,
    count: usize,
    bounds: GeoBounds,
    max_intensity: f64,
) -> Vec<HeatPoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            HeatPoint::new(
                rng.gen_range(bounds.south..=bounds.north),
                rng.gen_range(bounds.west..=bounds.east),
                rng.gen_range(0.0..max_intensity),
            )
        })
        .collect()
}

/// Points gathered around a few random centres, as real density data is.
///
/// `spread` is the half-width of each cluster in degrees.
pub fn clustered_points(
    seed: u64,
    clusters: usize,
    per_cluster: usize,
    bounds: GeoBounds,
    spread: f64,
) -> Vec<HeatPoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(clusters * per_cluster);

    for _ in 0..clusters {
        let lat = rng.gen_range(bounds.south..=bounds.north);
        let lng = rng.gen_range(bounds.west..=bounds.east);
        for _ in 0..per_cluster {
            points.push(HeatPoint::new(
                (lat + rng.gen_range(-spread..=spread)).clamp(bounds.south, bounds.north),
                (lng + rng.gen_range(-spread..=spread)).clamp(bounds.west, bounds.east),
                rng.gen_range(0.1..1.0),
            ));
        }
    }
    points
}

/// Points on a regular `rows x cols` lattice, all with the same intensity.
pub fn lattice_points(rows: usize, cols: usize, bounds: GeoBounds, intensity: f64) -> Vec<HeatPoint> {
    let lat_step = bounds.lat_span() / rows.max(2).saturating_sub(1) as f64;
    let lng_step = bounds.lng_span() / cols.max(2).saturating_sub(1) as f64;
    let mut points = Vec::with_capacity(rows * cols);

    for r in 0..rows {
        for c in 0..cols {
            points.push(HeatPoint::new(
                bounds.south + r as f64 * lat_step,
                bounds.west + c as f64 * lng_step,
                intensity,
            ));
        }
    }
    points
}
