//! Tests for point aggregation against the reference Web Mercator viewport.

use heatmap_common::{HeatPoint, IntensityCap, RenderOptions};
use heatmap_layer::{aggregate, MapView, EPSILON};
use test_utils::{
    assert_approx_eq, assert_coords_approx_eq, clustered_points, lattice_points, london_points,
    london_viewport, regions,
};

// ============================================================================
// Helper functions
// ============================================================================

fn options_with_max_zoom(max_zoom: f64) -> RenderOptions {
    RenderOptions {
        max_zoom: Some(max_zoom),
        ..RenderOptions::default()
    }
}

// ============================================================================
// London scenarios
// ============================================================================

#[test]
fn test_london_full_intensity() {
    let viewport = london_viewport(13.0);
    let result = aggregate(&london_points(), &options_with_max_zoom(13.0), &viewport).unwrap();

    assert_eq!(result.attenuation, 1.0);
    assert_eq!(result.effective_max, 1.0);
    assert_eq!(result.cell_size, 12.0);

    let intensities: Vec<f32> = result.blobs.iter().map(|b| b.intensity).collect();
    assert_eq!(intensities, vec![0.8, 0.5, 1.0]);
}

#[test]
fn test_london_two_levels_below_full_intensity() {
    let viewport = london_viewport(13.0);
    let result = aggregate(&london_points(), &options_with_max_zoom(15.0), &viewport).unwrap();

    assert_eq!(result.attenuation, 0.25);
    assert_eq!(result.effective_max, 0.25);

    let intensities: Vec<f32> = result.blobs.iter().map(|b| b.intensity).collect();
    assert_eq!(intensities, vec![0.8, 0.5, 1.0]);
}

#[test]
fn test_blob_sits_on_projected_point() {
    let viewport = london_viewport(13.0);
    let result = aggregate(&london_points(), &options_with_max_zoom(13.0), &viewport).unwrap();

    // The first point is the viewport centre.
    let first = result.blobs[0];
    assert_coords_approx_eq!((first.x, first.y), (400.0, 300.0), 1e-3);
}

#[test]
fn test_max_zoom_falls_back_to_map() {
    let viewport = london_viewport(13.0).with_max_zoom(14.0);
    let result = aggregate(&london_points(), &RenderOptions::default(), &viewport).unwrap();
    assert_eq!(result.attenuation, 0.5);
}

// ============================================================================
// Normalisation
// ============================================================================

#[test]
fn test_auto_max_includes_offscreen_points() {
    let mut points = london_points();
    // Paris, far outside the London viewport
    points.push(HeatPoint::new(48.85, 2.35, 5.0));

    let viewport = london_viewport(13.0);
    let result = aggregate(&points, &options_with_max_zoom(13.0), &viewport).unwrap();

    assert_eq!(result.effective_max, 5.0);
    assert_eq!(result.blobs.len(), 3);
    assert_approx_eq!(result.blobs[2].intensity, 0.2, 1e-6);
}

#[test]
fn test_effective_max_is_pan_invariant() {
    let points = clustered_points(11, 6, 40, regions::LONDON, 0.01);
    let options = options_with_max_zoom(14.0);
    let mut viewport = london_viewport(13.0);

    let before = aggregate(&points, &options, &viewport).unwrap();
    viewport.pan_by(1500.0, -900.0);
    let after = aggregate(&points, &options, &viewport).unwrap();

    assert_eq!(before.effective_max, after.effective_max);
}

#[test]
fn test_manual_cap_is_used_as_is() {
    let options = RenderOptions {
        max: IntensityCap::Fixed(4.0),
        max_zoom: Some(13.0),
        ..RenderOptions::default()
    };
    let result = aggregate(&london_points(), &options, &london_viewport(13.0)).unwrap();

    assert_eq!(result.effective_max, 4.0);
    assert_approx_eq!(result.blobs[2].intensity, 0.25, 1e-6);
}

#[test]
fn test_all_zero_intensity_keeps_positive_max() {
    let points: Vec<HeatPoint> = london_points()
        .into_iter()
        .map(|p| HeatPoint::new(p.lat, p.lng, 0.0))
        .collect();
    let result = aggregate(&points, &options_with_max_zoom(13.0), &london_viewport(13.0)).unwrap();

    assert_eq!(result.effective_max, EPSILON);
    assert_eq!(result.blobs.len(), 3);
    assert!(result.blobs.iter().all(|b| b.intensity == 0.0));
    assert!(result.blobs.iter().all(|b| b.x.is_finite() && b.y.is_finite()));
}

#[test]
fn test_separate_cells_never_exceed_one() {
    let mut points = lattice_points(5, 5, regions::LONDON, 1.0);
    for (k, p) in points.iter_mut().enumerate() {
        p.intensity = (k + 1) as f64 / 25.0;
    }

    let viewport = london_viewport(12.0);
    let result = aggregate(&points, &options_with_max_zoom(12.0), &viewport).unwrap();

    assert!(!result.blobs.is_empty());
    assert!(result.blobs.iter().all(|b| b.intensity <= 1.0));
}

// ============================================================================
// Grid behaviour
// ============================================================================

#[test]
fn test_points_sharing_a_cell_merge() {
    let points = vec![
        HeatPoint::new(51.5, -0.09, 1.0),
        HeatPoint::new(51.5, -0.09, 3.0),
    ];
    let result = aggregate(&points, &options_with_max_zoom(13.0), &london_viewport(13.0)).unwrap();

    assert_eq!(result.blobs.len(), 1);
    // Both points weigh into one cell: (1 + 3) / 3
    assert_approx_eq!(result.blobs[0].intensity, 4.0 / 3.0, 1e-6);
}

#[test]
fn test_grid_is_stable_under_pan() {
    let points = clustered_points(3, 5, 30, test_utils::london_bounds(), 0.002);
    let options = options_with_max_zoom(13.0);
    let mut viewport = london_viewport(13.0);

    let before = aggregate(&points, &options, &viewport).unwrap();
    viewport.pan_by(37.0, 11.0);
    let after = aggregate(&points, &options, &viewport).unwrap();

    assert_eq!(before.blobs.len(), after.blobs.len());
    for (a, b) in before.blobs.iter().zip(after.blobs.iter()) {
        assert_coords_approx_eq!((a.x - 37.0, a.y - 11.0), (b.x, b.y), 1e-3);
        assert_eq!(a.intensity, b.intensity);
    }
}

#[test]
fn test_points_outside_padding_are_skipped() {
    let viewport = london_viewport(13.0);
    let far = HeatPoint::new(51.5, 1.0, 1.0);
    let mut points = london_points();
    points.push(far);

    let result = aggregate(&points, &options_with_max_zoom(13.0), &viewport).unwrap();
    assert_eq!(result.blobs.len(), 3);
    assert!(!result.padded_bounds.contains(far.lat, far.lng));
}

#[test]
fn test_padding_covers_full_radius() {
    let viewport = london_viewport(13.0);
    let visible = viewport.visible_bounds();
    let result = aggregate(&london_points(), &RenderOptions::default(), &viewport).unwrap();

    // 40 px of padding on an 800 px wide view
    let expected = visible.lng_span() * 40.0 / 800.0;
    assert_approx_eq!(visible.west - result.padded_bounds.west, expected, 1e-9);
    assert_approx_eq!(result.padded_bounds.east - visible.east, expected, 1e-9);
}

#[test]
fn test_zero_viewport_yields_nothing() {
    let mut viewport = london_viewport(13.0);
    viewport.resize(0, 600);
    assert!(aggregate(&london_points(), &RenderOptions::default(), &viewport).is_none());
}

#[test]
fn test_aggregation_is_idempotent() {
    let points = clustered_points(5, 4, 50, regions::LONDON, 0.01);
    let viewport = london_viewport(13.0);
    let options = RenderOptions::default();

    let first = aggregate(&points, &options, &viewport);
    let second = aggregate(&points, &options, &viewport);
    assert_eq!(first, second);
}
