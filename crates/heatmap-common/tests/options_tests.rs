//! Tests for render option parsing, merging and validation.

use heatmap_common::{Color, Gradient, HeatmapError, IntensityCap, OptionsUpdate, RenderOptions};

// ============================================================================
// Merge tests
// ============================================================================

#[test]
fn test_radius_blur_round_trip() {
    let mut options = RenderOptions::default();
    options.merge(OptionsUpdate::new().radius(30.0).blur(10.0));
    assert_eq!(options.radius, 30.0);
    assert_eq!(options.blur, 10.0);
}

#[test]
fn test_partial_update_keeps_other_fields() {
    let mut options = RenderOptions::default();
    options.merge(OptionsUpdate::new().min_opacity(0.2));
    options.merge(OptionsUpdate::new().radius(12.0));

    assert_eq!(options.min_opacity, 0.2);
    assert_eq!(options.radius, 12.0);
    assert_eq!(options.blur, 15.0);
    assert_eq!(options.gradient, Gradient::default());
}

#[test]
fn test_gradient_change_flagged() {
    let mut options = RenderOptions::default();
    let change = options.merge(
        OptionsUpdate::new().gradient(Gradient::from_pairs([(0.0, "blue"), (1.0, "red")])),
    );
    assert!(change.gradient);
    assert!(!change.geometry);
    assert!(change.any());
}

#[test]
fn test_cap_change_flagged_as_normalization() {
    let mut options = RenderOptions::default();
    let change = options.merge(OptionsUpdate::new().max(IntensityCap::Fixed(3.0)));
    assert!(change.normalization);
    assert_eq!(options.max, IntensityCap::Fixed(3.0));
}

#[test]
fn test_crossfade_is_not_a_render_change() {
    let mut options = RenderOptions::default();
    let change = options.merge(OptionsUpdate::new().crossfade_ms(250));
    assert!(!change.any());
    assert_eq!(options.crossfade_ms, 250);
}

// ============================================================================
// JSON tests
// ============================================================================

#[test]
fn test_options_from_json() {
    let json = r##"{
        "radius": 30,
        "blur": 10,
        "max_zoom": 18,
        "gradient": [
            {"position": 0.0, "color": "blue"},
            {"position": 1.0, "color": "#FF0000"}
        ]
    }"##;
    let options = RenderOptions::from_json(json).unwrap();
    assert_eq!(options.radius, 30.0);
    assert_eq!(options.blur, 10.0);
    assert_eq!(options.max_zoom, Some(18.0));
    assert_eq!(options.min_opacity, 0.05);
    assert_eq!(options.gradient.stops.len(), 2);
    assert_eq!(options.gradient.stops[1].color.to_rgba(), (255, 0, 0, 255));
}

#[test]
fn test_update_from_json() {
    let update = OptionsUpdate::from_json(r#"{"radius": 40}"#).unwrap();
    assert_eq!(update.radius, Some(40.0));
    assert_eq!(update.blur, None);
}

#[test]
fn test_color_formats_from_json() {
    let json = r#"[
        {"position": 0.0, "color": [10, 20, 30]},
        {"position": 0.5, "color": {"r": 1, "g": 2, "b": 3, "a": 4}},
        {"position": 1.0, "color": "yellow"}
    ]"#;
    let gradient: Gradient = serde_json::from_str(json).unwrap();
    assert_eq!(gradient.stops[0].color, Color::Array(vec![10, 20, 30]));
    assert_eq!(gradient.stops[1].color.to_rgba(), (1, 2, 3, 4));
    assert_eq!(gradient.stops[2].color.to_rgba(), (255, 255, 0, 255));
}

#[test]
fn test_invalid_json_is_config_error() {
    let result = RenderOptions::from_json("{radius: ");
    assert!(matches!(result, Err(HeatmapError::Config(_))));
}

#[test]
fn test_from_missing_file() {
    let result = RenderOptions::from_file("/nonexistent/heatmap.json");
    assert!(matches!(result, Err(HeatmapError::Config(_))));
}

// ============================================================================
// Validation tests
// ============================================================================

#[test]
fn test_default_options_validate() {
    RenderOptions::default().validate().unwrap();
}

#[test]
fn test_validate_rejects_negative_radius() {
    let mut options = RenderOptions::default();
    options.merge(OptionsUpdate::new().radius(-1.0));
    assert!(matches!(options.validate(), Err(HeatmapError::Validation(_))));
}

#[test]
fn test_validate_rejects_opacity_out_of_range() {
    let mut options = RenderOptions::default();
    options.merge(OptionsUpdate::new().min_opacity(1.5));
    assert!(options.validate().is_err());
}

#[test]
fn test_validate_rejects_zero_cap() {
    let mut options = RenderOptions::default();
    options.merge(OptionsUpdate::new().max(IntensityCap::Fixed(0.0)));
    assert!(options.validate().is_err());
}

#[test]
fn test_validate_rejects_empty_gradient() {
    let mut options = RenderOptions::default();
    options.merge(OptionsUpdate::new().gradient(Gradient::new(vec![])));
    assert!(options.validate().is_err());
}
