//! Render options for the heatmap layer.
//!
//! Options are plain data with serde support, so a host can keep them in a
//! JSON document next to the rest of its map configuration:
//!
//! ```json
//! {
//!   "radius": 30,
//!   "blur": 10,
//!   "max": { "fixed": 4.0 },
//!   "gradient": [
//!     { "position": 0.0, "color": "blue" },
//!     { "position": 1.0, "color": "#FF0000" }
//!   ]
//! }
//! ```

use crate::error::{HeatmapError, HeatmapResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete set of options driving aggregation and painting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Radius of each point's disk in pixels
    pub radius: f64,

    /// Width of the soft edge around each disk in pixels
    pub blur: f64,

    /// Opacity floor for every stamped blob
    pub min_opacity: f64,

    /// Zoom level at which points reach full intensity; falls back to the
    /// host map's maximum zoom
    pub max_zoom: Option<f64>,

    /// Normalisation cap
    pub max: IntensityCap,

    /// Colour ramp applied to the accumulated alpha
    pub gradient: Gradient,

    /// Duration of the post-zoom crossfade; 0 disables it
    pub crossfade_ms: u64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            radius: 25.0,
            blur: 15.0,
            min_opacity: 0.05,
            max_zoom: None,
            max: IntensityCap::Auto,
            gradient: Gradient::default(),
            crossfade_ms: 0,
        }
    }
}

impl RenderOptions {
    /// Parse options from a JSON string; absent fields keep their defaults.
    pub fn from_json(json: &str) -> HeatmapResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load options from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> HeatmapResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Radius plus blur: how far a blob paints from its centre.
    pub fn full_radius(&self) -> f64 {
        self.radius + self.blur
    }

    /// Apply the fields present in `update`, leaving the rest untouched.
    pub fn merge(&mut self, update: OptionsUpdate) -> OptionsChange {
        let mut change = OptionsChange::default();

        if let Some(radius) = update.radius {
            change.geometry |= radius != self.radius;
            self.radius = radius;
        }
        if let Some(blur) = update.blur {
            change.geometry |= blur != self.blur;
            self.blur = blur;
        }
        if let Some(min_opacity) = update.min_opacity {
            change.min_opacity = min_opacity != self.min_opacity;
            self.min_opacity = min_opacity;
        }
        if let Some(gradient) = update.gradient {
            change.gradient = gradient != self.gradient;
            self.gradient = gradient;
        }
        if let Some(max_zoom) = update.max_zoom {
            change.normalization |= max_zoom != self.max_zoom;
            self.max_zoom = max_zoom;
        }
        if let Some(max) = update.max {
            change.normalization |= max != self.max;
            self.max = max;
        }
        if let Some(crossfade_ms) = update.crossfade_ms {
            self.crossfade_ms = crossfade_ms;
        }

        change
    }

    /// Check the options for values the renderer cannot draw sensibly.
    ///
    /// The layer never calls this itself; hosts that accept options from
    /// users should run it before handing them over.
    pub fn validate(&self) -> HeatmapResult<()> {
        if !(self.radius >= 0.0) {
            return Err(HeatmapError::Validation(format!(
                "radius must be non-negative, got {}",
                self.radius
            )));
        }
        if !(self.blur >= 0.0) {
            return Err(HeatmapError::Validation(format!(
                "blur must be non-negative, got {}",
                self.blur
            )));
        }
        if !(0.0..=1.0).contains(&self.min_opacity) {
            return Err(HeatmapError::Validation(format!(
                "min_opacity must be within [0, 1], got {}",
                self.min_opacity
            )));
        }
        if let IntensityCap::Fixed(cap) = self.max {
            if !(cap > 0.0) {
                return Err(HeatmapError::Validation(format!(
                    "fixed intensity cap must be positive, got {}",
                    cap
                )));
            }
        }
        self.gradient.validate()
    }
}

/// How the normalisation maximum is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityCap {
    /// Largest zoom-attenuated intensity across the whole dataset
    #[default]
    Auto,

    /// Caller-supplied maximum
    Fixed(f64),
}

/// A partial options update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsUpdate {
    pub radius: Option<f64>,
    pub blur: Option<f64>,
    pub min_opacity: Option<f64>,
    /// `Some(None)` (JSON `null`) reverts to the host map's maximum zoom
    #[serde(
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_zoom: Option<Option<f64>>,
    pub max: Option<IntensityCap>,
    pub gradient: Option<Gradient>,
    pub crossfade_ms: Option<u64>,
}

impl OptionsUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a partial update from JSON.
    pub fn from_json(json: &str) -> HeatmapResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn blur(mut self, blur: f64) -> Self {
        self.blur = Some(blur);
        self
    }

    pub fn min_opacity(mut self, min_opacity: f64) -> Self {
        self.min_opacity = Some(min_opacity);
        self
    }

    pub fn max_zoom(mut self, max_zoom: f64) -> Self {
        self.max_zoom = Some(Some(max_zoom));
        self
    }

    /// Fall back to the host map's maximum zoom again.
    pub fn clear_max_zoom(mut self) -> Self {
        self.max_zoom = Some(None);
        self
    }

    pub fn max(mut self, max: IntensityCap) -> Self {
        self.max = Some(max);
        self
    }

    pub fn gradient(mut self, gradient: Gradient) -> Self {
        self.gradient = Some(gradient);
        self
    }

    pub fn crossfade_ms(mut self, crossfade_ms: u64) -> Self {
        self.crossfade_ms = Some(crossfade_ms);
        self
    }
}

/// Deserialize a field that is present, possibly as `null`, into `Some(_)`.
/// Absent fields never reach this and take the `None` default.
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<f64>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer).map(Some)
}

/// Which option groups an update actually changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionsChange {
    /// Radius or blur: the stamp image must be rebuilt
    pub geometry: bool,
    pub min_opacity: bool,
    /// The palette must be rebuilt
    pub gradient: bool,
    /// Zoom of full intensity or the intensity cap
    pub normalization: bool,
}

impl OptionsChange {
    pub fn any(&self) -> bool {
        self.geometry || self.min_opacity || self.gradient || self.normalization
    }
}

/// Colour ramp made of positioned stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gradient {
    pub stops: Vec<GradientStop>,
}

impl Default for Gradient {
    fn default() -> Self {
        Self::from_pairs([
            (0.4, "blue"),
            (0.6, "cyan"),
            (0.7, "lime"),
            (0.8, "yellow"),
            (1.0, "red"),
        ])
    }
}

impl Gradient {
    pub fn new(stops: Vec<GradientStop>) -> Self {
        Self { stops }
    }

    /// Build a gradient from `(position, colour)` pairs, e.g. `(0.0, "blue")`.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (f64, &'a str)>,
    {
        Self {
            stops: pairs
                .into_iter()
                .map(|(position, color)| GradientStop {
                    position,
                    color: Color::Text(color.to_string()),
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Stops ordered by ascending position.
    ///
    /// The sort is stable: stops sharing a position keep their input order.
    pub fn sorted_stops(&self) -> Vec<GradientStop> {
        let mut stops = self.stops.clone();
        stops.sort_by(|a, b| {
            a.position
                .partial_cmp(&b.position)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        stops
    }

    pub fn validate(&self) -> HeatmapResult<()> {
        if self.stops.is_empty() {
            return Err(HeatmapError::Validation(
                "gradient must have at least one stop".to_string(),
            ));
        }
        for stop in &self.stops {
            if !(0.0..=1.0).contains(&stop.position) {
                return Err(HeatmapError::Validation(format!(
                    "gradient stop position {} is outside [0, 1]",
                    stop.position
                )));
            }
        }
        Ok(())
    }
}

/// A colour at a position along the gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position in `[0, 1]`
    pub position: f64,
    pub color: Color,
}

/// Color representation supporting multiple formats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    /// "#RRGGBB", "#RRGGBBAA" or a named colour
    Text(String),

    /// RGB array: [r, g, b] or [r, g, b, a]
    Array(Vec<u8>),

    /// Explicit RGBA
    Rgba { r: u8, g: u8, b: u8, a: u8 },
}

impl Color {
    /// Convert to RGBA tuple.
    pub fn to_rgba(&self) -> (u8, u8, u8, u8) {
        match self {
            Color::Text(s) if s.starts_with('#') => parse_hex_color(s),
            Color::Text(name) => named_color(name),
            Color::Array(arr) => {
                let r = arr.first().copied().unwrap_or(0);
                let g = arr.get(1).copied().unwrap_or(0);
                let b = arr.get(2).copied().unwrap_or(0);
                let a = arr.get(3).copied().unwrap_or(255);
                (r, g, b, a)
            }
            Color::Rgba { r, g, b, a } => (*r, *g, *b, *a),
        }
    }
}

fn parse_hex_color(s: &str) -> (u8, u8, u8, u8) {
    let s = s.trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>, fallback: u8| {
        s.get(range)
            .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            .unwrap_or(fallback)
    };

    match s.len() {
        6 => (channel(0..2, 0), channel(2..4, 0), channel(4..6, 0), 255),
        8 => (
            channel(0..2, 0),
            channel(2..4, 0),
            channel(4..6, 0),
            channel(6..8, 255),
        ),
        _ => (0, 0, 0, 255),
    }
}

fn named_color(name: &str) -> (u8, u8, u8, u8) {
    match name.to_lowercase().as_str() {
        "transparent" => (0, 0, 0, 0),
        "black" => (0, 0, 0, 255),
        "white" => (255, 255, 255, 255),
        "red" => (255, 0, 0, 255),
        "lime" => (0, 255, 0, 255),
        "green" => (0, 128, 0, 255),
        "blue" => (0, 0, 255, 255),
        "yellow" => (255, 255, 0, 255),
        "cyan" | "aqua" => (0, 255, 255, 255),
        "magenta" | "fuchsia" => (255, 0, 255, 255),
        "orange" => (255, 165, 0, 255),
        "purple" => (128, 0, 128, 255),
        "navy" => (0, 0, 128, 255),
        "gray" | "grey" => (128, 128, 128, 255),
        _ => (0, 0, 0, 255),
    }
}
