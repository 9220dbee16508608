//! Gradient palette used to colour the stamped alpha raster.
//!
//! The gradient is rasterised once into a 256-pixel strip; pixel `i` of the
//! strip becomes the colour of every heatmap pixel whose alpha is `i`.

use heatmap_common::{Gradient, HeatmapError, HeatmapResult};
use tiny_skia::{Color, LinearGradient, Paint, Pixmap, Point, Rect, SpreadMode, Transform};

/// Number of palette entries (one per alpha value)
pub const PALETTE_SIZE: usize = 256;

/// 256-entry RGB lookup table indexed by greyscale intensity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [[u8; 3]; PALETTE_SIZE],
}

impl Palette {
    /// Build the palette for a gradient.
    pub fn from_gradient(gradient: &Gradient) -> HeatmapResult<Self> {
        let strip = render_gradient_strip(gradient, PALETTE_SIZE as u32)?;
        Self::from_strip(&strip)
    }

    /// Build the palette from a rendered RGBA strip of `PALETTE_SIZE` pixels.
    pub fn from_strip(strip: &[u8]) -> HeatmapResult<Self> {
        if strip.len() != PALETTE_SIZE * 4 {
            return Err(HeatmapError::BufferSize {
                expected: PALETTE_SIZE * 4,
                actual: strip.len(),
            });
        }

        let mut colors = [[0u8; 3]; PALETTE_SIZE];
        for (color, px) in colors.iter_mut().zip(strip.chunks_exact(4)) {
            *color = [px[0], px[1], px[2]];
        }
        Ok(Self { colors })
    }

    /// Colour for a greyscale intensity.
    pub fn color(&self, index: u8) -> [u8; 3] {
        self.colors[index as usize]
    }

    pub fn colors(&self) -> &[[u8; 3]; PALETTE_SIZE] {
        &self.colors
    }

    /// Recolour a straight-RGBA buffer in place.
    ///
    /// Every pixel with non-zero alpha takes the RGB of `palette[alpha]`;
    /// the alpha channel itself is left untouched so the soft falloff of the
    /// stamps survives.
    pub fn colorize(&self, pixels: &mut [u8]) {
        for px in pixels.chunks_exact_mut(4) {
            let alpha = px[3];
            if alpha != 0 {
                let [r, g, b] = self.colors[alpha as usize];
                px[0] = r;
                px[1] = g;
                px[2] = b;
            }
        }
    }
}

/// Rasterise `gradient` as a horizontal strip `width` pixels wide.
///
/// Stops are applied in ascending position order (stable for ties) with
/// positions clamped to `[0, 1]`. The gradient axis runs from the centre of
/// the first pixel to the centre of the last, so pixel `i` samples position
/// `i / (width - 1)` and both ends of the ramp are hit exactly.
pub fn render_gradient_strip(gradient: &Gradient, width: u32) -> HeatmapResult<Vec<u8>> {
    if gradient.is_empty() {
        return Err(HeatmapError::InvalidGradient(
            "gradient has no stops".to_string(),
        ));
    }
    if width < 2 {
        return Err(HeatmapError::InvalidGradient(format!(
            "strip width must be at least 2, got {}",
            width
        )));
    }

    let stops = gradient
        .sorted_stops()
        .iter()
        .map(|stop| {
            let (r, g, b, a) = stop.color.to_rgba();
            tiny_skia::GradientStop::new(
                stop.position.clamp(0.0, 1.0) as f32,
                Color::from_rgba8(r, g, b, a),
            )
        })
        .collect();

    let shader = LinearGradient::new(
        Point::from_xy(0.5, 0.0),
        Point::from_xy(width as f32 - 0.5, 0.0),
        stops,
        SpreadMode::Pad,
        Transform::identity(),
    )
    .ok_or_else(|| HeatmapError::InvalidGradient("gradient shader rejected stops".to_string()))?;

    let mut strip = Pixmap::new(width, 1)
        .ok_or_else(|| HeatmapError::InvalidGradient("cannot allocate strip".to_string()))?;
    let rect = Rect::from_xywh(0.0, 0.0, width as f32, 1.0)
        .ok_or_else(|| HeatmapError::InvalidGradient("invalid strip rect".to_string()))?;
    let paint = Paint {
        shader,
        ..Paint::default()
    };
    strip.fill_rect(rect, &paint, Transform::identity(), None);

    let mut pixels = Vec::with_capacity(width as usize * 4);
    for pixel in strip.pixels() {
        let c = pixel.demultiply();
        pixels.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    tracing::trace!(stops = gradient.stops.len(), width, "rendered gradient strip");
    Ok(pixels)
}
