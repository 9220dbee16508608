//! Two-pass heatmap painter.
//!
//! Pass one stamps a blurred disk for every blob onto a cleared surface,
//! accumulating greyscale alpha through source-over compositing. Pass two
//! reads the raster back and recolours every pixel through the gradient
//! palette, indexed by its alpha.
//!
//! The stamp and palette are cached and rebuilt lazily: setters only mark
//! them dirty, the next `draw` rebuilds what is stale.

use crate::palette::{Palette, PALETTE_SIZE};
use crate::png;
use crate::stamp::StampImage;
use crate::surface::{RasterSnapshot, RasterSurface};
use heatmap_common::{Blob, Gradient, HeatmapError, HeatmapResult, RenderOptions};

/// Visual parameters of the painter.
#[derive(Debug, Clone, PartialEq)]
pub struct PainterStyle {
    pub radius: f64,
    pub blur: f64,
    pub min_opacity: f64,
    pub gradient: Gradient,
}

impl Default for PainterStyle {
    fn default() -> Self {
        Self::from(&RenderOptions::default())
    }
}

impl From<&RenderOptions> for PainterStyle {
    fn from(options: &RenderOptions) -> Self {
        Self {
            radius: options.radius,
            blur: options.blur,
            min_opacity: options.min_opacity,
            gradient: options.gradient.clone(),
        }
    }
}

impl PainterStyle {
    pub fn full_radius(&self) -> f64 {
        self.radius + self.blur
    }
}

/// Paints blobs onto a raster surface.
pub struct HeatmapPainter<S: RasterSurface> {
    surface: S,
    style: PainterStyle,
    stamp: Option<StampImage>,
    palette: Option<Palette>,
}

impl<S: RasterSurface> HeatmapPainter<S> {
    /// Wrap a surface. Fails if the surface cannot expose its pixels, since
    /// the recolouring pass needs them.
    pub fn new(surface: S, style: PainterStyle) -> HeatmapResult<Self> {
        if !surface.supports_pixel_access() {
            return Err(HeatmapError::UnsupportedSurface(
                "surface does not support pixel read/write".to_string(),
            ));
        }

        Ok(Self {
            surface,
            style,
            stamp: None,
            palette: None,
        })
    }

    pub fn style(&self) -> &PainterStyle {
        &self.style
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Change the disk geometry. The stamp is only invalidated when a value
    /// actually changes.
    pub fn set_radius(&mut self, radius: f64, blur: f64) {
        if radius != self.style.radius || blur != self.style.blur {
            self.style.radius = radius;
            self.style.blur = blur;
            self.stamp = None;
        }
    }

    pub fn set_min_opacity(&mut self, min_opacity: f64) {
        self.style.min_opacity = min_opacity;
    }

    pub fn set_gradient(&mut self, gradient: Gradient) {
        if gradient != self.style.gradient {
            self.style.gradient = gradient;
            self.palette = None;
        }
    }

    pub fn stamp_dirty(&self) -> bool {
        self.stamp.is_none()
    }

    pub fn palette_dirty(&self) -> bool {
        self.palette.is_none()
    }

    /// The cached palette, if it has been built.
    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface.resize(width, height);
    }

    /// Drop the raster's pixel storage.
    pub fn release(&mut self) {
        self.surface.resize(0, 0);
    }

    pub fn snapshot(&self) -> RasterSnapshot {
        self.surface.snapshot()
    }

    /// Render `blobs` (viewport pixel coordinates, intensity in `[0, 1]`).
    ///
    /// An empty list just clears the surface.
    pub fn draw(&mut self, blobs: &[Blob]) -> HeatmapResult<()> {
        self.surface.clear();
        if blobs.is_empty() {
            tracing::trace!("no blobs, surface cleared");
            return Ok(());
        }

        if self.stamp.is_none() {
            self.stamp = Some(StampImage::build(self.style.radius, self.style.blur));
        }
        let Some(stamp) = self.stamp.as_ref() else {
            return Ok(());
        };

        let full = stamp.full_radius() as f32;
        let floor = self.style.min_opacity as f32;
        for blob in blobs {
            let alpha = blob.intensity.max(floor).clamp(0.0, 1.0);
            self.surface
                .draw_stamp_at(stamp, blob.x - full, blob.y - full, alpha);
        }

        self.ensure_palette()?;
        let mut pixels = self.surface.read_pixels();
        if let Some(palette) = self.palette.as_ref() {
            palette.colorize(&mut pixels);
        }
        self.surface.write_pixels(&pixels)?;

        tracing::trace!(blobs = blobs.len(), "painted heatmap");
        Ok(())
    }

    fn ensure_palette(&mut self) -> HeatmapResult<()> {
        if self.palette.is_none() {
            let strip = self
                .surface
                .build_linear_gradient(&self.style.gradient, PALETTE_SIZE as u32)?;
            self.palette = Some(Palette::from_strip(&strip)?);
            tracing::trace!(stops = self.style.gradient.stops.len(), "rebuilt palette");
        }
        Ok(())
    }

    /// Encode the current raster as an indexed PNG.
    ///
    /// After a draw every visible pixel's colour is a function of its alpha,
    /// so the alpha channel indexes a palette whose entry `i` is
    /// `palette[i]` at opacity `i`.
    pub fn export_png(&mut self) -> HeatmapResult<Vec<u8>> {
        let (width, height) = self.surface.size();
        let pixels = self.surface.read_pixels();
        self.ensure_palette()?;
        let palette = self
            .palette
            .as_ref()
            .ok_or_else(|| HeatmapError::InvalidGradient("palette unavailable".to_string()))?;

        let entries: Vec<(u8, u8, u8, u8)> = palette
            .colors()
            .iter()
            .enumerate()
            .map(|(i, &[r, g, b])| {
                if i == 0 {
                    (0, 0, 0, 0)
                } else {
                    (r, g, b, i as u8)
                }
            })
            .collect();
        let indices: Vec<u8> = pixels.chunks_exact(4).map(|px| px[3]).collect();

        png::encode_indexed(&indices, width as usize, height as usize, &entries)
    }
}
