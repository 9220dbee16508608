//! Pre-rendered blurred disk used to paint each blob.
//!
//! The stamp is a square of side `2 * (radius + blur)` holding a black disk
//! of `radius` pixels at its centre whose edge is softened by a Gaussian blur
//! (`sigma = blur / 2`, the same falloff a canvas shadow of `blur` pixels
//! produces). Drawing the square at `(x - full, y - full)` centres the disk
//! on `(x, y)`. Only the alpha channel carries information; colour comes
//! later from the palette.

use crate::surface::stamp_texel;
use image::GrayImage;
use imageproc::filter::gaussian_blur_f32;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};

/// A blurred-disk stamp keyed by `(radius, blur)`.
#[derive(Debug, Clone)]
pub struct StampImage {
    radius: f64,
    blur: f64,
    pixmap: Option<Pixmap>,
}

impl StampImage {
    /// Render the stamp for the given radius and blur.
    ///
    /// A non-positive radius produces an empty stamp that draws nothing.
    pub fn build(radius: f64, blur: f64) -> Self {
        let full = radius + blur;
        let side = (2.0 * full).ceil();

        let pixmap = if radius > 0.0 && side >= 1.0 {
            render_disk(radius, blur, full, side as u32)
        } else {
            None
        };

        tracing::trace!(radius, blur, side, "built heatmap stamp");

        Self {
            radius,
            blur,
            pixmap,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn blur(&self) -> f64 {
        self.blur
    }

    /// Distance from the stamp centre to its edge.
    pub fn full_radius(&self) -> f64 {
        self.radius + self.blur
    }

    /// Side length of the square in pixels (0 for an empty stamp).
    pub fn side(&self) -> u32 {
        self.pixmap.as_ref().map(|p| p.width()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.pixmap.is_none()
    }

    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    /// Alpha of the stamp texel at `(x, y)`.
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        self.pixmap
            .as_ref()
            .and_then(|p| p.pixel(x, y))
            .map(|p| p.alpha())
            .unwrap_or(0)
    }
}

fn render_disk(radius: f64, blur: f64, full: f64, side: u32) -> Option<Pixmap> {
    let mut disk = Pixmap::new(side, side)?;
    let center = full as f32;
    let path = PathBuilder::from_circle(center, center, radius as f32)?;

    let mut paint = Paint::default();
    paint.set_color_rgba8(0, 0, 0, 255);
    paint.anti_alias = true;
    disk.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);

    let coverage: Vec<u8> = disk.pixels().iter().map(|p| p.alpha()).collect();
    let coverage = GrayImage::from_raw(side, side, coverage)?;
    let softened = if blur > 0.0 {
        gaussian_blur_f32(&coverage, (blur / 2.0) as f32)
    } else {
        coverage
    };

    // Peak is renormalised to fully opaque so a lone maximum-intensity blob
    // maps onto the top of the palette.
    let peak = softened.pixels().map(|p| p.0[0]).max().unwrap_or(0);
    if peak == 0 {
        return Some(disk);
    }

    let scale = 255.0 / peak as f32;
    for (texel, value) in disk.pixels_mut().iter_mut().zip(softened.pixels()) {
        let alpha = (value.0[0] as f32 * scale).round().min(255.0) as u8;
        *texel = stamp_texel(alpha);
    }

    Some(disk)
}
