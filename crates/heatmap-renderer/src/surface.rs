//! Raster surfaces the painter draws on.
//!
//! The painter only needs a handful of primitives from its target: clear,
//! composite a stamp at an offset with an opacity, and read/write the pixel
//! buffer. `RasterSurface` captures exactly that so hosts can plug in their
//! own canvas; `PixmapSurface` is the in-memory implementation backed by
//! tiny-skia.
//!
//! Pixel buffers crossing this interface are straight (non-premultiplied)
//! RGBA, row-major, 4 bytes per pixel.

use crate::palette::render_gradient_strip;
use crate::png;
use crate::stamp::StampImage;
use heatmap_common::{Gradient, HeatmapError, HeatmapResult};
use tiny_skia::{
    BlendMode, Color, ColorU8, FilterQuality, Pixmap, PixmapPaint, PremultipliedColorU8,
    Transform,
};

/// Drawing primitives required by the heatmap painter.
pub trait RasterSurface {
    /// Current size in pixels.
    fn size(&self) -> (u32, u32);

    /// Resize the surface; contents are discarded.
    fn resize(&mut self, width: u32, height: u32);

    /// Reset every pixel to transparent.
    fn clear(&mut self);

    /// Composite `stamp` with its top-left corner at `(x, y)` using
    /// source-over blending at the given opacity.
    fn draw_stamp_at(&mut self, stamp: &StampImage, x: f32, y: f32, alpha: f32);

    /// Copy of the pixel buffer as straight RGBA.
    fn read_pixels(&self) -> Vec<u8>;

    /// Replace the pixel buffer; `pixels` must cover the whole surface.
    fn write_pixels(&mut self, pixels: &[u8]) -> HeatmapResult<()>;

    /// Whether `read_pixels`/`write_pixels` are backed by real pixel access.
    fn supports_pixel_access(&self) -> bool {
        true
    }

    /// Render `gradient` as a horizontal strip `width` pixels wide and return
    /// its straight RGBA pixels.
    fn build_linear_gradient(&self, gradient: &Gradient, width: u32) -> HeatmapResult<Vec<u8>> {
        render_gradient_strip(gradient, width)
    }

    /// Owned copy of the current raster.
    fn snapshot(&self) -> RasterSnapshot {
        let (width, height) = self.size();
        RasterSnapshot {
            width,
            height,
            pixels: self.read_pixels(),
        }
    }
}

/// A frozen copy of a raster's pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterSnapshot {
    pub width: u32,
    pub height: u32,
    /// Straight RGBA, row-major
    pub pixels: Vec<u8>,
}

impl RasterSnapshot {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// RGBA of the pixel at `(x, y)`, if inside the snapshot.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels
            .get(idx..idx + 4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Encode the snapshot as an RGBA PNG.
    pub fn to_png(&self) -> HeatmapResult<Vec<u8>> {
        png::encode_rgba(&self.pixels, self.width as usize, self.height as usize)
    }
}

/// In-memory surface backed by a tiny-skia pixmap.
///
/// A zero-sized surface owns no pixmap; drawing on it is a no-op and its
/// pixel buffer is empty.
#[derive(Debug, Clone, Default)]
pub struct PixmapSurface {
    pixmap: Option<Pixmap>,
}

impl PixmapSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixmap: Pixmap::new(width, height),
        }
    }

    /// The backing pixmap (premultiplied), if the surface is non-empty.
    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    /// Straight RGBA of a single pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let pixel = self.pixmap.as_ref()?.pixel(x, y)?.demultiply();
        Some([pixel.red(), pixel.green(), pixel.blue(), pixel.alpha()])
    }
}

impl RasterSurface for PixmapSurface {
    fn size(&self) -> (u32, u32) {
        self.pixmap
            .as_ref()
            .map(|p| (p.width(), p.height()))
            .unwrap_or((0, 0))
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.pixmap = Pixmap::new(width, height);
    }

    fn clear(&mut self) {
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill(Color::TRANSPARENT);
        }
    }

    fn draw_stamp_at(&mut self, stamp: &StampImage, x: f32, y: f32, alpha: f32) {
        let (Some(pixmap), Some(stamp)) = (self.pixmap.as_mut(), stamp.pixmap()) else {
            return;
        };

        let paint = PixmapPaint {
            opacity: alpha.clamp(0.0, 1.0),
            blend_mode: BlendMode::SourceOver,
            quality: FilterQuality::Bilinear,
        };
        pixmap.draw_pixmap(0, 0, stamp.as_ref(), &paint, Transform::from_translate(x, y), None);
    }

    fn read_pixels(&self) -> Vec<u8> {
        let Some(pixmap) = self.pixmap.as_ref() else {
            return Vec::new();
        };

        let mut pixels = Vec::with_capacity(pixmap.data().len());
        for pixel in pixmap.pixels() {
            let c = pixel.demultiply();
            pixels.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        pixels
    }

    fn write_pixels(&mut self, pixels: &[u8]) -> HeatmapResult<()> {
        let (width, height) = self.size();
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(HeatmapError::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }

        let Some(pixmap) = self.pixmap.as_mut() else {
            return Ok(());
        };
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(pixels.chunks_exact(4)) {
            *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
        }
        Ok(())
    }
}

/// Premultiplied pixel for an opaque-black stamp texel of the given alpha.
pub(crate) fn stamp_texel(alpha: u8) -> PremultipliedColorU8 {
    PremultipliedColorU8::from_rgba(0, 0, 0, alpha).unwrap_or(PremultipliedColorU8::TRANSPARENT)
}
