//! Raster placement during zoom transitions and the post-zoom crossfade.

use crate::scheduler::TimerHandle;
use heatmap_common::PixelPoint;
use heatmap_renderer::RasterSnapshot;
use std::time::{Duration, Instant};

/// Where the host should composite the raster, relative to the viewport's
/// top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterPlacement {
    /// Viewport pixel of the raster's top-left corner
    pub offset: PixelPoint,
    /// Scale applied to the raster around its top-left corner
    pub scale: f64,
}

impl RasterPlacement {
    pub fn identity() -> Self {
        Self {
            offset: PixelPoint::new(0.0, 0.0),
            scale: 1.0,
        }
    }

    /// Placement of a raster rendered with its top-left at world pixel
    /// `origin` at zoom `origin_zoom`, shown in a viewport whose top-left is
    /// world pixel `top_left` at `zoom`.
    pub fn between(origin: PixelPoint, origin_zoom: f64, top_left: PixelPoint, zoom: f64) -> Self {
        let scale = 2f64.powf(zoom - origin_zoom);
        Self {
            offset: origin * scale - top_left,
            scale,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }
}

impl Default for RasterPlacement {
    fn default() -> Self {
        Self::identity()
    }
}

/// The previous raster fading out over the freshly rendered one.
#[derive(Debug, Clone)]
pub struct Crossfade {
    /// Raster as it looked when the zoom transition ended
    pub snapshot: RasterSnapshot,
    /// Placement the snapshot had at that moment
    pub placement: RasterPlacement,
    pub started: Instant,
    pub duration: Duration,
    pub timer: TimerHandle,
}

impl Crossfade {
    pub fn new(
        snapshot: RasterSnapshot,
        placement: RasterPlacement,
        duration: Duration,
        timer: TimerHandle,
    ) -> Self {
        Self {
            snapshot,
            placement,
            started: Instant::now(),
            duration,
            timer,
        }
    }

    /// Opacity of the snapshot at `now`, falling linearly from 1 to 0.
    pub fn opacity_at(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 0.0;
        }
        let elapsed = now.saturating_duration_since(self.started).as_secs_f32();
        (1.0 - elapsed / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }
}
