//! Per-modality signal normalization.

use crate::host::Rect;
use glam::Vec2;

/// Pointer position relative to `rect`, recentered to `[-1, 1]²`.
/// Degenerate rects yield the neutral signal.
pub fn pointer_signal(pointer: Vec2, rect: &Rect) -> Vec2 {
    let half = rect.half_extent();
    if half.x <= 0.0 || half.y <= 0.0 {
        return Vec2::ZERO;
    }
    ((pointer - rect.center()) / half).clamp(Vec2::splat(-1.0), Vec2::ONE)
}

/// How far `rect` has travelled through the viewport: 0 when its top sits on
/// the bottom edge, 1 once its bottom has left through the top edge.
pub fn scroll_progress(viewport_height: f32, rect: &Rect) -> f32 {
    let span = viewport_height + rect.height;
    if span <= 0.0 {
        return 0.0;
    }
    ((viewport_height - rect.top) / span).clamp(0.0, 1.0)
}

/// Horizontal pointer signal mapped onto `[0, 1]` progress.
#[inline]
pub fn pointer_progress(x: f32) -> f32 {
    ((x + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// Pointer offset from an element's center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Proximity {
    pub delta: Vec2,
    pub distance: f32,
}

impl Proximity {
    pub fn measure(pointer: Vec2, rect: &Rect) -> Self {
        let delta = pointer - rect.center();
        Self {
            delta,
            distance: delta.length(),
        }
    }

    /// Unit vector toward the pointer; zero when the pointer is on center.
    pub fn direction(&self) -> Vec2 {
        if self.distance > 0.0 {
            self.delta / self.distance
        } else {
            Vec2::ZERO
        }
    }
}

/// Linear falloff: 1 at the center, 0 at and beyond `start_radius`.
pub fn proximity_factor(distance: f32, start_radius: f32) -> f32 {
    if start_radius <= 0.0 {
        return 0.0;
    }
    1.0 - (distance / start_radius).clamp(0.0, 1.0)
}

/// Position along a path in percent, wrapped into `[0, 100)`.
pub fn path_offset(initial_offset: f32, progress: f32, strength: f32) -> f32 {
    (initial_offset + progress * strength * 100.0).rem_euclid(100.0)
}

/// Container rotation (degrees) for the depth modality: `x` pitches, `y` yaws.
pub fn depth_rotation(signal: Vec2, sensitivity: f32, inverted: bool) -> Vec2 {
    let sign = if inverted { -1.0 } else { 1.0 };
    Vec2::new(signal.y, signal.x) * sensitivity * sign
}
