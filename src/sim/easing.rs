//! Easing curves used by the reveal animations.
//! Input is normalized time in [0, 1].

use std::f32::consts::PI;

/// Strong slow end
#[inline]
pub fn cubic_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// 0 at both ends, 1 in the middle
#[inline]
pub fn sine_bump(t: f32) -> f32 {
    (PI * t.clamp(0.0, 1.0)).sin()
}
