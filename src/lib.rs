//! Love Lock - a combination-lock greeting page
//!
//! Core modules:
//! - `sim`: Deterministic simulation (dials, unlock guard, celebration timeline, particles)
//! - `settings`: Data-driven configuration, query parameters, capabilities
//! - `share`: Share links and letter text for the clipboard
//! - `audio`: Procedurally generated tick/chime tones
//! - `platform`: Browser capability shims (haptics, clipboard)
//! - `renderer`: Canvas2D drawing of the particle layers (web only)

pub mod audio;
pub mod platform;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod share;
pub mod sim;

pub use settings::{Capabilities, PageConfig, QualityPreset, Settings};

use glam::Vec2;

/// Page configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (one 60 Hz frame)
    pub const SIM_DT_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Combination that opens the lock unless the page config overrides it
    pub const DEFAULT_TARGET: [u8; 6] = [2, 0, 1, 1, 4, 6];

    /// Up/down controls: press longer than this to start repeating
    pub const HOLD_DELAY_MS: f64 = 300.0;
    /// Up/down controls: repeat interval while held
    pub const HOLD_REPEAT_MS: f64 = 120.0;
    /// Vertical drag distance per digit step (CSS pixels)
    pub const DRAG_STEP_PX: f32 = 18.0;

    /// Backing-store pixel ratio cap
    pub const MAX_DPR: f32 = 2.0;

    /// Lock card tilt at the card's top/bottom edge (degrees about X)
    pub const TILT_X_DEG: f32 = 8.0;
    /// Lock card tilt at the card's left/right edge (degrees about Y)
    pub const TILT_Y_DEG: f32 = 12.0;
    /// Reel cell height when the dial window has no layout yet
    pub const REEL_CELL_FALLBACK_PX: f32 = 46.0;
}

/// Canvas dimensions in device pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Device pixel ratio, capped at [`consts::MAX_DPR`]
    pub dpr: f32,
}

impl Viewport {
    pub fn new(css_width: f32, css_height: f32, device_pixel_ratio: f32) -> Self {
        let dpr = if device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(consts::MAX_DPR)
        } else {
            1.0
        };
        Self {
            width: (css_width * dpr).floor(),
            height: (css_height * dpr).floor(),
            dpr,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// True if `p` lies inside the viewport grown by `margin` on every side
    pub fn contains(&self, p: Vec2, margin: f32) -> bool {
        p.x >= -margin && p.x <= self.width + margin && p.y >= -margin && p.y <= self.height + margin
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0, 1.0)
    }
}

/// Point on the parametric heart curve at angle `u`, flipped into canvas space
/// (y grows downward) and scaled about `center`.
#[inline]
pub fn heart_point(u: f32, center: Vec2, scale: f32) -> Vec2 {
    let x = 16.0 * u.sin().powi(3);
    let y = 13.0 * u.cos() - 5.0 * (2.0 * u).cos() - 2.0 * (3.0 * u).cos() - (4.0 * u).cos();
    Vec2::new(x * scale + center.x, -y * scale + center.y)
}

/// Parallax tilt of the lock card for a pointer at (`client_x`, `client_y`).
///
/// `rect` is the card's client rect (left, top, width, height). Returns
/// `(rotate_x, rotate_y)` in degrees; the card leans toward the pointer.
pub fn parallax_tilt(rect: (f32, f32, f32, f32), client_x: f32, client_y: f32) -> (f32, f32) {
    let (left, top, width, height) = rect;
    if width <= 0.0 || height <= 0.0 {
        return (0.0, 0.0);
    }
    let x = (client_x - left) / width - 0.5;
    let y = (client_y - top) / height - 0.5;
    (-y * consts::TILT_X_DEG, x * consts::TILT_Y_DEG)
}

/// Vertical offset (CSS px) that scrolls a digit reel to `value`
pub fn reel_offset(value: u8, cell_height: f32) -> f32 {
    let cell = if cell_height > 0.0 {
        cell_height
    } else {
        consts::REEL_CELL_FALLBACK_PX
    };
    -(value as f32) * cell
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallax_tilt() {
        let rect = (100.0, 50.0, 200.0, 100.0);
        // Dead centre: flat
        assert_eq!(parallax_tilt(rect, 200.0, 100.0), (0.0, 0.0));
        // Top-right corner: tips back and turns right
        let (rx, ry) = parallax_tilt(rect, 300.0, 50.0);
        assert!((rx - 4.0).abs() < 1e-5);
        assert!((ry - 6.0).abs() < 1e-5);
        // Bottom-left corner mirrors it
        let (rx, ry) = parallax_tilt(rect, 100.0, 150.0);
        assert!((rx + 4.0).abs() < 1e-5);
        assert!((ry + 6.0).abs() < 1e-5);
        // Collapsed card never tilts
        assert_eq!(parallax_tilt((0.0, 0.0, 0.0, 10.0), 5.0, 5.0), (0.0, 0.0));
    }

    #[test]
    fn test_reel_offset() {
        assert_eq!(reel_offset(0, 40.0), 0.0);
        assert_eq!(reel_offset(7, 40.0), -280.0);
        assert_eq!(reel_offset(2, 0.0), -2.0 * consts::REEL_CELL_FALLBACK_PX);
    }

    #[test]
    fn test_viewport_caps_dpr() {
        let vp = Viewport::new(400.0, 300.0, 3.0);
        assert_eq!(vp.dpr, 2.0);
        assert_eq!(vp.width, 800.0);
        assert_eq!(vp.height, 600.0);

        let vp = Viewport::new(400.0, 300.0, 0.0);
        assert_eq!(vp.dpr, 1.0);
    }

    #[test]
    fn test_heart_point_shape() {
        let center = Vec2::new(100.0, 100.0);
        // u = 0: top notch, x on the axis, above the center
        let top = heart_point(0.0, center, 1.0);
        assert!((top.x - 100.0).abs() < 1e-4);
        assert!((top.y - 95.0).abs() < 1e-4);
        // u = π: bottom tip, below the center
        let tip = heart_point(std::f32::consts::PI, center, 1.0);
        assert!((tip.x - 100.0).abs() < 1e-3);
        assert!((tip.y - 117.0).abs() < 1e-3);
        // Symmetric about the vertical axis
        let a = heart_point(1.0, center, 2.0);
        let b = heart_point(-1.0, center, 2.0);
        assert!((a.x - 100.0 + (b.x - 100.0)).abs() < 1e-3);
        assert!((a.y - b.y).abs() < 1e-3);
    }
}
