//! Deterministic simulation module
//!
//! All page logic lives here. This module must be pure and deterministic:
//! - Fixed frame step, one simulated millisecond clock
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod code;
pub mod easing;
pub mod fx;
pub mod input;
pub mod morph;
pub mod particles;
pub mod scratch;
pub mod state;
pub mod tick;
pub mod timeline;
pub mod typewriter;

pub use code::{Code, CodeError, DigitStore, evaluate, wrap_digit};
pub use fx::{AMBIENT_DOTS, AmbientDot, FxItem, FxKind, FxLayer, ambient_dots};
pub use input::{DialKey, Direction, Gesture, InputAction, InputHandler, PointerId};
pub use morph::HeartMorph;
pub use particles::{ConfettiField, HeartField, Particle};
pub use scratch::ScratchCard;
pub use state::{HapticPattern, LockPhase, SceneEvent, SceneState};
pub use tick::{TickInput, tick};
pub use timeline::{CELEBRATION_SCHEDULE, Cue, Stage, Timeline};
pub use typewriter::Typewriter;

use rand::Rng;

/// Uniform sample in `[lo, hi)`; collapses to `lo` for an empty range
#[inline]
pub(crate) fn uniform<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}
