//! Fixed timestep simulation tick
//!
//! Advances the scene deterministically: same seed and same inputs give the
//! same particles, cues and events.

use glam::Vec2;

use super::input::Gesture;
use super::state::{SceneEvent, SceneState};

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Gestures in arrival order
    pub gestures: Vec<Gesture>,
    /// Scratch strokes on the letter card (normalized from, to)
    pub scratches: Vec<(Vec2, Vec2)>,
    /// Brush radius for this tick's strokes
    pub brush_radius: f32,
}

impl TickInput {
    pub fn is_empty(&self) -> bool {
        self.gestures.is_empty() && self.scratches.is_empty()
    }
}

/// Advance the scene by one fixed timestep of `dt_ms`
pub fn tick(state: &mut SceneState, input: &TickInput, dt_ms: f64) {
    state.now_ms += dt_ms;
    state.time_ticks += 1;

    // Input first so an unlock in this tick fires its zero-offset cues now
    for gesture in &input.gestures {
        state.apply_gesture(gesture);
    }
    for action in state.input.poll(state.now_ms) {
        state.apply_action(action);
    }

    state.advance_timeline();

    // Particle simulators
    state.confetti.step(&state.viewport);
    state.hearts.step();
    state.morph.step(&state.viewport);
    state.fx.step(&state.viewport, &mut state.rng);

    if state.typewriter.advance(dt_ms) {
        log::info!("Message complete");
        state.push(SceneEvent::MessageComplete);
    }

    for &(from, to) in &input.scratches {
        state.scratch_stroke(from, to, input.brush_radius);
    }
}
