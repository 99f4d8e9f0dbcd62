//! Scene state and core simulation types
//!
//! Everything the page mutates lives in one `SceneState` owned by the
//! shell and passed into `tick` and the renderer.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::code::{Code, CodeError, DigitStore};
use super::fx::{AMBIENT_DOTS, AmbientDot, FxLayer, ambient_dots};
use super::input::{Gesture, InputAction, InputHandler};
use super::morph::HeartMorph;
use super::particles::{CONFETTI_BURST, ConfettiField, HEART_BURST, HeartField};
use super::scratch::ScratchCard;
use super::timeline::{Cue, Stage, Timeline};
use super::typewriter::Typewriter;
use crate::Viewport;
use crate::settings::Settings;

const BOKEH_COUNT: usize = 24;
const TWINKLE_COUNT: usize = 40;
const RIBBON_COUNT: usize = 12;
const ORBIT_COUNT: usize = 36;

/// Lock state; `Unlocked` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockPhase {
    #[default]
    Locked,
    Unlocked,
}

/// Vibration patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticPattern {
    /// Short buzz on a wrong code
    Failure,
    /// Double buzz on unlock
    Success,
}

impl HapticPattern {
    /// Pattern in milliseconds (on, off, on, ...)
    pub fn pattern(&self) -> &'static [u32] {
        match self {
            HapticPattern::Failure => &[80],
            HapticPattern::Success => &[30, 60, 30],
        }
    }
}

/// Events for the shell (audio, DOM, haptics) emitted during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    /// A dial turned (wobble animation + tick sound)
    DigitChanged { dial: usize, value: u8, delta: i32 },
    /// Every dial was replaced at once (prefill, shuffle)
    DigitsReplaced,
    /// Wrong code
    Shake,
    HideMessage,
    Haptic(HapticPattern),
    /// Lock reached its terminal state
    Unlocked,
    /// Celebration timeline started (fires once per session)
    CelebrationStarted,
    Cue(Cue),
    StageChanged(Stage),
    /// Typewriter finished the last line
    MessageComplete,
    /// Scratch card crossed the reveal threshold
    LetterRevealed,
}

/// Complete scene state
#[derive(Debug, Clone)]
pub struct SceneState {
    pub settings: Settings,
    pub viewport: Viewport,

    /// Session seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,

    /// Simulation clock (ms)
    pub now_ms: f64,
    pub time_ticks: u64,

    // === Lock ===
    pub store: DigitStore,
    pub input: InputHandler,
    pub phase: LockPhase,

    // === Celebration ===
    pub timeline: Timeline,
    pub confetti: ConfettiField,
    pub hearts: HeartField,
    pub morph: HeartMorph,
    pub fx: FxLayer,
    pub typewriter: Typewriter,
    pub scratch: ScratchCard,
    /// Times the celebration has started (0 or 1)
    pub celebrations_started: u32,

    events: Vec<SceneEvent>,
}

impl SceneState {
    /// Create a new locked scene with the given seed
    pub fn new(settings: Settings, viewport: Viewport, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let budget = settings.quality.max_particles();
        let morph = HeartMorph::new(settings.quality.morph_particles(), &viewport, &mut rng);
        let typewriter = Typewriter::new(
            settings.message.clone(),
            settings.typewriter_char_ms,
            settings.typewriter_line_pause_ms,
        );
        Self {
            store: DigitStore::new(settings.target.clone()),
            input: InputHandler::new(),
            phase: LockPhase::Locked,

            timeline: Timeline::new(),
            confetti: ConfettiField::new(budget),
            hearts: HeartField::new(budget),
            morph,
            fx: FxLayer::new(budget),
            typewriter,
            scratch: ScratchCard::new(),
            celebrations_started: 0,

            settings,
            viewport,
            seed,
            rng,
            now_ms: 0.0,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.phase == LockPhase::Unlocked
    }

    pub fn stage(&self) -> Stage {
        self.timeline.stage()
    }

    pub fn current_code(&self) -> &Code {
        self.store.current()
    }

    /// Set every dial (query prefill), then evaluate
    pub fn prefill(&mut self, code: Code) -> Result<bool, CodeError> {
        self.store.set_current(code)?;
        self.push(SceneEvent::DigitsReplaced);
        Ok(self.check_unlock())
    }

    /// Route one gesture through the input handler and apply the result
    pub fn apply_gesture(&mut self, gesture: &Gesture) {
        for action in self.input.handle(gesture, self.now_ms) {
            self.apply_action(action);
        }
    }

    /// Apply an input action; every action ends with an evaluation
    pub fn apply_action(&mut self, action: InputAction) {
        match action {
            InputAction::Nudge { dial, delta } => match self.store.nudge(dial, delta) {
                Ok(value) => self.push(SceneEvent::DigitChanged { dial, value, delta }),
                Err(e) => {
                    log::warn!("Ignoring nudge: {e}");
                    return;
                }
            },
            InputAction::Shuffle => {
                self.store.shuffle(&mut self.rng);
                self.push(SceneEvent::DigitsReplaced);
            }
            InputAction::Check => {}
        }
        self.check_unlock();
    }

    /// Compare the dials against the target and apply feedback.
    ///
    /// Returns whether the dials currently match. Once unlocked no feedback
    /// is emitted and the timeline is never started again.
    pub fn check_unlock(&mut self) -> bool {
        if self.is_unlocked() {
            return self.store.is_match();
        }

        if !self.store.is_match() {
            if self.settings.effective_shake() {
                self.push(SceneEvent::Shake);
            }
            if self.settings.haptics {
                self.push(SceneEvent::Haptic(HapticPattern::Failure));
            }
            self.push(SceneEvent::HideMessage);
            return false;
        }

        log::info!("Unlocked with {}", self.store.current());
        self.phase = LockPhase::Unlocked;
        self.push(SceneEvent::Unlocked);
        if self.settings.haptics {
            self.push(SceneEvent::Haptic(HapticPattern::Success));
        }
        if self.timeline.start(self.now_ms) {
            self.celebrations_started += 1;
            self.push(SceneEvent::CelebrationStarted);
            // Zero-offset cues belong to the unlock instant
            self.advance_timeline();
        }
        true
    }

    /// Fire every due cue
    pub(crate) fn advance_timeline(&mut self) {
        for cue in self.timeline.advance(self.now_ms) {
            self.run_cue(cue);
        }
    }

    fn run_cue(&mut self, cue: Cue) {
        log::debug!("Cue {:?} at {:.0} ms", cue, self.now_ms);
        match cue {
            Cue::Enter(stage) => {
                log::info!("Stage {:?}", stage);
                self.push(SceneEvent::StageChanged(stage));
                return;
            }
            Cue::Confetti => self
                .confetti
                .burst(CONFETTI_BURST, &self.viewport, &mut self.rng),
            Cue::Shine => self.hearts.spawn(HEART_BURST, &self.viewport, &mut self.rng),
            Cue::MorphToHeart => self.morph.start(),
            Cue::AmbientFx => {
                self.fx
                    .spawn_bokeh(BOKEH_COUNT, &self.viewport, &mut self.rng);
                self.fx
                    .spawn_twinkles(TWINKLE_COUNT, &self.viewport, &mut self.rng);
            }
            Cue::Fireworks => {
                if self.settings.effective_fireworks() {
                    let count = self.settings.quality.fireworks_per_volley();
                    self.fx.launch_fireworks(count, &self.viewport, &mut self.rng);
                }
            }
            Cue::Typewriter => self.typewriter.start(),
            Cue::RibbonsAndOrbit => {
                self.fx
                    .spawn_ribbons(RIBBON_COUNT, &self.viewport, &mut self.rng);
                let radius = self.viewport.width.min(self.viewport.height) * 0.3;
                self.fx
                    .spawn_orbit(ORBIT_COUNT, self.viewport.center(), radius, &mut self.rng);
            }
            Cue::ScratchLetter => self.scratch.enable(),
            Cue::Chime
            | Cue::RevealMessage
            | Cue::SceneFadeOut
            | Cue::ShowOverlay => {}
        }
        self.push(SceneEvent::Cue(cue));
    }

    /// Canvas resized: keep the heart centred
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.morph.rebuild_targets(&self.viewport);
    }

    /// Start parameters for the background dot layer
    pub fn ambient_backdrop(&mut self) -> Vec<AmbientDot> {
        ambient_dots(AMBIENT_DOTS, &mut self.rng)
    }

    /// Scratch the letter card at a normalized point
    pub fn scratch_at(&mut self, point: Vec2, radius: f32) {
        if self.scratch.scratch(point, radius) {
            self.push(SceneEvent::LetterRevealed);
        }
    }

    /// Scratch along a normalized stroke
    pub fn scratch_stroke(&mut self, from: Vec2, to: Vec2, radius: f32) {
        if self.scratch.scratch_line(from, to, radius) {
            self.push(SceneEvent::LetterRevealed);
        }
    }

    pub(crate) fn push(&mut self, event: SceneEvent) {
        self.events.push(event);
    }

    /// Events since the last drain
    pub fn events(&self) -> &[SceneEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::input::Direction;

    fn scene() -> SceneState {
        SceneState::new(Settings::default(), Viewport::default(), 12345)
    }

    fn count(events: &[SceneEvent], event: SceneEvent) -> usize {
        events.iter().filter(|e| **e == event).count()
    }

    #[test]
    fn test_prefill_unlocks_and_starts_once() {
        let mut state = scene();
        let code = Code::parse("201146", state.store.len()).unwrap();
        assert_eq!(state.prefill(code), Ok(true));
        assert!(state.is_unlocked());
        assert_eq!(state.stage(), Stage::Unlocking);

        // Evaluate again immediately, as a second gesture source would
        assert!(state.check_unlock());
        assert!(state.check_unlock());

        let events = state.drain_events();
        assert_eq!(count(&events, SceneEvent::CelebrationStarted), 1);
        assert_eq!(count(&events, SceneEvent::Unlocked), 1);
        assert_eq!(
            count(&events, SceneEvent::Haptic(HapticPattern::Success)),
            1
        );
        assert_eq!(state.celebrations_started, 1);
        // Unlocking cues ran at the unlock instant
        assert_eq!(state.confetti.len(), CONFETTI_BURST);
        assert_eq!(state.hearts.len(), HEART_BURST);
        assert!(events.contains(&SceneEvent::Cue(Cue::Chime)));
    }

    #[test]
    fn test_prefill_wrong_length_rejected() {
        let mut state = scene();
        let code = Code::parse("20114", 5).unwrap();
        assert!(state.prefill(code).is_err());
        assert!(!state.is_unlocked());
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_mismatch_feedback() {
        let mut state = scene();
        state.apply_action(InputAction::Nudge { dial: 0, delta: 1 });
        let events = state.drain_events();
        assert_eq!(
            events,
            vec![
                SceneEvent::DigitChanged {
                    dial: 0,
                    value: 1,
                    delta: 1
                },
                SceneEvent::Shake,
                SceneEvent::Haptic(HapticPattern::Failure),
                SceneEvent::HideMessage,
            ]
        );
        assert!(!state.is_unlocked());
    }

    #[test]
    fn test_reduced_motion_skips_shake() {
        let settings = Settings {
            reduced_motion: true,
            haptics: false,
            ..Settings::default()
        };
        let mut state = SceneState::new(settings, Viewport::default(), 1);
        state.apply_action(InputAction::Check);
        assert_eq!(state.drain_events(), vec![SceneEvent::HideMessage]);
    }

    #[test]
    fn test_nudges_reach_target() {
        let mut state = scene();
        // 000000 -> 201146 by turning dials
        let turns = [(0, 2), (2, 1), (3, 1), (4, -6), (5, 6)];
        for (dial, delta) in turns {
            state.apply_action(InputAction::Nudge { dial, delta });
        }
        assert_eq!(state.current_code().to_string(), "201146");
        assert!(state.is_unlocked());

        // Turning after unlock changes the digit but never re-triggers
        state.drain_events();
        state.apply_action(InputAction::Nudge { dial: 0, delta: 1 });
        let events = state.drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], SceneEvent::DigitChanged { .. }));
        assert!(state.is_unlocked());
    }

    #[test]
    fn test_check_after_unlock_reports_current_match() {
        let mut state = scene();
        let code = Code::parse("201146", state.store.len()).unwrap();
        assert_eq!(state.prefill(code), Ok(true));
        state.drain_events();

        state.apply_action(InputAction::Nudge { dial: 0, delta: 1 });
        assert_eq!(state.current_code().to_string(), "301146");
        assert!(!state.check_unlock());
        // Still unlocked, and no failure feedback
        assert!(state.is_unlocked());
        assert_eq!(count(state.events(), SceneEvent::Shake), 0);
        assert_eq!(count(state.events(), SceneEvent::HideMessage), 0);

        state.apply_action(InputAction::Nudge { dial: 0, delta: -1 });
        assert!(state.check_unlock());
        assert_eq!(state.celebrations_started, 1);
    }

    #[test]
    fn test_bad_dial_is_ignored() {
        let mut state = scene();
        state.apply_action(InputAction::Nudge { dial: 99, delta: 1 });
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_gesture_routes_through_handler() {
        let mut state = scene();
        state.apply_gesture(&Gesture::ControlPress {
            dial: 0,
            direction: Direction::Up,
            pointer: 1,
        });
        state.apply_gesture(&Gesture::ControlRelease {
            dial: 0,
            direction: Direction::Up,
            pointer: 1,
        });
        assert_eq!(state.current_code().digit(0), Some(1));
    }

    #[test]
    fn test_same_seed_same_shuffle() {
        let mut a = scene();
        let mut b = scene();
        a.apply_action(InputAction::Shuffle);
        b.apply_action(InputAction::Shuffle);
        assert_eq!(a.current_code(), b.current_code());
    }

    #[test]
    fn test_ambient_backdrop_is_seeded() {
        let mut a = scene();
        let mut b = scene();
        let dots = a.ambient_backdrop();
        assert_eq!(dots.len(), AMBIENT_DOTS);
        assert_eq!(dots, b.ambient_backdrop());
        assert!(a.events().is_empty());
    }

    #[test]
    fn test_scratch_events_once() {
        let mut state = scene();
        state.scratch.enable();
        state.scratch_at(Vec2::splat(0.5), 2.0);
        state.scratch_at(Vec2::splat(0.5), 2.0);
        assert_eq!(count(state.events(), SceneEvent::LetterRevealed), 1);
    }
}
