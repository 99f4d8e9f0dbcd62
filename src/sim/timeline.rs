//! Celebration timeline
//!
//! A fixed schedule of cues at millisecond offsets from the unlock instant.
//! Stages advance purely on elapsed simulation time; there is no rollback
//! and the schedule always runs to completion once started.

/// Celebration stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stage {
    #[default]
    Locked,
    /// Lock opening: confetti, chime, shine
    Unlocking,
    /// Particles morph into the heart
    HeartReveal,
    /// Overlay and typewriter message
    MessageReveal,
    /// Everything shown; scratch letter enabled
    IdleUnlocked,
}

/// One scheduled effect trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Marks a stage transition
    Enter(Stage),
    Confetti,
    Chime,
    /// Glow pulse on the lock plus floating hearts
    Shine,
    RevealMessage,
    MorphToHeart,
    SceneFadeOut,
    /// Bokeh and twinkle layers
    AmbientFx,
    Fireworks,
    ShowOverlay,
    Typewriter,
    /// Ribbons plus sparks orbiting the heart
    RibbonsAndOrbit,
    ScratchLetter,
}

/// (offset ms, cue), sorted by offset
pub const CELEBRATION_SCHEDULE: &[(f64, Cue)] = &[
    (0.0, Cue::Enter(Stage::Unlocking)),
    (0.0, Cue::Confetti),
    (0.0, Cue::Chime),
    (0.0, Cue::Shine),
    (0.0, Cue::RevealMessage),
    (600.0, Cue::Enter(Stage::HeartReveal)),
    (600.0, Cue::MorphToHeart),
    (600.0, Cue::SceneFadeOut),
    (600.0, Cue::AmbientFx),
    (1400.0, Cue::Fireworks),
    (2600.0, Cue::Enter(Stage::MessageReveal)),
    (2600.0, Cue::ShowOverlay),
    (2600.0, Cue::Typewriter),
    (2600.0, Cue::RibbonsAndOrbit),
    (3800.0, Cue::Fireworks),
    (6000.0, Cue::Enter(Stage::IdleUnlocked)),
    (6000.0, Cue::ScratchLetter),
];

#[derive(Debug, Clone, Default)]
pub struct Timeline {
    started_at: Option<f64>,
    next: usize,
    stage: Stage,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at simulation time `now`. Returns false if already started.
    pub fn start(&mut self, now: f64) -> bool {
        if self.started_at.is_some() {
            return false;
        }
        self.started_at = Some(now);
        true
    }

    /// Fire every cue due at `now`, in schedule order
    pub fn advance(&mut self, now: f64) -> Vec<Cue> {
        let Some(started_at) = self.started_at else {
            return Vec::new();
        };
        let elapsed = now - started_at;
        let mut fired = Vec::new();
        while let Some(&(offset, cue)) = CELEBRATION_SCHEDULE.get(self.next) {
            if offset > elapsed {
                break;
            }
            if let Cue::Enter(stage) = cue {
                self.stage = stage;
            }
            fired.push(cue);
            self.next += 1;
        }
        fired
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// All cues fired
    pub fn is_finished(&self) -> bool {
        self.next >= CELEBRATION_SCHEDULE.len()
    }

    /// Milliseconds since the unlock, if started
    pub fn elapsed(&self, now: f64) -> Option<f64> {
        self.started_at.map(|t| now - t)
    }
}
