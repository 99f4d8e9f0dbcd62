//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Dial turned one step
    Tick,
    /// Lock opened
    Chime,
}

/// Base pitch of the dial tick (Hz)
pub const TICK_BASE_HZ: f32 = 480.0;
/// Low-pass cutoff for the tick (Hz)
pub const TICK_LOWPASS_HZ: f32 = 2200.0;
/// C5 E5 G5 C6
pub const CHIME_NOTES: [f32; 4] = [523.25, 659.25, 783.99, 1046.5];
/// Gap between chime notes (s)
pub const CHIME_NOTE_GAP: f64 = 0.09;

/// Pitch multiplier for a tick `dt_secs` after the previous one.
///
/// Fast spinning raises the pitch, capped at 1.6x.
pub fn tick_rate(dt_secs: f64) -> f32 {
    (0.9 + 0.04 / dt_secs.max(0.05)).min(1.6) as f32
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{
        AudioContext, AudioNode, BiquadFilterType, GainNode, OscillatorNode, OscillatorType,
    };

    use super::*;

    /// Audio manager for the page
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: f32,
        muted: bool,
        /// Context time of the previous tick
        last_tick_time: f64,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
                muted: false,
                last_tick_time: 0.0,
            }
        }

        pub fn is_available(&self) -> bool {
            self.ctx.is_some()
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Set master volume (0.0 - 1.0)
        pub fn set_master_volume(&mut self, vol: f32) {
            self.master_volume = vol.clamp(0.0, 1.0);
        }

        /// Mute/unmute all audio
        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        fn effective_volume(&self) -> f32 {
            if self.muted { 0.0 } else { self.master_volume }
        }

        /// Play a sound effect
        pub fn play(&mut self, effect: SoundEffect) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = self.ctx.clone() else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Tick => self.play_tick(&ctx, vol),
                SoundEffect::Chime => self.play_chime(&ctx, vol),
            }
        }

        // === Sound generators ===

        /// Create an oscillator feeding a gain node, routed through `via` if given
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
            via: Option<&AudioNode>,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            match via {
                Some(node) => {
                    osc.connect_with_audio_node(node).ok()?;
                    node.connect_with_audio_node(&gain).ok()?;
                }
                None => {
                    osc.connect_with_audio_node(&gain).ok()?;
                }
            }
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Dial tick - short filtered click, pitched up when spun fast
        fn play_tick(&mut self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            let rate = tick_rate(t - self.last_tick_time);
            self.last_tick_time = t;

            let Ok(filter) = ctx.create_biquad_filter() else {
                return;
            };
            filter.set_type(BiquadFilterType::Lowpass);
            filter.frequency().set_value(TICK_LOWPASS_HZ);

            let via: &AudioNode = &filter;
            let Some((osc, gain)) =
                self.create_osc(ctx, TICK_BASE_HZ * rate, OscillatorType::Triangle, Some(via))
            else {
                return;
            };

            gain.gain().set_value_at_time(0.0001, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.08 * vol, t + 0.005)
                .ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.0001, t + 0.06)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.08).ok();
        }

        /// Unlock chime - ascending major arpeggio
        fn play_chime(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            for (i, &freq) in CHIME_NOTES.iter().enumerate() {
                let start = t + i as f64 * CHIME_NOTE_GAP;
                if let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Sine, None) {
                    gain.gain().set_value_at_time(0.0001, start).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(vol * 0.25, start + 0.02)
                        .ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.001, start + 0.6)
                        .ok();
                    osc.start_with_when(start).ok();
                    osc.stop_with_when(start + 0.65).ok();
                }
                if i + 1 < CHIME_NOTES.len() {
                    continue;
                }
                // Soft octave shimmer on the last note
                if let Some((osc, gain)) =
                    self.create_osc(ctx, freq * 2.0, OscillatorType::Triangle, None)
                {
                    gain.gain().set_value_at_time(vol * 0.06, start).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.001, start + 0.8)
                        .ok();
                    osc.start_with_when(start).ok();
                    osc.stop_with_when(start + 0.85).ok();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_rate_bounds() {
        // Slow turns sit just above the base pitch
        assert!((tick_rate(2.0) - 0.92).abs() < 1e-6);
        // Very fast turns are capped
        assert_eq!(tick_rate(0.0), 1.6);
        assert_eq!(tick_rate(0.01), 1.6);
        // 100 ms apart: 0.9 + 0.4
        assert!((tick_rate(0.1) - 1.3).abs() < 1e-6);
    }

    #[test]
    fn test_tick_rate_monotonic() {
        let mut prev = tick_rate(0.05);
        for i in 1..100 {
            let r = tick_rate(0.05 + i as f64 * 0.02);
            assert!(r <= prev);
            prev = r;
        }
    }

    #[test]
    fn test_chime_ascends() {
        assert!(CHIME_NOTES.windows(2).all(|w| w[0] < w[1]));
        assert!((CHIME_NOTES[3] / CHIME_NOTES[0] - 2.0).abs() < 0.01);
    }
}
