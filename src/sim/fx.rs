//! Layered decorative effects
//!
//! One pool holds every post-unlock flourish. Each item carries a kind plus
//! a couple of kind-specific parameters (`phase`, `rate`, `radius`, `anchor`):
//! - Bokeh: large soft discs drifting upward, fading in and out
//! - Twinkle: stationary stars with sinusoidal brightness
//! - Ribbon: streamers swaying as they sink
//! - Orbit: sparks circling a fixed center
//! - Rocket: firework shell that bursts into sparks at its apex
//! - Spark: firework fragment with gravity and drag

use glam::Vec2;
use rand::Rng;

use super::easing::sine_bump;
use super::uniform;
use crate::Viewport;

/// Sparks per firework burst
pub const SPARKS_PER_BURST: usize = 48;
/// Per-frame velocity retention for sparks
const SPARK_DRAG: f32 = 0.98;
/// Items further than this outside the viewport are culled
const CULL_MARGIN: f32 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FxKind {
    Bokeh,
    Twinkle,
    Ribbon,
    Orbit,
    Rocket,
    Spark,
}

#[derive(Debug, Clone)]
pub struct FxItem {
    pub kind: FxKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub gravity: f32,
    pub hue: f32,
    pub size: f32,
    /// Frames remaining
    pub life: f32,
    pub max_life: f32,
    /// Twinkle/sway phase or orbit angle (radians)
    pub phase: f32,
    /// Per-frame phase increment
    pub rate: f32,
    /// Sway amplitude or orbit radius
    pub radius: f32,
    /// Ribbon base position or orbit center
    pub anchor: Vec2,
}

impl FxItem {
    fn new(kind: FxKind, pos: Vec2, hue: f32, size: f32, life: f32) -> Self {
        Self {
            kind,
            pos,
            vel: Vec2::ZERO,
            gravity: 0.0,
            hue,
            size,
            life,
            max_life: life.max(1.0),
            phase: 0.0,
            rate: 0.0,
            radius: 0.0,
            anchor: pos,
        }
    }

    /// Fraction of life remaining, 1 at spawn
    #[inline]
    pub fn life_fraction(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }

    /// Opacity for rendering
    pub fn alpha(&self) -> f32 {
        let t = self.life_fraction();
        match self.kind {
            FxKind::Bokeh => sine_bump(1.0 - t) * 0.35,
            FxKind::Twinkle => (0.5 + 0.5 * self.phase.sin()) * (t * 4.0).min(1.0),
            FxKind::Ribbon => (t * 5.0).min(1.0) * 0.85,
            FxKind::Orbit => t * 0.9,
            FxKind::Rocket => 1.0,
            FxKind::Spark => t,
        }
    }

    /// Advance one frame. Returns false once expired.
    fn step(&mut self) -> bool {
        self.life -= 1.0;
        match self.kind {
            FxKind::Bokeh | FxKind::Rocket => {
                self.pos += self.vel;
                self.vel.y += self.gravity;
            }
            FxKind::Twinkle => {
                self.phase += self.rate;
            }
            FxKind::Ribbon => {
                self.phase += self.rate;
                self.anchor += self.vel;
                self.pos = Vec2::new(self.anchor.x + self.phase.sin() * self.radius, self.anchor.y);
            }
            FxKind::Orbit => {
                self.phase += self.rate;
                self.pos = self.anchor + Vec2::new(self.phase.cos(), self.phase.sin()) * self.radius;
            }
            FxKind::Spark => {
                self.pos += self.vel;
                self.vel.y += self.gravity;
                self.vel *= SPARK_DRAG;
            }
        }
        self.life > 0.0
    }

    /// A rocket bursts at its apex or when it runs out of fuel
    fn should_burst(&self) -> bool {
        self.kind == FxKind::Rocket && (self.vel.y >= 0.0 || self.life <= 0.0)
    }
}

/// Pool of decorative items sharing one canvas
#[derive(Debug, Clone, Default)]
pub struct FxLayer {
    pub items: Vec<FxItem>,
    capacity: usize,
    bursts: u32,
}

impl FxLayer {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity.min(1024)),
            capacity,
            bursts: 0,
        }
    }

    fn room(&self) -> usize {
        self.capacity.saturating_sub(self.items.len())
    }

    pub fn spawn_bokeh<R: Rng>(&mut self, count: usize, viewport: &Viewport, rng: &mut R) {
        let dpr = viewport.dpr;
        for _ in 0..count.min(self.room()) {
            let pos = Vec2::new(
                uniform(rng, 0.0, viewport.width),
                uniform(rng, viewport.height * 0.2, viewport.height),
            );
            let mut item = FxItem::new(
                FxKind::Bokeh,
                pos,
                uniform(rng, 320.0, 360.0),
                uniform(rng, 18.0, 48.0) * dpr,
                uniform(rng, 240.0, 420.0),
            );
            item.vel = Vec2::new(uniform(rng, -0.2, 0.2) * dpr, -uniform(rng, 0.2, 0.6) * dpr);
            self.items.push(item);
        }
    }

    pub fn spawn_twinkles<R: Rng>(&mut self, count: usize, viewport: &Viewport, rng: &mut R) {
        for _ in 0..count.min(self.room()) {
            let pos = Vec2::new(
                uniform(rng, 0.0, viewport.width),
                uniform(rng, 0.0, viewport.height),
            );
            let mut item = FxItem::new(
                FxKind::Twinkle,
                pos,
                uniform(rng, 40.0, 60.0),
                uniform(rng, 1.0, 2.5) * viewport.dpr,
                uniform(rng, 120.0, 240.0),
            );
            item.phase = uniform(rng, 0.0, std::f32::consts::TAU);
            item.rate = uniform(rng, 0.05, 0.15);
            self.items.push(item);
        }
    }

    pub fn spawn_ribbons<R: Rng>(&mut self, count: usize, viewport: &Viewport, rng: &mut R) {
        let dpr = viewport.dpr;
        for _ in 0..count.min(self.room()) {
            let pos = Vec2::new(uniform(rng, 0.0, viewport.width), -uniform(rng, 10.0, 80.0));
            let mut item = FxItem::new(
                FxKind::Ribbon,
                pos,
                uniform(rng, 330.0, 370.0),
                uniform(rng, 6.0, 12.0) * dpr,
                uniform(rng, 300.0, 480.0),
            );
            item.vel = Vec2::new(0.0, uniform(rng, 0.8, 1.6) * dpr);
            item.phase = uniform(rng, 0.0, std::f32::consts::TAU);
            item.rate = uniform(rng, 0.03, 0.08);
            item.radius = uniform(rng, 10.0, 30.0) * dpr;
            self.items.push(item);
        }
    }

    /// Sparks evenly spaced on a ring around `center`
    pub fn spawn_orbit<R: Rng>(&mut self, count: usize, center: Vec2, radius: f32, rng: &mut R) {
        let n = count.min(self.room());
        for i in 0..n {
            let angle = i as f32 / n.max(1) as f32 * std::f32::consts::TAU;
            let mut item = FxItem::new(
                FxKind::Orbit,
                center,
                uniform(rng, 340.0, 380.0),
                uniform(rng, 1.5, 3.0),
                uniform(rng, 360.0, 540.0),
            );
            item.anchor = center;
            item.phase = angle;
            item.rate = 0.02;
            item.radius = radius * uniform(rng, 0.9, 1.1);
            item.pos = center + Vec2::new(angle.cos(), angle.sin()) * item.radius;
            self.items.push(item);
        }
    }

    /// Launch rockets from below the bottom edge
    pub fn launch_fireworks<R: Rng>(&mut self, count: usize, viewport: &Viewport, rng: &mut R) {
        let dpr = viewport.dpr;
        for _ in 0..count.min(self.room()) {
            let pos = Vec2::new(
                uniform(rng, viewport.width * 0.15, viewport.width * 0.85),
                viewport.height + 10.0,
            );
            let mut item = FxItem::new(
                FxKind::Rocket,
                pos,
                uniform(rng, 0.0, 360.0),
                2.5 * dpr,
                uniform(rng, 70.0, 110.0),
            );
            item.vel = Vec2::new(uniform(rng, -0.8, 0.8) * dpr, -uniform(rng, 9.0, 12.0) * dpr);
            item.gravity = 0.12 * dpr;
            self.items.push(item);
        }
    }

    fn burst<R: Rng>(&mut self, origin: Vec2, hue: f32, dpr: f32, rng: &mut R) {
        self.bursts += 1;
        for _ in 0..SPARKS_PER_BURST.min(self.room()) {
            let angle = uniform(rng, 0.0, std::f32::consts::TAU);
            let speed = uniform(rng, 1.0, 4.0) * dpr;
            let mut item = FxItem::new(
                FxKind::Spark,
                origin,
                hue + uniform(rng, -20.0, 20.0),
                uniform(rng, 1.0, 2.5) * dpr,
                uniform(rng, 50.0, 90.0),
            );
            item.vel = Vec2::new(angle.cos(), angle.sin()) * speed;
            item.gravity = 0.04 * dpr;
            self.items.push(item);
        }
    }

    /// Advance every item one frame; rockets at their apex burst into sparks
    pub fn step<R: Rng>(&mut self, viewport: &Viewport, rng: &mut R) {
        let mut bursts = Vec::new();
        self.items.retain_mut(|item| {
            let alive = item.step();
            if item.should_burst() {
                bursts.push((item.pos, item.hue));
                return false;
            }
            alive && viewport.contains(item.pos, CULL_MARGIN)
        });
        for (origin, hue) in bursts {
            self.burst(origin, hue, viewport.dpr, rng);
        }
    }

    /// Number of firework bursts so far
    pub fn bursts(&self) -> u32 {
        self.bursts
    }

    pub fn count(&self, kind: FxKind) -> usize {
        self.items.iter().filter(|i| i.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Background dots shown behind the lock from the start
pub const AMBIENT_DOTS: usize = 60;

/// One CSS-animated background dot. The browser moves it; only the
/// randomized start parameters come from here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientDot {
    /// Horizontal position in viewport-width percent
    pub left_vw: f32,
    /// Animation delay in seconds
    pub delay_s: f32,
    /// Animation duration in seconds
    pub duration_s: f32,
    pub opacity: f32,
}

pub fn ambient_dots<R: Rng>(count: usize, rng: &mut R) -> Vec<AmbientDot> {
    (0..count)
        .map(|_| AmbientDot {
            left_vw: uniform(rng, 0.0, 100.0),
            delay_s: uniform(rng, 0.0, 20.0),
            duration_s: uniform(rng, 16.0, 32.0),
            opacity: uniform(rng, 0.3, 0.9),
        })
        .collect()
}
