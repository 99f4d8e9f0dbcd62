//! Particle-to-heart morph
//!
//! A persistent formation of particles that drifts idly until started, then
//! converges on points sampled from the heart curve. Progress advances a
//! fixed amount per frame and is cubic-eased into the per-frame blend weight.

use glam::Vec2;
use rand::Rng;

use super::easing::cubic_out;
use super::uniform;
use crate::{Viewport, heart_point};

/// Progress added per frame while morphing
pub const MORPH_PROGRESS_STEP: f32 = 0.008;
/// Blend weight at zero progress
pub const MORPH_BASE_BLEND: f32 = 0.03;
/// Extra blend weight at full (eased) progress
pub const MORPH_EXTRA_BLEND: f32 = 0.08;
/// Heart scale relative to the smaller viewport side
const HEART_SCALE: f32 = 0.02;

#[derive(Debug, Clone)]
pub struct MorphParticle {
    pub pos: Vec2,
    /// Idle drift, pixels/frame
    pub vel: Vec2,
    pub target: Vec2,
    pub size: f32,
    pub hue: f32,
}

#[derive(Debug, Clone, Default)]
pub struct HeartMorph {
    pub particles: Vec<MorphParticle>,
    active: bool,
    progress: f32,
}

impl HeartMorph {
    /// Scatter `count` particles uniformly over the viewport
    pub fn new<R: Rng>(count: usize, viewport: &Viewport, rng: &mut R) -> Self {
        let dpr = viewport.dpr;
        let particles = (0..count)
            .map(|_| MorphParticle {
                pos: Vec2::new(
                    uniform(rng, 0.0, viewport.width),
                    uniform(rng, 0.0, viewport.height),
                ),
                vel: Vec2::new(uniform(rng, -0.15, 0.15) * dpr, uniform(rng, -0.15, 0.15) * dpr),
                target: Vec2::ZERO,
                size: uniform(rng, 1.0, 3.0),
                hue: uniform(rng, 330.0, 370.0),
            })
            .collect();
        let mut morph = Self {
            particles,
            active: false,
            progress: 0.0,
        };
        morph.rebuild_targets(viewport);
        morph
    }

    /// Resample heart targets for the current viewport (call on resize)
    pub fn rebuild_targets(&mut self, viewport: &Viewport) {
        let n = self.particles.len().max(1) as f32;
        let center = viewport.center();
        let scale = viewport.width.min(viewport.height) * HEART_SCALE;
        for (i, p) in self.particles.iter_mut().enumerate() {
            let u = i as f32 / n * std::f32::consts::TAU;
            p.target = heart_point(u, center, scale);
        }
    }

    /// Begin converging from wherever the particles currently are
    pub fn start(&mut self) {
        self.active = true;
        self.progress = 0.0;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Raw progress in [0, 1]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Cubic-eased progress
    pub fn eased(&self) -> f32 {
        cubic_out(self.progress)
    }

    /// Fraction of the remaining distance covered this frame
    pub fn blend(&self) -> f32 {
        MORPH_BASE_BLEND + self.eased() * MORPH_EXTRA_BLEND
    }

    /// Advance one frame
    pub fn step(&mut self, viewport: &Viewport) {
        if !self.active {
            // Idle drift, wrapping at the edges
            for p in &mut self.particles {
                p.pos += p.vel;
                p.pos.x = p.pos.x.rem_euclid(viewport.width.max(1.0));
                p.pos.y = p.pos.y.rem_euclid(viewport.height.max(1.0));
            }
            return;
        }

        self.progress = (self.progress + MORPH_PROGRESS_STEP).min(1.0);
        let blend = self.blend();
        for p in &mut self.particles {
            p.pos += (p.target - p.pos) * blend;
        }
    }

    /// Largest distance from any particle to its target
    pub fn max_distance(&self) -> f32 {
        self.particles
            .iter()
            .map(|p| p.pos.distance(p.target))
            .fold(0.0, f32::max)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn morph(count: usize) -> (HeartMorph, Viewport) {
        let vp = Viewport::new(800.0, 600.0, 1.0);
        let mut rng = Pcg32::seed_from_u64(42);
        (HeartMorph::new(count, &vp, &mut rng), vp)
    }

    #[test]
    fn test_targets_lie_on_heart() {
        let (m, vp) = morph(600);
        let scale = 600.0 * HEART_SCALE;
        let center = vp.center();
        // First target is the top notch at u = 0
        let first = m.particles[0].target;
        assert!((first - heart_point(0.0, center, scale)).length() < 1e-3);
        // All targets stay within the heart's bounding box
        for p in &m.particles {
            let d = p.target - center;
            assert!(d.x.abs() <= 16.0 * scale + 1e-2);
            assert!(d.y >= -12.0 * scale - 1e-2 && d.y <= 17.0 * scale + 1e-2);
        }
    }

    #[test]
    fn test_converges_monotonically() {
        let (mut m, vp) = morph(200);
        m.start();
        let mut prev: Vec<f32> = m.particles.iter().map(|p| p.pos.distance(p.target)).collect();
        let mut prev_progress = m.progress();
        for _ in 0..200 {
            m.step(&vp);
            assert!(m.progress() >= prev_progress);
            prev_progress = m.progress();
            let dist: Vec<f32> = m.particles.iter().map(|p| p.pos.distance(p.target)).collect();
            for (now, before) in dist.iter().zip(&prev) {
                assert!(now <= before);
            }
            prev = dist;
        }
        assert!(m.max_distance() < 1.0);
    }

    #[test]
    fn test_progress_caps_and_blend_grows() {
        let (mut m, vp) = morph(10);
        m.start();
        let first_blend = m.blend();
        assert!((first_blend - MORPH_BASE_BLEND).abs() < 1e-6);
        for _ in 0..200 {
            m.step(&vp);
        }
        assert_eq!(m.progress(), 1.0);
        assert!((m.blend() - (MORPH_BASE_BLEND + MORPH_EXTRA_BLEND)).abs() < 1e-6);
    }

    #[test]
    fn test_idle_drift_stays_in_viewport() {
        let (mut m, vp) = morph(50);
        for _ in 0..1000 {
            m.step(&vp);
        }
        assert!(!m.is_active());
        for p in &m.particles {
            assert!(p.pos.x >= 0.0 && p.pos.x < vp.width);
            assert!(p.pos.y >= 0.0 && p.pos.y < vp.height);
        }
    }

    #[test]
    fn test_rebuild_targets_follows_resize() {
        let (mut m, _) = morph(20);
        let big = Viewport::new(1600.0, 1200.0, 1.0);
        m.rebuild_targets(&big);
        let first = m.particles[0].target;
        assert!((first - heart_point(0.0, big.center(), 1200.0 * HEART_SCALE)).length() < 1e-3);
    }
}
