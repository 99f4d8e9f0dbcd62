//! Burst particles: confetti and floating hearts
//!
//! Kinematics run per frame (velocities are pixels/frame), matching the
//! cadence of the host's animation callback.

use glam::Vec2;
use rand::Rng;

use super::uniform;
use crate::Viewport;

/// Confetti burst size on unlock
pub const CONFETTI_BURST: usize = 160;
/// Floating hearts spawned by the shine cue
pub const HEART_BURST: usize = 18;

/// Hearts are culled once they float this far above the top edge
const HEART_CULL_Y: f32 = -40.0;
/// Confetti is culled once it falls this far below the bottom edge
const CONFETTI_FLOOR_MARGIN: f32 = 40.0;

/// A single burst particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Added to `vel.y` every frame
    pub gravity: f32,
    /// Degrees; may exceed 360 (wraps when rendered)
    pub hue: f32,
    pub size: f32,
    pub alpha: f32,
    /// Frames remaining; the particle is removed at zero
    pub life: f32,
}

impl Particle {
    /// Advance one frame. Returns false once the life counter runs out.
    pub fn step(&mut self) -> bool {
        self.pos += self.vel;
        self.vel.y += self.gravity;
        self.life -= 1.0;
        self.life > 0.0
    }
}

/// Confetti pool
#[derive(Debug, Clone, Default)]
pub struct ConfettiField {
    pub particles: Vec<Particle>,
    capacity: usize,
}

impl ConfettiField {
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Spawn up to `count` pieces from the upper-middle of the viewport
    pub fn burst<R: Rng>(&mut self, count: usize, viewport: &Viewport, rng: &mut R) {
        let dpr = viewport.dpr;
        let origin = Vec2::new(viewport.width / 2.0, viewport.height * 0.25);
        let room = self.capacity.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            self.particles.push(Particle {
                pos: origin,
                vel: Vec2::new(uniform(rng, -3.0, 3.0) * dpr, uniform(rng, -8.0, -2.0) * dpr),
                gravity: 0.15 * dpr,
                hue: uniform(rng, 330.0, 370.0),
                size: uniform(rng, 3.0, 6.0),
                alpha: 0.95,
                life: uniform(rng, 100.0, 160.0),
            });
        }
    }

    /// Advance every piece; drop expired ones and ones that fell off screen
    pub fn step(&mut self, viewport: &Viewport) {
        let floor = viewport.height + CONFETTI_FLOOR_MARGIN;
        self.particles.retain_mut(|p| p.step() && p.pos.y < floor);
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

/// Floating hearts pool
#[derive(Debug, Clone, Default)]
pub struct HeartField {
    pub particles: Vec<Particle>,
    capacity: usize,
}

impl HeartField {
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity.min(256)),
            capacity,
        }
    }

    /// Spawn hearts along the bottom edge drifting upward
    pub fn spawn<R: Rng>(&mut self, count: usize, viewport: &Viewport, rng: &mut R) {
        let dpr = viewport.dpr;
        let room = self.capacity.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            self.particles.push(Particle {
                pos: Vec2::new(
                    uniform(rng, 0.0, viewport.width),
                    viewport.height + uniform(rng, 0.0, 60.0),
                ),
                vel: Vec2::new(uniform(rng, -0.3, 0.3) * dpr, -uniform(rng, 1.2, 2.0) * dpr),
                gravity: 0.0,
                hue: 345.0,
                size: uniform(rng, 10.0, 24.0),
                alpha: uniform(rng, 0.6, 1.0),
                // Long enough to cross a tall viewport at the slowest speed
                life: (viewport.height + 160.0) / (1.2 * dpr),
            });
        }
    }

    pub fn step(&mut self) {
        self.particles
            .retain_mut(|p| p.step() && p.pos.y > HEART_CULL_Y);
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

    #[test]
    fn test_life_strictly_decreases_until_removed() {
        let mut p = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            gravity: 0.0,
            hue: 0.0,
            size: 1.0,
            alpha: 1.0,
            life: 3.0,
        };
        assert!(p.step());
        assert_eq!(p.life, 2.0);
        assert!(p.step());
        assert_eq!(p.life, 1.0);
        assert!(!p.step(), "removed exactly when life reaches zero");
        assert_eq!(p.life, 0.0);
    }

    #[test]
    fn test_confetti_expires_by_life() {
        // Huge viewport so nothing falls off screen first
        let vp = Viewport::new(10_000.0, 100_000.0, 1.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut field = ConfettiField::new(1000);
        field.burst(CONFETTI_BURST, &vp, &mut rng);
        assert_eq!(field.len(), CONFETTI_BURST);

        let mut prev_lives: Vec<f32> = field.particles.iter().map(|p| p.life).collect();
        for _ in 0..5 {
            field.step(&vp);
            let lives: Vec<f32> = field.particles.iter().map(|p| p.life).collect();
            for (now, before) in lives.iter().zip(&prev_lives) {
                assert!(now < before);
            }
            prev_lives = lives;
        }

        for _ in 0..160 {
            field.step(&vp);
            assert!(field.particles.iter().all(|p| p.life > 0.0));
        }
        assert!(field.is_empty());
    }

    #[test]
    fn test_confetti_culled_below_bottom_edge() {
        let vp = Viewport::new(100.0, 100.0, 1.0);
        let mut rng = Pcg32::seed_from_u64(5);
        let mut field = ConfettiField::new(100);
        field.burst(50, &vp, &mut rng);
        // Outlive the fall so only position can remove them
        for p in &mut field.particles {
            p.life = 10_000.0;
        }

        let mut frames = 0;
        while !field.is_empty() {
            field.step(&vp);
            frames += 1;
            assert!(frames < 400, "confetti never left the viewport");
            assert!(field
                .particles
                .iter()
                .all(|p| p.pos.y < vp.height + CONFETTI_FLOOR_MARGIN));
        }
    }

    #[test]
    fn test_confetti_respects_capacity() {
        let vp = Viewport::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut field = ConfettiField::new(100);
        field.burst(CONFETTI_BURST, &vp, &mut rng);
        assert_eq!(field.len(), 100);
        field.burst(10, &vp, &mut rng);
        assert_eq!(field.len(), 100);
    }

    #[test]
    fn test_confetti_falls_under_gravity() {
        let vp = Viewport::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut field = ConfettiField::new(10);
        field.burst(1, &vp, &mut rng);
        let vy0 = field.particles[0].vel.y;
        assert!(vy0 < 0.0, "launched upward");
        field.step(&vp);
        assert!(field.particles[0].vel.y > vy0);
    }

    #[test]
    fn test_hearts_float_up_and_cull() {
        let vp = Viewport::new(800.0, 600.0, 1.0);
        let mut rng = Pcg32::seed_from_u64(4);
        let mut hearts = HeartField::new(64);
        hearts.spawn(HEART_BURST, &vp, &mut rng);
        assert_eq!(hearts.len(), HEART_BURST);
        assert!(hearts.particles.iter().all(|h| h.pos.y >= vp.height));

        let y0 = hearts.particles[0].pos.y;
        hearts.step();
        assert!(hearts.particles[0].pos.y < y0);

        // Slowest heart travels 1.2 px/frame over ~700px
        for _ in 0..700 {
            hearts.step();
        }
        assert!(hearts.is_empty());
    }
}
