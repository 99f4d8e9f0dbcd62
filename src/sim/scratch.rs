//! Scratch-to-reveal letter card
//!
//! A coarse coverage grid over the card. Coordinates are normalized: x and y
//! in [0, 1] across the card, brush radius in card-width units. The card's
//! height/width ratio keeps the brush round on any card shape.

use glam::Vec2;

pub const SCRATCH_COLS: usize = 48;
pub const SCRATCH_ROWS: usize = 32;
/// Cleared fraction at which the rest of the card falls away
pub const REVEAL_THRESHOLD: f32 = 0.55;
/// Default brush radius (card-width units)
pub const BRUSH_RADIUS: f32 = 0.06;
/// Finger brushes are wider than mouse brushes
const COARSE_BRUSH_SCALE: f32 = 1.5;

/// Brush radius for the primary pointer type
pub fn brush_radius(coarse_pointer: bool) -> f32 {
    if coarse_pointer {
        BRUSH_RADIUS * COARSE_BRUSH_SCALE
    } else {
        BRUSH_RADIUS
    }
}

#[derive(Debug, Clone)]
pub struct ScratchCard {
    covered: Vec<bool>,
    cleared: usize,
    enabled: bool,
    revealed: bool,
    /// Card height / width
    aspect: f32,
}

impl Default for ScratchCard {
    fn default() -> Self {
        Self::new()
    }
}

impl ScratchCard {
    pub fn new() -> Self {
        Self {
            covered: vec![true; SCRATCH_COLS * SCRATCH_ROWS],
            cleared: 0,
            enabled: false,
            revealed: false,
            aspect: SCRATCH_ROWS as f32 / SCRATCH_COLS as f32,
        }
    }

    /// Set the on-screen card shape; degenerate sizes are ignored
    pub fn set_aspect(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite() {
            self.aspect = height / width;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Allow scratching (the timeline reaches the letter)
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn is_covered(&self, col: usize, row: usize) -> bool {
        col < SCRATCH_COLS && row < SCRATCH_ROWS && self.covered[row * SCRATCH_COLS + col]
    }

    pub fn cleared_fraction(&self) -> f32 {
        self.cleared as f32 / self.covered.len() as f32
    }

    /// Clear every cell whose center lies within `radius` of `point`.
    /// Returns true on the call that crosses the reveal threshold.
    pub fn scratch(&mut self, point: Vec2, radius: f32) -> bool {
        if !self.enabled || self.revealed {
            return false;
        }
        let aspect = self.aspect;
        let r2 = radius * radius;
        for row in 0..SCRATCH_ROWS {
            let cy = (row as f32 + 0.5) / SCRATCH_ROWS as f32;
            let dy = (cy - point.y) * aspect;
            if dy * dy > r2 {
                continue;
            }
            for col in 0..SCRATCH_COLS {
                let cx = (col as f32 + 0.5) / SCRATCH_COLS as f32;
                let dx = cx - point.x;
                let idx = row * SCRATCH_COLS + col;
                if self.covered[idx] && dx * dx + dy * dy <= r2 {
                    self.covered[idx] = false;
                    self.cleared += 1;
                }
            }
        }
        if self.cleared_fraction() >= REVEAL_THRESHOLD {
            self.reveal();
            return true;
        }
        false
    }

    /// Scratch along a stroke so fast pointer moves leave no gaps
    pub fn scratch_line(&mut self, from: Vec2, to: Vec2, radius: f32) -> bool {
        let steps = ((to - from).length() / (radius * 0.5).max(1e-3)).ceil().max(1.0) as usize;
        let mut revealed = false;
        for i in 0..=steps {
            let p = from.lerp(to, i as f32 / steps as f32);
            revealed |= self.scratch(p, radius);
        }
        revealed
    }

    fn reveal(&mut self) {
        self.covered.iter_mut().for_each(|c| *c = false);
        self.cleared = self.covered.len();
        self.revealed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_until_enabled() {
        let mut card = ScratchCard::new();
        assert!(!card.scratch(Vec2::splat(0.5), 0.2));
        assert_eq!(card.cleared_fraction(), 0.0);
        card.enable();
        card.scratch(Vec2::splat(0.5), 0.1);
        assert!(card.cleared_fraction() > 0.0);
        assert!(!card.is_covered(SCRATCH_COLS / 2, SCRATCH_ROWS / 2));
        assert!(card.is_covered(0, 0));
    }

    #[test]
    fn test_reveal_once_past_threshold() {
        let mut card = ScratchCard::new();
        card.enable();
        let mut reveals = 0;
        let mut y = 0.05;
        while y < 1.0 {
            if card.scratch_line(Vec2::new(0.0, y), Vec2::new(1.0, y), BRUSH_RADIUS) {
                reveals += 1;
            }
            y += 0.1;
        }
        assert_eq!(reveals, 1);
        assert!(card.is_revealed());
        assert_eq!(card.cleared_fraction(), 1.0);
        // Further scratches do nothing
        assert!(!card.scratch(Vec2::splat(0.5), 1.0));
    }

    fn cleared_in_column(card: &ScratchCard, col: usize) -> usize {
        (0..SCRATCH_ROWS).filter(|&row| !card.is_covered(col, row)).count()
    }

    fn cleared_in_row(card: &ScratchCard, row: usize) -> usize {
        (0..SCRATCH_COLS).filter(|&col| !card.is_covered(col, row)).count()
    }

    #[test]
    fn test_brush_follows_card_aspect() {
        let center = Vec2::splat(0.5);

        // Default shape has square cells: the brush spans as many rows as columns
        let mut wide = ScratchCard::new();
        wide.enable();
        wide.scratch(center, 0.1);
        let (wide_rows, wide_cols) = (
            cleared_in_column(&wide, SCRATCH_COLS / 2),
            cleared_in_row(&wide, SCRATCH_ROWS / 2),
        );
        assert_eq!(wide_rows, wide_cols);

        // A square card stretches cells vertically, so fewer rows are touched
        let mut square = ScratchCard::new();
        square.set_aspect(300.0, 300.0);
        assert_eq!(square.aspect(), 1.0);
        square.enable();
        square.scratch(center, 0.1);
        assert_eq!(cleared_in_row(&square, SCRATCH_ROWS / 2), wide_cols);
        assert!(cleared_in_column(&square, SCRATCH_COLS / 2) < wide_rows);
    }

    #[test]
    fn test_touch_brush_is_wider() {
        assert_eq!(brush_radius(false), BRUSH_RADIUS);
        assert!(brush_radius(true) > BRUSH_RADIUS);
    }

    #[test]
    fn test_degenerate_aspect_ignored() {
        let mut card = ScratchCard::new();
        let before = card.aspect();
        card.set_aspect(0.0, 100.0);
        card.set_aspect(100.0, f32::NAN);
        assert_eq!(card.aspect(), before);
    }

    #[test]
    fn test_same_spot_twice_counts_once() {
        let mut card = ScratchCard::new();
        card.enable();
        card.scratch(Vec2::new(0.2, 0.2), 0.05);
        let once = card.cleared_fraction();
        card.scratch(Vec2::new(0.2, 0.2), 0.05);
        assert_eq!(card.cleared_fraction(), once);
    }
}
