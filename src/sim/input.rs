//! Gesture translation
//!
//! Every gesture source (face tap, up/down controls, drag, wheel, keys) ends
//! up as the same `InputAction::Nudge` primitive. Timing comes from the
//! simulation clock, so hold-to-repeat is driven by `poll` instead of timers.

use crate::consts::{DRAG_STEP_PX, HOLD_DELAY_MS, HOLD_REPEAT_MS};

/// Browser pointer id (`PointerEvent.pointerId`)
pub type PointerId = i32;

/// Which way a control turns its dial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    #[inline]
    pub fn delta(self) -> i32 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }
}

/// Keys a focused dial responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialKey {
    ArrowUp,
    ArrowDown,
    Enter,
}

impl DialKey {
    /// Map a `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(DialKey::ArrowUp),
            "ArrowDown" => Some(DialKey::ArrowDown),
            "Enter" => Some(DialKey::Enter),
            _ => None,
        }
    }
}

/// Raw gesture from the page
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// Click on the dial face; `y_fraction` is 0 at the top edge, 1 at the bottom
    FaceTap { dial: usize, y_fraction: f32 },
    /// Pointer went down on an up/down control
    ControlPress {
        dial: usize,
        direction: Direction,
        pointer: PointerId,
    },
    /// Pointer up, leave or cancel on an up/down control
    ControlRelease {
        dial: usize,
        direction: Direction,
        pointer: PointerId,
    },
    DragStart { dial: usize, pointer: PointerId, y: f32 },
    DragMove { dial: usize, pointer: PointerId, y: f32 },
    DragEnd { dial: usize, pointer: PointerId },
    Wheel { dial: usize, delta_y: f32 },
    Key { dial: usize, key: DialKey },
    Shuffle,
}

/// What the scene should do in response to a gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Turn a dial, then evaluate
    Nudge { dial: usize, delta: i32 },
    /// Randomize every dial, then evaluate
    Shuffle,
    /// Evaluate without changing anything
    Check,
}

#[derive(Debug, Clone)]
struct Hold {
    dial: usize,
    direction: Direction,
    pointer: PointerId,
    next_step_at: f64,
    repeating: bool,
}

impl Hold {
    /// Emit every step due at or before `now`
    fn catch_up(&mut self, now: f64, out: &mut Vec<InputAction>) {
        while now >= self.next_step_at {
            out.push(InputAction::Nudge {
                dial: self.dial,
                delta: self.direction.delta(),
            });
            self.repeating = true;
            self.next_step_at += HOLD_REPEAT_MS;
        }
    }
}

#[derive(Debug, Clone)]
struct Drag {
    dial: usize,
    pointer: PointerId,
    start_y: f32,
    consumed: f32,
    /// At least one step was applied
    stepped: bool,
}

/// Tracks in-flight holds and drags
#[derive(Debug, Clone, Default)]
pub struct InputHandler {
    holds: Vec<Hold>,
    drags: Vec<Drag>,
    /// Dials whose last drag turned them; the click that ends it is swallowed
    swallow_tap: Vec<usize>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate one gesture at simulation time `now` (ms)
    pub fn handle(&mut self, gesture: &Gesture, now: f64) -> Vec<InputAction> {
        let mut out = Vec::new();
        match *gesture {
            Gesture::FaceTap { dial, y_fraction } => {
                if let Some(idx) = self.swallow_tap.iter().position(|&d| d == dial) {
                    self.swallow_tap.swap_remove(idx);
                    return out;
                }
                let delta = if y_fraction < 0.5 { 1 } else { -1 };
                out.push(InputAction::Nudge { dial, delta });
            }
            Gesture::ControlPress {
                dial,
                direction,
                pointer,
            } => self.press(dial, direction, pointer, now),
            Gesture::ControlRelease {
                dial,
                direction,
                pointer,
            } => self.release(dial, direction, pointer, now, &mut out),
            Gesture::DragStart { dial, pointer, y } => {
                // One drag per dial; a second finger doesn't steal it
                if !self.drags.iter().any(|d| d.dial == dial) {
                    self.swallow_tap.retain(|&d| d != dial);
                    self.drags.push(Drag {
                        dial,
                        pointer,
                        start_y: y,
                        consumed: 0.0,
                        stepped: false,
                    });
                }
            }
            Gesture::DragMove { dial, pointer, y } => {
                if let Some(drag) = self
                    .drags
                    .iter_mut()
                    .find(|d| d.dial == dial && d.pointer == pointer)
                {
                    // Upward movement is positive
                    let dy = drag.start_y - y;
                    let steps = ((dy - drag.consumed) / DRAG_STEP_PX).trunc() as i32;
                    if steps != 0 {
                        drag.consumed += steps as f32 * DRAG_STEP_PX;
                        drag.stepped = true;
                        out.push(InputAction::Nudge { dial, delta: steps });
                    }
                }
            }
            Gesture::DragEnd { dial, pointer } => {
                if let Some(idx) = self
                    .drags
                    .iter()
                    .position(|d| d.dial == dial && d.pointer == pointer)
                {
                    let drag = self.drags.swap_remove(idx);
                    if drag.stepped && !self.swallow_tap.contains(&dial) {
                        self.swallow_tap.push(dial);
                    }
                }
            }
            Gesture::Wheel { dial, delta_y } => {
                if delta_y != 0.0 && !delta_y.is_nan() {
                    let delta = if delta_y < 0.0 { 1 } else { -1 };
                    out.push(InputAction::Nudge { dial, delta });
                }
            }
            Gesture::Key { dial, key } => match key {
                DialKey::ArrowUp => out.push(InputAction::Nudge { dial, delta: 1 }),
                DialKey::ArrowDown => out.push(InputAction::Nudge { dial, delta: -1 }),
                DialKey::Enter => out.push(InputAction::Check),
            },
            Gesture::Shuffle => out.push(InputAction::Shuffle),
        }
        out
    }

    /// Emit repeat steps for held controls that are due at `now`
    pub fn poll(&mut self, now: f64) -> Vec<InputAction> {
        let mut out = Vec::new();
        for hold in &mut self.holds {
            hold.catch_up(now, &mut out);
        }
        out
    }

    /// Number of controls currently held
    pub fn active_holds(&self) -> usize {
        self.holds.len()
    }

    /// True while `pointer` is dragging `dial`
    pub fn is_dragging(&self, dial: usize, pointer: PointerId) -> bool {
        self.drags
            .iter()
            .any(|d| d.dial == dial && d.pointer == pointer)
    }

    /// True if `dial`'s next face tap belongs to a drag that already turned it
    pub fn swallows_tap(&self, dial: usize) -> bool {
        self.swallow_tap.contains(&dial)
    }

    fn press(&mut self, dial: usize, direction: Direction, pointer: PointerId, now: f64) {
        let taken = self
            .holds
            .iter()
            .any(|h| (h.dial == dial && h.direction == direction) || h.pointer == pointer);
        if taken {
            log::debug!("Ignoring press on dial {dial} by pointer {pointer}: already held");
            return;
        }
        self.holds.push(Hold {
            dial,
            direction,
            pointer,
            next_step_at: now + HOLD_DELAY_MS,
            repeating: false,
        });
    }

    fn release(
        &mut self,
        dial: usize,
        direction: Direction,
        pointer: PointerId,
        now: f64,
        out: &mut Vec<InputAction>,
    ) {
        let Some(idx) = self
            .holds
            .iter()
            .position(|h| h.dial == dial && h.direction == direction && h.pointer == pointer)
        else {
            return;
        };
        let mut hold = self.holds.remove(idx);
        hold.catch_up(now, out);
        if !hold.repeating {
            // Quick tap: exactly one step
            out.push(InputAction::Nudge {
                dial,
                delta: direction.delta(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nudges(actions: &[InputAction]) -> i32 {
        actions
            .iter()
            .map(|a| match a {
                InputAction::Nudge { delta, .. } => *delta,
                _ => 0,
            })
            .sum()
    }

    fn press(dial: usize, direction: Direction, pointer: PointerId) -> Gesture {
        Gesture::ControlPress {
            dial,
            direction,
            pointer,
        }
    }

    fn release(dial: usize, direction: Direction, pointer: PointerId) -> Gesture {
        Gesture::ControlRelease {
            dial,
            direction,
            pointer,
        }
    }

    #[test]
    fn test_quick_tap_is_one_step() {
        let mut input = InputHandler::new();
        assert!(input.handle(&press(0, Direction::Up, 1), 0.0).is_empty());
        assert!(input.poll(100.0).is_empty());
        let out = input.handle(&release(0, Direction::Up, 1), 150.0);
        assert_eq!(out, vec![InputAction::Nudge { dial: 0, delta: 1 }]);
        assert_eq!(input.active_holds(), 0);
    }

    #[test]
    fn test_hold_repeats_at_interval() {
        let mut input = InputHandler::new();
        input.handle(&press(2, Direction::Down, 7), 1000.0);

        let mut total = Vec::new();
        // Poll every frame for 1000 ms
        let mut t = 1000.0;
        while t <= 2000.0 {
            total.extend(input.poll(t));
            t += 1000.0 / 60.0;
        }
        // Steps at +300, +420, +540, +660, +780, +900
        assert_eq!(total.len(), 6);
        assert_eq!(nudges(&total), -6);

        // Release after a hold adds nothing extra
        let out = input.handle(&release(2, Direction::Down, 7), 2000.0);
        assert!(out.is_empty());

        // Nothing more after release
        assert!(input.poll(5000.0).is_empty());
    }

    #[test]
    fn test_release_catches_up_missed_steps() {
        let mut input = InputHandler::new();
        input.handle(&press(0, Direction::Up, 1), 0.0);
        // No poll in between: release at 700 sees steps at 300, 420, 540, 660
        let out = input.handle(&release(0, Direction::Up, 1), 700.0);
        assert_eq!(nudges(&out), 4);
    }

    #[test]
    fn test_second_pointer_cannot_cancel_hold() {
        let mut input = InputHandler::new();
        input.handle(&press(0, Direction::Up, 1), 0.0);
        // Another pointer presses and releases the same control
        input.handle(&press(0, Direction::Up, 2), 50.0);
        let out = input.handle(&release(0, Direction::Up, 2), 60.0);
        assert!(out.is_empty());
        assert_eq!(input.active_holds(), 1);

        // Original hold still repeats
        let out = input.poll(430.0);
        assert_eq!(nudges(&out), 2);

        let out = input.handle(&release(0, Direction::Up, 1), 450.0);
        assert!(out.is_empty());
        assert_eq!(input.active_holds(), 0);
    }

    #[test]
    fn test_face_tap_halves() {
        let mut input = InputHandler::new();
        assert_eq!(
            input.handle(&Gesture::FaceTap { dial: 1, y_fraction: 0.2 }, 0.0),
            vec![InputAction::Nudge { dial: 1, delta: 1 }]
        );
        assert_eq!(
            input.handle(&Gesture::FaceTap { dial: 1, y_fraction: 0.8 }, 0.0),
            vec![InputAction::Nudge { dial: 1, delta: -1 }]
        );
    }

    #[test]
    fn test_drag_steps_accumulate() {
        let mut input = InputHandler::new();
        input.handle(&Gesture::DragStart { dial: 0, pointer: 3, y: 200.0 }, 0.0);
        // 10px: not yet a step
        let out = input.handle(&Gesture::DragMove { dial: 0, pointer: 3, y: 190.0 }, 0.0);
        assert!(out.is_empty());
        // 40px up: two steps
        let out = input.handle(&Gesture::DragMove { dial: 0, pointer: 3, y: 160.0 }, 0.0);
        assert_eq!(out, vec![InputAction::Nudge { dial: 0, delta: 2 }]);
        // Other pointer is ignored
        let out = input.handle(&Gesture::DragMove { dial: 0, pointer: 9, y: 0.0 }, 0.0);
        assert!(out.is_empty());
        // Back down 40px from 160: consumed is 36, dy = 0 => -2 steps
        let out = input.handle(&Gesture::DragMove { dial: 0, pointer: 3, y: 200.0 }, 0.0);
        assert_eq!(out, vec![InputAction::Nudge { dial: 0, delta: -2 }]);

        input.handle(&Gesture::DragEnd { dial: 0, pointer: 3 }, 0.0);
        assert!(!input.is_dragging(0, 3));
    }

    #[test]
    fn test_click_after_stepping_drag_is_swallowed() {
        let mut input = InputHandler::new();
        input.handle(&Gesture::DragStart { dial: 1, pointer: 1, y: 200.0 }, 0.0);
        // 20px up: one step
        let out = input.handle(&Gesture::DragMove { dial: 1, pointer: 1, y: 180.0 }, 0.0);
        assert_eq!(out, vec![InputAction::Nudge { dial: 1, delta: 1 }]);
        // Back to 5px from the start: no step either way
        let out = input.handle(&Gesture::DragMove { dial: 1, pointer: 1, y: 195.0 }, 0.0);
        assert!(out.is_empty());
        input.handle(&Gesture::DragEnd { dial: 1, pointer: 1 }, 0.0);
        assert!(input.swallows_tap(1));

        // The click the browser sends after pointerup adds nothing
        let out = input.handle(&Gesture::FaceTap { dial: 1, y_fraction: 0.2 }, 0.0);
        assert!(out.is_empty());
        assert!(!input.swallows_tap(1));

        // A plain tap afterwards still counts
        input.handle(&Gesture::DragStart { dial: 1, pointer: 1, y: 100.0 }, 0.0);
        input.handle(&Gesture::DragEnd { dial: 1, pointer: 1 }, 0.0);
        assert!(!input.swallows_tap(1));
        let out = input.handle(&Gesture::FaceTap { dial: 1, y_fraction: 0.2 }, 0.0);
        assert_eq!(out, vec![InputAction::Nudge { dial: 1, delta: 1 }]);
    }

    #[test]
    fn test_stale_swallow_cleared_by_next_press() {
        let mut input = InputHandler::new();
        input.handle(&Gesture::DragStart { dial: 0, pointer: 1, y: 100.0 }, 0.0);
        input.handle(&Gesture::DragMove { dial: 0, pointer: 1, y: 60.0 }, 0.0);
        // Released off the dial: no click follows
        input.handle(&Gesture::DragEnd { dial: 0, pointer: 1 }, 0.0);
        assert!(input.swallows_tap(0));
        // The next press starts fresh
        input.handle(&Gesture::DragStart { dial: 0, pointer: 2, y: 100.0 }, 0.0);
        assert!(!input.swallows_tap(0));
    }

    #[test]
    fn test_wheel_and_keys() {
        let mut input = InputHandler::new();
        assert_eq!(
            input.handle(&Gesture::Wheel { dial: 0, delta_y: -120.0 }, 0.0),
            vec![InputAction::Nudge { dial: 0, delta: 1 }]
        );
        assert_eq!(
            input.handle(&Gesture::Wheel { dial: 0, delta_y: 3.0 }, 0.0),
            vec![InputAction::Nudge { dial: 0, delta: -1 }]
        );
        assert!(input
            .handle(&Gesture::Wheel { dial: 0, delta_y: 0.0 }, 0.0)
            .is_empty());

        let key = |k: &str| Gesture::Key {
            dial: 4,
            key: DialKey::from_key(k).unwrap(),
        };
        assert_eq!(
            input.handle(&key("ArrowUp"), 0.0),
            vec![InputAction::Nudge { dial: 4, delta: 1 }]
        );
        assert_eq!(
            input.handle(&key("ArrowDown"), 0.0),
            vec![InputAction::Nudge { dial: 4, delta: -1 }]
        );
        assert_eq!(input.handle(&key("Enter"), 0.0), vec![InputAction::Check]);
        assert_eq!(DialKey::from_key("a"), None);
    }
}
