//! Per-frame keyboard input resource.
//!
//! Captures which keys are held and exposes edge queries (pressed/released
//! this tick) to game and entity logic. The engine core never reads it; the
//! host feeds it through [`InputState::key_down`] / [`InputState::key_up`] and
//! the frame scheduler calls [`InputState::end_frame`] after every logic tick.
//!
//! Key identifiers are lowercased on entry so `"ArrowUp"` and `"arrowup"`
//! name the same key.

use rustc_hash::FxHashSet;

use crate::math::vector::Vector2;

pub const INPUT_ARROWUP: &str = "arrowup";
pub const INPUT_ARROWDOWN: &str = "arrowdown";
pub const INPUT_ARROWLEFT: &str = "arrowleft";
pub const INPUT_ARROWRIGHT: &str = "arrowright";

/// Held keys for the current and the previous logic tick.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: FxHashSet<String>,
    previous: FxHashSet<String>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press from the host.
    pub fn key_down(&mut self, key: &str) {
        self.held.insert(key.to_lowercase());
    }

    /// Record a key release from the host.
    pub fn key_up(&mut self, key: &str) {
        self.held.remove(&key.to_lowercase());
    }

    /// Whether the key is currently down.
    pub fn is_key_held(&self, key: &str) -> bool {
        self.held.contains(&key.to_lowercase())
    }

    /// Down now, up at the end of the previous tick.
    pub fn is_key_pressed(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        self.held.contains(&key) && !self.previous.contains(&key)
    }

    /// Up now, down at the end of the previous tick.
    pub fn is_key_released(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        !self.held.contains(&key) && self.previous.contains(&key)
    }

    /// Snapshot the held set so the next tick's edges are computed against it.
    pub fn end_frame(&mut self) {
        self.previous.clone_from(&self.held);
    }

    /// Non-normalized direction from four held keys: x in `-1..=1` (left to
    /// right), y in `-1..=1` (up to down).
    pub fn input_vector(&self, up: &str, down: &str, left: &str, right: &str) -> Vector2 {
        let axis = |neg: &str, pos: &str| -> f32 {
            let mut value = 0.0;
            if self.is_key_held(pos) {
                value += 1.0;
            }
            if self.is_key_held(neg) {
                value -= 1.0;
            }
            value
        };
        Vector2::new(axis(left, right), axis(up, down))
    }

    /// Arrow-key direction.
    pub fn arrow_vector(&self) -> Vector2 {
        self.input_vector(INPUT_ARROWUP, INPUT_ARROWDOWN, INPUT_ARROWLEFT, INPUT_ARROWRIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_follow_end_frame() {
        let mut input = InputState::new();
        input.key_down("Space");
        assert!(input.is_key_held("space"));
        assert!(input.is_key_pressed("space"));
        assert!(!input.is_key_released("space"));

        input.end_frame();
        assert!(input.is_key_held("space"));
        assert!(!input.is_key_pressed("space"));

        input.key_up("SPACE");
        assert!(input.is_key_released("space"));
        input.end_frame();
        assert!(!input.is_key_released("space"));
    }

    #[test]
    fn test_input_vector() {
        let mut input = InputState::new();
        assert_eq!(input.arrow_vector(), Vector2::zero_vec());

        input.key_down("ArrowRight");
        input.key_down("ArrowUp");
        assert_eq!(input.arrow_vector(), Vector2::new(1.0, -1.0));

        input.key_down("ArrowLeft");
        input.key_down("ArrowDown");
        assert_eq!(input.arrow_vector(), Vector2::new(0.0, 0.0));
    }
}
