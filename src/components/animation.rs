//! Frame-accumulator animation state.
//!
//! The frame index is a float that grows by `speed` every internal update. It
//! is not wrapped here; drawing wraps it into the sprite's frame count (see
//! [`crate::systems::render::sprite_command`]).

/// Playback state for a horizontal sprite strip.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Animation {
    /// Current frame, unwrapped.
    pub frame: f32,
    /// Frames advanced per logic tick.
    pub speed: f32,
}

impl Animation {
    pub fn new(speed: f32) -> Self {
        Self { frame: 0.0, speed }
    }

    /// Step one tick for a strip of `length` frames.
    ///
    /// Returns true when the step crossed a multiple of `length`, i.e. the
    /// position within the strip did not move forward. Only forward playback
    /// (`speed > 0`) reports loops.
    pub fn advance(&mut self, length: u32) -> bool {
        let before = self.frame;
        self.frame += self.speed;
        if self.speed <= 0.0 || length == 0 {
            return false;
        }
        let length = length as f32;
        (self.frame.abs() % length) <= (before.abs() % length)
    }

    pub fn restart(&mut self) {
        self.frame = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loops_over(speed: f32, length: u32, ticks: usize) -> usize {
        let mut animation = Animation::new(speed);
        (0..ticks).filter(|_| animation.advance(length)).count()
    }

    #[test]
    fn test_whole_speed_loops_once_per_strip() {
        // 4 frames at one frame per tick: wraps on ticks 4 and 8
        assert_eq!(loops_over(1.0, 4, 8), 2);
    }

    #[test]
    fn test_fractional_speed_does_not_fire_inside_a_frame() {
        // 0.25 per tick over a 4-frame strip: one wrap every 16 ticks
        assert_eq!(loops_over(0.25, 4, 16), 1);
        assert_eq!(loops_over(0.25, 4, 15), 0);
    }

    #[test]
    fn test_loop_compares_unfloored_positions() {
        // 0.5 over a 2-frame strip: positions 0.5, 1.0, 1.5, 0.0 within the
        // strip; only the wrap on tick 4 moves backwards. Flooring would also
        // fire on tick 1, where both positions floor to frame 0.
        let mut animation = Animation::new(0.5);
        let fired: Vec<bool> = (0..4).map(|_| animation.advance(2)).collect();
        assert_eq!(fired, vec![false, false, false, true]);
    }

    #[test]
    fn test_speed_of_a_full_strip_loops_every_tick() {
        assert_eq!(loops_over(4.0, 4, 3), 3);
    }

    #[test]
    fn test_no_loop_without_length_or_forward_speed() {
        assert_eq!(loops_over(1.0, 0, 10), 0);
        assert_eq!(loops_over(-1.0, 4, 10), 0);
        assert_eq!(loops_over(0.0, 4, 10), 0);
    }

    #[test]
    fn test_frame_keeps_accumulating() {
        let mut animation = Animation::new(0.5);
        for _ in 0..10 {
            animation.advance(2);
        }
        assert_eq!(animation.frame, 5.0);
        animation.restart();
        assert_eq!(animation.frame, 0.0);
    }
}
