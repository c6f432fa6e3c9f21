//! Automatic per-tick movement.
//!
//! An entity with a [`Movement`] is moved by `speed` during every internal
//! update (after `prev_position` is captured). There is no collision response;
//! movers that need it probe the static grid themselves.
//!
//! With a non-negative `view_edge_limit`, a mover that ends up outside the
//! view grown by that many pixels is destroyed with `unloading = true`, which
//! is how bullets and scrolling debris clean themselves up.

use crate::math::vector::Vector2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Movement {
    /// Displacement per logic tick.
    pub speed: Vector2,
    /// View padding for off-screen culling; negative disables culling.
    pub view_edge_limit: f32,
}

impl Default for Movement {
    fn default() -> Self {
        Self {
            speed: Vector2::zero_vec(),
            view_edge_limit: -1.0,
        }
    }
}

impl Movement {
    pub fn new(speed: Vector2) -> Self {
        Self {
            speed,
            ..Self::default()
        }
    }

    /// Enable off-screen culling with `padding` pixels around the view.
    pub fn culled_outside_view(mut self, padding: f32) -> Self {
        self.view_edge_limit = padding;
        self
    }

    pub fn culls(&self) -> bool {
        self.view_edge_limit >= 0.0
    }

    /// Apply one tick of movement to `position`.
    pub fn apply(&self, position: &mut Vector2) {
        *position += self.speed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_adds_speed() {
        let movement = Movement::new(Vector2::new(2.0, -1.0));
        let mut position = Vector2::new(10.0, 10.0);
        movement.apply(&mut position);
        movement.apply(&mut position);
        assert_eq!(position, Vector2::new(14.0, 8.0));
    }

    #[test]
    fn test_culling_flag() {
        assert!(!Movement::default().culls());
        assert!(Movement::default().culled_outside_view(0.0).culls());
    }
}
