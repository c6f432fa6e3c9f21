//! Collision records.
//!
//! [`CollisionData`] is produced by the dynamic collider checks and handed to
//! [`Behavior::on_collision`](crate::components::behavior::Behavior::on_collision),
//! one record per overlapping collider pair. [`StaticCollisionData`] is the
//! result of a static grid probe. Both are transient values built fresh for
//! every check and never stored by the engine.

use std::sync::Arc;

use crate::components::entity::EntityId;
use crate::math::geometry::point_distance;
use crate::math::vector::Vector2;

/// One dynamic overlap between a collider of `entity` and one of `other_entity`.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionData {
    /// Id of the collider doing the check.
    pub id: Arc<str>,
    /// Id of the collider that was hit.
    pub other_id: Arc<str>,
    pub entity: EntityId,
    pub other_entity: EntityId,
    /// Evaluation point of the checking collider; for raycasts, the first
    /// sample along the ray that was inside the other shape.
    pub hit: Vector2,
}

/// Result of a static grid probe.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StaticCollisionData {
    /// Cell payload; `0` means nothing was hit.
    pub value: i32,
    /// Where the probe started.
    pub start: Vector2,
    /// Where the collision was found, or the last sampled point on a miss.
    pub hit: Vector2,
    /// Last passable sample before `hit`.
    pub last_free: Vector2,
    /// Full cast displacement; only set by a ray probe that hit something.
    pub cast_length: Vector2,
}

impl StaticCollisionData {
    /// A probe at a single point: start, hit and last free all coincide.
    pub fn at_point(value: i32, x: f32, y: f32) -> Self {
        let point = Vector2::new(x, y);
        Self {
            value,
            start: point,
            hit: point,
            last_free: point,
            cast_length: Vector2::zero_vec(),
        }
    }

    pub fn is_hit(&self) -> bool {
        self.value != 0
    }

    /// Distance from the start to the hit point.
    pub fn magnitude_hit(&self) -> f32 {
        point_distance(self.start.x, self.start.y, self.hit.x, self.hit.y)
    }

    /// Distance from the start to the last free point.
    pub fn magnitude_free(&self) -> f32 {
        point_distance(self.start.x, self.start.y, self.last_free.x, self.last_free.y)
    }

    /// How far short of the full cast the ray stopped, per axis
    /// (`hit - start - cast_length`). Adding it to a moved position backs the
    /// mover off to the collision point.
    pub fn correction_offsets(&self) -> Vector2 {
        self.hit - self.start - self.cast_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_point_probe() {
        let data = StaticCollisionData::at_point(3, 4.0, 5.0);
        assert!(data.is_hit());
        assert_eq!(data.start, data.hit);
        assert_eq!(data.hit, data.last_free);
        assert!(approx_eq(data.magnitude_hit(), 0.0));
    }

    #[test]
    fn test_magnitudes_and_correction() {
        let data = StaticCollisionData {
            value: 1,
            start: Vector2::new(0.0, 0.0),
            hit: Vector2::new(30.0, 40.0),
            last_free: Vector2::new(3.0, 4.0),
            cast_length: Vector2::new(60.0, 80.0),
        };
        assert!(approx_eq(data.magnitude_hit(), 50.0));
        assert!(approx_eq(data.magnitude_free(), 5.0));
        assert_eq!(data.correction_offsets(), Vector2::new(-30.0, -40.0));
    }
}
