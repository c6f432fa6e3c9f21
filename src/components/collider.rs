//! Collider shapes and the dynamic overlap test.
//!
//! A [`Collider`] is attached to an [`Entity`] and never stores a position of
//! its own: its world origin is always the owner's current position plus the
//! collider's `offset`.
//!
//! # Shapes
//!
//! | Shape | Origin | Extent |
//! |---|---|---|
//! | `Point` | the point | none |
//! | `Rectangle` | top-left corner | `width` × `height` |
//! | `Circle` | centre | `radius` |
//! | `Raycast` | ray start | `distance` along `angle` (degrees) |
//!
//! # Contract
//!
//! - Every pair goes through a broad-phase circle reject before the shape
//!   test. The reject radius is the other collider's extent, plus this
//!   collider's extent for rectangles and circles, plus the cast distance for
//!   raycasts.
//! - Raycasts are one-way: a raycast reports hits on other shapes, but no
//!   shape ever reports a hit on a raycast (raycast vs raycast included).
//! - A ray is sampled at most [`RAYCAST_ITERATIONS`] times; the first sample
//!   inside the target is the reported hit point.
//! - Inactive colliders neither report nor receive hits.
//! - Rectangle overlaps use the centre-and-corner sampling of
//!   [`rectangle_inside_rectangle`] and [`rectangle_inside_circle`].
//!
//! Related:
//! - [`crate::systems::collision`] runs the pairwise sweep and dispatches hits.

use std::sync::Arc;

use crate::components::entity::Entity;
use crate::events::collision::CollisionData;
use crate::math::geometry::{
    circle_inside_circle, move_toward, point_inside_circle, point_inside_rectangle,
    rectangle_inside_circle, rectangle_inside_rectangle,
};
use crate::math::vector::Vector2;
use crate::systems::render::{DebugShape, DrawContext};

/// Maximum number of samples taken along a ray.
pub const RAYCAST_ITERATIONS: f32 = 16.0;

const DEBUG_FILL: [u8; 4] = [0xff, 0x00, 0x00, 0xbb];
const DEBUG_STROKE: [u8; 4] = [0x00, 0xff, 0x00, 0xbb];

/// Distance between two ray samples: `distance / 16`, or unit steps for rays
/// no longer than 16.
pub fn raycast_step_distance(distance: f32) -> f32 {
    if distance <= RAYCAST_ITERATIONS {
        1.0
    } else {
        distance / RAYCAST_ITERATIONS
    }
}

/// Number of samples after the origin for a ray of `distance`.
pub fn march_ray_steps(distance: f32) -> u32 {
    (distance / raycast_step_distance(distance)).ceil() as u32
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    Point,
    Rectangle { width: f32, height: f32 },
    Circle { radius: f32 },
    Raycast { angle: f32, distance: f32 },
}

impl ColliderShape {
    /// Size used by the broad-phase reject when this shape is the target.
    fn extent(&self) -> f32 {
        match *self {
            ColliderShape::Point => 0.0,
            ColliderShape::Rectangle { width, height } => width + height,
            ColliderShape::Circle { radius } => radius,
            ColliderShape::Raycast { distance, .. } => distance,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    /// Unique within the owning entity.
    pub id: Arc<str>,
    /// Origin relative to the owner's position.
    pub offset: Vector2,
    pub shape: ColliderShape,
    pub active: bool,
}

impl Collider {
    pub fn new(id: &str, offset: Vector2, shape: ColliderShape) -> Self {
        Self {
            id: Arc::from(id),
            offset,
            shape,
            active: true,
        }
    }

    pub fn point(id: &str, x_offset: f32, y_offset: f32) -> Self {
        Self::new(id, Vector2::new(x_offset, y_offset), ColliderShape::Point)
    }

    pub fn rectangle(id: &str, x_offset: f32, y_offset: f32, width: f32, height: f32) -> Self {
        Self::new(
            id,
            Vector2::new(x_offset, y_offset),
            ColliderShape::Rectangle { width, height },
        )
    }

    pub fn circle(id: &str, x_offset: f32, y_offset: f32, radius: f32) -> Self {
        Self::new(
            id,
            Vector2::new(x_offset, y_offset),
            ColliderShape::Circle { radius },
        )
    }

    pub fn raycast(id: &str, x_offset: f32, y_offset: f32, angle: f32, distance: f32) -> Self {
        Self::new(
            id,
            Vector2::new(x_offset, y_offset),
            ColliderShape::Raycast { angle, distance },
        )
    }

    /// World-space origin for an owner at `owner_position`.
    pub fn origin(&self, owner_position: Vector2) -> Vector2 {
        owner_position + self.offset
    }

    /// Test this collider (owned by `owner`) against every collider of `other`.
    ///
    /// Returns one record per overlapping pair, in `other`'s collider order.
    pub fn check(&self, owner: &Entity, other: &Entity) -> Vec<CollisionData> {
        let mut hits = Vec::new();
        if !self.active {
            return hits;
        }
        let (Some(owner_id), Some(other_entity)) = (owner.id(), other.id()) else {
            return hits;
        };
        let origin = self.origin(owner.position);

        for target in other.colliders().iter().filter(|c| c.active) {
            // raycasts are one-way
            if matches!(target.shape, ColliderShape::Raycast { .. }) {
                continue;
            }
            let target_origin = target.origin(other.position);
            if !point_inside_circle(
                origin.x,
                origin.y,
                target_origin.x,
                target_origin.y,
                self.broad_phase_radius(target),
            ) {
                continue;
            }
            if let Some(hit) = self.overlap(origin, target, target_origin) {
                hits.push(CollisionData {
                    id: self.id.clone(),
                    other_id: target.id.clone(),
                    entity: owner_id.clone(),
                    other_entity: other_entity.clone(),
                    hit,
                });
            }
        }
        hits
    }

    fn broad_phase_radius(&self, target: &Collider) -> f32 {
        let own = match self.shape {
            ColliderShape::Point => 0.0,
            ColliderShape::Rectangle { .. } | ColliderShape::Circle { .. } => self.shape.extent(),
            ColliderShape::Raycast { distance, .. } => distance,
        };
        own + target.shape.extent()
    }

    /// Shape test for one pair; the hit point on success.
    fn overlap(&self, origin: Vector2, target: &Collider, target_origin: Vector2) -> Option<Vector2> {
        let (x, y) = (origin.x, origin.y);
        let hit = match self.shape {
            ColliderShape::Point => point_hits(origin, target, target_origin),
            ColliderShape::Rectangle { width, height } => match target.shape {
                ColliderShape::Point => point_inside_rectangle(
                    target_origin.x,
                    target_origin.y,
                    x,
                    y,
                    x + width,
                    y + height,
                ),
                ColliderShape::Rectangle {
                    width: other_width,
                    height: other_height,
                } => rectangle_inside_rectangle(
                    x,
                    y,
                    x + width,
                    y + height,
                    target_origin.x,
                    target_origin.y,
                    target_origin.x + other_width,
                    target_origin.y + other_height,
                ),
                ColliderShape::Circle { radius } => rectangle_inside_circle(
                    x,
                    y,
                    x + width,
                    y + height,
                    target_origin.x,
                    target_origin.y,
                    radius,
                ),
                ColliderShape::Raycast { .. } => false,
            },
            ColliderShape::Circle { radius } => match target.shape {
                ColliderShape::Point => {
                    point_inside_circle(target_origin.x, target_origin.y, x, y, radius)
                }
                ColliderShape::Rectangle {
                    width: other_width,
                    height: other_height,
                } => rectangle_inside_circle(
                    target_origin.x,
                    target_origin.y,
                    target_origin.x + other_width,
                    target_origin.y + other_height,
                    x,
                    y,
                    radius,
                ),
                ColliderShape::Circle {
                    radius: other_radius,
                } => circle_inside_circle(
                    target_origin.x,
                    target_origin.y,
                    other_radius,
                    x,
                    y,
                    radius,
                ),
                ColliderShape::Raycast { .. } => false,
            },
            ColliderShape::Raycast { angle, distance } => {
                return march_ray(origin, angle, distance, |sample| {
                    point_hits(sample, target, target_origin)
                });
            }
        };
        hit.then_some(origin)
    }

    /// Debug outline of this collider for an owner at `owner_position`, in
    /// screen space for a view at `view_position`.
    pub fn debug_shape(&self, owner_position: Vector2, view_position: Vector2) -> DebugShape {
        let at = self.origin(owner_position) - view_position;
        match self.shape {
            ColliderShape::Point => DebugShape::Circle {
                x: at.x,
                y: at.y,
                radius: 0.5,
                fill: Some(DEBUG_FILL),
                stroke: DEBUG_STROKE,
            },
            ColliderShape::Rectangle { width, height } => DebugShape::Rectangle {
                x: at.x,
                y: at.y,
                width,
                height,
                fill: Some(DEBUG_FILL),
                stroke: DEBUG_STROKE,
            },
            ColliderShape::Circle { radius } => DebugShape::Circle {
                x: at.x,
                y: at.y,
                radius,
                fill: Some(DEBUG_FILL),
                stroke: DEBUG_STROKE,
            },
            ColliderShape::Raycast { angle, distance } => {
                let end = at + move_toward(angle, distance);
                DebugShape::Line {
                    x1: at.x,
                    y1: at.y,
                    x2: end.x,
                    y2: end.y,
                    stroke: DEBUG_STROKE,
                }
            }
        }
    }

    /// Issue the debug draw call for this collider's current geometry.
    pub fn draw(&self, owner: &Entity, ctx: &mut DrawContext<'_>) {
        let shape = self.debug_shape(owner.position, ctx.view);
        ctx.renderer.draw_shape(&shape);
    }
}

/// Containment of a single point in the target shape.
fn point_hits(point: Vector2, target: &Collider, target_origin: Vector2) -> bool {
    match target.shape {
        ColliderShape::Point => {
            point.x.round() == target_origin.x.round() && point.y.round() == target_origin.y.round()
        }
        ColliderShape::Rectangle { width, height } => point_inside_rectangle(
            point.x,
            point.y,
            target_origin.x,
            target_origin.y,
            target_origin.x + width,
            target_origin.y + height,
        ),
        ColliderShape::Circle { radius } => {
            point_inside_circle(point.x, point.y, target_origin.x, target_origin.y, radius)
        }
        ColliderShape::Raycast { .. } => false,
    }
}

/// Sample a ray from `origin` and return the first sample accepted by `test`.
///
/// The origin itself is not sampled. The number of samples is bounded by the
/// step scheme even when `angle` is the negative "no heading" sentinel.
pub(crate) fn march_ray(
    origin: Vector2,
    angle: f32,
    distance: f32,
    mut test: impl FnMut(Vector2) -> bool,
) -> Option<Vector2> {
    if distance <= 0.0 {
        return None;
    }
    let step = raycast_step_distance(distance);
    (1..=march_ray_steps(distance))
        .map(|i| origin + move_toward(angle, step * i as f32))
        .find(|&sample| test(sample))
}
