//! Dynamic collision resolution and static grid probes.
//!
//! # Dynamic
//!
//! Every logic tick, [`resolve_collisions`] runs once per collision candidate
//! (entities with at least one active collider, in slot order). It is a plain
//! O(n²) sweep with no spatial partitioning, which is fine for small entity
//! counts.
//!
//! Liveness is checked right before every callback, not just when the sweep
//! starts: an entity destroyed by an earlier callback gets no more callbacks
//! and causes no more callbacks in the same tick.
//!
//! # Static
//!
//! [`get_static_collision`] and [`ray_cast_static_collision`] read the scene's
//! static grid on demand; nothing runs them automatically.

use crate::components::collider::{march_ray_steps, raycast_step_distance};
use crate::components::entity::EntityId;
use crate::events::collision::{CollisionData, StaticCollisionData};
use crate::game::Game;
use crate::math::geometry::move_toward;
use crate::math::vector::Vector2;
use crate::resources::entitymanager::Occupant;
use crate::resources::scene::Scene;
use crate::systems::process::with_checkout;

/// Test every collider of `caller` against every other candidate and dispatch
/// `on_collision` for each hit.
pub fn resolve_collisions(game: &mut Game, caller: &EntityId, candidates: &[EntityId]) {
    if candidates.len() <= 1 {
        return;
    }
    for other in candidates {
        if other == caller {
            continue;
        }
        if !game.entities.is_alive(caller) {
            return;
        }
        if !game.entities.is_alive(other) {
            continue;
        }
        let records = collect_hits(game, caller, other);
        for record in &records {
            if !game.entities.is_alive(caller) {
                return;
            }
            // the other side was destroyed by an earlier callback in this batch
            if !game.entities.is_alive(other) {
                break;
            }
            let Some(slot) = game.entities.slot_of(caller) else {
                return;
            };
            with_checkout(game, slot, |occupant, game| {
                let Occupant { entity, behavior } = occupant;
                behavior.on_collision(entity, game, record);
            });
        }
    }
}

fn collect_hits(game: &Game, caller: &EntityId, other: &EntityId) -> Vec<CollisionData> {
    let (Some(owner), Some(target)) = (game.entities.get(caller), game.entities.get(other)) else {
        return Vec::new();
    };
    owner
        .colliders()
        .iter()
        .flat_map(|collider| collider.check(owner, target))
        .collect()
}

/// Cell value under `(x, y)`.
///
/// The point is floored and clamped to non-negative coordinates before it is
/// mapped into the grid. Outside the grid, or with no grid, the value is 0.
pub fn get_static_collision(scene: &Scene, x: f32, y: f32) -> StaticCollisionData {
    let x = x.floor().max(0.0);
    let y = y.floor().max(0.0);
    let resolution = scene.static_resolution.max(1) as f32;
    let column = (x / resolution).floor() as usize;
    let row = (y / resolution).floor() as usize;
    let value = scene.static_grid.cell(column, row).unwrap_or(0);
    StaticCollisionData::at_point(value, x, y)
}

/// March from `(x, y)` along `angle` for `dist` pixels, probing the grid.
///
/// Stops at the first non-zero cell. On a hit, `hit` is the probed point,
/// `last_free` the previous passable probe and `cast_length` the full cast
/// displacement. On a miss the result is the last probe with `start` set to
/// the ray origin. Probes use the same bounded step scheme as raycast
/// colliders, starting at the origin itself.
pub fn ray_cast_static_collision(
    scene: &Scene,
    x: f32,
    y: f32,
    angle: f32,
    dist: f32,
) -> StaticCollisionData {
    let start = Vector2::new(x, y).floor();
    if dist <= 0.0 {
        return get_static_collision(scene, start.x, start.y);
    }
    let step = raycast_step_distance(dist);
    let steps = march_ray_steps(dist);
    let mut last_free = start;
    let mut i = 0;
    loop {
        let check = start + move_toward(angle, step * i as f32);
        let mut data = get_static_collision(scene, check.x, check.y);
        data.start = start;
        if data.is_hit() {
            data.last_free = last_free.floor();
            data.cast_length = move_toward(angle, dist);
            return data;
        }
        last_free = check;
        if i >= steps {
            return data;
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::scene::StaticGrid;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn scene_with(rows: Vec<Vec<i32>>) -> Scene {
        Scene::new("grid").with_grid(StaticGrid::new(rows))
    }

    // ===== POINT PROBES =====

    #[test]
    fn test_point_probe_maps_cells() {
        let scene = scene_with(vec![vec![0, 7], vec![3, 0]]);
        assert_eq!(get_static_collision(&scene, 20.0, 4.0).value, 7);
        assert_eq!(get_static_collision(&scene, 15.9, 16.0).value, 3);
        assert_eq!(get_static_collision(&scene, 5.0, 5.0).value, 0);
    }

    #[test]
    fn test_point_probe_clamps_and_bounds() {
        let scene = scene_with(vec![vec![9, 0]]);
        let data = get_static_collision(&scene, -30.5, -2.0);
        assert_eq!(data.value, 9);
        assert_eq!(data.start, Vector2::new(0.0, 0.0));
        assert_eq!(get_static_collision(&scene, 100.0, 0.0).value, 0);
        assert_eq!(get_static_collision(&scene, 0.0, 100.0).value, 0);
        assert_eq!(get_static_collision(&Scene::new("empty"), 1.0, 1.0).value, 0);
    }

    // ===== RAY PROBES =====

    #[test]
    fn test_ray_stops_at_first_blocked_cell() {
        // column 3 (x 48..64) of row 0 is solid
        let scene = scene_with(vec![vec![0, 0, 0, 1, 0, 0, 0, 0]]);
        let data = ray_cast_static_collision(&scene, 0.0, 8.0, 0.0, 100.0);
        assert_eq!(data.value, 1);
        assert_eq!(data.start, Vector2::new(0.0, 8.0));
        assert_eq!(data.hit, Vector2::new(50.0, 8.0));
        assert_eq!(data.last_free, Vector2::new(43.0, 8.0));
        assert!(data.magnitude_free() < data.magnitude_hit());
        assert!(approx_eq(data.cast_length.x, 100.0));
        assert!(approx_eq(data.correction_offsets().x, -50.0));
    }

    #[test]
    fn test_ray_miss_reports_last_probe() {
        let scene = scene_with(vec![vec![0; 10]]);
        let data = ray_cast_static_collision(&scene, 0.0, 0.0, 0.0, 64.0);
        assert_eq!(data.value, 0);
        assert!(approx_eq(data.hit.x, 64.0));
        assert_eq!(data.cast_length, Vector2::zero_vec());
    }

    #[test]
    fn test_ray_without_heading_terminates() {
        let scene = scene_with(vec![vec![0; 4]]);
        let data = ray_cast_static_collision(&scene, 10.0, 5.0, -1.0, 200.0);
        assert_eq!(data.value, 0);
        assert_eq!(data.hit, Vector2::new(10.0, 5.0));
    }

    #[test]
    fn test_zero_length_ray_is_a_point_probe() {
        let scene = scene_with(vec![vec![4]]);
        let data = ray_cast_static_collision(&scene, 3.7, 2.2, 0.0, 0.0);
        assert_eq!(data.value, 4);
        assert_eq!(data.start, Vector2::new(3.0, 2.0));
    }
}
