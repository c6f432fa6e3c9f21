//! One logic tick over every entity.
//!
//! [`process`] is what the frame scheduler runs when a logic tick is due.
//!
//! # Order
//!
//! 1. Activate queued entities, most recently queued first, calling
//!    `on_init` on each right after it is slotted.
//! 2. Game update, then scene update (and scene scrolling).
//! 3. Early pass: `early_update` on every entity whose `process_flags` match
//!    the game mode.
//! 4. Main pass: animation step, `prev_position` capture and automatic
//!    movement, then `update`. Both are gated by mode and by the entity still
//!    being alive.
//! 5. Late pass: `late_update` (gated), then, if the entity survived, render
//!    list insertion (visible and `render_flags` match) and registration as a
//!    collision candidate (at least one active collider).
//! 6. Slot-table compaction when enough slots are empty.
//! 7. Collision resolution for every candidate.
//! 8. Renumbering after a mass destroy made during the tick, then a scene
//!    switch requested during the tick.
//!
//! Ticks do not nest: a frame requested from inside a hook is refused.
//!
//! An entity destroyed during a pass is skipped by every later step of the
//! same tick.

use log::error;

use crate::components::entity::EntityId;
use crate::game::Game;
use crate::resources::entitymanager::Occupant;
use crate::systems::collision::resolve_collisions;
use crate::systems::destroy::finalize;

/// Run `hook` on the occupant of `slot` while it is checked out.
///
/// Returns false when the slot holds no entity. A destroy requested while the
/// hook ran is applied afterwards, including the `on_destroy` hook.
pub(crate) fn with_checkout(
    game: &mut Game,
    slot: usize,
    hook: impl FnOnce(&mut Occupant, &mut Game),
) -> bool {
    let Some(mut occupant) = game.entities.checkout(slot) else {
        return false;
    };
    hook(&mut occupant, game);
    if let Some((occupant, unloading)) = game.entities.checkin(slot, occupant) {
        finalize(game, occupant, unloading);
    }
    true
}

/// Gate shared by the update passes.
fn runs_now(game: &Game, slot: usize, occupant: &Occupant) -> bool {
    occupant.entity.processes_in(game.mode) && !game.entities.destroy_pending(slot, occupant)
}

/// Built-in per-tick state changes that run before `update`.
fn internal_update(occupant: &mut Occupant, game: &mut Game) {
    let Occupant { entity, behavior } = occupant;

    let length = game
        .sprites
        .animation_length(&entity.sprite.id)
        .unwrap_or(0);
    if entity.animation.advance(length) {
        behavior.on_animation_loop(entity, game);
    }
    if !entity.is_live() {
        return;
    }

    entity.prev_position = entity.position;
    if let Some(movement) = entity.movement {
        movement.apply(&mut entity.position);
        if movement.culls()
            && game.point_outside_view(
                entity.position.x,
                entity.position.y,
                movement.view_edge_limit,
            )
        {
            entity.destroy(true);
        }
    }
}

/// Run one logic tick. Returns how many entities ran their main `update`.
pub fn process(game: &mut Game) -> usize {
    if game.in_process {
        error!("Logic tick requested while one is running; ignored");
        return 0;
    }
    game.in_process = true;
    game.static_probes.clear();

    while let Some(occupant) = game.entities.pop_pending() {
        let slot = game.entities.activate(occupant);
        with_checkout(game, slot, |occupant, game| {
            let Occupant { entity, behavior } = occupant;
            behavior.on_init(entity, game);
        });
    }

    game.run_game_update();
    game.run_scene_update();

    game.entities.clear_render_list();
    let slot_count = game.entities.slot_count();
    let mut processed = 0;

    for slot in 0..slot_count {
        with_checkout(game, slot, |occupant, game| {
            if runs_now(game, slot, occupant) {
                let Occupant { entity, behavior } = occupant;
                behavior.early_update(entity, game);
            }
        });
    }

    for slot in 0..slot_count {
        with_checkout(game, slot, |occupant, game| {
            if runs_now(game, slot, occupant) {
                internal_update(occupant, game);
            }
            if runs_now(game, slot, occupant) {
                let Occupant { entity, behavior } = occupant;
                behavior.update(entity, game);
                processed += 1;
            }
        });
    }

    let mut candidates: Vec<EntityId> = Vec::new();
    for slot in 0..slot_count {
        with_checkout(game, slot, |occupant, game| {
            if runs_now(game, slot, occupant) {
                let Occupant { entity, behavior } = occupant;
                behavior.late_update(entity, game);
            }
        });
        // destroyed by its own late update (or earlier): the slot is empty now
        let Some(entity) = game.entities.entity_at(slot) else {
            continue;
        };
        let Some(id) = entity.id().cloned() else {
            continue;
        };
        let depth = entity.depth;
        let renders = entity.renders_in(game.mode);
        let collides = entity.has_active_collider();
        if renders {
            game.entities.push_render(depth, id.clone());
        }
        if collides {
            candidates.push(id);
        }
    }

    if game.entities.empty_slot_count() >= game.config.entity_list_refresh_threshold {
        game.entities.compact();
    }

    for caller in &candidates {
        resolve_collisions(game, caller, &candidates);
    }

    game.in_process = false;

    game.entities.settle();
    if let Some(scene) = game.pending_scene.take() {
        game.start_scene(scene);
    }

    processed
}
