//! Entity destruction.
//!
//! - [`destroy`] removes one entity by id. The slot and the id are released
//!   first, then the entity's `on_destroy` hook runs, exactly once.
//! - [`destroy_all`] removes every entity except persistent ones (or all of
//!   them when forced) and renumbers the survivors from slot 0.
//!
//! A destroy aimed at an entity whose own hook is running is applied when the
//! hook returns. A mass destroy requested during a logic tick takes its
//! victims out at once, so no later pass of the tick sees them; only the
//! renumbering of the survivors waits for the end of the tick.

use log::debug;

use crate::components::entity::EntityId;
use crate::game::Game;
use crate::resources::entitymanager::{Occupant, Removal};

/// Destroy the entity named by `id`.
///
/// Returns false for an unknown or already destroyed id.
pub fn destroy(game: &mut Game, id: &EntityId, unloading: bool) -> bool {
    match game.entities.remove(id, unloading) {
        Removal::Removed(occupant, unloading) => {
            finalize(game, occupant, unloading);
            true
        }
        Removal::Deferred => true,
        Removal::NotFound => false,
    }
}

/// Run the `on_destroy` hook of an occupant that already left the table.
pub(crate) fn finalize(game: &mut Game, mut occupant: Box<Occupant>, unloading: bool) {
    let Occupant { entity, behavior } = &mut *occupant;
    debug!(
        "Destroyed entity '{}' {}",
        entity.name,
        entity.id().map(EntityId::as_str).unwrap_or("?")
    );
    behavior.on_destroy(entity, game, unloading);
}

/// Destroy every non-persistent entity, or every entity when `forced`.
///
/// A forced call also drops entities still waiting in the creation queue.
pub fn destroy_all(game: &mut Game, unloading: bool, forced: bool) {
    let removed = game.entities.remove_all(forced, unloading);
    if forced {
        let dropped = game.entities.clear_pending();
        if dropped > 0 {
            debug!("Dropped {} queued entities", dropped);
        }
    }
    debug!(
        "Mass destroy removed {} entities, {} survive",
        removed.len(),
        game.entities.active_count()
    );
    for occupant in removed {
        finalize(game, occupant, unloading);
    }
}
