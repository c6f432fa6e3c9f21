//! Per-entity hooks.
//!
//! Every spawned entity pairs its [`Entity`] record with a boxed [`Behavior`].
//! All hooks have defaults, so a type only implements what it reacts to.
//!
//! # Contract
//!
//! - Update hooks receive the entity record and the whole [`Game`]. While a
//!   hook runs the entity is checked out of its slot: it is not returned by id
//!   lookups, but it can still be destroyed through
//!   [`Game::destroy`](crate::game::Game::destroy) or [`Entity::destroy`]; the
//!   destruction is applied when the hook returns.
//! - Draw hooks only get read access to the entity and a [`DrawContext`].
//! - [`Behavior::on_destroy`] runs exactly once, after the entity has already
//!   left the slot table and the id table.

use crate::components::entity::Entity;
use crate::events::collision::CollisionData;
use crate::game::Game;
use crate::systems::render::DrawContext;

pub trait Behavior {
    /// The entity was just slotted and indexed.
    fn on_init(&mut self, _me: &mut Entity, _game: &mut Game) {}

    fn early_update(&mut self, _me: &mut Entity, _game: &mut Game) {}

    /// Runs after the animation step and automatic movement.
    fn update(&mut self, _me: &mut Entity, _game: &mut Game) {}

    fn late_update(&mut self, _me: &mut Entity, _game: &mut Game) {}

    /// One call per overlapping collider pair found by this entity's colliders.
    fn on_collision(&mut self, _me: &mut Entity, _game: &mut Game, _data: &CollisionData) {}

    /// The built-in animation wrapped around its frame count.
    fn on_animation_loop(&mut self, _me: &mut Entity, _game: &mut Game) {}

    /// `unloading` is set by mass destroys and view culling, so effects meant
    /// for gameplay deaths can be skipped.
    fn on_destroy(&mut self, _me: &mut Entity, _game: &mut Game, _unloading: bool) {}

    fn early_draw(&self, _me: &Entity, _ctx: &mut DrawContext<'_>) {}

    /// Defaults to drawing the entity's sprite at its position.
    fn draw(&self, me: &Entity, ctx: &mut DrawContext<'_>) {
        ctx.draw_entity(me);
    }

    fn late_draw(&self, _me: &Entity, _ctx: &mut DrawContext<'_>) {}
}

/// Behaviour for entities that only need the defaults (backgrounds, tiles).
#[derive(Debug, Default, Clone, Copy)]
pub struct Inert;

impl Behavior for Inert {}
