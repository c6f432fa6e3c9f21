//! The entity record.
//!
//! An [`Entity`] carries the state every game object shares: position, render
//! and animation state, colliders, mode flags and lifecycle flags. Behaviour
//! lives next to it in a [`Behavior`](crate::components::behavior::Behavior)
//! trait object; optional capabilities (like [`Movement`]) are plain fields.
//!
//! # Lifecycle
//!
//! `Pending` (spawned, queued) → `Active` (slotted, receives updates) →
//! `Destroyed` (terminal). While pending or destroyed [`Entity::slot`] is
//! `None`. The destroyed flag is monotonic.
//!
//! Related:
//! - [`crate::resources::entitymanager`] owns slots and the id table.
//! - [`crate::systems::process`] runs the update passes.

use std::fmt;
use std::sync::Arc;

use log::warn;
use smallvec::SmallVec;

use crate::components::animation::Animation;
use crate::components::collider::Collider;
use crate::components::movement::Movement;
use crate::components::sprite::Sprite;
use crate::math::vector::Vector2;
use crate::resources::gamestate::GameMode;

/// Depth for backdrops that should draw under everything.
pub const DEPTH_BACKGROUND: i32 = -100_000;
pub const DEPTH_DEFAULT: i32 = 0;

/// Unique string identifier of an entity.
///
/// Survives slot reuse: a destroyed entity's id is never handed to another
/// entity, so holding an id is the safe way to refer to an entity across
/// frames.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(Arc<str>);

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        EntityId(Arc::from(value))
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        EntityId(Arc::from(value))
    }
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub name: String,
    id: Option<EntityId>,
    slot: Option<usize>,
    destroyed: bool,
    destroy_request: Option<bool>,
    /// Survives a non-forced mass destroy (scene changes).
    pub persistent: bool,
    /// Modes in which the update hooks run.
    pub process_flags: GameMode,
    /// Modes in which the entity is drawn.
    pub render_flags: GameMode,

    pub position: Vector2,
    start_position: Vector2,
    /// Position at the start of the last internal update.
    pub prev_position: Vector2,

    /// Draw order; larger values draw later (closer to the viewer).
    pub depth: i32,
    pub visible: bool,
    pub sprite: Sprite,
    pub animation: Animation,
    colliders: SmallVec<[Collider; 2]>,
    pub movement: Option<Movement>,
}

impl Entity {
    pub fn new(x: f32, y: f32) -> Self {
        let start = Vector2::new(x, y);
        Self {
            name: String::new(),
            id: None,
            slot: None,
            destroyed: false,
            destroy_request: None,
            persistent: false,
            process_flags: GameMode::BASIC,
            render_flags: GameMode::ALL,
            position: start,
            start_position: start,
            prev_position: start,
            depth: DEPTH_DEFAULT,
            visible: true,
            sprite: Sprite::default(),
            animation: Animation::default(),
            colliders: SmallVec::new(),
            movement: None,
        }
    }

    /// Static backdrop drawn at `depth`, usually [`DEPTH_BACKGROUND`].
    pub fn background(x: f32, y: f32, sprite_id: impl Into<String>, depth: i32) -> Self {
        Self::new(x, y).with_sprite(sprite_id).with_depth(depth)
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_sprite(mut self, sprite_id: impl Into<String>) -> Self {
        self.sprite.id = sprite_id.into();
        self
    }

    pub fn with_depth(mut self, depth: i32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.add_collider(collider);
        self
    }

    pub fn with_movement(mut self, movement: Movement) -> Self {
        self.movement = Some(movement);
        self
    }

    pub fn with_persistence(mut self, persistent: bool) -> Self {
        self.persistent = persistent;
        self
    }

    /// Unique id, assigned when the entity is spawned.
    pub fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }

    /// Process slot while active; `None` while pending or once destroyed.
    pub fn slot(&self) -> Option<usize> {
        if self.destroyed { None } else { self.slot }
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn start_position(&self) -> Vector2 {
        self.start_position
    }

    /// Ask for this entity to be destroyed when its running hook returns.
    ///
    /// Meant for use from inside the entity's own hooks, where it cannot be
    /// looked up through the game. The first request wins.
    pub fn destroy(&mut self, unloading: bool) {
        if self.destroy_request.is_none() && !self.destroyed {
            self.destroy_request = Some(unloading);
        }
    }

    /// Pending self-destroy request and its `unloading` flag.
    pub fn destroy_requested(&self) -> Option<bool> {
        self.destroy_request
    }

    /// Still alive from its own point of view.
    pub fn is_live(&self) -> bool {
        !self.destroyed && self.destroy_request.is_none()
    }

    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    pub fn colliders_mut(&mut self) -> &mut [Collider] {
        &mut self.colliders
    }

    pub fn has_active_collider(&self) -> bool {
        self.colliders.iter().any(|c| c.active)
    }

    /// Append a collider. A collider with the same id is replaced in place.
    pub fn add_collider(&mut self, collider: Collider) {
        if let Some(existing) = self.colliders.iter_mut().find(|c| c.id == collider.id) {
            warn!(
                "Entity '{}' already has collider '{}', replacing it",
                self.name, collider.id
            );
            *existing = collider;
        } else {
            self.colliders.push(collider);
        }
    }

    pub fn remove_collider(&mut self, id: &str) -> Option<Collider> {
        let index = self.colliders.iter().position(|c| &*c.id == id)?;
        Some(self.colliders.remove(index))
    }

    pub fn collider(&self, id: &str) -> Option<&Collider> {
        self.colliders.iter().find(|c| &*c.id == id)
    }

    pub fn collider_mut(&mut self, id: &str) -> Option<&mut Collider> {
        self.colliders.iter_mut().find(|c| &*c.id == id)
    }

    /// Whether the entity takes part in a tick run under `mode`.
    pub fn processes_in(&self, mode: GameMode) -> bool {
        self.process_flags.intersects(mode)
    }

    /// Whether the entity is drawn under `mode`.
    pub fn renders_in(&self, mode: GameMode) -> bool {
        self.visible && self.render_flags.intersects(mode)
    }

    pub(crate) fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    pub(crate) fn assign_slot(&mut self, slot: usize) {
        self.slot = Some(slot);
    }

    pub(crate) fn mark_destroyed(&mut self) {
        self.destroyed = true;
        self.slot = None;
    }
}
