//! enjin: a small real-time 2D engine core.
//!
//! The crate provides a fixed-rate frame scheduler, an entity lifecycle with
//! slot reuse and stable string ids, per-entity hooks, dynamic and static
//! collision detection, scene transitions and a depth-sorted render pass. It
//! owns no window, image decoder or input device: those plug in through the
//! [`host::Host`], [`systems::render::Renderer`] and
//! [`resources::spritestore::SpriteLoader`] traits.
//!
//! # Project Structure
//!
//! - [`components`] – entity record, colliders, sprites, animation, behaviors
//! - [`events`] – collision records
//! - [`game`] – the game context and scene transitions
//! - [`host`] – frame source and input feed
//! - [`math`] – vector type and geometry helpers
//! - [`resources`] – entity table, clock, config, input, scene, sprite store
//! - [`systems`] – tick, collision, destroy, render and loading passes

pub mod components;
pub mod events;
pub mod game;
pub mod host;
pub mod math;
pub mod resources;
pub mod systems;
