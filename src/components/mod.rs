//! Entity data and hooks.
//!
//! The entity record and the optional pieces of state it is composed from.
//!
//! Submodules overview:
//! - [`animation`] – frame accumulator and loop detection
//! - [`behavior`] – per-entity hook trait
//! - [`collider`] – point, rectangle, circle and raycast colliders
//! - [`entity`] – the entity record and its unique id
//! - [`movement`] – automatic per-tick movement with off-screen culling
//! - [`sprite`] – sprite render state for the default draw hook
//! - [`tile`] – entities drawing a fixed tileset region

pub mod animation;
pub mod behavior;
pub mod collider;
pub mod entity;
pub mod movement;
pub mod sprite;
pub mod tile;
