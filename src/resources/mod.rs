//! Long-lived state owned by the [`Game`](crate::game::Game).
//!
//! Each submodule documents the semantics and intended usage of its
//! resource(s).
//!
//! Overview
//! - `entitymanager` – slot table, creation queue, id index and render list
//! - `frameclock` – fixed-rate timing and the rolling FPS window
//! - `gameconfig` – INI-backed engine configuration
//! - `gamestate` – game mode bitmask and run state
//! - `input` – held/pressed/released keyboard state
//! - `scene` – static collision grid, view offset and scene hooks
//! - `spritestore` – sprite metadata registry and loaders
pub mod entitymanager;
pub mod frameclock;
pub mod gameconfig;
pub mod gamestate;
pub mod input;
pub mod scene;
pub mod spritestore;
