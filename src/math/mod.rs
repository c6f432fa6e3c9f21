//! Math primitives shared by the engine.
//!
//! - [`geometry`] – containment/overlap tests, angle helpers, interpolation
//! - [`vector`] – the [`Vector2`](vector::Vector2) value type and its axis mask

pub mod geometry;
pub mod vector;
