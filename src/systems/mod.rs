//! Engine systems.
//!
//! Free functions that operate on the whole [`Game`](crate::game::Game). They
//! run in this order every host frame:
//!
//! - [`frame`] – decides whether a logic tick is due, then renders
//! - [`process`] – one logic tick: queue drain, update passes, collisions
//! - [`collision`] – dynamic collision resolution and static grid probes
//! - [`destroy`] – single and mass entity destruction
//! - [`render`] – render list traversal and the [`Renderer`](render::Renderer) boundary
//!
//! [`loading`] runs before the first frame and polls the sprite loader.
pub mod collision;
pub mod destroy;
pub mod frame;
pub mod loading;
pub mod process;
pub mod render;
