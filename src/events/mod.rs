//! Transient records produced by the engine and handed to hooks.
//!
//! Submodules overview:
//! - [`collision`] – dynamic collision records and static grid probe results

pub mod collision;
