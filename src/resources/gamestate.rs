//! High-level game state.
//!
//! Two separate notions live here:
//!
//! - [`GameMode`]: the bitmask compared against each entity's
//!   `process_flags`/`render_flags` to decide who updates and who draws this
//!   tick (pause screens, title screens, transitions...).
//! - [`RunState`]: where the [`Game`](crate::game::Game) is in its
//!   `new → start → run → shutdown` lifecycle.

use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

/// Bitmask of game modes.
///
/// An entity runs its update hooks when `entity.process_flags & mode` is
/// non-empty and draws when `entity.render_flags & mode` is non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameMode(pub u32);

impl GameMode {
    pub const NONE: GameMode = GameMode(0);
    pub const BASIC: GameMode = GameMode(1 << 0);
    pub const PAUSE: GameMode = GameMode(1 << 1);
    pub const TITLE: GameMode = GameMode(1 << 2);
    pub const TRANSITION: GameMode = GameMode(1 << 3);
    pub const GAMEOVER: GameMode = GameMode(1 << 4);
    pub const ALL: GameMode = GameMode(!0);

    /// True when the two masks share at least one bit.
    pub fn intersects(self, other: GameMode) -> bool {
        self.0 & other.0 != 0
    }

    pub fn contains(self, other: GameMode) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for GameMode {
    fn default() -> Self {
        GameMode::BASIC
    }
}

impl BitOr for GameMode {
    type Output = GameMode;

    fn bitor(self, rhs: GameMode) -> GameMode {
        GameMode(self.0 | rhs.0)
    }
}

impl BitOrAssign for GameMode {
    fn bitor_assign(&mut self, rhs: GameMode) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for GameMode {
    type Output = GameMode;

    fn bitand(self, rhs: GameMode) -> GameMode {
        GameMode(self.0 & rhs.0)
    }
}

impl Not for GameMode {
    type Output = GameMode;

    fn not(self) -> GameMode {
        GameMode(!self.0)
    }
}

/// Lifecycle of a [`Game`](crate::game::Game).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunState {
    /// Constructed, waiting for assets or for `start`.
    #[default]
    Created,
    /// `start` ran; frames are processed.
    Running,
    /// `shutdown` ran; every entity has been destroyed.
    Stopped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode_is_basic() {
        assert_eq!(GameMode::default(), GameMode::BASIC);
    }

    #[test]
    fn test_intersects() {
        let flags = GameMode::BASIC | GameMode::PAUSE;
        assert!(flags.intersects(GameMode::PAUSE));
        assert!(!flags.intersects(GameMode::TITLE));
        assert!(GameMode::ALL.intersects(GameMode::GAMEOVER));
        assert!(!GameMode::NONE.intersects(GameMode::ALL));
    }

    #[test]
    fn test_contains_and_not() {
        let flags = GameMode::ALL & !GameMode::PAUSE;
        assert!(flags.contains(GameMode::BASIC));
        assert!(!flags.intersects(GameMode::PAUSE));
    }
}
