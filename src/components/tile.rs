//! Tileset pieces.
//!
//! A tile is an entity that draws one fixed rectangle cut out of a tileset
//! sprite instead of an animation frame. Spawn the entity with the tileset as
//! its sprite id and a [`Tile`] as its behavior:
//!
//! ```ignore
//! game.spawn(
//!     Entity::new(32.0, 48.0).with_sprite("tiles").with_depth(DEPTH_BACKGROUND),
//!     Tile::new(TileRegion::new(16, 0, 16, 16)),
//! );
//! ```

use crate::components::behavior::Behavior;
use crate::components::entity::Entity;
use crate::systems::render::DrawContext;

/// Source rectangle inside a tileset, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl TileRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub region: TileRegion,
}

impl Tile {
    pub fn new(region: TileRegion) -> Self {
        Self { region }
    }
}

impl Behavior for Tile {
    fn draw(&self, me: &Entity, ctx: &mut DrawContext<'_>) {
        if !me.sprite.id.is_empty() {
            ctx.draw_region(&me.sprite.id, &self.region, me.position);
        }
    }
}
