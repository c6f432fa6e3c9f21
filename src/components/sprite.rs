use crate::math::vector::Vector2;

/// How an entity's sprite is drawn by the default draw hook.
///
/// `id` names a sprite registered in the
/// [`SpriteStore`](crate::resources::spritestore::SpriteStore); the empty id
/// draws nothing. A negative scale mirrors the sprite on that axis. `align`
/// is the offset of the sprite's top-left corner from the entity position,
/// scaled with the sprite.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub id: String,
    pub xscale: f32,
    pub yscale: f32,
    pub align: Vector2,
    /// Rotation in degrees.
    pub angle: f32,
    /// Opacity from 0 (transparent) to 1.
    pub alpha: f32,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            id: String::new(),
            xscale: 1.0,
            yscale: 1.0,
            align: Vector2::zero_vec(),
            angle: 0.0,
            alpha: 1.0,
        }
    }
}

impl Sprite {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Centre a `width` × `height` frame on the entity position.
    pub fn centered(mut self, width: f32, height: f32) -> Self {
        self.align = Vector2::new(-width * 0.5, -height * 0.5);
        self
    }

    pub fn flip_h(&mut self) {
        self.xscale = -self.xscale;
    }

    pub fn flip_v(&mut self) {
        self.yscale = -self.yscale;
    }
}
