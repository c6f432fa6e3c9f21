//! Drawing.
//!
//! The engine does not own a graphics backend. Everything visible goes through
//! the [`Renderer`] trait, so a host can plug in a window, a terminal or the
//! [`RecordingRenderer`] used by tests and headless runs.
//!
//! # Order
//!
//! [`render`] walks the render list built by the last logic tick in ascending
//! depth. Within each depth bucket every entity gets `early_draw`, then every
//! entity gets `draw`, then every entity gets `late_draw` (plus its collider
//! outlines when `draw_colliders` is on). Ties keep insertion order, which is
//! slot order.
//!
//! Debug overlays (static grid cells and probes) and the FPS counter are drawn
//! last, on top of everything.

use log::error;

use crate::components::entity::Entity;
use crate::components::sprite::Sprite;
use crate::components::tile::TileRegion;
use crate::events::collision::StaticCollisionData;
use crate::game::Game;
use crate::math::vector::Vector2;
use crate::resources::entitymanager::Occupant;
use crate::resources::spritestore::{SpriteData, SpriteStore};

const GRID_FILL: [u8; 4] = [0xff, 0x00, 0x00, 0xbb];
const GRID_STROKE: [u8; 4] = [0x00, 0xee, 0xff, 0xbb];
const PROBE_STROKE: [u8; 4] = [0xff, 0xff, 0x00, 0xff];
const TEXT_COLOR: [u8; 4] = [0xff, 0xff, 0xff, 0xff];
const FPS_COLOR: [u8; 4] = [0xff, 0xff, 0xff, 0xbb];

/// One sprite blit in screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteCommand {
    pub sprite_id: String,
    /// Wrapped frame index.
    pub frame: u32,
    /// Source rectangle in the sheet.
    pub source_x: u32,
    pub source_y: u32,
    pub source_width: u32,
    pub source_height: u32,
    pub x: f32,
    pub y: f32,
    /// Destination size, already scaled.
    pub width: f32,
    pub height: f32,
    pub flip_x: bool,
    pub flip_y: bool,
    pub angle: f32,
    pub alpha: f32,
}

/// Debug primitives, in screen space.
#[derive(Debug, Clone, PartialEq)]
pub enum DebugShape {
    Rectangle {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<[u8; 4]>,
        stroke: [u8; 4],
    },
    Circle {
        x: f32,
        y: f32,
        radius: f32,
        fill: Option<[u8; 4]>,
        stroke: [u8; 4],
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        stroke: [u8; 4],
    },
}

/// Drawing backend.
pub trait Renderer {
    /// Start a new frame filled with `color` (RGBA).
    fn clear(&mut self, color: [u8; 4]);
    fn draw_sprite(&mut self, data: &SpriteData, command: &SpriteCommand);
    fn draw_shape(&mut self, shape: &DebugShape);
    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: [u8; 4]);
}

/// What a draw hook gets to work with.
pub struct DrawContext<'a> {
    pub renderer: &'a mut dyn Renderer,
    pub sprites: &'a SpriteStore,
    /// Top-left corner of the view in world space.
    pub view: Vector2,
}

impl DrawContext<'_> {
    /// Draw `me`'s sprite at its position with its animation frame.
    pub fn draw_entity(&mut self, me: &Entity) {
        self.draw_sprite(&me.sprite, me.animation.frame, me.position);
    }

    /// Draw any sprite at a world position. An empty sprite id draws nothing;
    /// an unregistered one is reported and skipped.
    pub fn draw_sprite(&mut self, sprite: &Sprite, frame: f32, position: Vector2) {
        if sprite.id.is_empty() {
            return;
        }
        let Some(data) = self.sprites.get(&sprite.id) else {
            error!("Cannot draw unknown sprite '{}'", sprite.id);
            return;
        };
        if let Some(command) = sprite_command(data, sprite, frame, position, self.view) {
            self.renderer.draw_sprite(data, &command);
        }
    }

    /// Draw one region of a tileset at a world position.
    pub fn draw_region(&mut self, sprite_id: &str, region: &TileRegion, position: Vector2) {
        let Some(data) = self.sprites.get(sprite_id) else {
            error!("Cannot draw unknown sprite '{}'", sprite_id);
            return;
        };
        let command = region_command(sprite_id, region, position, self.view);
        self.renderer.draw_sprite(data, &command);
    }
}

/// Wrap an unbounded frame accumulator into `0..length`.
pub fn wrap_frame(frame: f32, length: u32) -> u32 {
    if length == 0 {
        return 0;
    }
    (frame.rem_euclid(length as f32).floor() as u32) % length
}

/// Screen-space blit for `sprite` drawn at world `position`.
///
/// Returns `None` when either scale is zero. The destination corner is
/// floored to whole pixels.
pub fn sprite_command(
    data: &SpriteData,
    sprite: &Sprite,
    frame: f32,
    position: Vector2,
    view: Vector2,
) -> Option<SpriteCommand> {
    if sprite.xscale == 0.0 || sprite.yscale == 0.0 {
        return None;
    }
    let xscale = sprite.xscale.abs();
    let yscale = sprite.yscale.abs();
    let frame = wrap_frame(frame, data.anim_length);
    Some(SpriteCommand {
        sprite_id: sprite.id.clone(),
        frame,
        source_x: frame * data.width,
        source_y: 0,
        source_width: data.width,
        source_height: data.height,
        x: (position.x - view.x + sprite.align.x * xscale).floor(),
        y: (position.y - view.y + sprite.align.y * yscale).floor(),
        width: data.width as f32 * xscale,
        height: data.height as f32 * yscale,
        flip_x: sprite.xscale < 0.0,
        flip_y: sprite.yscale < 0.0,
        angle: sprite.angle,
        alpha: sprite.alpha,
    })
}

/// Screen-space blit of a fixed `region` of a sheet (tiles), with no
/// animation and no scaling.
pub fn region_command(
    sprite_id: &str,
    region: &TileRegion,
    position: Vector2,
    view: Vector2,
) -> SpriteCommand {
    SpriteCommand {
        sprite_id: sprite_id.to_string(),
        frame: 0,
        source_x: region.x,
        source_y: region.y,
        source_width: region.width,
        source_height: region.height,
        x: (position.x - view.x).floor(),
        y: (position.y - view.y).floor(),
        width: region.width as f32,
        height: region.height as f32,
        flip_x: false,
        flip_y: false,
        angle: 0.0,
        alpha: 1.0,
    }
}

/// Draw the current render list. Returns how many entities ran `draw`.
pub fn render(game: &mut Game, renderer: &mut dyn Renderer) -> usize {
    let probes = std::mem::take(&mut game.static_probes);
    let game = &*game;
    let view = game.scene.view_position;

    renderer.clear(game.scene.clear_color);
    let mut ctx = DrawContext {
        renderer,
        sprites: &game.sprites,
        view,
    };

    let mut rendered = 0;
    for ids in game.entities.render_list().values() {
        // entities destroyed since the list was built are skipped
        let bucket: Vec<&Occupant> = ids
            .iter()
            .filter_map(|id| game.entities.occupant(id))
            .collect();
        for occupant in &bucket {
            occupant.behavior.early_draw(&occupant.entity, &mut ctx);
        }
        for occupant in &bucket {
            occupant.behavior.draw(&occupant.entity, &mut ctx);
            rendered += 1;
        }
        for occupant in &bucket {
            occupant.behavior.late_draw(&occupant.entity, &mut ctx);
            if game.config.draw_colliders {
                for collider in occupant.entity.colliders() {
                    collider.draw(&occupant.entity, &mut ctx);
                }
            }
        }
    }

    if game.config.draw_static_colliders {
        draw_static_grid(game, &mut ctx);
        for probe in &probes {
            draw_probe(probe, &mut ctx);
        }
    }

    if game.config.show_fps {
        ctx.renderer
            .draw_text(&game.clock.fps.to_string(), 4.0, 12.0, FPS_COLOR);
    }

    rendered
}

fn draw_static_grid(game: &Game, ctx: &mut DrawContext<'_>) {
    let resolution = game.scene.static_resolution.max(1) as f32;
    for (row, cells) in game.scene.static_grid.rows.iter().enumerate() {
        for (column, &value) in cells.iter().enumerate() {
            if value == 0 {
                continue;
            }
            let x = column as f32 * resolution - ctx.view.x;
            let y = row as f32 * resolution - ctx.view.y;
            ctx.renderer.draw_shape(&DebugShape::Rectangle {
                x,
                y,
                width: resolution,
                height: resolution,
                fill: Some(GRID_FILL),
                stroke: GRID_STROKE,
            });
            ctx.renderer
                .draw_text(&value.to_string(), x + 2.0, y + resolution - 2.0, TEXT_COLOR);
        }
    }
}

fn draw_probe(probe: &StaticCollisionData, ctx: &mut DrawContext<'_>) {
    let start = probe.start - ctx.view;
    let hit = probe.hit - ctx.view;
    if start != hit {
        ctx.renderer.draw_shape(&DebugShape::Line {
            x1: start.x,
            y1: start.y,
            x2: hit.x,
            y2: hit.y,
            stroke: PROBE_STROKE,
        });
    }
    ctx.renderer.draw_shape(&DebugShape::Circle {
        x: hit.x,
        y: hit.y,
        radius: 1.0,
        fill: probe.is_hit().then_some(GRID_FILL),
        stroke: PROBE_STROKE,
    });
}

/// A single recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    Sprite(SpriteCommand),
    Shape(DebugShape),
    Text {
        text: String,
        x: f32,
        y: f32,
        color: [u8; 4],
    },
}

/// Renderer that keeps the calls of the last frame in memory.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    /// Frames started so far.
    pub frames: u64,
    /// Clear color of the current frame.
    pub clear_color: [u8; 4],
    /// Calls issued since the last clear.
    pub calls: Vec<RenderCall>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sprite ids drawn this frame, in call order.
    pub fn sprite_ids(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RenderCall::Sprite(command) => Some(command.sprite_id.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RenderCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn shape_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, RenderCall::Shape(_)))
            .count()
    }
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self, color: [u8; 4]) {
        self.frames += 1;
        self.clear_color = color;
        self.calls.clear();
    }

    fn draw_sprite(&mut self, _data: &SpriteData, command: &SpriteCommand) {
        self.calls.push(RenderCall::Sprite(command.clone()));
    }

    fn draw_shape(&mut self, shape: &DebugShape) {
        self.calls.push(RenderCall::Shape(shape.clone()));
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: [u8; 4]) {
        self.calls.push(RenderCall::Text {
            text: text.to_string(),
            x,
            y,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::behavior::{Behavior, Inert};
    use crate::components::collider::Collider;
    use crate::resources::gameconfig::GameConfig;
    use crate::resources::scene::{Scene, StaticGrid};

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn sheet() -> SpriteData {
        SpriteData::new(16, 8, 4)
    }

    fn game_with_sprites() -> Game {
        let mut game = Game::new("render", GameConfig::new());
        game.start_scene(Scene::new("stage"));
        game.sprites.insert("a", sheet());
        game.sprites.insert("b", sheet());
        game.sprites.insert("c", sheet());
        game
    }

    // ===== SPRITE COMMANDS =====

    #[test]
    fn test_wrap_frame() {
        assert_eq!(wrap_frame(0.0, 4), 0);
        assert_eq!(wrap_frame(5.7, 4), 1);
        assert_eq!(wrap_frame(-1.0, 4), 3);
        assert_eq!(wrap_frame(-0.5, 4), 3);
        assert_eq!(wrap_frame(12.0, 0), 0);
    }

    #[test]
    fn test_sprite_command_places_frame_in_view() {
        let sprite = Sprite::new("a").centered(16.0, 8.0);
        let command = sprite_command(
            &sheet(),
            &sprite,
            2.5,
            Vector2::new(100.5, 50.0),
            Vector2::new(20.0, 10.0),
        )
        .unwrap();
        assert_eq!(command.frame, 2);
        assert_eq!(command.source_x, 32);
        assert!(approx_eq(command.x, 72.0));
        assert!(approx_eq(command.y, 36.0));
        assert!(approx_eq(command.width, 16.0));
        assert!(!command.flip_x);
    }

    #[test]
    fn test_sprite_command_mirrors_and_scales() {
        let mut sprite = Sprite::new("a");
        sprite.xscale = -2.0;
        sprite.yscale = 0.5;
        let command =
            sprite_command(&sheet(), &sprite, 0.0, Vector2::zero_vec(), Vector2::zero_vec())
                .unwrap();
        assert!(command.flip_x);
        assert!(!command.flip_y);
        assert!(approx_eq(command.width, 32.0));
        assert!(approx_eq(command.height, 4.0));

        sprite.yscale = 0.0;
        assert!(
            sprite_command(&sheet(), &sprite, 0.0, Vector2::zero_vec(), Vector2::zero_vec())
                .is_none()
        );
    }

    #[test]
    fn test_region_command_cuts_tileset() {
        let region = TileRegion::new(32, 16, 16, 16);
        let command = region_command(
            "tiles",
            &region,
            Vector2::new(40.0, 8.5),
            Vector2::new(8.0, 0.0),
        );
        assert_eq!((command.source_x, command.source_y), (32, 16));
        assert!(approx_eq(command.x, 32.0));
        assert!(approx_eq(command.y, 8.0));
        assert!(approx_eq(command.width, 16.0));
    }

    // ===== RENDER PASS =====

    #[test]
    fn test_render_orders_by_depth_then_slot() {
        let mut game = game_with_sprites();
        game.spawn(Entity::new(0.0, 0.0).with_sprite("b").with_depth(5), Inert);
        game.spawn(Entity::new(0.0, 0.0).with_sprite("c").with_depth(-3), Inert);
        game.spawn(Entity::new(0.0, 0.0).with_sprite("a").with_depth(5), Inert);

        let mut renderer = RecordingRenderer::new();
        let outcome = game.force_frame(Some(&mut renderer));
        assert_eq!(outcome.rendered, Some(3));
        // queued entities activate most recent first, so "a" gets slot 0
        assert_eq!(renderer.sprite_ids(), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_render_skips_hidden_and_unknown_sprites() {
        let mut game = game_with_sprites();
        let mut hidden = Entity::new(0.0, 0.0).with_sprite("a");
        hidden.visible = false;
        game.spawn(hidden, Inert);
        game.spawn(Entity::new(0.0, 0.0).with_sprite("missing"), Inert);

        let mut renderer = RecordingRenderer::new();
        let outcome = game.force_frame(Some(&mut renderer));
        assert_eq!(outcome.rendered, Some(1));
        assert!(renderer.sprite_ids().is_empty());
    }

    struct Layered;

    impl Behavior for Layered {
        fn early_draw(&self, _me: &Entity, ctx: &mut DrawContext<'_>) {
            ctx.renderer.draw_text("early", 0.0, 0.0, TEXT_COLOR);
        }

        fn draw(&self, _me: &Entity, ctx: &mut DrawContext<'_>) {
            ctx.renderer.draw_text("draw", 0.0, 0.0, TEXT_COLOR);
        }

        fn late_draw(&self, _me: &Entity, ctx: &mut DrawContext<'_>) {
            ctx.renderer.draw_text("late", 0.0, 0.0, TEXT_COLOR);
        }
    }

    #[test]
    fn test_draw_phases_run_per_bucket() {
        let mut game = game_with_sprites();
        game.spawn(Entity::new(0.0, 0.0), Layered);
        game.spawn(Entity::new(0.0, 0.0), Layered);

        let mut renderer = RecordingRenderer::new();
        game.force_frame(Some(&mut renderer));
        assert_eq!(
            renderer.texts(),
            vec!["early", "early", "draw", "draw", "late", "late"]
        );
    }

    #[test]
    fn test_debug_overlays() {
        let mut config = GameConfig::new();
        config.show_fps = true;
        config.draw_colliders = true;
        config.draw_static_colliders = true;
        let mut game = Game::new("debug", config);
        game.start_scene(
            Scene::new("grid")
                .with_grid(StaticGrid::new(vec![vec![0, 2]]))
                .with_clear_color([1, 2, 3, 255]),
        );
        game.spawn(
            Entity::new(0.0, 0.0).with_collider(Collider::circle("c", 0.0, 0.0, 4.0)),
            Inert,
        );
        game.static_collision(20.0, 4.0);

        let mut renderer = RecordingRenderer::new();
        game.force_frame(Some(&mut renderer));
        assert_eq!(renderer.clear_color, [1, 2, 3, 255]);
        // collider outline, grid cell, probe dot
        assert_eq!(renderer.shape_count(), 3);
        assert!(renderer.texts().contains(&"2"));
        // forced frames do not count towards the FPS window
        assert_eq!(renderer.texts().last(), Some(&"0"));
    }
}
