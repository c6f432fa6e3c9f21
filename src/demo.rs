//! Headless demo game.
//!
//! A ship at the bottom of a walled arena shoots rocks that drift down from
//! the top. Clearing every rock starts the next level through a scene
//! transition that carries the level number and the score.

use log::{debug, info};
use serde_json::json;

use enjin::components::behavior::Behavior;
use enjin::components::collider::Collider;
use enjin::components::entity::{DEPTH_BACKGROUND, Entity};
use enjin::components::movement::Movement;
use enjin::components::sprite::Sprite;
use enjin::components::tile::{Tile, TileRegion};
use enjin::events::collision::CollisionData;
use enjin::game::{Game, GameBehavior};
use enjin::math::geometry::{prob, rand_range};
use enjin::math::vector::Vector2;
use enjin::resources::scene::{Scene, SceneBehavior, StaticGrid};
use enjin::resources::spritestore::{SpriteData, SpriteStore};

pub const SHIP: &str = "ship";
pub const ROCK: &str = "rock";
pub const SHOT: &str = "shot";
pub const TILES: &str = "tiles";
pub const SKY: &str = "sky";

const SHIP_SPEED: f32 = 2.0;
const SHOT_SPEED: f32 = 5.0;
const SHOT_COOLDOWN: u32 = 8;
const ROCKS_PER_LEVEL: usize = 6;

/// Sprites used when no manifest is given.
pub fn register_sprites(store: &mut SpriteStore) {
    store.insert(SHIP, SpriteData::new(16, 16, 2));
    store.insert(ROCK, SpriteData::new(16, 16, 4));
    store.insert(SHOT, SpriteData::new(4, 8, 1));
    store.insert(TILES, SpriteData::new(64, 64, 1));
    store.insert(SKY, SpriteData::new(256, 240, 1));
}

/// Arena walls: a border of solid cells, 16 x 15 cells of 16 pixels.
pub fn default_grid() -> StaticGrid {
    let (columns, rows) = (16, 15);
    let mut cells = vec![vec![0; columns]; rows];
    for (r, row) in cells.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            if r == 0 || r == rows - 1 || c == 0 || c == columns - 1 {
                *cell = 1;
            }
        }
    }
    StaticGrid::new(cells)
}

// ===== GAME =====

#[derive(Debug)]
pub struct Demo {
    grid: Option<StaticGrid>,
    ticks: u64,
}

impl Demo {
    pub fn new(grid: StaticGrid) -> Self {
        Self {
            grid: Some(grid),
            ticks: 0,
        }
    }
}

impl GameBehavior for Demo {
    fn init(&mut self, game: &mut Game) {
        info!(
            "Demo started with a {}x{} view",
            game.config.view_width, game.config.view_height
        );
        let grid = self.grid.take().unwrap_or_else(default_grid);
        game.start_scene(Arena::scene(grid));
    }

    fn update(&mut self, game: &mut Game) {
        self.ticks += 1;
        if self.ticks % 60 == 0 {
            debug!(
                "Tick {}: {} entities, {} fps",
                self.ticks,
                game.entities.active_count(),
                game.clock.fps
            );
        }
    }
}

// ===== SCENE =====

pub struct Arena {
    pub level: u32,
    pub score: u32,
}

impl Arena {
    pub fn scene(grid: StaticGrid) -> Scene {
        Scene::new("arena")
            .with_grid(grid)
            .with_clear_color([0x10, 0x10, 0x20, 0xff])
            .with_behavior(Arena { level: 1, score: 0 })
    }

    fn spawn_rocks(&self, game: &mut Game) {
        let (width, _) = game.view_size();
        for _ in 0..ROCKS_PER_LEVEL {
            let x = rand_range(&mut game.rng, 24.0, width as f32 - 24.0);
            let y = rand_range(&mut game.rng, 20.0, 60.0);
            let drift = 0.1 + self.level as f32 * 0.05;
            let mut rock = Entity::new(x, y)
                .named(ROCK)
                .with_sprite(ROCK)
                .with_collider(Collider::circle("body", 0.0, 0.0, 7.0))
                .with_movement(Movement::new(Vector2::new(0.0, drift)).culled_outside_view(16.0));
            rock.sprite = Sprite::new(ROCK).centered(16.0, 16.0);
            rock.animation.speed = 0.2;
            game.spawn(rock, Rock);
        }
    }
}

impl SceneBehavior for Arena {
    fn on_init(&mut self, game: &mut Game) {
        info!("Level {} begins, score {}", self.level, self.score);
        game.spawn_inert(Entity::background(0.0, 0.0, SKY, DEPTH_BACKGROUND));
        game.spawn(
            Entity::new(0.0, 0.0).with_sprite(TILES).with_depth(DEPTH_BACKGROUND + 1),
            Tile::new(TileRegion::new(0, 0, 16, 16)),
        );
        if game.entities.find_by_name(SHIP).is_none() {
            let (width, height) = game.view_size();
            let mut ship = Entity::new(width as f32 * 0.5, height as f32 - 32.0)
                .named(SHIP)
                .with_persistence(true)
                .with_depth(10)
                .with_collider(Collider::circle("hull", 0.0, 0.0, 6.0));
            ship.sprite = Sprite::new(SHIP).centered(16.0, 16.0);
            game.spawn(ship, Ship::default());
        }
        self.spawn_rocks(game);
    }

    fn update(&mut self, game: &mut Game) {
        let rocks = game
            .entities
            .iter()
            .filter(|entity| entity.name == ROCK)
            .count();
        if rocks == 0 && game.entities.pending_count() == 0 {
            let grid = game.scene.static_grid.clone();
            game.start_scene(Scene::new("arena").with_grid(grid).with_behavior(Arena {
                level: self.level + 1,
                score: self.score,
            }));
        }
    }

    fn on_destroy(&mut self, game: &mut Game) -> Option<serde_json::Value> {
        let destroyed = game.entities.destroyed;
        Some(json!({ "level": self.level, "destroyed": destroyed }))
    }

    fn on_transfer(&mut self, _game: &mut Game, old_scene: &Scene, payload: Option<serde_json::Value>) {
        let cleared = payload
            .as_ref()
            .and_then(|p| p.get("level"))
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(0);
        self.score += cleared as u32 * 100;
        info!(
            "Arena '{}' cleared level {}, moving on",
            old_scene.name, cleared
        );
    }
}

// ===== ENTITIES =====

#[derive(Debug, Default)]
pub struct Ship {
    cooldown: u32,
}

impl Behavior for Ship {
    fn update(&mut self, me: &mut Entity, game: &mut Game) {
        let direction = game.input.arrow_vector();
        if direction.x != 0.0 || direction.y != 0.0 {
            let angle = direction.heading();
            let probe = game.ray_cast_static(me.position.x, me.position.y, angle, 8.0 + SHIP_SPEED);
            if !probe.is_hit() {
                me.position += direction.normalized() * SHIP_SPEED;
            }
        }
        me.animation.frame = if direction.x < 0.0 { 1.0 } else { 0.0 };

        self.cooldown = self.cooldown.saturating_sub(1);
        if game.input.is_key_held("space") && self.cooldown == 0 {
            self.cooldown = SHOT_COOLDOWN;
            let shot = Entity::new(me.position.x - 2.0, me.position.y - 12.0)
                .named(SHOT)
                .with_sprite(SHOT)
                .with_collider(Collider::raycast("tip", 2.0, 0.0, 270.0, 8.0))
                .with_movement(Movement::new(Vector2::new(0.0, -SHOT_SPEED)).culled_outside_view(8.0));
            game.spawn(shot, Shot);
        }
    }

    fn on_collision(&mut self, me: &mut Entity, _game: &mut Game, data: &CollisionData) {
        info!("Ship hit by {} at {}", data.other_entity, data.hit);
        me.position = me.start_position();
    }
}

pub struct Shot;

impl Behavior for Shot {
    fn update(&mut self, me: &mut Entity, game: &mut Game) {
        if game.static_collision(me.position.x, me.position.y).is_hit() {
            me.destroy(false);
        }
    }

    fn on_collision(&mut self, me: &mut Entity, game: &mut Game, data: &CollisionData) {
        if game.get(&data.other_entity).is_some_and(|other| other.name == ROCK) {
            game.destroy(&data.other_entity, false);
            me.destroy(false);
        }
    }
}

pub struct Rock;

impl Behavior for Rock {
    fn on_animation_loop(&mut self, _me: &mut Entity, game: &mut Game) {
        if prob(&mut game.rng, 1.0) {
            debug!("A rock rumbles");
        }
    }

    fn on_destroy(&mut self, me: &mut Entity, _game: &mut Game, unloading: bool) {
        if !unloading {
            info!("Rock shattered at {}", me.position);
        }
    }
}
