//! Scene resource.
//!
//! A [`Scene`] owns what belongs to one level rather than to the whole game:
//! the static collision grid, the view (scroll) offset and the clear colour.
//! Scene-specific logic plugs in through [`SceneBehavior`]; the transition
//! itself lives in [`Game::start_scene`](crate::game::Game::start_scene).
//!
//! # Static grid
//!
//! [`StaticGrid`] is a list of rows, each a list of `i32` cells. `0` is
//! passable, any other value is a tile payload returned by the static probes in
//! [`crate::systems::collision`]. Rows may have different lengths. A grid
//! deserializes from plain JSON (`[[0,0,1],[0,1,1]]`).

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::game::Game;
use crate::math::geometry::point_inside_rectangle;
use crate::math::vector::Vector2;

/// Pixels per static grid cell unless a scene says otherwise.
pub const DEFAULT_STATIC_RESOLUTION: u32 = 16;

/// Fully transparent black.
pub const CLEAR_TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticGrid {
    pub rows: Vec<Vec<i32>>,
}

impl StaticGrid {
    pub fn new(rows: Vec<Vec<i32>>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at `(column, row)`, or `None` outside the grid.
    pub fn cell(&self, column: usize, row: usize) -> Option<i32> {
        self.rows.get(row).and_then(|r| r.get(column)).copied()
    }

    pub fn from_json(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map_err(|e| format!("Failed to parse static grid: {}", e))
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read static grid {:?}: {}", path, e))?;
        let grid = Self::from_json(&text)?;
        info!("Loaded static grid {:?} with {} rows", path, grid.rows.len());
        Ok(grid)
    }
}

/// Scene hooks. Every method has an empty default.
///
/// The behavior is taken out of the scene while one of its hooks runs, so a
/// hook may freely use the whole [`Game`].
pub trait SceneBehavior {
    /// The scene just became active.
    fn on_init(&mut self, _game: &mut Game) {}

    /// Once per logic tick, after the game's own update and before entities.
    fn update(&mut self, _game: &mut Game) {}

    /// The scene is being replaced. Runs before its entities are destroyed;
    /// the returned payload is handed to the next scene's
    /// [`on_transfer`](SceneBehavior::on_transfer).
    fn on_destroy(&mut self, _game: &mut Game) -> Option<serde_json::Value> {
        None
    }

    /// This scene replaces `old_scene`. The old scene's non-persistent
    /// entities are already gone.
    fn on_transfer(
        &mut self,
        _game: &mut Game,
        _old_scene: &Scene,
        _payload: Option<serde_json::Value>,
    ) {
    }
}

/// One level's static data and view state.
pub struct Scene {
    pub name: String,
    /// Top-left corner of the view in world coordinates.
    pub view_position: Vector2,
    /// Added to `view_position` every logic tick.
    pub scroll_speed: Vector2,
    pub static_grid: StaticGrid,
    /// Pixels per static grid cell.
    pub static_resolution: u32,
    /// RGBA colour the renderer clears to every frame.
    pub clear_color: [u8; 4],
    pub(crate) behavior: Option<Box<dyn SceneBehavior>>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("")
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("view_position", &self.view_position)
            .field("scroll_speed", &self.scroll_speed)
            .field("static_resolution", &self.static_resolution)
            .field("grid_rows", &self.static_grid.rows.len())
            .field("has_behavior", &self.behavior.is_some())
            .finish()
    }
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            view_position: Vector2::zero_vec(),
            scroll_speed: Vector2::zero_vec(),
            static_grid: StaticGrid::default(),
            static_resolution: DEFAULT_STATIC_RESOLUTION,
            clear_color: CLEAR_TRANSPARENT,
            behavior: None,
        }
    }

    pub fn with_behavior(mut self, behavior: impl SceneBehavior + 'static) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    pub fn with_grid(mut self, grid: StaticGrid) -> Self {
        self.static_grid = grid;
        self
    }

    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.static_resolution = resolution.max(1);
        self
    }

    pub fn with_clear_color(mut self, color: [u8; 4]) -> Self {
        self.clear_color = color;
        self
    }

    /// Whether `(x, y)` lies inside the view grown by `pad` on every side.
    /// The view edge itself counts as outside.
    pub fn point_inside_view(&self, x: f32, y: f32, pad: f32, view_size: (u32, u32)) -> bool {
        let (width, height) = view_size;
        point_inside_rectangle(
            x,
            y,
            self.view_position.x - pad,
            self.view_position.y - pad,
            self.view_position.x + width as f32 + pad,
            self.view_position.y + height as f32 + pad,
        )
    }

    pub fn point_outside_view(&self, x: f32, y: f32, pad: f32, view_size: (u32, u32)) -> bool {
        !self.point_inside_view(x, y, pad, view_size)
    }
}
