//! Engine configuration.
//!
//! Tunables for the scheduler, the lifecycle manager and the debug overlays,
//! loaded from an INI file. Every value has a safe default so a missing or
//! partial file never prevents startup.
//!
//! # Configuration File Format
//!
//! ```ini
//! [engine]
//! update_rate = 60
//! entity_cap = 60
//! entity_list_refresh_threshold = 20
//! render_warning_limit = 256
//!
//! [view]
//! width = 256
//! height = 240
//!
//! [debug]
//! show_fps = true
//! draw_colliders = false
//! draw_static_colliders = false
//! ```

use configparser::ini::Ini;
use log::{info, warn};
use std::path::PathBuf;

/// Default safe values for startup
const DEFAULT_UPDATE_RATE: u32 = 60;
/// Low on purpose: breaching it is logged, which catches entity leaks early.
const DEFAULT_ENTITY_CAP: usize = 60;
const DEFAULT_REFRESH_THRESHOLD: usize = 20;
const DEFAULT_RENDER_WARNING_LIMIT: usize = 256;
const DEFAULT_VIEW_WIDTH: u32 = 256;
const DEFAULT_VIEW_HEIGHT: u32 = 240;
const DEFAULT_SHOW_FPS: bool = true;
const DEFAULT_DRAW_COLLIDERS: bool = false;
const DEFAULT_DRAW_STATIC_COLLIDERS: bool = false;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Logic ticks per second.
    pub update_rate: u32,
    /// Slot count past which appending a new entity logs an error. Advisory.
    pub entity_cap: usize,
    /// Number of empty slots that triggers a slot-table compaction.
    pub entity_list_refresh_threshold: usize,
    /// Rendering at least this many entities in one frame logs an error.
    pub render_warning_limit: usize,
    /// View width in pixels.
    pub view_width: u32,
    /// View height in pixels.
    pub view_height: u32,
    pub show_fps: bool,
    /// Draw every entity collider after its late draw.
    pub draw_colliders: bool,
    /// Draw the scene's static collision grid.
    pub draw_static_colliders: bool,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            update_rate: DEFAULT_UPDATE_RATE,
            entity_cap: DEFAULT_ENTITY_CAP,
            entity_list_refresh_threshold: DEFAULT_REFRESH_THRESHOLD,
            render_warning_limit: DEFAULT_RENDER_WARNING_LIMIT,
            view_width: DEFAULT_VIEW_WIDTH,
            view_height: DEFAULT_VIEW_HEIGHT,
            show_fps: DEFAULT_SHOW_FPS,
            draw_colliders: DEFAULT_DRAW_COLLIDERS,
            draw_static_colliders: DEFAULT_DRAW_STATIC_COLLIDERS,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Milliseconds between two logic ticks.
    pub fn update_interval_ms(&self) -> f64 {
        1000.0 / f64::from(self.update_rate.max(1))
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    /// Load configuration from INI text instead of a file.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        // [engine] section
        if let Some(rate) = config.getuint("engine", "update_rate").ok().flatten() {
            if rate == 0 {
                warn!("update_rate = 0 ignored, keeping {}", self.update_rate);
            } else {
                self.update_rate = rate as u32;
            }
        }
        if let Some(cap) = config.getuint("engine", "entity_cap").ok().flatten() {
            self.entity_cap = cap as usize;
        }
        if let Some(threshold) = config
            .getuint("engine", "entity_list_refresh_threshold")
            .ok()
            .flatten()
        {
            self.entity_list_refresh_threshold = (threshold as usize).max(1);
        }
        if let Some(limit) = config
            .getuint("engine", "render_warning_limit")
            .ok()
            .flatten()
        {
            self.render_warning_limit = limit as usize;
        }

        // [view] section
        if let Some(width) = config.getuint("view", "width").ok().flatten() {
            self.view_width = width as u32;
        }
        if let Some(height) = config.getuint("view", "height").ok().flatten() {
            self.view_height = height as u32;
        }

        // [debug] section
        if let Some(show) = config.getbool("debug", "show_fps").ok().flatten() {
            self.show_fps = show;
        }
        if let Some(draw) = config.getbool("debug", "draw_colliders").ok().flatten() {
            self.draw_colliders = draw;
        }
        if let Some(draw) = config
            .getbool("debug", "draw_static_colliders")
            .ok()
            .flatten()
        {
            self.draw_static_colliders = draw;
        }

        info!(
            "Loaded config: {} ticks/s, cap={}, refresh={}, view {}x{}, fps={}, colliders={}/{}",
            self.update_rate,
            self.entity_cap,
            self.entity_list_refresh_threshold,
            self.view_width,
            self.view_height,
            self.show_fps,
            self.draw_colliders,
            self.draw_static_colliders
        );
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("engine", "update_rate", Some(self.update_rate.to_string()));
        config.set("engine", "entity_cap", Some(self.entity_cap.to_string()));
        config.set(
            "engine",
            "entity_list_refresh_threshold",
            Some(self.entity_list_refresh_threshold.to_string()),
        );
        config.set(
            "engine",
            "render_warning_limit",
            Some(self.render_warning_limit.to_string()),
        );

        config.set("view", "width", Some(self.view_width.to_string()));
        config.set("view", "height", Some(self.view_height.to_string()));

        config.set("debug", "show_fps", Some(self.show_fps.to_string()));
        config.set("debug", "draw_colliders", Some(self.draw_colliders.to_string()));
        config.set(
            "debug",
            "draw_static_colliders",
            Some(self.draw_static_colliders.to_string()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// View size in pixels as `(width, height)`.
    pub fn view_size(&self) -> (u32, u32) {
        (self.view_width, self.view_height)
    }
}
