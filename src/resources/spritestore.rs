//! Sprite registry and loaders.
//!
//! The engine never decodes images. It only needs each sprite's frame size and
//! animation length, which a [`SpriteLoader`] registers into the
//! [`SpriteStore`] during startup. The game loop polls the loader once per host
//! tick until it reports [`LoadStatus::Ready`] or [`LoadStatus::Failed`].
//!
//! # Manifest format
//!
//! [`ManifestLoader`] reads JSON of the form:
//!
//! ```json
//! { "sprites": [ { "id": "player", "width": 16, "height": 16, "sheet_width": 64 } ] }
//! ```
//!
//! Frames are laid out horizontally, so the animation length is
//! `ceil(sheet_width / width)`.

use std::path::{Path, PathBuf};

use log::{error, info};
use rustc_hash::FxHashMap;
use serde::Deserialize;

/// Frame metadata for one registered sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteData {
    /// Width of one frame in pixels.
    pub width: u32,
    /// Height of one frame in pixels.
    pub height: u32,
    /// Number of frames in the sheet.
    pub anim_length: u32,
}

impl SpriteData {
    pub fn new(width: u32, height: u32, anim_length: u32) -> Self {
        Self {
            width,
            height,
            anim_length,
        }
    }

    /// Derive the frame count from the full sheet width.
    pub fn from_sheet(width: u32, height: u32, sheet_width: u32) -> Self {
        let anim_length = if width == 0 { 0 } else { sheet_width.div_ceil(width) };
        Self::new(width, height, anim_length)
    }
}

/// Registry of sprite metadata keyed by sprite id, plus loading counters.
#[derive(Debug, Default)]
pub struct SpriteStore {
    sprites: FxHashMap<String, SpriteData>,
    /// Sprites announced by the loader.
    pub total: usize,
    /// Sprites registered so far.
    pub loaded: usize,
    /// Sprites that failed to load.
    pub errors: usize,
}

impl SpriteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sprite directly, bypassing any loader. Replaces an existing id.
    pub fn insert(&mut self, id: impl Into<String>, data: SpriteData) {
        let id = id.into();
        info!(
            "Registered sprite {}: {}x{} ({} frames)",
            id, data.width, data.height, data.anim_length
        );
        self.sprites.insert(id, data);
    }

    pub fn get(&self, id: &str) -> Option<&SpriteData> {
        self.sprites.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sprites.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Frame count of a sprite.
    ///
    /// The empty id means "no sprite" and yields `None` silently; an unknown
    /// id is logged as an error.
    pub fn animation_length(&self, id: &str) -> Option<u32> {
        if id.is_empty() {
            return None;
        }
        match self.sprites.get(id) {
            Some(data) => Some(data.anim_length),
            None => {
                error!("Sprite is not defined: {}", id);
                None
            }
        }
    }

    /// Fraction of announced sprites registered, from 0 to 1.
    ///
    /// A store with nothing announced is complete.
    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        self.loaded as f32 / self.total as f32
    }

    pub fn all_loaded(&self) -> bool {
        self.loaded >= self.total
    }
}

/// Result of one loader poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Still working; poll again next host tick.
    Pending,
    /// Every announced sprite is registered.
    Ready,
    /// At least one sprite failed; startup must not continue.
    Failed,
}

/// Source of sprite metadata, polled once per host tick during startup.
pub trait SpriteLoader {
    fn poll(&mut self, store: &mut SpriteStore) -> LoadStatus;
}

/// Loader for programs that register their sprites up front.
#[derive(Debug, Default)]
pub struct PreloadedSprites;

impl SpriteLoader for PreloadedSprites {
    fn poll(&mut self, store: &mut SpriteStore) -> LoadStatus {
        store.loaded = store.len();
        store.total = store.len();
        LoadStatus::Ready
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ManifestEntry {
    id: String,
    width: u32,
    height: u32,
    #[serde(default)]
    sheet_width: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
struct Manifest {
    sprites: Vec<ManifestEntry>,
}

enum ManifestSource {
    Path(PathBuf),
    Text(String),
}

/// Loads sprite metadata from a JSON manifest.
///
/// The first poll reads and parses the manifest and announces its sprite
/// count; each later poll registers one sprite, so loading progress advances
/// across host ticks like a real asset pipeline would.
pub struct ManifestLoader {
    source: ManifestSource,
    pending: Vec<ManifestEntry>,
    started: bool,
}

impl ManifestLoader {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            source: ManifestSource::Path(path.as_ref().to_path_buf()),
            pending: Vec::new(),
            started: false,
        }
    }

    pub fn from_json(text: impl Into<String>) -> Self {
        Self {
            source: ManifestSource::Text(text.into()),
            pending: Vec::new(),
            started: false,
        }
    }

    fn read_manifest(&self) -> Result<Manifest, String> {
        let text = match &self.source {
            ManifestSource::Path(path) => std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read sprite manifest {:?}: {}", path, e))?,
            ManifestSource::Text(text) => text.clone(),
        };
        serde_json::from_str(&text).map_err(|e| format!("Failed to parse sprite manifest: {}", e))
    }
}

impl SpriteLoader for ManifestLoader {
    fn poll(&mut self, store: &mut SpriteStore) -> LoadStatus {
        if !self.started {
            self.started = true;
            match self.read_manifest() {
                Ok(manifest) => {
                    store.total += manifest.sprites.len();
                    // reversed so pop() registers in manifest order
                    self.pending = manifest.sprites.into_iter().rev().collect();
                }
                Err(e) => {
                    error!("{}", e);
                    store.errors += 1;
                }
            }
        } else if let Some(entry) = self.pending.pop() {
            if entry.width == 0 || entry.height == 0 {
                error!("Sprite {} has a zero-sized frame", entry.id);
                store.errors += 1;
            } else {
                let sheet_width = entry.sheet_width.unwrap_or(entry.width);
                store.insert(
                    entry.id,
                    SpriteData::from_sheet(entry.width, entry.height, sheet_width),
                );
                store.loaded += 1;
            }
        }

        if store.errors > 0 {
            LoadStatus::Failed
        } else if self.started && self.pending.is_empty() && store.all_loaded() {
            LoadStatus::Ready
        } else {
            LoadStatus::Pending
        }
    }
}
