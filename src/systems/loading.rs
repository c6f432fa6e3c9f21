//! Startup asset loading.
//!
//! Before the game starts, the sprite loader is polled once per host frame
//! until it reports ready. Any load error aborts startup: the game never starts
//! with missing sprites.

use log::info;

use crate::game::Game;
use crate::host::Host;
use crate::resources::spritestore::{LoadStatus, SpriteLoader};

/// Poll `loader` until every sprite is registered.
///
/// Returns the number of sprites the loader announced.
pub fn wait_for_assets(
    game: &mut Game,
    host: &mut dyn Host,
    loader: &mut dyn SpriteLoader,
) -> Result<usize, String> {
    loop {
        let status = loader.poll(&mut game.sprites);
        if game.sprites.total > 0 {
            info!(
                "Loading progress: {:.0}%",
                game.sprites.progress() * 100.0
            );
        }
        match status {
            LoadStatus::Ready => {
                info!("Asset loading complete: {}", game.sprites.total);
                return Ok(game.sprites.total);
            }
            LoadStatus::Failed => {
                return Err(format!(
                    "Asset loading failed with {} errors",
                    game.sprites.errors
                ));
            }
            LoadStatus::Pending => {
                if host.next_frame().is_none() {
                    return Err("Host stopped before assets finished loading".to_string());
                }
            }
        }
    }
}
