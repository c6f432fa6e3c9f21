//! enjin demo entry point.
//!
//! Runs the headless arena demo from [`demo`] on a simulated host: a fixed
//! number of host frames at 144 Hz, with scripted arrow and space key
//! presses, drawn into a [`RecordingRenderer`].
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --frames 600 --seed 42
//! ```

mod demo;

use std::path::PathBuf;

use clap::Parser;
use log::{error, info, warn};

use enjin::game::Game;
use enjin::host::SimulatedHost;
use enjin::resources::gameconfig::GameConfig;
use enjin::resources::input::{INPUT_ARROWLEFT, INPUT_ARROWRIGHT};
use enjin::resources::scene::StaticGrid;
use enjin::resources::spritestore::{ManifestLoader, PreloadedSprites, SpriteLoader};
use enjin::systems::render::RecordingRenderer;

const HOST_REFRESH_MS: f64 = 1000.0 / 144.0;

/// enjin headless demo
#[derive(Parser)]
#[command(version, about = "Runs the enjin arena demo without a window")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Number of host frames to run.
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// JSON sprite manifest; the built-in sprites are used when absent.
    #[arg(long, value_name = "PATH")]
    manifest: Option<PathBuf>,

    /// JSON static collision grid; a walled arena is used when absent.
    #[arg(long, value_name = "PATH")]
    grid: Option<PathBuf>,

    /// Seed for entity ids and game randomness.
    #[arg(long)]
    seed: Option<u64>,
}

/// Hold right, then left, firing in bursts.
fn scripted_host(frames: u64) -> SimulatedHost {
    let mut host = SimulatedHost::new(HOST_REFRESH_MS, frames)
        .with_key_down(20, INPUT_ARROWRIGHT)
        .with_key_up(140, INPUT_ARROWRIGHT)
        .with_key_down(160, INPUT_ARROWLEFT)
        .with_key_up(400, INPUT_ARROWLEFT);
    let mut frame = 30;
    while frame < frames {
        host = host.with_key_down(frame, "space").with_key_up(frame + 60, "space");
        frame += 120;
    }
    host
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(cli.config.clone());
    if let Err(e) = config.load_from_file() {
        warn!("{}; using default configuration", e);
    }

    let grid = match &cli.grid {
        Some(path) => match StaticGrid::load_from_file(path) {
            Ok(grid) => grid,
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        },
        None => demo::default_grid(),
    };

    let mut game = Game::new("enjin demo", config).with_behavior(demo::Demo::new(grid));
    if let Some(seed) = cli.seed {
        game = game.with_seed(seed);
    }

    let mut loader: Box<dyn SpriteLoader> = match &cli.manifest {
        Some(path) => Box::new(ManifestLoader::from_path(path)),
        None => {
            demo::register_sprites(&mut game.sprites);
            Box::new(PreloadedSprites)
        }
    };

    let mut host = scripted_host(cli.frames);
    let mut renderer = RecordingRenderer::new();

    if let Err(e) = game.run(&mut host, loader.as_mut(), &mut renderer) {
        error!("Demo aborted: {}", e);
        std::process::exit(1);
    }

    info!(
        "Ran {} host frames, {} logic ticks, {} frames drawn ({} draw calls in the last)",
        host.frame_index,
        game.clock.ticks,
        renderer.frames,
        renderer.calls.len()
    );
}
