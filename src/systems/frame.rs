//! Fixed-rate frame scheduler.
//!
//! The host calls [`frame`] as often as it can (once per display refresh, or in
//! a tight loop for headless runs). Logic ticks run at `update_rate` per
//! second regardless; rendering happens on every call while a scene is
//! active.
//!
//! # Contract
//!
//! - Without focus nothing happens at all, not even rendering.
//! - A tick is due once `update_interval_ms` has elapsed since the previous
//!   tick. The overshoot is carried over (`previous = now - elapsed % rate`),
//!   so a host refreshing at 144 Hz still averages 60 logic ticks per second.
//! - A forced call always ticks and does not count towards the FPS window.
//! - Key edges (`pressed`/`released`) are advanced after every tick, so an
//!   edge is visible to exactly one tick.
//! - A frame requested from a hook while a tick runs is refused and logged.

use log::error;

use crate::game::Game;
use crate::systems::process::process;
use crate::systems::render::{Renderer, render};

/// What one call to [`frame`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameOutcome {
    /// A logic tick ran.
    pub ticked: bool,
    /// Entities that ran their main update during the tick.
    pub processed: usize,
    /// Entities drawn, if the frame rendered.
    pub rendered: Option<usize>,
}

pub fn frame(
    game: &mut Game,
    now_ms: f64,
    forced: bool,
    has_focus: bool,
    renderer: Option<&mut dyn Renderer>,
) -> FrameOutcome {
    let mut outcome = FrameOutcome::default();
    if !has_focus {
        return outcome;
    }
    if game.in_process {
        error!("Frame requested from inside a logic tick; ignored");
        return outcome;
    }
    game.clock.last_now_ms = now_ms;

    let elapsed = game.clock.elapsed(now_ms);
    if forced || game.clock.is_due(now_ms) {
        if !forced && game.config.show_fps {
            game.clock.record_tick(now_ms);
        }
        outcome.processed = process(game);
        outcome.ticked = true;
        game.clock.ticks += 1;
        game.clock.advance(now_ms, elapsed);
        game.input.end_frame();
    }

    if !game.has_active_scene() {
        return outcome;
    }
    if let Some(renderer) = renderer {
        let rendered = render(game, renderer);
        if rendered >= game.config.render_warning_limit {
            error!("Excessive entity rendering: {} entities drawn", rendered);
        }
        outcome.rendered = Some(rendered);
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::gameconfig::GameConfig;
    use crate::resources::scene::Scene;
    use crate::systems::render::RecordingRenderer;

    fn game() -> Game {
        let mut config = GameConfig::new();
        config.update_rate = 50;
        let mut game = Game::new("frames", config);
        game.start_scene(Scene::new("stage"));
        game
    }

    // ===== SCHEDULING =====

    #[test]
    fn test_tick_waits_for_interval() {
        let mut game = game();
        let start = game.clock.ticks;
        assert!(frame(&mut game, 20.0, false, true, None).ticked);
        assert!(!frame(&mut game, 30.0, false, true, None).ticked);
        assert!(frame(&mut game, 40.0, false, true, None).ticked);
        assert_eq!(game.clock.ticks, start + 2);
    }

    #[test]
    fn test_overshoot_carries_over() {
        let mut game = game();
        assert!(frame(&mut game, 25.0, false, true, None).ticked);
        // 5 ms of overshoot: next tick is due at 40, not 45
        assert!(frame(&mut game, 40.0, false, true, None).ticked);
    }

    #[test]
    fn test_forced_frame_always_ticks() {
        let mut game = game();
        frame(&mut game, 20.0, false, true, None);
        assert!(frame(&mut game, 21.0, true, true, None).ticked);
    }

    #[test]
    fn test_no_focus_does_nothing() {
        let mut game = game();
        let mut renderer = RecordingRenderer::new();
        let outcome = frame(&mut game, 100.0, false, false, Some(&mut renderer));
        assert_eq!(outcome, FrameOutcome::default());
        assert_eq!(renderer.frames, 0);
    }

    // ===== RENDERING =====

    #[test]
    fn test_renders_every_call() {
        let mut game = game();
        let mut renderer = RecordingRenderer::new();
        frame(&mut game, 20.0, false, true, Some(&mut renderer));
        let outcome = frame(&mut game, 21.0, false, true, Some(&mut renderer));
        assert!(!outcome.ticked);
        assert_eq!(outcome.rendered, Some(0));
        assert_eq!(renderer.frames, 2);
    }

    #[test]
    fn test_no_render_without_scene() {
        let mut game = Game::new("bare", GameConfig::new());
        let mut renderer = RecordingRenderer::new();
        let outcome = frame(&mut game, 100.0, false, true, Some(&mut renderer));
        assert!(outcome.ticked);
        assert_eq!(outcome.rendered, None);
    }
}
