//! Host integration.
//!
//! A [`Host`] stands in for the platform: it hands out frame timestamps, says
//! whether the game has focus and feeds keyboard events into the
//! [`InputState`]. [`Game::run`](crate::game::Game::run) drives the engine
//! from any host.
//!
//! - [`SimulatedHost`] steps a fake clock by a fixed amount per frame and
//!   replays scripted key events. Tests and the headless demo use it.
//! - [`RealtimeHost`] follows the wall clock and sleeps between frames.

use std::ops::Range;
use std::thread;
use std::time::{Duration, Instant};

use crate::resources::input::InputState;

pub trait Host {
    /// Wait for the next frame and return its timestamp in milliseconds, or
    /// `None` when the host wants the game to stop.
    fn next_frame(&mut self) -> Option<f64>;

    fn has_focus(&self) -> bool {
        true
    }

    /// Apply keyboard events that arrived since the last frame.
    fn poll_input(&mut self, _input: &mut InputState) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum KeyEvent {
    Down(String),
    Up(String),
}

/// Deterministic host with a fixed frame step.
#[derive(Debug, Clone)]
pub struct SimulatedHost {
    step_ms: f64,
    frames: u64,
    /// Frames handed out so far.
    pub frame_index: u64,
    focus_lost: Vec<Range<u64>>,
    events: Vec<(u64, KeyEvent)>,
}

impl SimulatedHost {
    /// Run `frames` frames, `step_ms` apart, starting at `step_ms`.
    pub fn new(step_ms: f64, frames: u64) -> Self {
        Self {
            step_ms,
            frames,
            frame_index: 0,
            focus_lost: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Report no focus for the frames in `frames`.
    pub fn with_focus_lost(mut self, frames: Range<u64>) -> Self {
        self.focus_lost.push(frames);
        self
    }

    /// Press `key` before frame `frame` (1-based, like `frame_index`).
    pub fn with_key_down(mut self, frame: u64, key: &str) -> Self {
        self.events.push((frame, KeyEvent::Down(key.to_string())));
        self
    }

    pub fn with_key_up(mut self, frame: u64, key: &str) -> Self {
        self.events.push((frame, KeyEvent::Up(key.to_string())));
        self
    }

    pub fn now_ms(&self) -> f64 {
        self.frame_index as f64 * self.step_ms
    }
}

impl Host for SimulatedHost {
    fn next_frame(&mut self) -> Option<f64> {
        if self.frame_index >= self.frames {
            return None;
        }
        self.frame_index += 1;
        Some(self.now_ms())
    }

    fn has_focus(&self) -> bool {
        !self
            .focus_lost
            .iter()
            .any(|range| range.contains(&self.frame_index))
    }

    fn poll_input(&mut self, input: &mut InputState) {
        for (frame, event) in &self.events {
            if *frame != self.frame_index {
                continue;
            }
            match event {
                KeyEvent::Down(key) => input.key_down(key),
                KeyEvent::Up(key) => input.key_up(key),
            }
        }
    }
}

/// Wall-clock host that paces frames at a target refresh rate.
#[derive(Debug)]
pub struct RealtimeHost {
    started: Instant,
    frame_time: Duration,
    last_frame: Option<Instant>,
    remaining: Option<u64>,
}

impl RealtimeHost {
    /// `refresh_rate` frames per second, forever or for `frames` frames.
    pub fn new(refresh_rate: u32, frames: Option<u64>) -> Self {
        Self {
            started: Instant::now(),
            frame_time: Duration::from_secs_f64(1.0 / f64::from(refresh_rate.max(1))),
            last_frame: None,
            remaining: frames,
        }
    }
}

impl Host for RealtimeHost {
    fn next_frame(&mut self) -> Option<f64> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }
        if let Some(last) = self.last_frame {
            let spent = last.elapsed();
            if spent < self.frame_time {
                thread::sleep(self.frame_time - spent);
            }
        }
        let now = Instant::now();
        self.last_frame = Some(now);
        Some(now.duration_since(self.started).as_secs_f64() * 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_host_steps_and_stops() {
        let mut host = SimulatedHost::new(10.0, 3);
        assert_eq!(host.next_frame(), Some(10.0));
        assert_eq!(host.next_frame(), Some(20.0));
        assert_eq!(host.next_frame(), Some(30.0));
        assert_eq!(host.next_frame(), None);
    }

    #[test]
    fn test_simulated_host_focus_and_keys() {
        let mut host = SimulatedHost::new(10.0, 5)
            .with_focus_lost(2..4)
            .with_key_down(1, "x")
            .with_key_up(3, "x");
        let mut input = InputState::new();

        host.next_frame();
        assert!(host.has_focus());
        host.poll_input(&mut input);
        assert!(input.is_key_held("x"));

        host.next_frame();
        assert!(!host.has_focus());
        host.next_frame();
        host.poll_input(&mut input);
        assert!(!input.is_key_held("x"));
        host.next_frame();
        assert!(host.has_focus());
    }

    #[test]
    fn test_realtime_host_frame_budget() {
        let mut host = RealtimeHost::new(1000, Some(2));
        let first = host.next_frame();
        let second = host.next_frame();
        assert!(first.is_some());
        assert!(second >= first);
        assert_eq!(host.next_frame(), None);
    }
}
