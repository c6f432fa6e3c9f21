//! Fixed-rate timing state for the frame scheduler.
//!
//! Host ticks arrive at display refresh rate; logic ticks run at
//! [`FrameClock::update_rate_ms`] intervals. The clock carries the remainder
//! of each interval forward instead of snapping to the raw tick time, so the
//! logic rate does not drift with host jitter.

use std::collections::VecDeque;

/// Width of the rolling FPS window in milliseconds.
const FPS_WINDOW_MS: f64 = 1000.0;

#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Milliseconds between logic ticks.
    pub update_rate_ms: f64,
    /// Timestamp the last logic tick is accounted to.
    pub previous_update_ms: f64,
    /// Most recent host timestamp seen.
    pub last_now_ms: f64,
    /// Logic ticks counted in the last second.
    pub fps: usize,
    /// Logic ticks run since startup, forced ones included.
    pub ticks: u64,
    times: VecDeque<f64>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(60)
    }
}

impl FrameClock {
    pub fn new(update_rate: u32) -> Self {
        Self {
            update_rate_ms: 1000.0 / f64::from(update_rate.max(1)),
            previous_update_ms: 0.0,
            last_now_ms: 0.0,
            fps: 0,
            ticks: 0,
            times: VecDeque::new(),
        }
    }

    pub fn set_update_rate(&mut self, update_rate: u32) {
        self.update_rate_ms = 1000.0 / f64::from(update_rate.max(1));
    }

    /// Milliseconds since the last accounted logic tick.
    pub fn elapsed(&self, now_ms: f64) -> f64 {
        now_ms - self.previous_update_ms
    }

    pub fn is_due(&self, now_ms: f64) -> bool {
        self.elapsed(now_ms) >= self.update_rate_ms
    }

    /// Account a logic tick run at `now_ms`, keeping the part of the elapsed
    /// time that exceeds whole intervals.
    pub fn advance(&mut self, now_ms: f64, elapsed_ms: f64) {
        let offset = elapsed_ms % self.update_rate_ms;
        self.previous_update_ms = now_ms - offset;
    }

    /// Push a tick timestamp into the rolling window and refresh `fps`.
    pub fn record_tick(&mut self, now_ms: f64) {
        while let Some(&front) = self.times.front() {
            if front <= now_ms - FPS_WINDOW_MS {
                self.times.pop_front();
            } else {
                break;
            }
        }
        self.times.push_back(now_ms);
        self.fps = self.times.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_rate() {
        let clock = FrameClock::new(50);
        assert!(approx_eq(clock.update_rate_ms, 20.0));
        assert!(approx_eq(FrameClock::new(0).update_rate_ms, 1000.0));
    }

    #[test]
    fn test_remainder_is_carried() {
        let mut clock = FrameClock::new(50);
        assert!(!clock.is_due(19.0));
        assert!(clock.is_due(25.0));
        clock.advance(25.0, clock.elapsed(25.0));
        assert!(approx_eq(clock.previous_update_ms, 20.0));
        // 20 ms after the accounted tick, not after the raw one
        assert!(clock.is_due(40.0));
    }

    #[test]
    fn test_fps_window() {
        let mut clock = FrameClock::new(60);
        for t in [0.0, 400.0, 800.0, 1000.0] {
            clock.record_tick(t);
        }
        // 0.0 drops out once a tick lands at 1000
        assert_eq!(clock.fps, 3);
        clock.record_tick(2500.0);
        assert_eq!(clock.fps, 1);
    }
}
