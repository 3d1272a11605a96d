//! Clock helpers for frame-rate reporting
//!
//! `now_seconds()` is `performance.now()` in the browser and time since process
//! start natively.

use std::collections::VecDeque;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub fn now_seconds() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now() / 1000.0)
        .unwrap_or(0.0)
}

#[cfg(not(all(target_arch = "wasm32", feature = "wasm")))]
pub fn now_seconds() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64()
}

/// Rolling frames-per-second over the last `window` frame timestamps
#[derive(Debug)]
pub struct FrameRateMeter {
    stamps: VecDeque<f64>,
    window: usize,
}

impl Default for FrameRateMeter {
    fn default() -> Self {
        Self::new(60)
    }
}

impl FrameRateMeter {
    pub fn new(window: usize) -> Self {
        let window = window.max(2);
        Self {
            stamps: VecDeque::with_capacity(window),
            window,
        }
    }

    /// Record a frame at `now` (seconds)
    pub fn tick_at(&mut self, now: f64) {
        if self.stamps.len() == self.window {
            self.stamps.pop_front();
        }
        self.stamps.push_back(now);
    }

    pub fn tick(&mut self) {
        self.tick_at(now_seconds());
    }

    pub fn fps(&self) -> f64 {
        let (Some(first), Some(last)) = (self.stamps.front(), self.stamps.back()) else {
            return 0.0;
        };
        let elapsed = last - first;
        if self.stamps.len() < 2 || elapsed <= 0.0 {
            return 0.0;
        }
        (self.stamps.len() - 1) as f64 / elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_steady_60() {
        let mut meter = FrameRateMeter::new(10);
        for i in 0..30 {
            meter.tick_at(i as f64 / 60.0);
        }
        assert!((meter.fps() - 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_fps_needs_two_frames() {
        let mut meter = FrameRateMeter::default();
        assert_eq!(meter.fps(), 0.0);
        meter.tick_at(1.0);
        assert_eq!(meter.fps(), 0.0);
        meter.tick_at(1.0);
        assert_eq!(meter.fps(), 0.0);
    }

    #[test]
    fn test_now_seconds_monotonic() {
        let a = now_seconds();
        let b = now_seconds();
        assert!(b >= a);
    }
}
