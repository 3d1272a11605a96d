//! Frame loop bookkeeping shared by the browser loop, the CLI and the preview
//!
//! The loop itself is platform specific (`requestAnimationFrame`, a tokio
//! interval, egui repaints); what to do with each frame's outcome is not.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::field::FrameStats;
use super::surface::SurfaceError;
use tracing::{debug, error, warn};

/// Consecutive failed frames after which the loop gives up (~2s at 60 Hz)
pub const MAX_CONSECUTIVE_FRAME_FAILURES: u32 = 120;

/// Shared stop flag for a repeating task
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Whether the loop should schedule another frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameVerdict {
    Continue,
    Stop,
}

/// Tracks frame outcomes and decides when a loop must stop
#[derive(Debug)]
pub struct FrameSupervisor {
    token: CancellationToken,
    max_consecutive_failures: u32,
    consecutive_failures: u32,
    frames: u64,
    failures: u64,
    last_stats: FrameStats,
}

impl FrameSupervisor {
    pub fn new(token: CancellationToken) -> Self {
        Self::with_limit(token, MAX_CONSECUTIVE_FRAME_FAILURES)
    }

    pub fn with_limit(token: CancellationToken, max_consecutive_failures: u32) -> Self {
        Self {
            token,
            max_consecutive_failures: max_consecutive_failures.max(1),
            consecutive_failures: 0,
            frames: 0,
            failures: 0,
            last_stats: FrameStats::default(),
        }
    }

    /// Checked before drawing a frame
    pub fn should_run(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Record one frame's outcome.
    ///
    /// Isolated failures are logged and skipped. A streak of
    /// `max_consecutive_failures` cancels the token and stops the loop.
    pub fn record(&mut self, outcome: Result<FrameStats, SurfaceError>) -> FrameVerdict {
        self.frames += 1;
        match outcome {
            Ok(stats) => {
                if self.consecutive_failures > 0 {
                    debug!(failed = self.consecutive_failures, "Frame drawing recovered");
                }
                self.consecutive_failures = 0;
                self.last_stats = stats;
            }
            Err(e) => {
                self.failures += 1;
                self.consecutive_failures += 1;
                if self.consecutive_failures == 1 {
                    warn!(error = %e, frame = self.frames, "Frame drawing failed");
                } else {
                    debug!(error = %e, streak = self.consecutive_failures, "Frame drawing failed");
                }
                if self.consecutive_failures >= self.max_consecutive_failures {
                    error!(
                        streak = self.consecutive_failures,
                        "Too many failed frames, stopping animation"
                    );
                    self.token.cancel();
                }
            }
        }

        if self.token.is_cancelled() {
            FrameVerdict::Stop
        } else {
            FrameVerdict::Continue
        }
    }

    /// Frames recorded so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Failed frames recorded so far
    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Counters of the most recent successful frame
    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok() -> Result<FrameStats, SurfaceError> {
        Ok(FrameStats {
            nodes: 3,
            ..FrameStats::default()
        })
    }

    fn failed() -> Result<FrameStats, SurfaceError> {
        Err(SurfaceError::Detached)
    }

    #[test]
    fn test_token_shared_between_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_isolated_failures_continue() {
        let mut sup = FrameSupervisor::with_limit(CancellationToken::new(), 3);
        assert_eq!(sup.record(failed()), FrameVerdict::Continue);
        assert_eq!(sup.record(failed()), FrameVerdict::Continue);
        assert_eq!(sup.record(ok()), FrameVerdict::Continue);
        assert_eq!(sup.record(failed()), FrameVerdict::Continue);
        assert_eq!(sup.frames(), 4);
        assert_eq!(sup.failures(), 3);
        assert_eq!(sup.last_stats().nodes, 3);
        assert!(sup.should_run());
    }

    #[test]
    fn test_failure_streak_stops_loop() {
        let token = CancellationToken::new();
        let mut sup = FrameSupervisor::with_limit(token.clone(), 3);
        assert_eq!(sup.record(failed()), FrameVerdict::Continue);
        assert_eq!(sup.record(failed()), FrameVerdict::Continue);
        assert_eq!(sup.record(failed()), FrameVerdict::Stop);
        assert!(token.is_cancelled());
        assert!(!sup.should_run());
    }

    #[test]
    fn test_external_cancel_stops_loop() {
        let token = CancellationToken::new();
        let mut sup = FrameSupervisor::new(token.clone());
        assert_eq!(sup.record(ok()), FrameVerdict::Continue);
        token.cancel();
        assert!(!sup.should_run());
        assert_eq!(sup.record(ok()), FrameVerdict::Stop);
    }
}
