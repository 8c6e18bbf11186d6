//=========================================================================
// Frame Timers
//=========================================================================
//
// FrameTimer  ── wall clock, sleeps out the remainder of each frame
// ManualTimer ── fixed delta, never sleeps (headless runs and tests)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use log::trace;

//=== Internal Dependencies ===============================================

use super::Timer;

//=== FrameTimer ==========================================================

/// Wall-clock timer holding the loop to a target frame rate.
#[derive(Debug)]
pub struct FrameTimer {
    frame_duration: Duration,
    frame_start: Option<Instant>,
    delta: Duration,
}

impl FrameTimer {
    /// Creates a timer targeting `target_fps` frames per second.
    ///
    /// # Panics
    ///
    /// Panics if `target_fps` is not finite and positive.
    pub fn new(target_fps: f64) -> Self {
        assert!(
            target_fps.is_finite() && target_fps > 0.0,
            "Target FPS must be positive, got {}",
            target_fps
        );

        let frame_duration = Duration::from_secs_f64(1.0 / target_fps);
        Self {
            frame_duration,
            frame_start: None,
            delta: frame_duration,
        }
    }

    /// Time budget of a single frame.
    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }
}

impl Timer for FrameTimer {
    fn start(&mut self) {
        self.frame_start = Some(Instant::now());
    }

    fn finish(&mut self) {
        let Some(start) = self.frame_start.take() else {
            return;
        };

        let elapsed = start.elapsed();
        if elapsed < self.frame_duration {
            thread::sleep(self.frame_duration - elapsed);
        } else {
            trace!(target: "timer", "Frame over budget: {:?} > {:?}", elapsed, self.frame_duration);
        }

        self.delta = start.elapsed();
    }

    fn delta(&self) -> Duration {
        self.delta
    }
}

//=== ManualTimer =========================================================

/// Timer reporting a fixed delta and never sleeping.
#[derive(Debug, Clone)]
pub struct ManualTimer {
    delta: Duration,
    starts: u64,
    finishes: u64,
}

impl ManualTimer {
    pub fn new(delta: Duration) -> Self {
        Self {
            delta,
            starts: 0,
            finishes: 0,
        }
    }

    /// Equivalent of a paced timer at `fps`, without the pacing.
    ///
    /// # Panics
    ///
    /// Panics if `fps` is not finite and positive.
    pub fn from_fps(fps: f64) -> Self {
        assert!(fps.is_finite() && fps > 0.0, "Target FPS must be positive, got {}", fps);
        Self::new(Duration::from_secs_f64(1.0 / fps))
    }

    pub fn set_delta(&mut self, delta: Duration) {
        self.delta = delta;
    }

    pub fn starts(&self) -> u64 {
        self.starts
    }

    pub fn finishes(&self) -> u64 {
        self.finishes
    }
}

impl Default for ManualTimer {
    fn default() -> Self {
        Self::from_fps(60.0)
    }
}

impl Timer for ManualTimer {
    fn start(&mut self) {
        self.starts += 1;
    }

    fn finish(&mut self) {
        self.finishes += 1;
    }

    fn delta(&self) -> Duration {
        self.delta
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
