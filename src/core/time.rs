//! Animation clock driving per-frame evaluation

use std::time::{Duration, Instant};

/// One scheduler tick as seen by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameTick {
    /// Seconds since the clock started (monotonic)
    pub elapsed: f32,
    /// Seconds since the previous tick
    pub delta: f32,
    /// Number of ticks issued so far, including this one
    pub frame: u64,
}

#[derive(Debug, Clone, Copy)]
enum ClockSource {
    /// Wall clock, measured with `Instant`
    Realtime { start: Instant, last_frame: Instant },
    /// Fixed step per tick (headless runs, tests)
    Fixed { step: Duration },
}

/// Monotonic clock handing out `FrameTick`s, one per rendered frame.
pub struct AnimationClock {
    source: ClockSource,
    elapsed: Duration,
    delta: Duration,
    frame_count: u64,
    fps_window_start: Duration,
    fps_window_frames: u32,
    fps: f32,
}

impl AnimationClock {
    /// Create a clock backed by the wall clock
    pub fn realtime() -> Self {
        let now = Instant::now();
        Self::with_source(ClockSource::Realtime {
            start: now,
            last_frame: now,
        })
    }

    /// Create a clock that advances by `1 / fps` seconds per tick
    pub fn fixed(fps: f32) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 { fps } else { 60.0 };
        Self::with_source(ClockSource::Fixed {
            step: Duration::from_secs_f32(1.0 / fps),
        })
    }

    fn with_source(source: ClockSource) -> Self {
        Self {
            source,
            elapsed: Duration::ZERO,
            delta: Duration::ZERO,
            frame_count: 0,
            fps_window_start: Duration::ZERO,
            fps_window_frames: 0,
            fps: 0.0,
        }
    }

    /// Call once per frame to advance the clock
    pub fn tick(&mut self) -> FrameTick {
        match &mut self.source {
            ClockSource::Realtime { start, last_frame } => {
                let now = Instant::now();
                self.delta = now - *last_frame;
                self.elapsed = now - *start;
                *last_frame = now;
            }
            ClockSource::Fixed { step } => {
                self.delta = *step;
                self.elapsed += *step;
            }
        }
        self.frame_count += 1;
        self.fps_window_frames += 1;

        // Update FPS every second of clock time
        let window = self.elapsed - self.fps_window_start;
        if window >= Duration::from_secs(1) {
            self.fps = self.fps_window_frames as f32 / window.as_secs_f32();
            self.fps_window_frames = 0;
            self.fps_window_start = self.elapsed;
        }

        self.current()
    }

    /// The most recent tick without advancing
    pub fn current(&self) -> FrameTick {
        FrameTick {
            elapsed: self.elapsed.as_secs_f32(),
            delta: self.delta.as_secs_f32(),
            frame: self.frame_count,
        }
    }

    /// Seconds since the clock started
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get current FPS (updated every second)
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Get total frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::realtime()
    }
}
