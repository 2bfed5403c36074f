//! Frame clock for the render loop.
//!
//! ```ignore
//! use galaxy::time::Time;
//!
//! let mut time = Time::new();
//!
//! // Once per frame:
//! let (elapsed, delta) = time.update();
//! println!("{:.2}s, {:.1} fps", elapsed, time.fps());
//! ```

use std::time::{Duration, Instant};

/// Elapsed time, frame delta, frame count and a periodically sampled FPS.
#[derive(Debug)]
pub struct Time {
    start: Instant,
    last_frame: Instant,
    elapsed_secs: f32,
    delta_secs: f32,
    frame_count: u64,
    fps: f32,
    /// Frame count at the last FPS sample.
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
}

impl Time {
    /// Create a new clock starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Advance by one frame. Returns `(elapsed, delta)` in seconds.
    pub fn update(&mut self) -> (f32, f32) {
        self.update_at(Instant::now())
    }

    fn update_at(&mut self, now: Instant) -> (f32, f32) {
        self.delta_secs = now.saturating_duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.elapsed_secs = now.saturating_duration_since(self.start).as_secs_f32();
        self.frame_count += 1;

        let since_sample = now.saturating_duration_since(self.fps_update_time);
        if since_sample >= self.fps_update_interval {
            let frames = self.frame_count - self.fps_frame_count;
            self.fps = frames as f32 / since_sample.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        (self.elapsed_secs, self.delta_secs)
    }

    /// Seconds since the clock started, as of the last update.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second, resampled every 500ms.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
