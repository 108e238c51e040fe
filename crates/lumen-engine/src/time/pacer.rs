use std::thread;
use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time since the previous tick, including the paced sleep.
    pub dt: Duration,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Fixed-interval frame pacer.
///
/// `wait` sleeps only for what is left of the interval since the previous
/// tick, so time spent rendering counts toward the interval. A frame that
/// overran does not sleep at all.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Duration,
    last: Instant,
    frame_index: u64,
}

impl FramePacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Instant::now(),
            frame_index: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Resets the baseline, e.g. after the loop was idle.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Time left until the next tick is due.
    pub fn remaining(&self) -> Duration {
        self.interval.saturating_sub(self.last.elapsed())
    }

    /// Sleeps out the rest of the interval, then ticks.
    pub fn wait(&mut self) -> FrameTime {
        let remaining = self.remaining();
        if !remaining.is_zero() {
            thread::sleep(remaining);
        }
        self.tick()
    }

    fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let time = FrameTime {
            dt: now.saturating_duration_since(self.last),
            now,
            frame_index: self.frame_index,
        };

        self.last = now;
        self.frame_index = self.frame_index.wrapping_add(1);
        time
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new(Duration::from_millis(16))
    }
}
