//! Frame time
//!
//! Every landmark frame carries the time at which it was captured, measured
//! in microseconds since the start of the stream. Debounce policies that
//! depend on elapsed time (the transcript) read this clock rather than the
//! wall clock, so replaying a recording reproduces the same output.

use std::ops::{Add, Sub};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Capture time of a frame, microseconds since stream start
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct FrameTime(pub u64);

impl FrameTime {
    pub const ZERO: FrameTime = FrameTime(0);

    #[inline]
    pub fn from_micros(micros: u64) -> Self {
        FrameTime(micros)
    }

    /// Saturates at `u64::MAX` microseconds
    #[inline]
    pub fn from_millis(millis: u64) -> Self {
        FrameTime(millis.saturating_mul(1000))
    }

    #[inline]
    pub fn from_secs_f64(secs: f64) -> Self {
        FrameTime((secs.max(0.0) * 1_000_000.0) as u64)
    }

    #[inline]
    pub fn as_micros(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn as_millis(self) -> u64 {
        self.0 / 1000
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    /// Time of the `index`-th frame of a stream running at `fps`
    #[inline]
    pub fn at_frame(index: u64, fps: f64) -> Self {
        if fps <= 0.0 {
            return FrameTime::ZERO;
        }
        FrameTime::from_secs_f64(index as f64 / fps)
    }

    #[inline]
    pub fn saturating_add(self, duration: Duration) -> Self {
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
        FrameTime(self.0.saturating_add(micros))
    }
}

impl Add<Duration> for FrameTime {
    type Output = FrameTime;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl Sub<FrameTime> for FrameTime {
    type Output = Duration;

    /// Elapsed time, saturating at zero for out-of-order frames
    #[inline]
    fn sub(self, rhs: FrameTime) -> Self::Output {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

impl std::fmt::Debug for FrameTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t({:.3}ms)", self.0 as f64 / 1000.0)
    }
}

impl std::fmt::Display for FrameTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let total_ms = self.as_millis();
        let ms = total_ms % 1000;
        let secs = (total_ms / 1000) % 60;
        let mins = (total_ms / 60_000) % 60;
        let hours = total_ms / 3_600_000;
        write!(f, "{:02}:{:02}:{:02}.{:03}", hours, mins, secs, ms)
    }
}
