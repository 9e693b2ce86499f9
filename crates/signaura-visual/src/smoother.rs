//! Temporal smoothing - strict sliding-window mean
//!
//! Landmark detectors jitter from frame to frame. The smoother keeps the last
//! W raw vectors (oldest evicted first) and reports their field-wise mean.
//! A frame without a face is skipped entirely: it neither enters the window
//! nor evicts anything, so a short detection dropout does not drag the
//! average towards zero.

use std::collections::VecDeque;

use signaura_core::{FeatureVector, SmoothedFeatureVector};
use tracing::trace;

/// Default window capacity (frames)
pub const DEFAULT_SMOOTHING_WINDOW: usize = 5;

/// Sliding-window averager over feature vectors
#[derive(Debug, Clone)]
pub struct TemporalSmoother {
    /// Most recent raw vectors, oldest at the front
    window: VecDeque<FeatureVector>,
    /// Maximum number of vectors kept
    capacity: usize,
}

impl TemporalSmoother {
    /// Create a smoother; a capacity of 0 is raised to 1
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Feed one frame's raw vector, `None` when the frame had no face
    ///
    /// `None` passes through without touching the window.
    pub fn smooth(&mut self, raw: Option<&FeatureVector>) -> Option<SmoothedFeatureVector> {
        let raw = raw?;
        self.push(*raw);
        self.current()
    }

    /// Append a vector, evicting the oldest on overflow
    pub fn push(&mut self, raw: FeatureVector) {
        self.window.push_back(raw);
        if self.window.len() > self.capacity {
            self.window.pop_front();
            trace!(capacity = self.capacity, "smoothing window full, evicted oldest");
        }
    }

    /// Mean of the current window, `None` before the first vector
    pub fn current(&self) -> Option<SmoothedFeatureVector> {
        FeatureVector::mean(&self.window)
            .map(|features| SmoothedFeatureVector::new(features, self.window.len()))
    }

    /// Window contents, oldest first
    pub fn window(&self) -> impl Iterator<Item = &FeatureVector> {
        self.window.iter()
    }

    /// Most recent raw vector
    pub fn latest(&self) -> Option<&FeatureVector> {
        self.window.back()
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all history (pipeline restart)
    pub fn clear(&mut self) {
        self.window.clear();
    }
}

impl Default for TemporalSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING_WINDOW)
    }
}
