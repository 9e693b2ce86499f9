//! Thread-safe pipeline handle
//!
//! Smoother, classifier and gate state must advance together, so a frame is
//! processed under one lock from extraction to gating. Clones share the same
//! pipeline.

use std::sync::Arc;

use parking_lot::Mutex;
use signaura_core::LandmarkFrame;

use crate::{FrameOutput, Pipeline, PipelineSink, PipelineStats};

/// Shared handle to one pipeline
#[derive(Debug, Clone, Default)]
pub struct SharedPipeline {
    inner: Arc<Mutex<Pipeline>>,
}

impl SharedPipeline {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            inner: Arc::new(Mutex::new(pipeline)),
        }
    }

    /// Process one frame atomically
    pub fn process(&self, frame: &LandmarkFrame) -> FrameOutput {
        self.inner.lock().process(frame)
    }

    /// Process one frame atomically, reporting to `sink`
    pub fn process_with<S: PipelineSink + ?Sized>(
        &self,
        frame: &LandmarkFrame,
        sink: &mut S,
    ) -> FrameOutput {
        self.inner.lock().process_with(frame, sink)
    }

    pub fn stable_label(&self) -> Option<String> {
        self.inner.lock().stable_label().map(str::to_string)
    }

    pub fn stats(&self) -> PipelineStats {
        self.inner.lock().stats().clone()
    }

    pub fn reset(&self) {
        self.inner.lock().reset();
    }

    /// Run `f` with exclusive access to the pipeline
    pub fn with<R>(&self, f: impl FnOnce(&mut Pipeline) -> R) -> R {
        f(&mut *self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signaura_core::FrameTime;
    use std::thread;

    #[test]
    fn test_frames_from_many_threads_are_counted_once() {
        let shared = SharedPipeline::default();
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for i in 0..25 {
                        shared.process(&LandmarkFrame::empty(FrameTime::from_millis(t * 100 + i)));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(shared.stats().frames, 100);
        assert_eq!(shared.stats().frames_with_face, 0);
    }

    #[test]
    fn test_with_gives_exclusive_access() {
        let shared = SharedPipeline::new(Pipeline::new());
        let window = shared.with(|p| p.config().smoothing_window);
        assert_eq!(window, 5);
        shared.reset();
        assert_eq!(shared.stable_label(), None);
    }
}
