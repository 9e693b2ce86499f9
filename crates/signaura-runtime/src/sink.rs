//! Output channel from a pipeline to its host
//!
//! The pipeline never reaches out to a display or a transcript store. Hosts
//! implement [`PipelineSink`] and receive the events they care about; every
//! method has an empty default.

use signaura_core::FrameTime;
use signaura_state::{Transcript, TranscriptEntry};

use crate::FrameOutput;

/// Receiver for pipeline events
pub trait PipelineSink {
    /// Called once per processed frame, after the other callbacks
    fn on_frame(&mut self, _output: &FrameOutput) {}

    /// A new stable label passed the stability gate
    fn on_stable_label(&mut self, _time: FrameTime, _text: &str) {}

    /// A transcript entry was produced
    fn on_transcript(&mut self, _entry: &TranscriptEntry) {}
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl PipelineSink for NullSink {}

/// Sink that keeps stable labels and the transcript in memory
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    pub frames: u64,
    pub labels: Vec<(FrameTime, String)>,
    pub transcript: Transcript,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent stable label
    pub fn current_label(&self) -> Option<&str> {
        self.labels.last().map(|(_, text)| text.as_str())
    }
}

impl PipelineSink for CollectingSink {
    fn on_frame(&mut self, _output: &FrameOutput) {
        self.frames += 1;
    }

    fn on_stable_label(&mut self, time: FrameTime, text: &str) {
        self.labels.push((time, text.to_string()));
    }

    fn on_transcript(&mut self, entry: &TranscriptEntry) {
        self.transcript.push(entry.clone());
    }
}

impl<S: PipelineSink + ?Sized> PipelineSink for &mut S {
    fn on_frame(&mut self, output: &FrameOutput) {
        (**self).on_frame(output);
    }

    fn on_stable_label(&mut self, time: FrameTime, text: &str) {
        (**self).on_stable_label(time, text);
    }

    fn on_transcript(&mut self, entry: &TranscriptEntry) {
        (**self).on_transcript(entry);
    }
}
