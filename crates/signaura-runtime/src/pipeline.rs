//! Pipeline - the per-stream context object
//!
//! One `Pipeline` owns every piece of mutable state for one camera stream:
//! the smoothing window, the channel latches, the stability tracker and the
//! transcript debouncer. Frames must be fed in arrival order. Independent
//! streams use independent pipelines and never share state.
//!
//! Per-frame flow:
//! 1. Extract raw features (none without a face)
//! 2. Smooth (a frame without a face leaves the window untouched)
//! 3. Classify (channel latches advance only when features exist)
//! 4. Gate the phrase for the stable label
//! 5. Debounce the phrase for the transcript

use std::time::{Duration, Instant};

use serde::Serialize;
use signaura_core::{
    FeatureVector, FrameTime, LandmarkFrame, Point2, SignauraResult, SmoothedFeatureVector,
};
use signaura_state::{
    ChannelState, Classification, GestureClassifier, StabilityGate, TranscriptDebouncer,
    TranscriptEntry,
};
use signaura_visual::{extract_frame, FeatureGauges, TemporalSmoother};
use tracing::{debug, trace, warn};

use crate::{NullSink, PipelineConfig, PipelineSink};

/// Everything a host needs about one processed frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameOutput {
    pub timestamp: FrameTime,
    /// Unsmoothed metrics, `None` without a face
    pub raw_features: Option<FeatureVector>,
    /// Window mean, `None` without a face
    pub smoothed: Option<SmoothedFeatureVector>,
    /// Raw classifier phrase (empty without a face)
    pub classification: Classification,
    /// Set on the frame a new label passes the stability gate
    pub stable_label: Option<String>,
    /// Set on the frame the transcript records a change
    pub transcript: Option<TranscriptEntry>,
    /// Display readouts for the smoothed metrics
    pub gauges: Option<FeatureGauges>,
}

impl FrameOutput {
    pub fn has_face(&self) -> bool {
        self.raw_features.is_some()
    }

    /// Raw classifier phrase
    pub fn phrase(&self) -> &str {
        &self.classification.text
    }
}

/// Per-pipeline counters
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStats {
    pub frames: u64,
    pub frames_with_face: u64,
    pub labels_emitted: u64,
    pub transcript_entries: u64,
    /// Raw detector arrays that failed ingestion
    pub rejected_frames: u64,
    #[serde(skip)]
    pub last_frame_duration: Duration,
}

/// Landmark-to-label pipeline for one stream
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    smoother: TemporalSmoother,
    classifier: GestureClassifier,
    gate: StabilityGate,
    debouncer: TranscriptDebouncer,
    stats: PipelineStats,
}

impl Pipeline {
    /// Pipeline with the stock configuration
    pub fn new() -> Self {
        Self::build(PipelineConfig::default())
    }

    /// Pipeline with a custom configuration, validated first
    pub fn with_config(config: PipelineConfig) -> SignauraResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: PipelineConfig) -> Self {
        Pipeline {
            smoother: TemporalSmoother::new(config.smoothing_window),
            classifier: GestureClassifier::new(&config.thresholds),
            gate: StabilityGate::new(config.stability_frames),
            debouncer: TranscriptDebouncer::new(config.transcript_interval),
            stats: PipelineStats::default(),
            config,
        }
    }

    /// Process one frame
    pub fn process(&mut self, frame: &LandmarkFrame) -> FrameOutput {
        self.process_with(frame, &mut NullSink)
    }

    /// Process one frame and report events to `sink`
    pub fn process_with<S: PipelineSink + ?Sized>(
        &mut self,
        frame: &LandmarkFrame,
        sink: &mut S,
    ) -> FrameOutput {
        let start = Instant::now();
        self.stats.frames += 1;

        let raw = extract_frame(frame);
        let smoothed = self.smoother.smooth(raw.as_ref());
        let classification = self.classifier.classify(smoothed.as_ref());

        let mut stable_label = None;
        let mut transcript = None;

        if !classification.is_empty() {
            self.stats.frames_with_face += 1;

            stable_label = self.gate.gate(&classification.text);
            if let Some(label) = &stable_label {
                self.stats.labels_emitted += 1;
                debug!(time = %frame.timestamp, label = %label, "stable label");
                sink.on_stable_label(frame.timestamp, label);
            }

            transcript = self.debouncer.observe(&classification.text, frame.timestamp);
            if let Some(entry) = &transcript {
                self.stats.transcript_entries += 1;
                sink.on_transcript(entry);
            }
        }

        let output = FrameOutput {
            timestamp: frame.timestamp,
            raw_features: raw,
            gauges: smoothed.as_ref().map(|s| FeatureGauges::from_features(&s.features)),
            smoothed,
            classification,
            stable_label,
            transcript,
        };

        trace!(
            time = %frame.timestamp,
            face = frame.has_face(),
            pose = frame.has_pose(),
            phrase = output.phrase(),
            "frame processed"
        );
        sink.on_frame(&output);

        self.stats.last_frame_duration = start.elapsed();
        output
    }

    /// Validate raw detector arrays and process them as one frame
    ///
    /// Rejected arrays are counted and leave every piece of state untouched.
    pub fn ingest(
        &mut self,
        timestamp: FrameTime,
        face: Option<Vec<Point2>>,
        pose: Option<Vec<Point2>>,
    ) -> SignauraResult<FrameOutput> {
        match LandmarkFrame::from_raw(timestamp, face, pose) {
            Ok(frame) => Ok(self.process(&frame)),
            Err(e) => {
                self.stats.rejected_frames += 1;
                warn!(time = %timestamp, error = %e, "rejected landmark frame");
                Err(e)
            }
        }
    }

    /// Last label surfaced by the stability gate
    pub fn stable_label(&self) -> Option<&str> {
        self.gate.stable()
    }

    /// Current window mean
    pub fn smoothed(&self) -> Option<SmoothedFeatureVector> {
        self.smoother.current()
    }

    pub fn smoother(&self) -> &TemporalSmoother {
        &self.smoother
    }

    pub fn channel_state(&self) -> &ChannelState {
        self.classifier.state()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    /// Explicit restart: clear window, latches, gate and transcript debounce
    ///
    /// Counters are kept.
    pub fn reset(&mut self) {
        self.smoother.clear();
        self.classifier.reset();
        self.gate.reset();
        self.debouncer.reset();
        debug!("pipeline reset");
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
