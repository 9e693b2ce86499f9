//! Scripted scenarios
//!
//! A scenario is a sequence of held expressions at a fixed frame rate, with
//! optional detector noise. Running it feeds every frame through a fresh
//! pipeline and keeps everything the host would have seen.

use signaura_core::{FrameTime, LandmarkFrame, Point2, SignauraResult};
use signaura_runtime::{CollectingSink, FrameOutput, Pipeline, PipelineConfig, PipelineStats};
use signaura_state::Transcript;

use crate::synth::{FaceRig, JitterConfig, LandmarkJitter, PoseRig};

/// Default capture rate
pub const DEFAULT_FPS: f64 = 30.0;

/// One held segment
#[derive(Clone, Debug)]
pub enum Segment {
    /// Face (and optionally body) held for `frames`
    Hold {
        face: FaceRig,
        pose: Option<PoseRig>,
        frames: u32,
    },
    /// Nothing detected for `frames`
    NoFace { frames: u32 },
}

impl Segment {
    pub fn frames(&self) -> u32 {
        match self {
            Segment::Hold { frames, .. } | Segment::NoFace { frames } => *frames,
        }
    }
}

/// Scripted sequence of segments
#[derive(Clone, Debug)]
pub struct Scenario {
    pub name: String,
    pub fps: f64,
    pub segments: Vec<Segment>,
    pub jitter: Option<JitterConfig>,
}

impl Scenario {
    pub fn new(name: &str) -> Self {
        Scenario {
            name: name.to_string(),
            fps: DEFAULT_FPS,
            segments: Vec::new(),
            jitter: None,
        }
    }

    pub fn at_fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }

    /// Hold a face for `frames`
    pub fn hold(self, face: FaceRig, frames: u32) -> Self {
        self.segment(Segment::Hold {
            face,
            pose: None,
            frames,
        })
    }

    /// Hold a face and body for `frames`
    pub fn hold_with_pose(self, face: FaceRig, pose: PoseRig, frames: u32) -> Self {
        self.segment(Segment::Hold {
            face,
            pose: Some(pose),
            frames,
        })
    }

    /// Lose the face for `frames`
    pub fn dropout(self, frames: u32) -> Self {
        self.segment(Segment::NoFace { frames })
    }

    pub fn with_jitter(mut self, jitter: JitterConfig) -> Self {
        self.jitter = Some(jitter);
        self
    }

    fn segment(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn total_frames(&self) -> u64 {
        self.segments.iter().map(|s| s.frames() as u64).sum()
    }

    /// Raw detector arrays for every frame, in order
    pub fn raw_frames(&self) -> Vec<RawFrame> {
        let mut jitter = self.jitter.clone().map(LandmarkJitter::new);
        let mut frames = Vec::with_capacity(self.total_frames() as usize);
        let mut index = 0u64;

        for segment in &self.segments {
            for _ in 0..segment.frames() {
                let timestamp = FrameTime::at_frame(index, self.fps);
                index += 1;

                let (mut face, pose) = match segment {
                    Segment::Hold { face, pose, .. } => {
                        (Some(face.mesh()), pose.as_ref().map(PoseRig::skeleton))
                    }
                    Segment::NoFace { .. } => (None, None),
                };

                if let Some(jitter) = jitter.as_mut() {
                    if face.is_some() && jitter.drop_face() {
                        face = None;
                    }
                    if let Some(points) = face.as_mut() {
                        jitter.perturb(points);
                    }
                }

                frames.push(RawFrame {
                    timestamp,
                    face,
                    pose,
                });
            }
        }

        frames
    }

    /// Run on a stock pipeline
    pub fn run(&self) -> SignauraResult<ScenarioOutcome> {
        self.run_with(PipelineConfig::default())
    }

    /// Run on a pipeline built from `config`
    pub fn run_with(&self, config: PipelineConfig) -> SignauraResult<ScenarioOutcome> {
        let mut pipeline = Pipeline::with_config(config)?;
        let mut sink = CollectingSink::new();
        let mut outputs = Vec::with_capacity(self.total_frames() as usize);

        for raw in self.raw_frames() {
            let frame = LandmarkFrame::from_raw(raw.timestamp, raw.face, raw.pose)?;
            outputs.push(pipeline.process_with(&frame, &mut sink));
        }

        Ok(ScenarioOutcome {
            name: self.name.clone(),
            outputs,
            labels: sink.labels,
            transcript: sink.transcript,
            stats: pipeline.stats().clone(),
        })
    }
}

/// Detector output for one synthetic frame
#[derive(Clone, Debug)]
pub struct RawFrame {
    pub timestamp: FrameTime,
    pub face: Option<Vec<Point2>>,
    pub pose: Option<Vec<Point2>>,
}

/// Everything observed while running a scenario
#[derive(Clone, Debug)]
pub struct ScenarioOutcome {
    pub name: String,
    pub outputs: Vec<FrameOutput>,
    /// Stable labels in emission order
    pub labels: Vec<(FrameTime, String)>,
    pub transcript: Transcript,
    pub stats: PipelineStats,
}

impl ScenarioOutcome {
    /// Stable label texts in emission order
    pub fn label_texts(&self) -> Vec<&str> {
        self.labels.iter().map(|(_, t)| t.as_str()).collect()
    }

    /// Last stable label
    pub fn final_label(&self) -> Option<&str> {
        self.labels.last().map(|(_, t)| t.as_str())
    }

    /// Raw classifier phrase of every frame
    pub fn phrases(&self) -> Vec<&str> {
        self.outputs.iter().map(|o| o.phrase()).collect()
    }

    /// Output of the frame with the given index
    pub fn frame(&self, index: usize) -> Option<&FrameOutput> {
        self.outputs.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_count_and_timing() {
        let s = Scenario::new("timing")
            .hold(FaceRig::neutral(), 10)
            .dropout(5)
            .hold(FaceRig::smiling(), 15);
        assert_eq!(s.total_frames(), 30);

        let frames = s.raw_frames();
        assert_eq!(frames.len(), 30);
        assert_eq!(frames[0].timestamp, FrameTime::ZERO);
        assert_eq!(frames[29].timestamp, FrameTime::at_frame(29, 30.0));
        assert!(frames[9].face.is_some());
        assert!(frames[10].face.is_none());
        assert!(frames[15].face.is_some());
    }

    #[test]
    fn test_jittered_frames_repeat() {
        let s = Scenario::new("jitter")
            .hold(FaceRig::neutral(), 20)
            .with_jitter(JitterConfig::flaky());
        let a: Vec<_> = s.raw_frames().into_iter().map(|f| f.face).collect();
        let b: Vec<_> = s.raw_frames().into_iter().map(|f| f.face).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_outcome_accessors() {
        let outcome = Scenario::new("neutral")
            .hold(FaceRig::neutral(), 12)
            .run()
            .unwrap();
        assert_eq!(outcome.outputs.len(), 12);
        assert_eq!(outcome.label_texts(), vec!["neutral"]);
        assert_eq!(outcome.final_label(), Some("neutral"));
        assert!(outcome.phrases().iter().all(|p| *p == "neutral"));
        assert_eq!(outcome.frame(7).unwrap().stable_label.as_deref(), Some("neutral"));
    }
}
