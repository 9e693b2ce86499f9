//! Replay of recorded landmark streams
//!
//! Input is JSON lines, one detector frame per line:
//!
//! ```text
//! {"timeMs": 33, "face": [{"x": 0.41, "y": 0.39}, ...], "pose": null}
//! ```
//!
//! Each line is ingested into a pipeline and the resulting `FrameOutput` is
//! written as one JSON line. Lines that do not parse, and frames that fail
//! landmark validation, are logged and skipped.

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};
use signaura_core::{FrameTime, Point2, SignauraError, SignauraResult};
use signaura_state::Transcript;
use tracing::{info, warn};

use crate::{DatasetRecorder, Pipeline, PipelineStats};

/// One recorded detector frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameRecord {
    /// Capture time, milliseconds since stream start
    pub time_ms: u64,
    #[serde(default)]
    pub face: Option<Vec<Point2>>,
    #[serde(default)]
    pub pose: Option<Vec<Point2>>,
}

impl FrameRecord {
    /// Parse one JSON line; `line` is 1-based and only used in errors
    pub fn parse_line(json: &str, line: usize) -> SignauraResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| SignauraError::InvalidFrame(format!("line {}: {}", line, e)))
    }

    pub fn timestamp(&self) -> FrameTime {
        FrameTime::from_millis(self.time_ms)
    }
}

/// Totals for one replay run
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaySummary {
    pub lines: u64,
    pub malformed_lines: u64,
    pub stats: PipelineStats,
    pub transcript: Transcript,
}

/// Run every frame of `input` through `pipeline`, writing outputs to `output`
///
/// When `recorder` is given it observes every output (and so records while a
/// collection session is active).
pub fn replay<R: BufRead, W: Write>(
    pipeline: &mut Pipeline,
    input: R,
    mut output: W,
    mut recorder: Option<&mut DatasetRecorder>,
) -> SignauraResult<ReplaySummary> {
    let mut summary = ReplaySummary::default();

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        summary.lines += 1;

        let record = match FrameRecord::parse_line(&line, index + 1) {
            Ok(record) => record,
            Err(e) => {
                summary.malformed_lines += 1;
                warn!(error = %e, "skipping malformed line");
                continue;
            }
        };

        let timestamp = record.timestamp();
        let out = match pipeline.ingest(timestamp, record.face, record.pose) {
            Ok(out) => out,
            Err(_) => continue,
        };

        if let Some(entry) = &out.transcript {
            summary.transcript.push(entry.clone());
        }
        if let Some(recorder) = recorder.as_deref_mut() {
            recorder.observe(&out);
        }

        serde_json::to_writer(&mut output, &out).map_err(std::io::Error::from)?;
        output.write_all(b"\n")?;
    }

    output.flush()?;
    summary.stats = pipeline.stats().clone();

    info!(
        lines = summary.lines,
        malformed = summary.malformed_lines,
        frames = summary.stats.frames,
        rejected = summary.stats.rejected_frames,
        labels = summary.stats.labels_emitted,
        "replay finished"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use signaura_core::FaceLandmark;

    fn face_json(brow_y: f64) -> String {
        let mut points = vec![Point2::new(0.5, 0.5); FaceLandmark::min_mesh_len()];
        let mut put = |lm: FaceLandmark, x: f64, y: f64| points[lm.mesh_index()] = Point2::new(x, y);
        put(FaceLandmark::LeftEyeOuter, 0.4, 0.4);
        put(FaceLandmark::RightEyeOuter, 0.6, 0.4);
        put(FaceLandmark::LeftUpperLid, 0.42, 0.395);
        put(FaceLandmark::LeftLowerLid, 0.42, 0.405);
        put(FaceLandmark::RightUpperLid, 0.58, 0.395);
        put(FaceLandmark::RightLowerLid, 0.58, 0.405);
        put(FaceLandmark::LeftBrow, 0.42, brow_y);
        put(FaceLandmark::RightBrow, 0.58, brow_y);
        put(FaceLandmark::Chin, 0.5, 0.505);
        put(FaceLandmark::UpperLip, 0.5, 0.55);
        put(FaceLandmark::LowerLip, 0.5, 0.551);
        put(FaceLandmark::MouthCornerLeft, 0.475, 0.55);
        put(FaceLandmark::MouthCornerRight, 0.525, 0.55);
        serde_json::to_string(&points).unwrap()
    }

    fn stream(frames: u64, brow_y: f64) -> String {
        let face = face_json(brow_y);
        (0..frames)
            .map(|i| format!("{{\"timeMs\": {}, \"face\": {}}}\n", i * 33, face))
            .collect()
    }

    #[test]
    fn test_replay_writes_one_line_per_frame() {
        let mut pipeline = Pipeline::new();
        let mut out = Vec::new();
        let summary = replay(&mut pipeline, stream(10, 0.36).as_bytes(), &mut out, None).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 10);
        assert_eq!(summary.stats.frames, 10);
        assert_eq!(summary.stats.labels_emitted, 1);
        assert_eq!(pipeline.stable_label(), Some("eyebrows raised (surprise/ask)"));

        let last: serde_json::Value = serde_json::from_str(text.lines().last().unwrap()).unwrap();
        assert_eq!(last["classification"]["channels"][0], "browsRaised");
    }

    #[test]
    fn test_replay_skips_bad_lines() {
        let input = concat!(
            "not json\n",
            "\n",
            "{\"timeMs\": 0, \"face\": [{\"x\": 0.1, \"y\": 0.1}]}\n",
            "{\"timeMs\": 33}\n",
        );
        let mut pipeline = Pipeline::new();
        let summary = replay(&mut pipeline, input.as_bytes(), std::io::sink(), None).unwrap();
        assert_eq!(summary.lines, 3);
        assert_eq!(summary.malformed_lines, 1);
        assert_eq!(summary.stats.rejected_frames, 1);
        assert_eq!(summary.stats.frames, 1);
    }

    #[test]
    fn test_replay_collects_dataset() {
        let mut pipeline = Pipeline::new();
        let mut recorder = DatasetRecorder::new();
        recorder.start_collecting("question").unwrap();
        replay(&mut pipeline, stream(6, 0.36).as_bytes(), std::io::sink(), Some(&mut recorder))
            .unwrap();
        assert_eq!(recorder.sample_count(), 6);
        assert!(recorder.to_csv().lines().nth(1).unwrap().starts_with("question,"));
    }

    #[test]
    fn test_huge_timestamp_saturates() {
        let input = concat!(
            "{\"timeMs\": 18446744073709551615}\n",
            "{\"timeMs\": 18446744073709551615, \"face\": null}\n",
        );
        let mut pipeline = Pipeline::new();
        let mut out = Vec::new();
        let summary = replay(&mut pipeline, input.as_bytes(), &mut out, None).unwrap();
        assert_eq!(summary.stats.frames, 2);
        assert_eq!(summary.malformed_lines, 0);

        let first: serde_json::Value =
            serde_json::from_str(String::from_utf8(out).unwrap().lines().next().unwrap()).unwrap();
        assert_eq!(first["timestamp"], serde_json::json!(u64::MAX));
    }

    #[test]
    fn test_point_extra_fields_ignored() {
        let r = FrameRecord::parse_line(r#"{"timeMs": 5, "pose": [{"x": 0.1, "y": 0.2, "z": -0.3}]}"#, 1)
            .unwrap();
        assert_eq!(r.timestamp(), FrameTime::from_millis(5));
        assert_eq!(r.pose.unwrap()[0], Point2::new(0.1, 0.2));
        assert!(r.face.is_none());
    }
}
