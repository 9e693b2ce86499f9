//! Arbitrary detector output through ingestion and the whole pipeline
//!
//! Landmark arrays of any length and any coordinate value (NaN and infinities
//! included) must either be rejected with an error or produce an output that
//! keeps the pipeline invariants.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use signaura_core::{FrameTime, Point2};
use signaura_runtime::{Pipeline, PipelineConfig};
use signaura_state::Channel;

#[derive(Debug, Arbitrary)]
struct FuzzFrame {
    delta_ms: u16,
    face: Option<Vec<(f64, f64)>>,
    pose: Option<Vec<(f64, f64)>>,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    smoothing_window: u8,
    stability_frames: u8,
    frames: Vec<FuzzFrame>,
}

fn points(raw: Option<Vec<(f64, f64)>>) -> Option<Vec<Point2>> {
    raw.map(|v| v.into_iter().map(|(x, y)| Point2::new(x, y)).collect())
}

fuzz_target!(|input: FuzzInput| {
    let config = PipelineConfig {
        smoothing_window: input.smoothing_window as usize,
        stability_frames: input.stability_frames as u32,
        ..Default::default()
    };
    let Ok(mut pipeline) = Pipeline::with_config(config) else {
        return;
    };

    let mut now = 0u64;
    for frame in input.frames {
        now += frame.delta_ms as u64;
        let Ok(out) = pipeline.ingest(FrameTime::from_millis(now), points(frame.face), points(frame.pose))
        else {
            continue;
        };

        let channels = &out.classification.channels;
        assert!(!(channels.contains(&Channel::HeadTiltLeft)
            && channels.contains(&Channel::HeadTiltRight)));
        assert!(!(channels.contains(&Channel::GazingLeft)
            && channels.contains(&Channel::GazingRight)));

        if let Some(smoothed) = out.smoothed {
            assert!(smoothed.samples >= 1);
            assert!(smoothed.samples <= pipeline.config().smoothing_window);
        } else {
            assert!(out.classification.text.is_empty());
            assert!(out.stable_label.is_none());
        }
    }
});
