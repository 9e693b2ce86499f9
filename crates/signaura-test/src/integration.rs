//! End-to-end Integration Test Suite
//!
//! Runs scripted expressions through the whole pipeline and verifies:
//! - Expected stable labels
//! - Exclusive channel pairs never latch together
//! - Frames without a face never produce a phrase or features
//! - Stable labels require a full run of identical phrases and never repeat
//! - Transcript entries are spaced by more than the configured interval

use signaura_runtime::PipelineConfig;
use signaura_state::Channel;

use crate::scenario::{Scenario, ScenarioOutcome};
use crate::synth::{FaceRig, JitterConfig, PoseRig};

// ============================================================================
// RESULTS
// ============================================================================

/// Result of one scenario check
#[derive(Debug, Clone)]
pub struct ScenarioCheck {
    pub name: String,
    pub passed: bool,
    pub labels: Vec<String>,
    pub violations: Vec<String>,
}

impl ScenarioCheck {
    fn from_outcome(outcome: &ScenarioOutcome, expected: &[&str], config: &PipelineConfig) -> Self {
        let labels: Vec<String> = outcome.label_texts().iter().map(|s| s.to_string()).collect();
        let mut violations = check_invariants(outcome, config);

        if labels != expected {
            violations.push(format!("expected labels {:?}, got {:?}", expected, labels));
        }

        ScenarioCheck {
            name: outcome.name.clone(),
            passed: violations.is_empty(),
            labels,
            violations,
        }
    }
}

// ============================================================================
// INVARIANTS
// ============================================================================

/// Check every pipeline invariant over a scenario outcome
pub fn check_invariants(outcome: &ScenarioOutcome, config: &PipelineConfig) -> Vec<String> {
    let mut violations = Vec::new();
    let exclusive = [
        (Channel::HeadTiltLeft, Channel::HeadTiltRight),
        (Channel::GazingLeft, Channel::GazingRight),
    ];

    for (i, out) in outcome.outputs.iter().enumerate() {
        let channels = &out.classification.channels;
        for (a, b) in exclusive {
            if channels.contains(&a) && channels.contains(&b) {
                violations.push(format!("frame {}: {} and {} both active", i, a.key(), b.key()));
            }
        }

        if !out.has_face() && (!out.phrase().is_empty() || out.smoothed.is_some()) {
            violations.push(format!("frame {}: output without a face", i));
        }

        if let Some(label) = &out.stable_label {
            let run = stable_run_length(outcome, i);
            if run < config.stability_frames as usize {
                violations.push(format!(
                    "frame {}: label {:?} after only {} identical phrases",
                    i, label, run
                ));
            }
        }
    }

    for pair in outcome.labels.windows(2) {
        if pair[0].1 == pair[1].1 {
            violations.push(format!("label {:?} emitted twice in a row", pair[0].1));
        }
    }

    let mut last_change = signaura_core::FrameTime::ZERO;
    for entry in outcome.transcript.entries() {
        if entry.time - last_change <= config.transcript_interval {
            violations.push(format!("transcript entry {:?} too soon", entry.text));
        }
        last_change = entry.time;
    }

    violations
}

/// Identical non-empty phrases ending at frame `end`, skipping faceless frames
fn stable_run_length(outcome: &ScenarioOutcome, end: usize) -> usize {
    let target = outcome.outputs[end].phrase();
    outcome.outputs[..=end]
        .iter()
        .rev()
        .filter(|o| o.has_face())
        .take_while(|o| o.phrase() == target)
        .count()
}

// ============================================================================
// SCENARIOS
// ============================================================================

fn run_check(scenario: Scenario, expected: &[&str]) -> ScenarioCheck {
    let config = PipelineConfig::default();
    match scenario.run_with(config.clone()) {
        Ok(outcome) => ScenarioCheck::from_outcome(&outcome, expected, &config),
        Err(e) => ScenarioCheck {
            name: scenario.name.clone(),
            passed: false,
            labels: Vec::new(),
            violations: vec![format!("scenario failed: {}", e)],
        },
    }
}

/// Surprised face: eyes wide, brows up, mouth closed
pub fn scenario_brows_raised() -> ScenarioCheck {
    run_check(
        Scenario::new("brows raised").hold(FaceRig::brows_raised(), 20),
        &["eyebrows raised (surprise/ask)"],
    )
}

/// Neutral, then a held blink
pub fn scenario_blink() -> ScenarioCheck {
    run_check(
        Scenario::new("blink")
            .hold(FaceRig::neutral(), 10)
            .hold(FaceRig::eyes_closed(), 15),
        &["neutral", "eyes closed/blink"],
    )
}

/// Head swings right, left, right
pub fn scenario_tilt_swing() -> ScenarioCheck {
    run_check(
        Scenario::new("tilt swing")
            .hold(FaceRig::neutral().with_roll(15.0), 20)
            .hold(FaceRig::neutral().with_roll(-15.0), 20)
            .hold(FaceRig::neutral().with_roll(15.0), 20),
        &["head tilted right", "head tilted left", "head tilted right"],
    )
}

/// A two-frame smile inside a neutral stretch is absorbed
pub fn scenario_glitch_absorbed() -> ScenarioCheck {
    run_check(
        Scenario::new("glitch")
            .hold(FaceRig::neutral(), 20)
            .hold(FaceRig::smiling(), 3)
            .hold(FaceRig::neutral(), 20),
        &["neutral"],
    )
}

/// Detector noise and face dropouts over a neutral face
pub fn scenario_noisy_neutral() -> ScenarioCheck {
    run_check(
        Scenario::new("noisy neutral")
            .hold(FaceRig::neutral(), 150)
            .with_jitter(JitterConfig::flaky()),
        &["neutral"],
    )
}

/// Body lean with a visible torso
pub fn scenario_body_lean() -> ScenarioCheck {
    run_check(
        Scenario::new("body lean")
            .hold_with_pose(FaceRig::neutral(), PoseRig::level(), 12)
            .hold_with_pose(FaceRig::neutral(), PoseRig::leaning(0.12), 15),
        &["neutral", "body leaning"],
    )
}

/// Every scenario in the suite
pub fn run_suite() -> Vec<ScenarioCheck> {
    vec![
        scenario_brows_raised(),
        scenario_blink(),
        scenario_tilt_swing(),
        scenario_glitch_absorbed(),
        scenario_noisy_neutral(),
        scenario_body_lean(),
    ]
}
