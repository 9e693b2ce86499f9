//! Pose geometry - torso lean from body landmarks
//!
//! The body detector is optional context. When the shoulders or hips are not
//! visible the lean is reported as neutral (0) instead of failing.

use signaura_core::{PoseLandmark, PoseSkeleton};

/// Shoulder mid Y minus hip mid Y, or 0 when unavailable
pub fn torso_lean(pose: Option<&PoseSkeleton>) -> f64 {
    let Some(pose) = pose else {
        return 0.0;
    };

    let shoulders = pose
        .point(PoseLandmark::LeftShoulder)
        .zip(pose.point(PoseLandmark::RightShoulder));
    let hips = pose
        .point(PoseLandmark::LeftHip)
        .zip(pose.point(PoseLandmark::RightHip));

    match (shoulders, hips) {
        (Some((ls, rs)), Some((lh, rh))) => ls.midpoint(&rs).y - lh.midpoint(&rh).y,
        _ => 0.0,
    }
}
