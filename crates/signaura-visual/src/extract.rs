//! Feature extraction - one landmark frame in, one feature vector out

use signaura_core::{FaceMesh, FeatureVector, LandmarkFrame, PoseSkeleton};

use crate::{torso_lean, FaceGeometry};

/// Compute the nine metrics for a face and optional pose
///
/// Returns `None` when there is no face: nothing is meaningful without one.
/// Pure and deterministic.
pub fn extract(face: Option<&FaceMesh>, pose: Option<&PoseSkeleton>) -> Option<FeatureVector> {
    let face = face.filter(|f| !f.is_empty())?;
    let g = FaceGeometry::new(face);

    Some(FeatureVector {
        eye_ratio: g.eye_ratio(),
        brow_ratio: g.brow_ratio(),
        mouth_open: g.mouth_open(),
        roll: g.roll(),
        nod: g.nod(),
        torso_lean: torso_lean(pose),
        brow_asymmetry: g.brow_asymmetry(),
        smile_metric: g.smile_metric(),
        gaze_metric: g.gaze_metric(),
    })
}

/// [`extract`] applied to a whole frame
pub fn extract_frame(frame: &LandmarkFrame) -> Option<FeatureVector> {
    extract(frame.face.as_ref(), frame.pose.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use signaura_core::{FaceLandmark, FrameTime, Point2};

    fn face_points() -> Vec<Point2> {
        let mut p = vec![Point2::new(0.5, 0.5); 468];
        p[FaceLandmark::LeftEyeOuter.mesh_index()] = Point2::new(0.4, 0.4);
        p[FaceLandmark::RightEyeOuter.mesh_index()] = Point2::new(0.6, 0.4);
        p
    }

    #[test]
    fn test_no_face_no_features() {
        let frame = LandmarkFrame::empty(FrameTime::ZERO);
        assert!(extract_frame(&frame).is_none());
        assert!(extract(None, None).is_none());
    }

    #[test]
    fn test_pose_only_frame() {
        let frame =
            LandmarkFrame::from_raw(FrameTime::ZERO, None, Some(vec![Point2::new(0.5, 0.5); 33]))
                .unwrap();
        assert!(extract_frame(&frame).is_none());
    }

    #[test]
    fn test_face_without_pose_is_neutral_lean() {
        let frame = LandmarkFrame::from_raw(FrameTime::ZERO, Some(face_points()), None).unwrap();
        let v = extract_frame(&frame).unwrap();
        assert_eq!(v.torso_lean, 0.0);
        assert!(v.is_finite());
    }

    #[test]
    fn test_deterministic() {
        let frame = LandmarkFrame::from_raw(FrameTime::ZERO, Some(face_points()), None).unwrap();
        assert_eq!(extract_frame(&frame), extract_frame(&frame));
    }
}
