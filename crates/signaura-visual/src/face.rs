//! Face geometry - expression metrics from a face mesh
//!
//! Every distance is divided by the inter-ocular distance (outer eye corner
//! to outer eye corner) so the metrics do not depend on how close the person
//! sits to the camera. Head roll is an angle and head nod is left raw.

use signaura_core::{FaceLandmark, FaceMesh, IrisLandmark, Point2};

/// Added to the inter-ocular distance so coincident eye corners cannot divide by zero
pub const INTER_OCULAR_EPSILON: f64 = 1e-6;

/// Metric view over one validated face mesh
#[derive(Debug, Clone, Copy)]
pub struct FaceGeometry<'a> {
    mesh: &'a FaceMesh,
    inter_ocular: f64,
}

impl<'a> FaceGeometry<'a> {
    pub fn new(mesh: &'a FaceMesh) -> Self {
        let inter_ocular = mesh
            .point(FaceLandmark::LeftEyeOuter)
            .distance(&mesh.point(FaceLandmark::RightEyeOuter))
            + INTER_OCULAR_EPSILON;
        Self { mesh, inter_ocular }
    }

    #[inline]
    fn p(&self, landmark: FaceLandmark) -> Point2 {
        self.mesh.point(landmark)
    }

    /// Normalization denominator, always > 0
    pub fn inter_ocular(&self) -> f64 {
        self.inter_ocular
    }

    /// Mean upper-to-lower lid distance, normalized
    pub fn eye_ratio(&self) -> f64 {
        let left = self
            .p(FaceLandmark::LeftUpperLid)
            .distance(&self.p(FaceLandmark::LeftLowerLid));
        let right = self
            .p(FaceLandmark::RightUpperLid)
            .distance(&self.p(FaceLandmark::RightLowerLid));
        (left + right) / 2.0 / self.inter_ocular
    }

    /// Mean height of each brow above its eye center, normalized
    ///
    /// Positive when the brow sits above the eye (image `y` grows downward).
    pub fn brow_ratio(&self) -> f64 {
        let left_eye_y =
            (self.p(FaceLandmark::LeftUpperLid).y + self.p(FaceLandmark::LeftLowerLid).y) / 2.0;
        let right_eye_y =
            (self.p(FaceLandmark::RightUpperLid).y + self.p(FaceLandmark::RightLowerLid).y) / 2.0;

        let left = left_eye_y - self.p(FaceLandmark::LeftBrow).y;
        let right = right_eye_y - self.p(FaceLandmark::RightBrow).y;
        (left + right) / 2.0 / self.inter_ocular
    }

    /// Lip gap, normalized
    pub fn mouth_open(&self) -> f64 {
        self.p(FaceLandmark::UpperLip)
            .distance(&self.p(FaceLandmark::LowerLip))
            / self.inter_ocular
    }

    /// Angle of the left-to-right eye-corner line, in degrees
    pub fn roll(&self) -> f64 {
        let left = self.p(FaceLandmark::LeftEyeOuter);
        let right = self.p(FaceLandmark::RightEyeOuter);
        (right.y - left.y).atan2(right.x - left.x).to_degrees()
    }

    /// Chin Y minus nose-tip Y, positive when the chin drops below the nose
    pub fn nod(&self) -> f64 {
        self.p(FaceLandmark::Chin).y - self.p(FaceLandmark::NoseTip).y
    }

    /// Difference between left and right brow-to-lid distances, normalized
    pub fn brow_asymmetry(&self) -> f64 {
        let left = self
            .p(FaceLandmark::LeftBrow)
            .distance(&self.p(FaceLandmark::LeftUpperLid));
        let right = self
            .p(FaceLandmark::RightBrow)
            .distance(&self.p(FaceLandmark::RightUpperLid));
        (left - right).abs() / self.inter_ocular
    }

    /// Mouth corner to mouth corner, normalized
    pub fn smile_metric(&self) -> f64 {
        self.p(FaceLandmark::MouthCornerLeft)
            .distance(&self.p(FaceLandmark::MouthCornerRight))
            / self.inter_ocular
    }

    /// Summed horizontal iris offsets from the outer eye corners, normalized
    ///
    /// Without iris refinement each iris falls back to its eye corner, which
    /// contributes zero offset.
    pub fn gaze_metric(&self) -> f64 {
        let left_eye = self.p(FaceLandmark::LeftEyeOuter);
        let right_eye = self.p(FaceLandmark::RightEyeOuter);
        let left_iris = self.mesh.iris(IrisLandmark::Left).unwrap_or(left_eye);
        let right_iris = self.mesh.iris(IrisLandmark::Right).unwrap_or(right_eye);

        ((left_iris.x - left_eye.x) + (right_iris.x - right_eye.x)) / self.inter_ocular
    }
}
