//! Typed landmarks
//!
//! The external detector delivers landmarks as index-addressed point arrays
//! (MediaPipe face mesh and pose layouts). The pipeline never indexes those
//! arrays directly: the points it needs are named here, and a face mesh is
//! validated once at ingestion so feature extraction cannot hit a hole.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{SignauraError, SignauraResult};

/// Normalized 2D image point, `y` grows downward
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    #[inline]
    pub fn distance(&self, other: &Point2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Midpoint between two points
    #[inline]
    pub fn midpoint(&self, other: &Point2) -> Point2 {
        Point2 {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Which detector a landmark belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandmarkSet {
    Face,
    Pose,
}

impl fmt::Display for LandmarkSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LandmarkSet::Face => write!(f, "face"),
            LandmarkSet::Pose => write!(f, "pose"),
        }
    }
}

/// Face mesh landmarks required by feature extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceLandmark {
    LeftEyeOuter,
    RightEyeOuter,
    LeftUpperLid,
    LeftLowerLid,
    RightUpperLid,
    RightLowerLid,
    LeftBrow,
    RightBrow,
    NoseTip,
    Chin,
    UpperLip,
    LowerLip,
    MouthCornerLeft,
    MouthCornerRight,
}

impl FaceLandmark {
    pub const COUNT: usize = 14;

    /// All required landmarks, in anchor order
    pub fn all() -> &'static [FaceLandmark; FaceLandmark::COUNT] {
        &[
            FaceLandmark::LeftEyeOuter,
            FaceLandmark::RightEyeOuter,
            FaceLandmark::LeftUpperLid,
            FaceLandmark::LeftLowerLid,
            FaceLandmark::RightUpperLid,
            FaceLandmark::RightLowerLid,
            FaceLandmark::LeftBrow,
            FaceLandmark::RightBrow,
            FaceLandmark::NoseTip,
            FaceLandmark::Chin,
            FaceLandmark::UpperLip,
            FaceLandmark::LowerLip,
            FaceLandmark::MouthCornerLeft,
            FaceLandmark::MouthCornerRight,
        ]
    }

    /// Index in the face mesh point array
    pub fn mesh_index(self) -> usize {
        match self {
            FaceLandmark::LeftEyeOuter => 33,
            FaceLandmark::RightEyeOuter => 263,
            FaceLandmark::LeftUpperLid => 105,
            FaceLandmark::LeftLowerLid => 159,
            FaceLandmark::RightUpperLid => 386,
            FaceLandmark::RightLowerLid => 145,
            FaceLandmark::LeftBrow => 70,
            FaceLandmark::RightBrow => 300,
            FaceLandmark::NoseTip => 1,
            FaceLandmark::Chin => 152,
            FaceLandmark::UpperLip => 13,
            FaceLandmark::LowerLip => 14,
            FaceLandmark::MouthCornerLeft => 61,
            FaceLandmark::MouthCornerRight => 291,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FaceLandmark::LeftEyeOuter => "left eye outer",
            FaceLandmark::RightEyeOuter => "right eye outer",
            FaceLandmark::LeftUpperLid => "left upper lid",
            FaceLandmark::LeftLowerLid => "left lower lid",
            FaceLandmark::RightUpperLid => "right upper lid",
            FaceLandmark::RightLowerLid => "right lower lid",
            FaceLandmark::LeftBrow => "left brow",
            FaceLandmark::RightBrow => "right brow",
            FaceLandmark::NoseTip => "nose tip",
            FaceLandmark::Chin => "chin",
            FaceLandmark::UpperLip => "upper lip",
            FaceLandmark::LowerLip => "lower lip",
            FaceLandmark::MouthCornerLeft => "mouth corner left",
            FaceLandmark::MouthCornerRight => "mouth corner right",
        }
    }

    /// Smallest mesh length that covers every required landmark
    pub fn min_mesh_len() -> usize {
        Self::all()
            .iter()
            .map(|lm| lm.mesh_index() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Iris centers, only present when the detector runs iris refinement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IrisLandmark {
    Left,
    Right,
}

impl IrisLandmark {
    pub fn mesh_index(self) -> usize {
        match self {
            IrisLandmark::Left => 468,
            IrisLandmark::Right => 473,
        }
    }
}

/// Pose landmarks used for torso lean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoseLandmark {
    LeftShoulder,
    RightShoulder,
    LeftHip,
    RightHip,
}

impl PoseLandmark {
    pub fn pose_index(self) -> usize {
        match self {
            PoseLandmark::LeftShoulder => 11,
            PoseLandmark::RightShoulder => 12,
            PoseLandmark::LeftHip => 23,
            PoseLandmark::RightHip => 24,
        }
    }
}

/// A validated face mesh
///
/// Construction guarantees every [`FaceLandmark`] is present and finite, so
/// lookups through [`FaceMesh::point`] are infallible.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceMesh {
    points: Vec<Point2>,
    anchors: [Point2; FaceLandmark::COUNT],
    left_iris: Option<Point2>,
    right_iris: Option<Point2>,
}

impl FaceMesh {
    /// Validate a raw face mesh
    ///
    /// Returns `Ok(None)` for an empty mesh (no detection).
    pub fn from_points(points: Vec<Point2>) -> SignauraResult<Option<Self>> {
        if points.is_empty() {
            return Ok(None);
        }

        if let Some((index, p)) = points.iter().enumerate().find(|(_, p)| !p.is_finite()) {
            return Err(SignauraError::InvalidCoordinate {
                set: LandmarkSet::Face,
                index,
                x: p.x,
                y: p.y,
            });
        }

        let mut anchors = [Point2::default(); FaceLandmark::COUNT];
        for (slot, lm) in anchors.iter_mut().zip(FaceLandmark::all()) {
            *slot = *points
                .get(lm.mesh_index())
                .ok_or_else(|| SignauraError::MissingLandmark {
                    set: LandmarkSet::Face,
                    name: lm.name(),
                    index: lm.mesh_index(),
                    available: points.len(),
                })?;
        }

        let left_iris = points.get(IrisLandmark::Left.mesh_index()).copied();
        let right_iris = points.get(IrisLandmark::Right.mesh_index()).copied();

        Ok(Some(Self {
            points,
            anchors,
            left_iris,
            right_iris,
        }))
    }

    /// Position of a required landmark
    #[inline]
    pub fn point(&self, landmark: FaceLandmark) -> Point2 {
        self.anchors[landmark as usize]
    }

    /// Iris center, if iris refinement was enabled
    #[inline]
    pub fn iris(&self, iris: IrisLandmark) -> Option<Point2> {
        match iris {
            IrisLandmark::Left => self.left_iris,
            IrisLandmark::Right => self.right_iris,
        }
    }

    pub fn has_iris(&self) -> bool {
        self.left_iris.is_some() && self.right_iris.is_some()
    }

    /// All raw points
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Body pose landmarks
///
/// Pose is optional context; a missing point is reported as `None` and never
/// fails ingestion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PoseSkeleton {
    points: Vec<Point2>,
}

impl PoseSkeleton {
    /// Wrap raw pose points, `None` for an empty set
    pub fn from_points(points: Vec<Point2>) -> Option<Self> {
        if points.is_empty() {
            None
        } else {
            Some(Self { points })
        }
    }

    /// Position of a pose landmark, `None` when absent or non-finite
    pub fn point(&self, landmark: PoseLandmark) -> Option<Point2> {
        self.points
            .get(landmark.pose_index())
            .copied()
            .filter(Point2::is_finite)
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh_of(len: usize) -> Vec<Point2> {
        (0..len)
            .map(|i| Point2::new(i as f64 / len as f64, 0.5))
            .collect()
    }

    #[test]
    fn test_anchor_order_matches_discriminants() {
        for (i, lm) in FaceLandmark::all().iter().enumerate() {
            assert_eq!(*lm as usize, i);
        }
    }

    #[test]
    fn test_min_mesh_len() {
        assert_eq!(FaceLandmark::min_mesh_len(), 387);
    }

    #[test]
    fn test_face_mesh_empty_is_no_detection() {
        assert!(FaceMesh::from_points(Vec::new()).unwrap().is_none());
    }

    #[test]
    fn test_face_mesh_missing_landmark() {
        let err = FaceMesh::from_points(mesh_of(200)).unwrap_err();
        match err {
            SignauraError::MissingLandmark {
                set,
                index,
                available,
                ..
            } => {
                assert_eq!(set, LandmarkSet::Face);
                assert_eq!(index, 263);
                assert_eq!(available, 200);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_face_mesh_rejects_nan() {
        let mut points = mesh_of(468);
        points[10] = Point2::new(f64::NAN, 0.1);
        assert!(matches!(
            FaceMesh::from_points(points),
            Err(SignauraError::InvalidCoordinate { index: 10, .. })
        ));
    }

    #[test]
    fn test_face_mesh_lookup_and_iris() {
        let points = mesh_of(468);
        let chin = points[152];
        let mesh = FaceMesh::from_points(points).unwrap().unwrap();
        assert_eq!(mesh.point(FaceLandmark::Chin), chin);
        assert!(!mesh.has_iris());
        assert!(mesh.iris(IrisLandmark::Left).is_none());

        let refined = FaceMesh::from_points(mesh_of(478)).unwrap().unwrap();
        assert!(refined.has_iris());
    }

    #[test]
    fn test_pose_skeleton_partial() {
        assert!(PoseSkeleton::from_points(Vec::new()).is_none());

        let pose = PoseSkeleton::from_points(mesh_of(13)).unwrap();
        assert!(pose.point(PoseLandmark::LeftShoulder).is_some());
        assert!(pose.point(PoseLandmark::LeftHip).is_none());
    }

    #[test]
    fn test_point_distance() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(0.3, 0.4);
        assert!((a.distance(&b) - 0.5).abs() < 1e-12);
        assert_eq!(a.midpoint(&b), Point2::new(0.15, 0.2));
    }
}
