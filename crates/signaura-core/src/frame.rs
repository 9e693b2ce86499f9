//! Landmark frames
//!
//! One frame is what the external detectors report for a single camera image:
//! an optional face mesh and an optional pose skeleton. Either may be missing.

use crate::{FaceMesh, FrameTime, Point2, PoseSkeleton, SignauraResult};

/// One frame of detector output
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LandmarkFrame {
    /// Capture time
    pub timestamp: FrameTime,
    /// Face mesh, `None` when no face was detected
    pub face: Option<FaceMesh>,
    /// Pose skeleton, `None` when no body was detected
    pub pose: Option<PoseSkeleton>,
}

impl LandmarkFrame {
    /// Frame with no detections
    pub fn empty(timestamp: FrameTime) -> Self {
        Self {
            timestamp,
            face: None,
            pose: None,
        }
    }

    /// Ingest raw detector arrays
    ///
    /// Empty arrays are treated as "not detected". A non-empty face array is
    /// validated and rejected if it lacks a required landmark.
    pub fn from_raw(
        timestamp: FrameTime,
        face: Option<Vec<Point2>>,
        pose: Option<Vec<Point2>>,
    ) -> SignauraResult<Self> {
        let face = match face {
            Some(points) => FaceMesh::from_points(points)?,
            None => None,
        };
        let pose = pose.and_then(PoseSkeleton::from_points);

        Ok(Self {
            timestamp,
            face,
            pose,
        })
    }

    /// Set face mesh
    pub fn with_face(mut self, face: FaceMesh) -> Self {
        self.face = Some(face);
        self
    }

    /// Set pose skeleton
    pub fn with_pose(mut self, pose: PoseSkeleton) -> Self {
        self.pose = Some(pose);
        self
    }

    pub fn has_face(&self) -> bool {
        self.face.is_some()
    }

    pub fn has_pose(&self) -> bool {
        self.pose.is_some()
    }
}
