//! Frame assembly from independent detectors
//!
//! Face and pose detectors report on their own schedules. The assembler
//! keeps the latest result from each and builds a full `LandmarkFrame`
//! whenever either one reports, so a pose update reuses the last face and
//! vice versa. A detector reporting "nothing found" clears its half.

use signaura_core::{FaceMesh, FrameTime, LandmarkFrame, Point2, PoseSkeleton, SignauraResult};

/// Last-known face and pose
#[derive(Debug, Clone, Default)]
pub struct FrameAssembler {
    face: Option<FaceMesh>,
    pose: Option<PoseSkeleton>,
}

impl FrameAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Face detector result
    ///
    /// An invalid mesh is rejected and the previous face is kept.
    pub fn update_face(
        &mut self,
        timestamp: FrameTime,
        points: Option<Vec<Point2>>,
    ) -> SignauraResult<LandmarkFrame> {
        self.face = match points {
            Some(points) => FaceMesh::from_points(points)?,
            None => None,
        };
        Ok(self.frame(timestamp))
    }

    /// Pose detector result
    pub fn update_pose(&mut self, timestamp: FrameTime, points: Option<Vec<Point2>>) -> LandmarkFrame {
        self.pose = points.and_then(PoseSkeleton::from_points);
        self.frame(timestamp)
    }

    /// Frame from the last-known face and pose
    pub fn frame(&self, timestamp: FrameTime) -> LandmarkFrame {
        LandmarkFrame {
            timestamp,
            face: self.face.clone(),
            pose: self.pose.clone(),
        }
    }

    pub fn clear(&mut self) {
        self.face = None;
        self.pose = None;
    }
}
