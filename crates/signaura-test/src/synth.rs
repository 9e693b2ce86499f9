//! Synthetic landmark rigs
//!
//! Builds face meshes and pose skeletons from expression parameters instead
//! of camera frames. Parameters are expressed in the same units as the
//! extracted metrics, so a rig with `brow_raise: 0.15` extracts a brow ratio
//! of (almost exactly) 0.15 when the head is level:
//! - Distances are laid out in inter-ocular units around the eye-line center
//! - Roll rotates the whole face around that center
//! - Jitter adds seeded uniform noise and random face dropouts

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use signaura_core::{FaceLandmark, IrisLandmark, Point2, PoseLandmark};

/// Face mesh length without iris refinement
pub const FACE_MESH_LEN: usize = 468;
/// Face mesh length with iris refinement
pub const FACE_MESH_IRIS_LEN: usize = 478;
/// Pose skeleton length
pub const POSE_LEN: usize = 33;

/// Expression parameters for one synthetic face
#[derive(Clone, Debug, PartialEq)]
pub struct FaceRig {
    /// Eye-line center in image coordinates
    pub center: Point2,
    /// Outer eye corner distance
    pub inter_ocular: f64,
    /// Lid gap (eye ratio)
    pub eye_open: f64,
    /// Brow height above the eye center (brow ratio)
    pub brow_raise: f64,
    /// Lip gap (mouth ratio)
    pub mouth_open: f64,
    /// Head roll in degrees
    pub roll_deg: f64,
    /// Chin minus nose-tip height, image units
    pub nod: f64,
    /// Left minus right brow height (brow asymmetry)
    pub brow_asymmetry: f64,
    /// Mouth corner distance (smile metric)
    pub mouth_width: f64,
    /// Horizontal iris shift (gaze metric), needs `iris`
    pub gaze: f64,
    /// Emit iris refinement points
    pub iris: bool,
}

impl Default for FaceRig {
    fn default() -> Self {
        Self::neutral()
    }
}

impl FaceRig {
    /// Relaxed face: every channel OFF
    pub fn neutral() -> Self {
        FaceRig {
            center: Point2::new(0.5, 0.4),
            inter_ocular: 0.2,
            eye_open: 0.06,
            brow_raise: 0.06,
            mouth_open: 0.01,
            roll_deg: 0.0,
            nod: 0.005,
            brow_asymmetry: 0.0,
            mouth_width: 0.24,
            gaze: 0.0,
            iris: true,
        }
    }

    /// Eyes wide, brows raised, mouth closed, level head
    pub fn brows_raised() -> Self {
        FaceRig {
            eye_open: 0.08,
            brow_raise: 0.15,
            ..Self::neutral()
        }
    }

    pub fn eyes_closed() -> Self {
        FaceRig {
            eye_open: 0.005,
            ..Self::neutral()
        }
    }

    pub fn smiling() -> Self {
        FaceRig {
            mouth_width: 0.36,
            ..Self::neutral()
        }
    }

    pub fn mouth_open() -> Self {
        FaceRig {
            mouth_open: 0.15,
            ..Self::neutral()
        }
    }

    pub fn with_roll(mut self, degrees: f64) -> Self {
        self.roll_deg = degrees;
        self
    }

    pub fn with_gaze(mut self, gaze: f64) -> Self {
        self.gaze = gaze;
        self
    }

    pub fn with_nod(mut self, nod: f64) -> Self {
        self.nod = nod;
        self
    }

    pub fn with_brow_asymmetry(mut self, asymmetry: f64) -> Self {
        self.brow_asymmetry = asymmetry;
        self
    }

    pub fn with_eye_open(mut self, eye_open: f64) -> Self {
        self.eye_open = eye_open;
        self
    }

    pub fn without_iris(mut self) -> Self {
        self.iris = false;
        self
    }

    /// Map a point from face units (inter-ocular, y down) to image coordinates
    fn place(&self, x: f64, y: f64) -> Point2 {
        let (sin, cos) = self.roll_deg.to_radians().sin_cos();
        let s = self.inter_ocular;
        Point2::new(
            self.center.x + (x * cos - y * sin) * s,
            self.center.y + (x * sin + y * cos) * s,
        )
    }

    /// Full face mesh
    pub fn mesh(&self) -> Vec<Point2> {
        let len = if self.iris { FACE_MESH_IRIS_LEN } else { FACE_MESH_LEN };
        let mut points = vec![self.place(0.0, 0.3); len];

        let half_eye = self.eye_open / 2.0;
        let half_asym = self.brow_asymmetry / 2.0;
        let half_mouth = self.mouth_width / 2.0;
        let nod = self.nod / self.inter_ocular;

        let layout = [
            (FaceLandmark::LeftEyeOuter, -0.5, 0.0),
            (FaceLandmark::RightEyeOuter, 0.5, 0.0),
            (FaceLandmark::LeftUpperLid, -0.3, -half_eye),
            (FaceLandmark::LeftLowerLid, -0.3, half_eye),
            (FaceLandmark::RightUpperLid, 0.3, -half_eye),
            (FaceLandmark::RightLowerLid, 0.3, half_eye),
            (FaceLandmark::LeftBrow, -0.3, -(self.brow_raise + half_asym)),
            (FaceLandmark::RightBrow, 0.3, -(self.brow_raise - half_asym)),
            (FaceLandmark::NoseTip, 0.0, 0.5),
            (FaceLandmark::Chin, 0.0, 0.5 + nod),
            (FaceLandmark::UpperLip, 0.0, 0.8),
            (FaceLandmark::LowerLip, 0.0, 0.8 + self.mouth_open),
            (FaceLandmark::MouthCornerLeft, -half_mouth, 0.8),
            (FaceLandmark::MouthCornerRight, half_mouth, 0.8),
        ];
        for (landmark, x, y) in layout {
            points[landmark.mesh_index()] = self.place(x, y);
        }

        if self.iris {
            let shift = self.gaze / 2.0;
            points[IrisLandmark::Left.mesh_index()] = self.place(-0.3 + shift, 0.0);
            points[IrisLandmark::Right.mesh_index()] = self.place(0.3 + shift, 0.0);
        }

        points
    }
}

/// Shoulder/hip layout for one synthetic body
#[derive(Clone, Debug, PartialEq)]
pub struct PoseRig {
    /// Shoulder line height
    pub shoulder_y: f64,
    /// Shoulder midpoint minus hip midpoint height (torso lean)
    pub lean: f64,
    /// Emit hip points
    pub hips_visible: bool,
}

impl Default for PoseRig {
    fn default() -> Self {
        Self::level()
    }
}

impl PoseRig {
    /// Shoulders and hips at the same height: zero lean
    pub fn level() -> Self {
        PoseRig {
            shoulder_y: 0.7,
            lean: 0.0,
            hips_visible: true,
        }
    }

    pub fn leaning(lean: f64) -> Self {
        PoseRig {
            lean,
            ..Self::level()
        }
    }

    /// Hips out of frame
    pub fn shoulders_only() -> Self {
        PoseRig {
            hips_visible: false,
            ..Self::level()
        }
    }

    pub fn skeleton(&self) -> Vec<Point2> {
        let len = if self.hips_visible {
            POSE_LEN
        } else {
            PoseLandmark::LeftHip.pose_index()
        };
        let mut points = vec![Point2::new(0.5, self.shoulder_y); len];

        points[PoseLandmark::LeftShoulder.pose_index()] = Point2::new(0.4, self.shoulder_y);
        points[PoseLandmark::RightShoulder.pose_index()] = Point2::new(0.6, self.shoulder_y);
        if self.hips_visible {
            let hip_y = self.shoulder_y - self.lean;
            points[PoseLandmark::LeftHip.pose_index()] = Point2::new(0.45, hip_y);
            points[PoseLandmark::RightHip.pose_index()] = Point2::new(0.55, hip_y);
        }
        points
    }
}

/// Detector noise model
#[derive(Clone, Debug)]
pub struct JitterConfig {
    /// Max absolute per-coordinate offset, image units
    pub amplitude: f64,
    /// Probability that a frame reports no face
    pub face_dropout: f64,
    pub seed: u64,
}

impl Default for JitterConfig {
    fn default() -> Self {
        JitterConfig {
            amplitude: 0.0005,
            face_dropout: 0.0,
            seed: 42,
        }
    }
}

impl JitterConfig {
    /// Jitter only
    pub fn mild() -> Self {
        Self::default()
    }

    /// Jitter plus frequent face dropouts
    pub fn flaky() -> Self {
        JitterConfig {
            amplitude: 0.0005,
            face_dropout: 0.1,
            seed: 7,
        }
    }
}

/// Seeded noise source
pub struct LandmarkJitter {
    config: JitterConfig,
    rng: StdRng,
}

impl LandmarkJitter {
    pub fn new(config: JitterConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    /// Perturb every point in place
    pub fn perturb(&mut self, points: &mut [Point2]) {
        if self.config.amplitude <= 0.0 {
            return;
        }
        let dist = Uniform::new_inclusive(-self.config.amplitude, self.config.amplitude);
        for p in points.iter_mut() {
            p.x += dist.sample(&mut self.rng);
            p.y += dist.sample(&mut self.rng);
        }
    }

    /// Decide whether this frame loses the face
    pub fn drop_face(&mut self) -> bool {
        self.config.face_dropout > 0.0 && self.rng.gen_bool(self.config.face_dropout.min(1.0))
    }
}
