//! Feature vectors
//!
//! A frame with a face yields exactly nine scale-invariant metrics. The vector
//! is always complete: a frame without a face yields no vector at all rather
//! than a partially populated one.

use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Number of metrics in a feature vector
pub const FEATURE_COUNT: usize = 9;

/// Metric identifier, in dataset column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    EyeRatio,
    BrowRatio,
    MouthOpen,
    Roll,
    Nod,
    TorsoLean,
    BrowAsymmetry,
    SmileMetric,
    GazeMetric,
}

impl Feature {
    /// All metrics in column order
    pub fn all() -> &'static [Feature; FEATURE_COUNT] {
        &[
            Feature::EyeRatio,
            Feature::BrowRatio,
            Feature::MouthOpen,
            Feature::Roll,
            Feature::Nod,
            Feature::TorsoLean,
            Feature::BrowAsymmetry,
            Feature::SmileMetric,
            Feature::GazeMetric,
        ]
    }

    /// Column name used in the dataset header
    pub fn name(self) -> &'static str {
        match self {
            Feature::EyeRatio => "eyeRatio",
            Feature::BrowRatio => "browRatio",
            Feature::MouthOpen => "mouthOpen",
            Feature::Roll => "roll",
            Feature::Nod => "nod",
            Feature::TorsoLean => "torsoLean",
            Feature::BrowAsymmetry => "browAsymmetry",
            Feature::SmileMetric => "smileMetric",
            Feature::GazeMetric => "gazeMetric",
        }
    }

    /// Decimal places when serialized (roll is in degrees)
    pub fn precision(self) -> usize {
        match self {
            Feature::Roll => 2,
            _ => 4,
        }
    }
}

/// Per-frame geometric metrics
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureVector {
    /// Mean lid gap over inter-ocular distance, lower = more closed
    pub eye_ratio: f64,
    /// Eye-center to brow height over inter-ocular distance
    pub brow_ratio: f64,
    /// Lip gap over inter-ocular distance
    pub mouth_open: f64,
    /// Eye-line angle in degrees
    pub roll: f64,
    /// Chin Y minus nose-tip Y, unnormalized
    pub nod: f64,
    /// Shoulder mid Y minus hip mid Y, 0 when pose is unavailable
    pub torso_lean: f64,
    /// Left/right brow-to-lid distance difference over inter-ocular distance
    pub brow_asymmetry: f64,
    /// Mouth width over inter-ocular distance
    pub smile_metric: f64,
    /// Summed horizontal iris offset over inter-ocular distance, negative = left
    pub gaze_metric: f64,
}

impl FeatureVector {
    /// Value of a single metric
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::EyeRatio => self.eye_ratio,
            Feature::BrowRatio => self.brow_ratio,
            Feature::MouthOpen => self.mouth_open,
            Feature::Roll => self.roll,
            Feature::Nod => self.nod,
            Feature::TorsoLean => self.torso_lean,
            Feature::BrowAsymmetry => self.brow_asymmetry,
            Feature::SmileMetric => self.smile_metric,
            Feature::GazeMetric => self.gaze_metric,
        }
    }

    /// Mutable access to a single metric
    pub fn get_mut(&mut self, feature: Feature) -> &mut f64 {
        match feature {
            Feature::EyeRatio => &mut self.eye_ratio,
            Feature::BrowRatio => &mut self.brow_ratio,
            Feature::MouthOpen => &mut self.mouth_open,
            Feature::Roll => &mut self.roll,
            Feature::Nod => &mut self.nod,
            Feature::TorsoLean => &mut self.torso_lean,
            Feature::BrowAsymmetry => &mut self.brow_asymmetry,
            Feature::SmileMetric => &mut self.smile_metric,
            Feature::GazeMetric => &mut self.gaze_metric,
        }
    }

    /// Builder-style override of one metric
    pub fn with(mut self, feature: Feature, value: f64) -> Self {
        *self.get_mut(feature) = value;
        self
    }

    /// Metrics in column order
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        let mut out = [0.0; FEATURE_COUNT];
        for (slot, feature) in out.iter_mut().zip(Feature::all()) {
            *slot = self.get(*feature);
        }
        out
    }

    /// Build from metrics in column order
    pub fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        let mut v = FeatureVector::default();
        for (value, feature) in values.iter().zip(Feature::all()) {
            *v.get_mut(*feature) = *value;
        }
        v
    }

    /// Field-wise arithmetic mean, `None` for an empty input
    pub fn mean<'a, I>(vectors: I) -> Option<FeatureVector>
    where
        I: IntoIterator<Item = &'a FeatureVector>,
    {
        let mut sum = [0.0; FEATURE_COUNT];
        let mut count = 0usize;

        for v in vectors {
            for (acc, value) in sum.iter_mut().zip(v.to_array()) {
                *acc += value;
            }
            count += 1;
        }

        if count == 0 {
            return None;
        }

        let n = count as f64;
        Some(FeatureVector::from_array(sum.map(|s| s / n)))
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

/// Window-averaged feature vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothedFeatureVector {
    /// Averaged metrics
    pub features: FeatureVector,
    /// Number of raw vectors averaged (1..=window capacity)
    pub samples: usize,
}

impl SmoothedFeatureVector {
    pub fn new(features: FeatureVector, samples: usize) -> Self {
        Self { features, samples }
    }
}

impl Deref for SmoothedFeatureVector {
    type Target = FeatureVector;

    fn deref(&self) -> &Self::Target {
        &self.features
    }
}
