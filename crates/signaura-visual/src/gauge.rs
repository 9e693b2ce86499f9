//! Feature gauges - percent readouts for a display panel
//!
//! The display collaborator shows six bars (eye, brow, mouth, roll, nod,
//! torso). Each raw metric is mapped onto 0..=100 with a per-metric scale and
//! flagged "high" above a per-metric level so the panel can highlight it.

use serde::Serialize;
use signaura_core::FeatureVector;

/// Typical full-scale value for eye, brow and mouth ratios
const RATIO_FULL_SCALE: f64 = 0.15;
/// Roll range shown on the bar, degrees either side of level
const ROLL_FULL_SCALE: f64 = 30.0;
/// Typical full-scale nod offset
const NOD_FULL_SCALE: f64 = 0.1;
/// Typical full-scale torso lean
const TORSO_FULL_SCALE: f64 = 0.15;

/// One bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gauge {
    /// Bar fill, 0..=100
    pub percent: f64,
    /// Highlight flag
    pub high: bool,
    /// Caption shown next to the bar
    pub caption: String,
}

impl Gauge {
    fn percent(percent: f64, high_above: f64) -> Self {
        let percent = clamp_percent(percent);
        Self {
            percent,
            high: percent > high_above,
            caption: format!("{}%", percent.round()),
        }
    }
}

/// All six bars for one smoothed vector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureGauges {
    pub eye: Gauge,
    pub brow: Gauge,
    pub mouth: Gauge,
    pub roll: Gauge,
    pub nod: Gauge,
    pub torso: Gauge,
}

impl FeatureGauges {
    pub fn from_features(f: &FeatureVector) -> Self {
        // Roll is centered: level head fills half the bar
        let roll_percent = clamp_percent(50.0 + f.roll / ROLL_FULL_SCALE * 50.0);

        Self {
            eye: Gauge::percent(f.eye_ratio / RATIO_FULL_SCALE * 100.0, 70.0),
            brow: Gauge::percent(f.brow_ratio / RATIO_FULL_SCALE * 100.0, 70.0),
            mouth: Gauge::percent(f.mouth_open / RATIO_FULL_SCALE * 100.0, 50.0),
            roll: Gauge {
                percent: roll_percent,
                high: f.roll.abs() > 15.0,
                caption: format!("{}°", round_degrees(f.roll)),
            },
            nod: Gauge::percent((f.nod / NOD_FULL_SCALE).abs() * 100.0, 40.0),
            torso: Gauge::percent((f.torso_lean / TORSO_FULL_SCALE).abs() * 100.0, 50.0),
        }
    }
}

/// Whole degrees, with `-0` shown as `0`
fn round_degrees(roll: f64) -> f64 {
    let rounded = roll.round();
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signaura_core::Feature;

    #[test]
    fn test_level_head_is_half_bar() {
        let g = FeatureGauges::from_features(&FeatureVector::default());
        assert_eq!(g.roll.percent, 50.0);
        assert!(!g.roll.high);
        assert_eq!(g.roll.caption, "0°");
    }

    #[test]
    fn test_small_negative_roll_caption() {
        for roll in [-0.3, -0.0, 0.4] {
            let g = FeatureGauges::from_features(&FeatureVector::default().with(Feature::Roll, roll));
            assert_eq!(g.roll.caption, "0°");
        }
        let g = FeatureGauges::from_features(&FeatureVector::default().with(Feature::Roll, -12.6));
        assert_eq!(g.roll.caption, "-13°");
    }

    #[test]
    fn test_clamped_and_flagged() {
        let f = FeatureVector::default()
            .with(Feature::EyeRatio, 0.3)
            .with(Feature::BrowRatio, -0.05)
            .with(Feature::Roll, -45.0)
            .with(Feature::Nod, -0.05);
        let g = FeatureGauges::from_features(&f);

        assert_eq!(g.eye.percent, 100.0);
        assert!(g.eye.high);
        assert_eq!(g.brow.percent, 0.0);
        assert_eq!(g.roll.percent, 0.0);
        assert!(g.roll.high);
        assert!((g.nod.percent - 50.0).abs() < 1e-9);
        assert!(g.nod.high);
        assert_eq!(g.nod.caption, "50%");
    }

    #[test]
    fn test_mouth_threshold() {
        let f = FeatureVector::default().with(Feature::MouthOpen, 0.06);
        let g = FeatureGauges::from_features(&f);
        assert!((g.mouth.percent - 40.0).abs() < 1e-9);
        assert!(!g.mouth.high);
    }
}
