//! Hysteresis latch - a boolean with separate activate and release thresholds
//!
//! A single threshold flickers when a noisy metric hovers around it. The latch
//! activates past the ON threshold and only releases past a less extreme OFF
//! threshold; anything between the two keeps the current state.

use serde::{Deserialize, Serialize};

/// Which way the metric must move to activate the latch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// ON when the metric rises above `on`, OFF when it falls below `off`
    Above,
    /// ON when the metric falls below `on`, OFF when it rises above `off`
    Below,
}

/// ON/OFF threshold pair, as written in configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub on: f64,
    pub off: f64,
}

impl Thresholds {
    pub const fn new(on: f64, off: f64) -> Self {
        Self { on, off }
    }
}

/// Dual-threshold latch rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HysteresisLatch {
    pub direction: Direction,
    pub on: f64,
    pub off: f64,
}

impl HysteresisLatch {
    pub const fn above(on: f64, off: f64) -> Self {
        Self {
            direction: Direction::Above,
            on,
            off,
        }
    }

    pub const fn below(on: f64, off: f64) -> Self {
        Self {
            direction: Direction::Below,
            on,
            off,
        }
    }

    pub fn with_thresholds(direction: Direction, thresholds: Thresholds) -> Self {
        Self {
            direction,
            on: thresholds.on,
            off: thresholds.off,
        }
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds::new(self.on, self.off)
    }

    /// Metric is past the ON threshold (strict)
    #[inline]
    pub fn should_activate(&self, value: f64) -> bool {
        match self.direction {
            Direction::Above => value > self.on,
            Direction::Below => value < self.on,
        }
    }

    /// Metric is past the OFF threshold (strict)
    #[inline]
    pub fn should_release(&self, value: f64) -> bool {
        match self.direction {
            Direction::Above => value < self.off,
            Direction::Below => value > self.off,
        }
    }

    /// Next latch state given the current one
    ///
    /// A NaN metric compares false both ways and leaves the state unchanged.
    #[inline]
    pub fn step(&self, active: bool, value: f64) -> bool {
        if !active && self.should_activate(value) {
            true
        } else if active && self.should_release(value) {
            false
        } else {
            active
        }
    }

    /// Check that both thresholds are finite and OFF is not beyond ON
    pub fn validate(&self) -> Result<(), String> {
        if !self.on.is_finite() || !self.off.is_finite() {
            return Err(format!("thresholds must be finite (on {}, off {})", self.on, self.off));
        }
        let ordered = match self.direction {
            Direction::Above => self.off <= self.on,
            Direction::Below => self.off >= self.on,
        };
        if ordered {
            Ok(())
        } else {
            Err(format!(
                "off threshold {} is more extreme than on threshold {} for {:?} latch",
                self.off, self.on, self.direction
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_latch_holds_between_thresholds() {
        let latch = HysteresisLatch::below(0.02, 0.03);
        let mut active = false;

        active = latch.step(active, 0.01);
        assert!(active);
        active = latch.step(active, 0.025);
        assert!(active);
        active = latch.step(active, 0.01);
        assert!(active);
        active = latch.step(active, 0.031);
        assert!(!active);
        active = latch.step(active, 0.025);
        assert!(!active);
    }

    #[test]
    fn test_above_latch_strict_comparisons() {
        let latch = HysteresisLatch::above(0.08, 0.06);
        assert!(!latch.step(false, 0.08));
        assert!(latch.step(false, 0.0801));
        assert!(latch.step(true, 0.06));
        assert!(!latch.step(true, 0.0599));
    }

    #[test]
    fn test_nan_keeps_state() {
        let latch = HysteresisLatch::above(1.0, 0.5);
        assert!(latch.step(true, f64::NAN));
        assert!(!latch.step(false, f64::NAN));
    }

    #[test]
    fn test_validate() {
        assert!(HysteresisLatch::above(10.0, 8.0).validate().is_ok());
        assert!(HysteresisLatch::below(-10.0, -8.0).validate().is_ok());
        assert!(HysteresisLatch::above(0.1, 0.1).validate().is_ok());
        assert!(HysteresisLatch::above(0.1, 0.2).validate().is_err());
        assert!(HysteresisLatch::below(-0.02, -0.03).validate().is_err());
        assert!(HysteresisLatch::above(f64::INFINITY, 0.0).validate().is_err());
    }
}
