//! Channels - the semantic labels the classifier can latch
//!
//! Channels are listed in output order. Head tilt and gaze come in mutually
//! exclusive pairs.

use serde::{Deserialize, Serialize};
use signaura_core::FeatureVector;

use crate::{Direction, HysteresisLatch, Thresholds};

/// Number of channels
pub const CHANNEL_COUNT: usize = 11;

/// A monitored expression/pose state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    EyesClosed,
    MouthOpen,
    BrowsRaised,
    HeadTiltRight,
    HeadTiltLeft,
    HeadNod,
    BodyLean,
    BrowFurrow,
    Smiling,
    GazingLeft,
    GazingRight,
}

impl Channel {
    /// All channels in output order
    pub fn all() -> &'static [Channel; CHANNEL_COUNT] {
        &[
            Channel::EyesClosed,
            Channel::MouthOpen,
            Channel::BrowsRaised,
            Channel::HeadTiltRight,
            Channel::HeadTiltLeft,
            Channel::HeadNod,
            Channel::BodyLean,
            Channel::BrowFurrow,
            Channel::Smiling,
            Channel::GazingLeft,
            Channel::GazingRight,
        ]
    }

    /// Stable identifier (config keys, JSON output)
    pub fn key(self) -> &'static str {
        match self {
            Channel::EyesClosed => "eyesClosed",
            Channel::MouthOpen => "mouthOpen",
            Channel::BrowsRaised => "browsRaised",
            Channel::HeadTiltRight => "headTiltRight",
            Channel::HeadTiltLeft => "headTiltLeft",
            Channel::HeadNod => "headNod",
            Channel::BodyLean => "bodyLean",
            Channel::BrowFurrow => "browFurrow",
            Channel::Smiling => "smiling",
            Channel::GazingLeft => "gazingLeft",
            Channel::GazingRight => "gazingRight",
        }
    }

    /// Human-readable phrase shown when the channel is ON
    pub fn phrase(self) -> &'static str {
        match self {
            Channel::EyesClosed => "eyes closed/blink",
            Channel::MouthOpen => "mouth open (maybe surprise/talking)",
            Channel::BrowsRaised => "eyebrows raised (surprise/ask)",
            Channel::HeadTiltRight => "head tilted right",
            Channel::HeadTiltLeft => "head tilted left",
            Channel::HeadNod => "head down / nod",
            Channel::BodyLean => "body leaning",
            Channel::BrowFurrow => "brow furrow (concern)",
            Channel::Smiling => "smiling",
            Channel::GazingLeft => "looking left",
            Channel::GazingRight => "looking right",
        }
    }

    /// The metric this channel watches
    pub fn metric(self, f: &FeatureVector) -> f64 {
        match self {
            Channel::EyesClosed => f.eye_ratio,
            Channel::MouthOpen => f.mouth_open,
            Channel::BrowsRaised => f.brow_ratio,
            Channel::HeadTiltRight | Channel::HeadTiltLeft => f.roll,
            Channel::HeadNod => f.nod,
            Channel::BodyLean => f.torso_lean.abs(),
            Channel::BrowFurrow => f.brow_asymmetry,
            Channel::Smiling => f.smile_metric,
            Channel::GazingLeft | Channel::GazingRight => f.gaze_metric,
        }
    }

    /// Direction the metric moves to activate
    pub fn direction(self) -> Direction {
        match self {
            Channel::EyesClosed | Channel::HeadTiltLeft | Channel::GazingLeft => Direction::Below,
            _ => Direction::Above,
        }
    }

    /// Channel forced OFF when this one turns ON
    pub fn exclusive_with(self) -> Option<Channel> {
        match self {
            Channel::HeadTiltRight => Some(Channel::HeadTiltLeft),
            Channel::HeadTiltLeft => Some(Channel::HeadTiltRight),
            Channel::GazingLeft => Some(Channel::GazingRight),
            Channel::GazingRight => Some(Channel::GazingLeft),
            _ => None,
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// One latch bit per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelState {
    bits: [bool; CHANNEL_COUNT],
}

impl ChannelState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, channel: Channel) -> bool {
        self.bits[channel.index()]
    }

    #[inline]
    pub fn set(&mut self, channel: Channel, active: bool) {
        self.bits[channel.index()] = active;
    }

    /// Active channels in output order
    pub fn active(&self) -> impl Iterator<Item = Channel> + '_ {
        Channel::all().iter().copied().filter(|c| self.get(*c))
    }

    pub fn any_active(&self) -> bool {
        self.bits.iter().any(|b| *b)
    }

    pub fn active_count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// Clear every latch
    pub fn clear(&mut self) {
        self.bits = [false; CHANNEL_COUNT];
    }
}

/// Threshold table, one ON/OFF pair per channel
///
/// Missing keys in configuration fall back to the defaults below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ChannelThresholds {
    pub eyes_closed: Thresholds,
    pub mouth_open: Thresholds,
    pub brows_raised: Thresholds,
    pub head_tilt_right: Thresholds,
    pub head_tilt_left: Thresholds,
    pub head_nod: Thresholds,
    pub body_lean: Thresholds,
    pub brow_furrow: Thresholds,
    pub smiling: Thresholds,
    pub gazing_left: Thresholds,
    pub gazing_right: Thresholds,
}

impl Default for ChannelThresholds {
    fn default() -> Self {
        Self {
            eyes_closed: Thresholds::new(0.02, 0.03),
            mouth_open: Thresholds::new(0.08, 0.06),
            brows_raised: Thresholds::new(0.12, 0.10),
            head_tilt_right: Thresholds::new(10.0, 8.0),
            head_tilt_left: Thresholds::new(-10.0, -8.0),
            head_nod: Thresholds::new(0.02, 0.01),
            body_lean: Thresholds::new(0.08, 0.05),
            brow_furrow: Thresholds::new(0.06, 0.04),
            smiling: Thresholds::new(0.30, 0.28),
            gazing_left: Thresholds::new(-0.02, -0.01),
            gazing_right: Thresholds::new(0.02, 0.01),
        }
    }
}

impl ChannelThresholds {
    pub fn get(&self, channel: Channel) -> Thresholds {
        match channel {
            Channel::EyesClosed => self.eyes_closed,
            Channel::MouthOpen => self.mouth_open,
            Channel::BrowsRaised => self.brows_raised,
            Channel::HeadTiltRight => self.head_tilt_right,
            Channel::HeadTiltLeft => self.head_tilt_left,
            Channel::HeadNod => self.head_nod,
            Channel::BodyLean => self.body_lean,
            Channel::BrowFurrow => self.brow_furrow,
            Channel::Smiling => self.smiling,
            Channel::GazingLeft => self.gazing_left,
            Channel::GazingRight => self.gazing_right,
        }
    }

    /// Latch rule for one channel
    pub fn latch(&self, channel: Channel) -> HysteresisLatch {
        HysteresisLatch::with_thresholds(channel.direction(), self.get(channel))
    }

    /// Latch rules for every channel, in output order
    pub fn latches(&self) -> [HysteresisLatch; CHANNEL_COUNT] {
        let all = Channel::all();
        std::array::from_fn(|i| self.latch(all[i]))
    }

    /// Check every pair, naming the first offending channel
    pub fn validate(&self) -> Result<(), String> {
        for channel in Channel::all() {
            self.latch(*channel)
                .validate()
                .map_err(|e| format!("{}: {}", channel.key(), e))?;
        }
        Ok(())
    }
}
