//! Gesture classifier - hysteresis state machine over the channel table
//!
//! Moore machine: the phrase is a pure function of which channels are
//! latched, and each transition is a pure function of the previous latches
//! and the current smoothed vector. Channels are evaluated in output order;
//! the only cross-channel effect is that a channel turning ON forces its
//! exclusive partner OFF in the same evaluation.

use serde::Serialize;
use signaura_core::{FeatureVector, SmoothedFeatureVector};
use tracing::debug;

use crate::{Channel, ChannelState, ChannelThresholds, HysteresisLatch, CHANNEL_COUNT};

/// Phrase used when no channel is ON
pub const NEUTRAL: &str = "neutral";

/// Separator between phrases of simultaneously active channels
pub const PHRASE_SEPARATOR: &str = ", ";

/// Classifier output for one frame
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Classification {
    /// Active channels in output order
    pub channels: Vec<Channel>,
    /// Joined phrase; [`NEUTRAL`] when nothing is active, empty when there was no input
    pub text: String,
}

impl Classification {
    /// Output for a frame without features
    pub fn empty() -> Self {
        Self::default()
    }

    /// Render a channel state
    pub fn from_state(state: &ChannelState) -> Self {
        let channels: Vec<Channel> = state.active().collect();
        let text = if channels.is_empty() {
            NEUTRAL.to_string()
        } else {
            channels
                .iter()
                .map(|c| c.phrase())
                .collect::<Vec<_>>()
                .join(PHRASE_SEPARATOR)
        };
        Self { channels, text }
    }

    /// Phrases of the active channels
    pub fn labels(&self) -> Vec<&'static str> {
        self.channels.iter().map(|c| c.phrase()).collect()
    }

    /// No input was classified
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_neutral(&self) -> bool {
        self.text == NEUTRAL
    }
}

/// Multi-channel hysteresis classifier
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    /// Latched channels, persists across frames
    state: ChannelState,
    /// Latch rule per channel, in output order
    latches: [HysteresisLatch; CHANNEL_COUNT],
}

impl GestureClassifier {
    pub fn new(thresholds: &ChannelThresholds) -> Self {
        Self {
            state: ChannelState::new(),
            latches: thresholds.latches(),
        }
    }

    /// Classify one smoothed vector
    ///
    /// `None` (no face) yields [`Classification::empty`] and leaves every
    /// latch untouched.
    pub fn classify(&mut self, features: Option<&SmoothedFeatureVector>) -> Classification {
        match features {
            Some(f) => {
                self.update(&f.features);
                Classification::from_state(&self.state)
            }
            None => Classification::empty(),
        }
    }

    /// Apply one frame of transitions
    pub fn update(&mut self, f: &FeatureVector) {
        for (channel, latch) in Channel::all().iter().zip(self.latches.iter()) {
            let value = channel.metric(f);
            let active = self.state.get(*channel);
            let next = latch.step(active, value);

            if next == active {
                continue;
            }

            self.state.set(*channel, next);
            debug!(channel = channel.key(), value, active = next, "channel transition");

            if next {
                if let Some(partner) = channel.exclusive_with() {
                    if self.state.get(partner) {
                        self.state.set(partner, false);
                        debug!(
                            channel = partner.key(),
                            forced_by = channel.key(),
                            "exclusive channel released"
                        );
                    }
                }
            }
        }
    }

    /// Current latches
    pub fn state(&self) -> &ChannelState {
        &self.state
    }

    /// Output for the current latches without advancing
    pub fn current(&self) -> Classification {
        Classification::from_state(&self.state)
    }

    /// Clear every latch (pipeline restart)
    pub fn reset(&mut self) {
        self.state.clear();
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(&ChannelThresholds::default())
    }
}
