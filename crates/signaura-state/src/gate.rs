//! Stability gate - debounce for the surfaced label
//!
//! The classifier phrase can still change for a single frame when the
//! detector glitches. The gate only surfaces a phrase once it has been the
//! candidate for N consecutive frames, and never surfaces the same phrase
//! twice in a row.

/// Default number of identical consecutive candidates (~270 ms at 30 fps)
pub const DEFAULT_STABILITY_FRAMES: u32 = 8;

/// Candidate tracker
#[derive(Debug, Clone)]
pub struct StabilityGate {
    /// Consecutive frames required
    threshold: u32,
    /// Current candidate phrase
    candidate: String,
    /// How many consecutive frames the candidate has been seen
    count: u32,
    /// Last phrase surfaced
    last_emitted: String,
}

impl StabilityGate {
    /// Create a gate; a threshold of 0 is raised to 1
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            candidate: String::new(),
            count: 0,
            last_emitted: String::new(),
        }
    }

    /// Feed one frame's phrase
    ///
    /// Returns the phrase when it becomes the new stable output, `None` otherwise.
    pub fn gate(&mut self, candidate: &str) -> Option<String> {
        if candidate == self.candidate {
            self.count = self.count.saturating_add(1);
        } else {
            self.candidate.clear();
            self.candidate.push_str(candidate);
            self.count = 1;
        }

        if self.count >= self.threshold && self.candidate != self.last_emitted {
            self.last_emitted.clone_from(&self.candidate);
            return Some(self.last_emitted.clone());
        }

        None
    }

    /// Last surfaced phrase, `None` before the first emission
    pub fn stable(&self) -> Option<&str> {
        if self.last_emitted.is_empty() {
            None
        } else {
            Some(&self.last_emitted)
        }
    }

    /// Current candidate and its run length
    pub fn pending(&self) -> (&str, u32) {
        (&self.candidate, self.count)
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Forget candidate and last output (pipeline restart)
    pub fn reset(&mut self) {
        self.candidate.clear();
        self.count = 0;
        self.last_emitted.clear();
    }
}

impl Default for StabilityGate {
    fn default() -> Self {
        Self::new(DEFAULT_STABILITY_FRAMES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eighth_frame_emits_once() {
        let mut g = StabilityGate::default();
        for _ in 0..7 {
            assert_eq!(g.gate("smiling"), None);
        }
        assert_eq!(g.gate("smiling"), Some("smiling".to_string()));
        assert_eq!(g.gate("smiling"), None);
        assert_eq!(g.stable(), Some("smiling"));
    }

    #[test]
    fn test_interruption_restarts_count() {
        let mut g = StabilityGate::default();
        for _ in 0..6 {
            g.gate("smiling");
        }
        g.gate("neutral");
        for _ in 0..7 {
            assert_eq!(g.gate("smiling"), None);
        }
        assert_eq!(g.pending(), ("smiling", 7));
        assert!(g.gate("smiling").is_some());
    }

    #[test]
    fn test_return_to_previous_label_after_change() {
        let mut g = StabilityGate::new(3);
        for _ in 0..3 {
            g.gate("neutral");
        }
        assert_eq!(g.stable(), Some("neutral"));
        for _ in 0..3 {
            g.gate("smiling");
        }
        assert_eq!(g.stable(), Some("smiling"));
        let emitted: Vec<_> = (0..3).filter_map(|_| g.gate("neutral")).collect();
        assert_eq!(emitted, vec!["neutral".to_string()]);
    }

    #[test]
    fn test_threshold_one_emits_on_change() {
        let mut g = StabilityGate::new(0);
        assert_eq!(g.threshold(), 1);
        assert_eq!(g.gate("a"), Some("a".to_string()));
        assert_eq!(g.gate("a"), None);
        assert_eq!(g.gate("b"), Some("b".to_string()));
    }

    #[test]
    fn test_reset() {
        let mut g = StabilityGate::new(2);
        g.gate("x");
        g.gate("x");
        g.reset();
        assert_eq!(g.stable(), None);
        assert_eq!(g.pending(), ("", 0));
    }
}
