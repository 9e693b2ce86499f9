//! Transcript - coarse, time-based record of phrase changes
//!
//! Independent of the stability gate: the debouncer looks at the raw
//! classifier phrase and records it when it differs from the last recorded
//! phrase and more than the minimum interval of frame time has passed since
//! that record.

use std::time::Duration;

use serde::Serialize;
use signaura_core::FrameTime;
use tracing::debug;

/// Default minimum interval between transcript entries
pub const DEFAULT_TRANSCRIPT_INTERVAL: Duration = Duration::from_millis(500);

/// One recorded phrase change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    pub time: FrameTime,
    pub text: String,
}

impl std::fmt::Display for TranscriptEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.time, self.text)
    }
}

/// Change-plus-elapsed-time debouncer
#[derive(Debug, Clone)]
pub struct TranscriptDebouncer {
    min_interval: Duration,
    last_text: String,
    /// Frame time of the last recorded change, stream start initially
    last_change: FrameTime,
}

impl TranscriptDebouncer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_text: String::new(),
            last_change: FrameTime::ZERO,
        }
    }

    /// Observe the phrase of the frame captured at `now`
    pub fn observe(&mut self, text: &str, now: FrameTime) -> Option<TranscriptEntry> {
        if text == self.last_text || now - self.last_change <= self.min_interval {
            return None;
        }

        self.last_text.clear();
        self.last_text.push_str(text);
        self.last_change = now;
        debug!(time = %now, text, "transcript entry");

        Some(TranscriptEntry {
            time: now,
            text: text.to_string(),
        })
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn reset(&mut self) {
        self.last_text.clear();
        self.last_change = FrameTime::ZERO;
    }
}

impl Default for TranscriptDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSCRIPT_INTERVAL)
    }
}

/// Ordered transcript history
#[derive(Debug, Clone, Default, Serialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Plain-text export, one `[HH:MM:SS.mmm] phrase` line per entry
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&entry.to_string());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_strictly_more_than_interval() {
        let mut d = TranscriptDebouncer::default();
        assert!(d.observe("neutral", FrameTime::from_millis(500)).is_none());
        let e = d.observe("neutral", FrameTime::from_millis(501)).unwrap();
        assert_eq!(e.text, "neutral");
        assert_eq!(e.time, FrameTime::from_millis(501));
    }

    #[test]
    fn test_same_text_never_repeats() {
        let mut d = TranscriptDebouncer::default();
        assert!(d.observe("smiling", FrameTime::from_millis(600)).is_some());
        assert!(d.observe("smiling", FrameTime::from_millis(5000)).is_none());
    }

    #[test]
    fn test_change_within_interval_is_dropped() {
        let mut d = TranscriptDebouncer::default();
        d.observe("neutral", FrameTime::from_millis(1000));
        assert!(d.observe("smiling", FrameTime::from_millis(1300)).is_none());
        assert!(d.observe("smiling", FrameTime::from_millis(1500)).is_none());
        assert!(d.observe("smiling", FrameTime::from_millis(1501)).is_some());
        // Flip back after the interval is recorded
        assert!(d.observe("neutral", FrameTime::from_millis(2100)).is_some());
    }

    #[test]
    fn test_reset_restores_stream_start() {
        let mut d = TranscriptDebouncer::new(Duration::from_millis(100));
        d.observe("a", FrameTime::from_millis(200));
        d.reset();
        assert!(d.observe("a", FrameTime::from_millis(50)).is_none());
        assert!(d.observe("a", FrameTime::from_millis(150)).is_some());
    }

    #[test]
    fn test_transcript_text_export() {
        let mut t = Transcript::new();
        t.push(TranscriptEntry {
            time: FrameTime::from_millis(1_250),
            text: "smiling".into(),
        });
        t.push(TranscriptEntry {
            time: FrameTime::from_millis(62_000),
            text: "neutral".into(),
        });
        assert_eq!(t.to_text(), "[00:00:01.250] smiling\n[00:01:02.000] neutral\n");
        assert_eq!(t.len(), 2);
        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.to_text(), "");
    }
}
