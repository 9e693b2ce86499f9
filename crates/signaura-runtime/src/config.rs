//! Pipeline configuration
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! yields the stock pipeline. Durations are written as humantime strings
//! (`"500ms"`, `"1s 250ms"`).

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use signaura_core::{SignauraError, SignauraResult};
use signaura_state::{ChannelThresholds, DEFAULT_STABILITY_FRAMES, DEFAULT_TRANSCRIPT_INTERVAL};
use signaura_visual::DEFAULT_SMOOTHING_WINDOW;

/// Upper bound on the smoothing window
pub const MAX_SMOOTHING_WINDOW: usize = 120;

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct PipelineConfig {
    /// Raw vectors averaged by the smoother
    pub smoothing_window: usize,
    /// Consecutive identical phrases before a label is surfaced
    pub stability_frames: u32,
    /// Minimum frame time between transcript entries
    #[serde(with = "humantime_duration")]
    pub transcript_interval: Duration,
    /// ON/OFF thresholds per channel
    pub thresholds: ChannelThresholds,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            smoothing_window: DEFAULT_SMOOTHING_WINDOW,
            stability_frames: DEFAULT_STABILITY_FRAMES,
            transcript_interval: DEFAULT_TRANSCRIPT_INTERVAL,
            thresholds: ChannelThresholds::default(),
        }
    }
}

impl PipelineConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> SignauraResult<Self> {
        let config: PipelineConfig = serde_json::from_str(json)
            .map_err(|e| SignauraError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> SignauraResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> SignauraResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SignauraError::InvalidConfig(e.to_string()))
    }

    pub fn validate(&self) -> SignauraResult<()> {
        if self.smoothing_window == 0 || self.smoothing_window > MAX_SMOOTHING_WINDOW {
            return Err(SignauraError::InvalidConfig(format!(
                "smoothingWindow must be in 1..={}, got {}",
                MAX_SMOOTHING_WINDOW, self.smoothing_window
            )));
        }
        if self.stability_frames == 0 {
            return Err(SignauraError::InvalidConfig(
                "stabilityFrames must be at least 1".to_string(),
            ));
        }
        self.thresholds
            .validate()
            .map_err(|e| SignauraError::InvalidConfig(format!("thresholds.{}", e)))
    }
}

mod humantime_duration {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signaura_state::Thresholds;

    #[test]
    fn test_empty_document_is_default() {
        let config = PipelineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.smoothing_window, 5);
        assert_eq!(config.stability_frames, 8);
        assert_eq!(config.transcript_interval, Duration::from_millis(500));
    }

    #[test]
    fn test_partial_document() {
        let config = PipelineConfig::from_json_str(
            r#"{
                "stabilityFrames": 4,
                "transcriptInterval": "1s 250ms",
                "thresholds": { "mouthOpen": { "on": 0.1, "off": 0.07 } }
            }"#,
        )
        .unwrap();
        assert_eq!(config.stability_frames, 4);
        assert_eq!(config.transcript_interval, Duration::from_millis(1250));
        assert_eq!(config.thresholds.mouth_open, Thresholds::new(0.1, 0.07));
        assert_eq!(config.smoothing_window, 5);
    }

    #[test]
    fn test_json_round_trip() {
        let config = PipelineConfig {
            smoothing_window: 7,
            ..Default::default()
        };
        let json = config.to_json_pretty().unwrap();
        assert!(json.contains("\"500ms\""));
        assert_eq!(PipelineConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_bad_values() {
        for json in [
            r#"{"smoothingWindow": 0}"#,
            r#"{"stabilityFrames": 0}"#,
            r#"{"transcriptInterval": "soon"}"#,
            r#"{"thresholds": {"smiling": {"on": 0.2, "off": 0.3}}}"#,
            r#"{"unknownKnob": true}"#,
        ] {
            let err = PipelineConfig::from_json_str(json).unwrap_err();
            assert!(matches!(err, SignauraError::InvalidConfig(_)), "{json}");
        }
    }

    #[test]
    fn test_threshold_error_names_channel() {
        let err = PipelineConfig::from_json_str(r#"{"thresholds": {"smiling": {"on": 0.2, "off": 0.3}}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("thresholds.smiling"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = PipelineConfig::from_path("/nonexistent/signaura.json").unwrap_err();
        assert!(matches!(err, SignauraError::Io(_)));
    }
}
