//! Error types for the SignAura pipeline

use thiserror::Error;

use crate::LandmarkSet;

/// Core SignAura errors
#[derive(Error, Debug)]
pub enum SignauraError {
    // Ingestion errors
    #[error("Missing {set} landmark {name} (index {index}): got {available} points")]
    MissingLandmark {
        set: LandmarkSet,
        name: &'static str,
        index: usize,
        available: usize,
    },

    #[error("Invalid {set} coordinate at index {index}: ({x}, {y})")]
    InvalidCoordinate {
        set: LandmarkSet,
        index: usize,
        x: f64,
        y: f64,
    },

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Dataset errors
    #[error("Invalid label {0:?}: must be non-empty and free of commas and line breaks")]
    InvalidLabel(String),

    #[error("CSV header mismatch: expected {expected:?}, got {actual:?}")]
    CsvHeaderMismatch { expected: String, actual: String },

    #[error("CSV record {line}: {reason}")]
    CsvRecord { line: usize, reason: String },

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for SignAura operations
pub type SignauraResult<T> = Result<T, SignauraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_landmark_message() {
        let err = SignauraError::MissingLandmark {
            set: LandmarkSet::Face,
            name: "chin",
            index: 152,
            available: 100,
        };
        let msg = err.to_string();
        assert!(msg.contains("chin"));
        assert!(msg.contains("152"));
        assert!(msg.contains("face"));
    }
}
