//! Labelled feature dataset and its CSV form
//!
//! The CSV layout is a fixed contract shared with downstream training
//! scripts: one header line, then one row per sample with the label first
//! and the nine smoothed metrics in column order. Ratios carry four
//! decimals, roll carries two.

use std::io::Write;

use serde::Serialize;
use signaura_core::{Feature, FeatureVector, SignauraError, SignauraResult, FEATURE_COUNT};
use tracing::{debug, info};

use crate::FrameOutput;

/// Header line of every dataset CSV
pub const DATASET_HEADER: &str =
    "label,eyeRatio,browRatio,mouthOpen,roll,nod,torsoLean,browAsymmetry,smileMetric,gazeMetric";

/// Fixed-point text with ties rounded away from zero
///
/// Matches JavaScript `Number.prototype.toFixed`: an exact binary midpoint
/// rounds up in magnitude, `-0.0` prints without a sign, and every other
/// value is rounded to the nearest representable decimal.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();

    match midpoint_rounded_up(magnitude, digits) {
        Some(scaled) if digits == 0 => format!("{}{}", sign, scaled),
        Some(scaled) => {
            let scale = 10u128.pow(digits as u32);
            format!(
                "{}{}.{:0width$}",
                sign,
                scaled / scale,
                scaled % scale,
                width = digits
            )
        }
        None => format!("{}{:.*}", sign, digits, magnitude),
    }
}

/// `magnitude * 10^digits` rounded up, when it lies exactly halfway between
/// two integers
fn midpoint_rounded_up(magnitude: f64, digits: usize) -> Option<u128> {
    let bits = magnitude.to_bits();
    let exp_bits = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if exp_bits == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), exp_bits - 1075)
    };
    if mantissa == 0 || exponent >= 0 {
        return None;
    }

    // magnitude * 10^digits * 2 = v / 2^shift, a midpoint when that is odd
    let v = (mantissa as u128).checked_mul(10u128.checked_pow(digits as u32)?)?;
    let shift = -(exponent + 1);
    if shift < 0 || v.trailing_zeros() as i32 != shift {
        return None;
    }
    let odd = v >> shift;
    Some((odd + 1) / 2)
}

/// Trim a label and check it can sit in a CSV cell unquoted
pub fn validate_label(label: &str) -> SignauraResult<String> {
    let trimmed = label.trim();
    if trimmed.is_empty() || trimmed.contains(|c: char| matches!(c, ',' | '\n' | '\r' | '"')) {
        return Err(SignauraError::InvalidLabel(label.to_string()));
    }
    Ok(trimmed.to_string())
}

/// One labelled row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSample {
    pub label: String,
    pub features: FeatureVector,
}

impl DatasetSample {
    pub fn new(label: &str, features: FeatureVector) -> SignauraResult<Self> {
        Ok(Self {
            label: validate_label(label)?,
            features,
        })
    }

    /// CSV row without the trailing newline
    pub fn to_csv_row(&self) -> String {
        let mut row = self.label.clone();
        for feature in Feature::all() {
            row.push(',');
            row.push_str(&to_fixed(self.features.get(*feature), feature.precision()));
        }
        row
    }

    /// Parse a data row; `line` is 1-based and only used in errors
    pub fn parse_row(row: &str, line: usize) -> SignauraResult<Self> {
        let cells: Vec<&str> = row.split(',').collect();
        if cells.len() != FEATURE_COUNT + 1 {
            return Err(SignauraError::CsvRecord {
                line,
                reason: format!("expected {} fields, got {}", FEATURE_COUNT + 1, cells.len()),
            });
        }

        let label = validate_label(cells[0]).map_err(|e| SignauraError::CsvRecord {
            line,
            reason: e.to_string(),
        })?;

        let mut values = [0.0; FEATURE_COUNT];
        for ((slot, cell), feature) in values.iter_mut().zip(&cells[1..]).zip(Feature::all()) {
            *slot = cell.trim().parse::<f64>().map_err(|e| SignauraError::CsvRecord {
                line,
                reason: format!("{}: {:?}: {}", feature.name(), cell, e),
            })?;
        }

        Ok(Self {
            label,
            features: FeatureVector::from_array(values),
        })
    }
}

/// Parse a whole dataset CSV, header included
///
/// Blank lines are skipped.
pub fn parse_csv(text: &str) -> SignauraResult<Vec<DatasetSample>> {
    let mut lines = text.lines().map(|l| l.trim_end_matches('\r'));

    let header = lines.next().unwrap_or_default();
    if header != DATASET_HEADER {
        return Err(SignauraError::CsvHeaderMismatch {
            expected: DATASET_HEADER.to_string(),
            actual: header.to_string(),
        });
    }

    lines
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| DatasetSample::parse_row(l, i + 2))
        .collect()
}

/// Sample collector
///
/// Samples can be recorded one at a time with an explicit label, or a
/// collection session can be started with a label so that every smoothed
/// frame observed until `stop_collecting` is recorded under it.
#[derive(Debug, Clone, Default)]
pub struct DatasetRecorder {
    samples: Vec<DatasetSample>,
    /// Active collection label
    collecting: Option<String>,
}

impl DatasetRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one sample
    pub fn record(&mut self, label: &str, features: &FeatureVector) -> SignauraResult<()> {
        let sample = DatasetSample::new(label, *features)?;
        self.samples.push(sample);
        debug!(label, samples = self.samples.len(), "dataset sample recorded");
        Ok(())
    }

    /// Start a collection session
    pub fn start_collecting(&mut self, label: &str) -> SignauraResult<()> {
        let label = validate_label(label)?;
        info!(label = %label, "dataset collection started");
        self.collecting = Some(label);
        Ok(())
    }

    /// Stop the session, returning its label
    pub fn stop_collecting(&mut self) -> Option<String> {
        let label = self.collecting.take();
        if let Some(label) = &label {
            info!(label = %label, samples = self.samples.len(), "dataset collection stopped");
        }
        label
    }

    pub fn collecting(&self) -> Option<&str> {
        self.collecting.as_deref()
    }

    pub fn is_collecting(&self) -> bool {
        self.collecting.is_some()
    }

    /// Feed a pipeline output; records its smoothed vector while collecting
    ///
    /// Returns whether a sample was recorded.
    pub fn observe(&mut self, output: &FrameOutput) -> bool {
        match (&self.collecting, &output.smoothed) {
            (Some(label), Some(smoothed)) => {
                self.samples.push(DatasetSample {
                    label: label.clone(),
                    features: smoothed.features,
                });
                true
            }
            _ => false,
        }
    }

    pub fn samples(&self) -> &[DatasetSample] {
        &self.samples
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Whole dataset as CSV text, header first, every row newline-terminated
    pub fn to_csv(&self) -> String {
        let mut out = String::with_capacity(DATASET_HEADER.len() + 1 + self.samples.len() * 80);
        out.push_str(DATASET_HEADER);
        out.push('\n');
        for sample in &self.samples {
            out.push_str(&sample.to_csv_row());
            out.push('\n');
        }
        out
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> SignauraResult<()> {
        writer.write_all(self.to_csv().as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use signaura_core::{FrameTime, SmoothedFeatureVector};
    use signaura_state::Classification;

    fn sample_features() -> FeatureVector {
        FeatureVector {
            eye_ratio: 0.051234,
            brow_ratio: 0.15,
            mouth_open: 0.004,
            roll: -3.1234,
            nod: 0.00549,
            torso_lean: 0.0,
            brow_asymmetry: 0.012,
            smile_metric: 0.25,
            gaze_metric: -0.0311,
        }
    }

    fn output(smoothed: Option<FeatureVector>) -> FrameOutput {
        FrameOutput {
            timestamp: FrameTime::ZERO,
            raw_features: smoothed,
            smoothed: smoothed.map(|f| SmoothedFeatureVector::new(f, 1)),
            classification: Classification::empty(),
            stable_label: None,
            transcript: None,
            gauges: None,
        }
    }

    #[test]
    fn test_row_format() {
        let s = DatasetSample::new("question", sample_features()).unwrap();
        assert_eq!(
            s.to_csv_row(),
            "question,0.0512,0.1500,0.0040,-3.12,0.0055,0.0000,0.0120,0.2500,-0.0311"
        );
    }

    #[test]
    fn test_to_fixed_rounds_midpoints_up() {
        assert_eq!(to_fixed(0.125, 2), "0.13");
        assert_eq!(to_fixed(0.03125, 4), "0.0313");
        assert_eq!(to_fixed(-0.125, 2), "-0.13");
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(0.5, 0), "1");
        assert_eq!(to_fixed(12.375, 2), "12.38");
        // Not midpoints once stored as f64
        assert_eq!(to_fixed(1.005, 2), "1.00");
        assert_eq!(to_fixed(0.15, 1), "0.1");
        assert_eq!(to_fixed(0.051234, 4), "0.0512");
    }

    #[test]
    fn test_to_fixed_signs_and_specials() {
        assert_eq!(to_fixed(-0.0, 4), "0.0000");
        assert_eq!(to_fixed(0.0, 2), "0.00");
        assert_eq!(to_fixed(-0.00001, 4), "-0.0000");
        assert_eq!(to_fixed(f64::NAN, 4), "NaN");
        assert_eq!(to_fixed(f64::INFINITY, 2), "Infinity");
        assert_eq!(to_fixed(f64::NEG_INFINITY, 2), "-Infinity");
    }

    #[test]
    fn test_row_midpoints_and_negative_zero() {
        let features = FeatureVector {
            eye_ratio: 0.03125,
            roll: 0.125,
            torso_lean: -0.0,
            ..FeatureVector::default()
        };
        let s = DatasetSample::new("tie", features).unwrap();
        assert_eq!(
            s.to_csv_row(),
            "tie,0.0313,0.0000,0.0000,0.13,0.0000,0.0000,0.0000,0.0000,0.0000"
        );
    }

    #[test]
    fn test_header_written_once() {
        let mut r = DatasetRecorder::new();
        r.record("a", &sample_features()).unwrap();
        r.record("b", &sample_features()).unwrap();
        let csv = r.to_csv();
        assert_eq!(csv.matches(DATASET_HEADER).count(), 1);
        assert!(csv.starts_with(DATASET_HEADER));
        assert!(csv.ends_with('\n'));
        assert_eq!(csv.lines().count(), 3);
    }

    #[test]
    fn test_empty_dataset_is_header_only() {
        let csv = DatasetRecorder::new().to_csv();
        assert_eq!(csv, format!("{}\n", DATASET_HEADER));
        assert!(parse_csv(&csv).unwrap().is_empty());
    }

    #[test]
    fn test_label_validation() {
        assert_eq!(validate_label("  nod yes ").unwrap(), "nod yes");
        for bad in ["", "   ", "a,b", "a\nb", "say \"hi\""] {
            assert!(matches!(validate_label(bad), Err(SignauraError::InvalidLabel(_))));
        }
    }

    #[test]
    fn test_collection_session() {
        let mut r = DatasetRecorder::new();
        assert!(!r.observe(&output(Some(sample_features()))));
        assert!(r.start_collecting("").is_err());

        r.start_collecting("surprise").unwrap();
        assert!(r.observe(&output(Some(sample_features()))));
        assert!(!r.observe(&output(None)));
        assert!(r.observe(&output(Some(sample_features()))));
        assert_eq!(r.stop_collecting().as_deref(), Some("surprise"));
        assert!(!r.observe(&output(Some(sample_features()))));

        assert_eq!(r.sample_count(), 2);
        assert!(r.samples().iter().all(|s| s.label == "surprise"));
    }

    #[test]
    fn test_write_to() {
        let mut r = DatasetRecorder::new();
        r.record("neutral", &FeatureVector::default()).unwrap();
        let mut buf = Vec::new();
        r.write_to(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), r.to_csv());
    }

    #[test]
    fn test_parse_errors() {
        let err = parse_csv("label,a,b\n").unwrap_err();
        assert!(matches!(err, SignauraError::CsvHeaderMismatch { .. }));

        let text = format!("{}\nok,1,2,3,4,5,6,7,8,9\nshort,1,2\n", DATASET_HEADER);
        match parse_csv(&text).unwrap_err() {
            SignauraError::CsvRecord { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error {other:?}"),
        }

        let text = format!("{}\nx,1,2,3,four,5,6,7,8,9\n", DATASET_HEADER);
        let err = parse_csv(&text).unwrap_err();
        assert!(err.to_string().contains("roll"));
    }

    #[test]
    fn test_parse_tolerates_crlf_and_blank_lines() {
        let text = format!("{}\r\nsmile,1,2,3,4,5,6,7,8,9\r\n\r\n", DATASET_HEADER);
        let samples = parse_csv(&text).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].features.gaze_metric, 9.0);
    }

    proptest! {
        #[test]
        fn prop_csv_preserves_serialized_precision(
            values in proptest::array::uniform9(-1.0f64..1.0),
            roll in -90.0f64..90.0,
        ) {
            let features = FeatureVector::from_array(values).with(Feature::Roll, roll);
            let mut r = DatasetRecorder::new();
            r.record("sample", &features).unwrap();

            let parsed = parse_csv(&r.to_csv()).unwrap();
            prop_assert_eq!(parsed.len(), 1);
            prop_assert_eq!(parsed[0].label.as_str(), "sample");
            for feature in Feature::all() {
                let tolerance = 0.5 * 10f64.powi(-(feature.precision() as i32)) + 1e-12;
                let diff = (parsed[0].features.get(*feature) - features.get(*feature)).abs();
                prop_assert!(diff <= tolerance, "{} off by {}", feature.name(), diff);
            }
        }
    }
}
