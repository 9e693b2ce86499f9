//! Arbitrary JSON through configuration parsing and validation

#![no_main]

use libfuzzer_sys::fuzz_target;
use signaura_runtime::{Pipeline, PipelineConfig};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = PipelineConfig::from_json_str(text) else {
        return;
    };

    // Parsing validates, so every accepted config builds a pipeline
    assert!(Pipeline::with_config(config).is_ok());
});
