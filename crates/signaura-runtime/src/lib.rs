//! SignAura Runtime - Per-stream pipeline orchestration
//!
//! This crate wires the stages into one context object per stream:
//! 1. Assemble frames from independent face and pose detectors
//! 2. Extract raw features
//! 3. Smooth over the sliding window
//! 4. Classify with hysteresis latches
//! 5. Gate the phrase into a stable label
//! 6. Debounce the phrase into the transcript
//! 7. Report to the host through a sink, record dataset samples on demand

pub mod assembler;
pub mod config;
pub mod dataset;
pub mod logging;
pub mod pipeline;
pub mod replay;
pub mod shared;
pub mod sink;

pub use assembler::*;
pub use config::*;
pub use dataset::*;
pub use logging::*;
pub use pipeline::*;
pub use replay::*;
pub use shared::*;
pub use sink::*;
