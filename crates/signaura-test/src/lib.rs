//! SignAura Test Harness
//!
//! Tools for exercising the pipeline without a camera:
//! - Synthetic face and body rigs that produce detector-shaped landmark arrays
//! - Seeded landmark jitter and face dropout
//! - Scripted scenarios run end to end through a fresh pipeline
//! - Integration checks over everything a scenario observed

pub mod integration;
pub mod scenario;
pub mod synth;

pub use integration::*;
pub use scenario::*;
pub use synth::*;
