//! SignAura State Engine - From smoothed features to stable labels
//!
//! This crate owns every piece of per-stream state downstream of smoothing:
//! - Hysteresis latches (distinct ON and OFF thresholds)
//! - The 11 semantic channels and their threshold table
//! - The gesture classifier (a Moore machine over channel latches)
//! - The stability gate (N consecutive identical candidates)
//! - The transcript debounce (time-based, decoupled from the gate)

pub mod channel;
pub mod classifier;
pub mod gate;
pub mod hysteresis;
pub mod transcript;

pub use channel::*;
pub use classifier::*;
pub use gate::*;
pub use hysteresis::*;
pub use transcript::*;
