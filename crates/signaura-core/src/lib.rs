//! SignAura Core - Fundamental types and primitives
//!
//! This crate defines the types shared by every stage of the NMF pipeline:
//! - Frame time (FrameTime)
//! - Typed landmarks (FaceLandmark, PoseLandmark) and validated landmark sets
//! - Landmark frames as delivered by the external detector
//! - The 9-metric feature vector and its smoothed counterpart
//! - Error types

pub mod error;
pub mod features;
pub mod frame;
pub mod landmark;
pub mod time;

pub use error::*;
pub use features::*;
pub use frame::*;
pub use landmark::*;
pub use time::*;
