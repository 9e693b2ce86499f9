//! SignAura Visual - From landmarks to smoothed features
//!
//! Landmarks are geometry, not meaning. This crate turns a face mesh (and,
//! when available, a pose skeleton) into nine scale-invariant metrics, then
//! averages them over a short sliding window so the classifier downstream
//! sees a steady signal instead of detector jitter.
//!
//! # Stages
//!
//! - Face geometry: eye, brow, mouth, head roll/nod, asymmetry, smile, gaze
//! - Pose geometry: torso lean (neutral when the body is not visible)
//! - Extraction: both combined into one `FeatureVector`
//! - Smoothing: strict sliding-window mean over the last W vectors
//! - Gauges: percent readouts for a feature display panel

pub mod extract;
pub mod face;
pub mod gauge;
pub mod pose;
pub mod smoother;

pub use extract::*;
pub use face::*;
pub use gauge::*;
pub use pose::*;
pub use smoother::*;
