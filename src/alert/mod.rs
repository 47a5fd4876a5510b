//! Threshold evaluation and message assembly.
//!
//! Submodules:
//! - `thresholds` - classifies observations against configured thresholds.
//! - `messages` - aggregates warnings per day and renders recipient-ready
//!   message bodies.

pub mod messages;
pub mod thresholds;
