//! Data organization utilities for the warning service.
//!
//! Submodules:
//! - `summary` - collapses the parser's flat observation output into
//!   per-day figures for the progress log.

pub mod summary;
