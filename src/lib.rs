//! Scheduled weather warning service.
//!
//! Polls the met.no Locationforecast classic feed for a fixed
//! coordinate, detects threshold crossings for wind gusts, sustained
//! wind, and precipitation over per-phenomenon look-ahead horizons, and
//! broadcasts rendered warnings to configured recipients through an
//! outbound webhook. Runs to completion once per invocation; the exit
//! code distinguishes "nothing to report", "warnings delivered",
//! "delivery incomplete", and fatal errors.

pub mod alert;
pub mod analysis;
pub mod config;
pub mod dev_mode;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod notify;
pub mod run;
