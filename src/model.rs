//! Core data types for the weather warning service.
//!
//! This module defines the shared domain model imported by all other
//! modules. It contains no I/O and no logic beyond trivial accessors,
//! only types and the constants that name them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Feed element identifiers
// ---------------------------------------------------------------------------

/// Feed element identifier for instantaneous wind gusts, in m/s.
pub const ELEM_WIND_GUST: &str = "ff_gust";

/// Feed element identifier for sustained wind, in m/s.
pub const ELEM_WIND_SPEED: &str = "ff";

// ---------------------------------------------------------------------------
// Threshold comparison policy
// ---------------------------------------------------------------------------

/// How a measured value is compared against its configured threshold.
///
/// Earlier revisions of this service disagreed on whether a value exactly
/// equal to the threshold should warn. The policy lives in one named
/// constant (`THRESHOLD_CMP`) so the choice cannot drift between call
/// sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdCmp {
    /// Strictly greater than the threshold.
    Above,
    /// Greater than or equal to the threshold.
    AtLeast,
}

impl ThresholdCmp {
    /// Returns `true` if `value` crosses `threshold` under this policy.
    pub fn crossed(self, value: f64, threshold: f64) -> bool {
        match self {
            ThresholdCmp::Above => value > threshold,
            ThresholdCmp::AtLeast => value >= threshold,
        }
    }
}

/// Comparison policy in effect for every phenomenon.
pub const THRESHOLD_CMP: ThresholdCmp = ThresholdCmp::AtLeast;

// ---------------------------------------------------------------------------
// Reading types
// ---------------------------------------------------------------------------

/// Precipitation for a single forecast interval, in mm.
///
/// Feed variants publish either a single amount or a (min, value, max)
/// band for the same interval; both shapes are preserved so the formatter
/// can render a band as a range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Precipitation {
    Amount(f64),
    Band { min: f64, value: f64, max: f64 },
}

impl Precipitation {
    /// The representative amount used for threshold comparison and day
    /// totals. For a band this is the feed's point value (the parser
    /// substitutes `max` when the band omits one).
    pub fn amount(&self) -> f64 {
        match *self {
            Precipitation::Amount(value) => value,
            Precipitation::Band { value, .. } => value,
        }
    }

    /// Lower and upper bounds. A plain amount bounds itself.
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            Precipitation::Amount(value) => (value, value),
            Precipitation::Band { min, max, .. } => (min, max),
        }
    }
}

/// One forecast reading at a single instant for the configured location.
///
/// `date` is the UTC calendar date of `timestamp` and is the aggregation
/// key everywhere downstream. Each optional field is present only when
/// the feed published a figure under the canonical element identifier
/// for that phenomenon.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    pub date: NaiveDate,
    pub wind_gust_mps: Option<f64>,
    pub wind_speed_mps: Option<f64>,
    pub precipitation_mm: Option<Precipitation>,
}

impl Observation {
    /// An observation contributing no data to any threshold is discarded
    /// during parsing, never downstream.
    pub fn has_data(&self) -> bool {
        self.wind_gust_mps.is_some() || self.wind_speed_mps.is_some() || self.precipitation_mm.is_some()
    }
}

// ---------------------------------------------------------------------------
// Warning types
// ---------------------------------------------------------------------------

/// The axis along which warnings are filtered and reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phenomenon {
    Precipitation,
    Wind,
    Both,
}

/// An observation that crossed at least one configured threshold, with
/// one human-readable reason per crossing. Never persisted; warnings are
/// intermediate, per-run records.
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub date: NaiveDate,
    pub timestamp: DateTime<Utc>,
    pub wind_gust_mps: Option<f64>,
    pub wind_speed_mps: Option<f64>,
    pub precipitation_mm: Option<Precipitation>,
    pub reasons: Vec<String>,
}

/// A rendered notification body addressed to a single recipient.
///
/// The phenomenon tag is carried explicitly; downstream reporting never
/// infers the message class from its rendered text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub phenomenon: Phenomenon,
    pub recipient: String,
    pub body: String,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Fatal errors that abort a run. Per-interval data gaps are soft-skipped
/// in the parser and single delivery failures are reported as booleans;
/// neither appears here.
#[derive(Debug, PartialEq)]
pub enum CheckError {
    /// A required configuration value is missing or malformed.
    Config(String),
    /// Non-2xx HTTP response from the forecast feed.
    FeedHttp(u16),
    /// Transport-level failure talking to the forecast feed.
    FeedTransport(String),
    /// The feed document could not be parsed at all.
    FeedParse(String),
}

impl std::fmt::Display for CheckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckError::Config(msg) => write!(f, "configuration error: {}", msg),
            CheckError::FeedHttp(code) => write!(f, "feed HTTP error: {}", code),
            CheckError::FeedTransport(msg) => write!(f, "feed transport error: {}", msg),
            CheckError::FeedParse(msg) => write!(f, "feed parse error: {}", msg),
        }
    }
}

impl std::error::Error for CheckError {}
