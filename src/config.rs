//! Environment-backed configuration.
//!
//! All settings come from the process environment (a `.env` file is
//! loaded by the entry point via `dotenv` before this module runs).
//! Configuration is read once, validated upfront, and passed by
//! reference into every component; there is no process-wide mutable
//! state. Required values that are missing or malformed fail the run
//! before any network activity.

use std::env;

use crate::model::CheckError;

const METNO_BASE_URL: &str = "https://api.met.no/weatherapi/locationforecast/2.0/classic";

/// Read-only settings for a single run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Forecast coordinate. Used only to construct the fetch request.
    pub latitude: f64,
    pub longitude: f64,

    /// Wind gust warning threshold, m/s.
    pub wind_gust_threshold_mps: f64,
    /// Sustained-wind fallback threshold, m/s. When unset, instants
    /// without a gust figure never produce wind warnings.
    pub wind_speed_threshold_mps: Option<f64>,
    /// Precipitation warning threshold, mm.
    pub precipitation_threshold_mm: f64,

    /// Look-ahead horizons, in days, per phenomenon.
    pub precipitation_days_ahead: i64,
    pub wind_days_ahead: i64,

    /// Recipient identifiers per phenomenon. An empty list disables
    /// that phenomenon's notifications entirely.
    pub precipitation_recipients: Vec<String>,
    pub wind_recipients: Vec<String>,

    /// Webhook delivery target and credential. Both must be present for
    /// any delivery to succeed.
    pub endpoint_url: Option<String>,
    pub bearer_token: Option<String>,

    /// Development mode: read the feed from this file instead of the
    /// live API.
    pub replay_file: Option<String>,
}

impl Config {
    /// Load and validate configuration from the environment.
    pub fn from_env() -> Result<Config, CheckError> {
        Ok(Config {
            latitude: require_f64("LATITUDE")?,
            longitude: require_f64("LONGITUDE")?,
            wind_gust_threshold_mps: require_f64("WIND_GUST_THRESHOLD")?,
            wind_speed_threshold_mps: optional_f64("WIND_SPEED_THRESHOLD")?,
            precipitation_threshold_mm: require_f64("PRECIPITATION_THRESHOLD")?,
            precipitation_days_ahead: require_i64("PRECIPITATION_DAYS_AHEAD")?,
            wind_days_ahead: require_i64("WIND_DAYS_AHEAD")?,
            precipitation_recipients: recipient_list("PRECIPITATION_USER_IDS"),
            wind_recipients: recipient_list("WIND_USER_IDS"),
            endpoint_url: optional("ENDPOINT_URL"),
            bearer_token: optional("BEARER_TOKEN"),
            replay_file: optional("REPLAY_FILE"),
        })
    }

    /// URL of the classic point forecast for the configured coordinate.
    pub fn api_url(&self) -> String {
        format!("{}?lat={}&lon={}", METNO_BASE_URL, self.latitude, self.longitude)
    }
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn require_f64(name: &str) -> Result<f64, CheckError> {
    let raw = optional(name).ok_or_else(|| CheckError::Config(format!("{} is not set", name)))?;
    raw.parse::<f64>()
        .map_err(|_| CheckError::Config(format!("{} is not a number: {:?}", name, raw)))
}

fn optional_f64(name: &str) -> Result<Option<f64>, CheckError> {
    match optional(name) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<f64>()
            .map(Some)
            .map_err(|_| CheckError::Config(format!("{} is not a number: {:?}", name, raw))),
    }
}

fn require_i64(name: &str) -> Result<i64, CheckError> {
    let raw = optional(name).ok_or_else(|| CheckError::Config(format!("{} is not set", name)))?;
    raw.parse::<i64>()
        .map_err(|_| CheckError::Config(format!("{} is not an integer: {:?}", name, raw)))
}

/// Comma-separated recipient identifiers; absent variable means no
/// recipients.
fn recipient_list(name: &str) -> Vec<String> {
    match env::var(name) {
        Err(_) => Vec::new(),
        Ok(raw) => split_recipients(&raw),
    }
}

/// Whitespace around entries is ignored and empty entries are dropped.
fn split_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect()
}
