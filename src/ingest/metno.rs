//! met.no Locationforecast classic feed client and parser.
//!
//! Fetches the XML point forecast for a fixed coordinate and flattens
//! its repeated `<time>` interval nodes into typed `Observation`s. The
//! classic format mixes zero-duration "instant" intervals (wind) with
//! period intervals (precipitation); every node is handled uniformly
//! and a node missing one phenomenon simply leaves that field absent.
//!
//! API documentation: https://api.met.no/weatherapi/locationforecast/2.0/documentation
//!
//! # Clock injection
//! Parsing accepts a `now: DateTime<Utc>` parameter rather than calling
//! `Utc::now()` internally. The caller computes "now" exactly once per
//! run, so the today-exclusion cannot shift mid-run and re-parsing the
//! same document yields identical output.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::model::{CheckError, Observation, Precipitation, ELEM_WIND_GUST, ELEM_WIND_SPEED};

/// met.no requires a User-Agent identifying the application; anonymous
/// requests are rejected.
const FEED_USER_AGENT: &str = "metwarn_service/0.1 (scheduled weather threshold monitor)";

// ============================================================================
// Feed document structures
// ============================================================================

/// Root `<weatherdata>` element.
#[derive(Debug, Deserialize)]
struct WeatherData {
    product: Product,
}

#[derive(Debug, Deserialize)]
struct Product {
    #[serde(rename = "time", default)]
    times: Vec<TimeNode>,
}

/// One forecast interval: `<time from="..." to="...">` wrapping per-point
/// element values under a `<location>` child.
#[derive(Debug, Deserialize)]
struct TimeNode {
    from: Option<String>,
    to: Option<String>,
    #[serde(rename = "location", default)]
    locations: Vec<LocationNode>,
}

#[derive(Debug, Deserialize)]
struct LocationNode {
    #[serde(rename = "windSpeed", default)]
    wind_speed: Vec<WindElement>,
    #[serde(rename = "windGust", default)]
    wind_gust: Vec<WindElement>,
    #[serde(rename = "precipitation", default)]
    precipitation: Vec<PrecipitationElement>,
}

/// `<windSpeed id="ff" mps="..."/>` or `<windGust id="ff_gust" mps="..."/>`.
#[derive(Debug, Deserialize)]
struct WindElement {
    id: Option<String>,
    mps: Option<f64>,
}

/// `<precipitation value="..."/>`, optionally banded with
/// `minvalue`/`maxvalue` depending on the feed variant.
#[derive(Debug, Deserialize)]
struct PrecipitationElement {
    value: Option<f64>,
    minvalue: Option<f64>,
    maxvalue: Option<f64>,
}

// ============================================================================
// Feed client
// ============================================================================

/// Fetch the complete raw feed document.
///
/// Non-2xx responses and transport failures are both fatal for the run;
/// no partial parsing is attempted.
pub fn fetch_feed(client: &reqwest::blocking::Client, url: &str) -> Result<String, CheckError> {
    let response = client
        .get(url)
        .header("User-Agent", FEED_USER_AGENT)
        .send()
        .map_err(|e| CheckError::FeedTransport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(CheckError::FeedHttp(status.as_u16()));
    }

    response.text().map_err(|e| CheckError::FeedTransport(e.to_string()))
}

// ============================================================================
// Feed parsing
// ============================================================================

/// Parse the raw feed into observations within the look-ahead horizon.
///
/// An unparsable document is a fatal error. Individual intervals with
/// missing instants, no location data, or no recognized phenomenon
/// values are skipped silently. Output preserves document order, which
/// is the feed's chronological order.
pub fn parse_feed(
    raw: &str,
    horizon_days: i64,
    now: DateTime<Utc>,
) -> Result<Vec<Observation>, CheckError> {
    let doc: WeatherData =
        serde_xml_rs::from_str(raw).map_err(|e| CheckError::FeedParse(e.to_string()))?;

    Ok(doc
        .product
        .times
        .iter()
        .filter_map(|node| parse_time_node(node, horizon_days, now))
        .collect())
}

fn parse_time_node(node: &TimeNode, horizon_days: i64, now: DateTime<Utc>) -> Option<Observation> {
    let from = node.from.as_deref()?;
    node.to.as_deref()?;

    let timestamp = DateTime::parse_from_rfc3339(from).ok()?.with_timezone(&Utc);
    if !within_horizon(timestamp, horizon_days, now) {
        return None;
    }

    let location = node.locations.first()?;
    let observation = Observation {
        timestamp,
        date: timestamp.date_naive(),
        wind_gust_mps: extract_wind(&location.wind_gust, ELEM_WIND_GUST),
        wind_speed_mps: extract_wind(&location.wind_speed, ELEM_WIND_SPEED),
        precipitation_mm: extract_precipitation(&location.precipitation),
    };

    observation.has_data().then_some(observation)
}

/// An interval qualifies when its UTC calendar date differs from today's
/// (today's partial day is always excluded, regardless of horizon) and it
/// starts no later than `now + horizon_days`. There is no lower bound
/// beyond the today-exclusion; the feed does not publish past intervals
/// in practice.
fn within_horizon(timestamp: DateTime<Utc>, horizon_days: i64, now: DateTime<Utc>) -> bool {
    if timestamp.date_naive() == now.date_naive() {
        return false;
    }
    timestamp <= now + Duration::days(horizon_days)
}

/// First element carrying the canonical identifier wins; any other ids
/// the feed publishes under the same tag are ignored. No match means no
/// value, never zero.
fn extract_wind(elements: &[WindElement], expected_id: &str) -> Option<f64> {
    elements
        .iter()
        .find(|element| element.id.as_deref() == Some(expected_id))
        .and_then(|element| element.mps)
}

/// Reads the first precipitation element. A `minvalue`/`maxvalue` pair
/// yields a band whose representative value is the `value` attribute, or
/// `maxvalue` when the feed omits one; otherwise the plain `value`.
fn extract_precipitation(elements: &[PrecipitationElement]) -> Option<Precipitation> {
    let element = elements.first()?;
    match (element.minvalue, element.maxvalue) {
        (Some(min), Some(max)) => Some(Precipitation::Band {
            min,
            value: element.value.unwrap_or(max),
            max,
        }),
        _ => element.value.map(Precipitation::Amount),
    }
}

// ============================================================================
// Tests
// ============================================================================
