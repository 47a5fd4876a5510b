//! End-to-end pipeline tests over embedded feed documents.
//!
//! These tests drive the full chain raw XML -> observations -> warnings
//! -> rendered bodies -> recipient messages with a fixed injected "now",
//! so every assertion is deterministic and no network access is needed.
//! Webhook delivery itself is exercised only through its
//! missing-configuration path.

use chrono::{DateTime, TimeZone, Utc};

use metwarn_service::alert::messages::{format_precipitation_message, format_wind_message};
use metwarn_service::alert::thresholds::{evaluate, Thresholds};
use metwarn_service::config::Config;
use metwarn_service::ingest::metno::parse_feed;
use metwarn_service::model::{CheckError, Phenomenon};
use metwarn_service::notify::{expand, generate_messages};
use metwarn_service::run::{run, RunOutcome};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// A fixed "now" used across all tests: 2024-03-01 12:00:00 UTC.
fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

fn test_thresholds() -> Thresholds {
    Thresholds {
        wind_gust_mps: 15.0,
        wind_speed_mps: Some(10.0),
        precipitation_mm: 5.0,
    }
}

fn test_config() -> Config {
    Config {
        latitude: 56.95,
        longitude: 24.1,
        wind_gust_threshold_mps: 15.0,
        wind_speed_threshold_mps: Some(10.0),
        precipitation_threshold_mm: 5.0,
        precipitation_days_ahead: 2,
        wind_days_ahead: 3,
        precipitation_recipients: vec!["p-100".to_string()],
        wind_recipients: vec!["w-100".to_string(), "w-200".to_string()],
        endpoint_url: None,
        bearer_token: None,
        replay_file: None,
    }
}

fn feed_document(times: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<weatherdata xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" created="2024-03-01T11:00:00Z">
  <meta><model name="met_public_forecast"/></meta>
  <product class="pointData">
{}
  </product>
</weatherdata>"#,
        times
    )
}

fn gust_interval(from: &str, gust: f64, speed: f64) -> String {
    format!(
        r#"<time datatype="forecast" from="{from}" to="{from}">
             <location latitude="56.95" longitude="24.1">
               <windGust id="ff_gust" mps="{gust}"/>
               <windSpeed id="ff" mps="{speed}"/>
             </location>
           </time>"#
    )
}

fn precipitation_interval(from: &str, to: &str, value: f64) -> String {
    format!(
        r#"<time datatype="forecast" from="{from}" to="{to}">
             <location latitude="56.95" longitude="24.1">
               <precipitation unit="mm" value="{value}"/>
             </location>
           </time>"#
    )
}

// ---------------------------------------------------------------------------
// Scenario A: single qualifying gust
// ---------------------------------------------------------------------------

#[test]
fn test_qualifying_gust_flows_from_feed_to_message_body() {
    let xml = feed_document(&gust_interval("2024-03-02T06:00:00Z", 18.3, 12.0));

    let observations = parse_feed(&xml, 3, fixed_now()).expect("well-formed document");
    assert_eq!(observations.len(), 1);

    let (warnings, dates) = evaluate(&observations, Phenomenon::Wind, &test_thresholds());
    assert_eq!(warnings.len(), 1);
    assert_eq!(dates.len(), 1);
    assert!(
        warnings[0].reasons[0].contains("18.3"),
        "reason names the measured value: {:?}",
        warnings[0].reasons
    );

    let body = format_wind_message(&warnings).expect("one qualifying day");
    assert!(body.contains("2024-03-02"));
    assert!(body.contains("18.3"));
}

// ---------------------------------------------------------------------------
// Scenario B: everything below threshold
// ---------------------------------------------------------------------------

#[test]
fn test_sub_threshold_precipitation_produces_no_messages() {
    let xml = feed_document(&format!(
        "{}\n{}",
        precipitation_interval("2024-03-02T06:00:00Z", "2024-03-02T12:00:00Z", 3.0),
        precipitation_interval("2024-03-02T12:00:00Z", "2024-03-02T18:00:00Z", 4.0),
    ));

    let observations = parse_feed(&xml, 2, fixed_now()).expect("well-formed document");
    assert_eq!(observations.len(), 2);

    let (warnings, _) = evaluate(&observations, Phenomenon::Precipitation, &test_thresholds());
    assert!(warnings.is_empty());

    assert_eq!(format_precipitation_message(&warnings), None);
    let batch = generate_messages(&warnings, &[], &test_config());
    assert!(batch.is_empty(), "no messages regardless of recipient list size");
}

// ---------------------------------------------------------------------------
// Scenario C: banded precipitation
// ---------------------------------------------------------------------------

#[test]
fn test_banded_precipitation_renders_as_range() {
    let xml = feed_document(
        r#"<time datatype="forecast" from="2024-03-02T06:00:00Z" to="2024-03-02T12:00:00Z">
             <location latitude="56.95" longitude="24.1">
               <precipitation unit="mm" value="6.0" minvalue="1.0" maxvalue="6.0"/>
             </location>
           </time>"#,
    );

    let observations = parse_feed(&xml, 2, fixed_now()).expect("well-formed document");
    let (warnings, _) = evaluate(&observations, Phenomenon::Precipitation, &test_thresholds());
    assert_eq!(warnings.len(), 1, "representative value 6.0 crosses threshold 5.0");

    let body = format_precipitation_message(&warnings).expect("qualifying band");
    assert!(
        body.contains("1.0 - 6.0 mm"),
        "band renders as a range, not a single number: {}",
        body
    );
}

// ---------------------------------------------------------------------------
// Scenario D: fetch failure aborts before delivery
// ---------------------------------------------------------------------------

#[test]
fn test_unreadable_feed_is_fatal_and_nothing_is_sent() {
    let mut config = test_config();
    config.replay_file = Some("/nonexistent/metwarn_feed.xml".to_string());

    let client = reqwest::blocking::Client::new();
    let result = run(&config, &client, fixed_now());
    assert!(matches!(result, Err(CheckError::FeedTransport(_))));
}

#[test]
fn test_unparsable_feed_is_fatal() {
    let path = std::env::temp_dir().join("metwarn_garbage_feed.xml");
    std::fs::write(&path, "not a weather document").unwrap();

    let mut config = test_config();
    config.replay_file = Some(path.to_str().unwrap().to_string());

    let client = reqwest::blocking::Client::new();
    let result = run(&config, &client, fixed_now());
    assert!(matches!(result, Err(CheckError::FeedParse(_))));

    let _ = std::fs::remove_file(&path);
}

// ---------------------------------------------------------------------------
// Scenario E: recipient gating
// ---------------------------------------------------------------------------

#[test]
fn test_qualifying_warning_with_no_recipients_yields_no_messages() {
    let xml = feed_document(&gust_interval("2024-03-02T06:00:00Z", 18.3, 12.0));
    let observations = parse_feed(&xml, 3, fixed_now()).expect("well-formed document");
    let (warnings, _) = evaluate(&observations, Phenomenon::Wind, &test_thresholds());
    assert_eq!(warnings.len(), 1);

    let mut config = test_config();
    config.wind_recipients.clear();
    let batch = generate_messages(&[], &warnings, &config);
    assert!(batch.is_empty());
}

// ---------------------------------------------------------------------------
// P4/P5: zero-sum suppression and broadcast fan-out
// ---------------------------------------------------------------------------

#[test]
fn test_broadcast_fan_out_preserves_recipient_order() {
    let recipients = vec!["r1".to_string(), "r2".to_string(), "r3".to_string()];
    let batch = expand(Phenomenon::Precipitation, Some("body"), &recipients);

    assert_eq!(batch.len(), 3);
    let ids: Vec<&str> = batch.iter().map(|m| m.recipient.as_str()).collect();
    assert_eq!(ids, vec!["r1", "r2", "r3"]);
    assert!(batch.iter().all(|m| m.body == "body"));
}

#[test]
fn test_zero_total_days_suppress_the_whole_message() {
    let xml = feed_document(&precipitation_interval(
        "2024-03-02T06:00:00Z",
        "2024-03-02T12:00:00Z",
        0.0,
    ));
    let observations = parse_feed(&xml, 2, fixed_now()).expect("well-formed document");

    // With a zero threshold the zero reading technically "crosses", but a
    // day whose total is zero must never render.
    let zero_thresholds = Thresholds {
        wind_gust_mps: 15.0,
        wind_speed_mps: None,
        precipitation_mm: 0.0,
    };
    let (warnings, _) = evaluate(&observations, Phenomenon::Precipitation, &zero_thresholds);
    assert_eq!(warnings.len(), 1);
    assert_eq!(format_precipitation_message(&warnings), None);
}

// ---------------------------------------------------------------------------
// P6: idempotent re-aggregation
// ---------------------------------------------------------------------------

#[test]
fn test_reevaluating_the_same_feed_yields_identical_bytes() {
    let xml = feed_document(&format!(
        "{}\n{}\n{}",
        gust_interval("2024-03-02T06:00:00Z", 18.3, 12.0),
        gust_interval("2024-03-03T06:00:00Z", 16.0, 9.5),
        precipitation_interval("2024-03-02T06:00:00Z", "2024-03-02T12:00:00Z", 7.5),
    ));
    let now = fixed_now();

    let render = || {
        let wind_observations = parse_feed(&xml, 3, now).expect("well-formed document");
        let (wind_warnings, _) = evaluate(&wind_observations, Phenomenon::Wind, &test_thresholds());

        let precipitation_observations = parse_feed(&xml, 2, now).expect("well-formed document");
        let (precipitation_warnings, _) = evaluate(
            &precipitation_observations,
            Phenomenon::Precipitation,
            &test_thresholds(),
        );

        (
            format_wind_message(&wind_warnings),
            format_precipitation_message(&precipitation_warnings),
        )
    };

    assert_eq!(render(), render());
}

// ---------------------------------------------------------------------------
// Full run over a replayed feed
// ---------------------------------------------------------------------------

#[test]
fn test_run_reports_no_warnings_for_a_calm_forecast() {
    let xml = feed_document(&gust_interval("2024-03-02T06:00:00Z", 4.0, 2.5));
    let path = std::env::temp_dir().join("metwarn_calm_feed.xml");
    std::fs::write(&path, &xml).unwrap();

    let mut config = test_config();
    config.replay_file = Some(path.to_str().unwrap().to_string());

    let client = reqwest::blocking::Client::new();
    let outcome = run(&config, &client, fixed_now()).expect("calm forecast runs cleanly");
    assert_eq!(outcome, RunOutcome::NoWarnings);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_run_with_warnings_but_no_endpoint_is_delivery_incomplete() {
    let xml = feed_document(&gust_interval("2024-03-02T06:00:00Z", 18.3, 12.0));
    let path = std::env::temp_dir().join("metwarn_stormy_feed.xml");
    std::fs::write(&path, &xml).unwrap();

    let mut config = test_config();
    config.replay_file = Some(path.to_str().unwrap().to_string());
    // endpoint_url and bearer_token stay unset: every delivery fails, but
    // the run itself is not fatal.

    let client = reqwest::blocking::Client::new();
    let outcome = run(&config, &client, fixed_now()).expect("delivery failure is not fatal");
    assert_eq!(outcome, RunOutcome::DeliveryIncomplete);

    let _ = std::fs::remove_file(&path);
}
