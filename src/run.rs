//! One complete check: fetch, parse, evaluate, render, deliver.
//!
//! The pipeline is strictly sequential and runs once per invocation.
//! "Now" is computed by the caller exactly once and threaded through
//! every stage, so the today-exclusion and horizons stay consistent
//! even when a run straddles midnight.

use chrono::{DateTime, Utc};

use crate::alert::thresholds::{self, Thresholds};
use crate::analysis::summary;
use crate::config::Config;
use crate::dev_mode;
use crate::ingest::metno;
use crate::logging::{self, DataSource};
use crate::model::{CheckError, Observation, Phenomenon};
use crate::notify::{self, webhook};

/// How a completed (non-fatal) run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// No threshold crossings; nothing was sent.
    NoWarnings,
    /// Warnings existed and every delivery succeeded.
    Delivered,
    /// Warnings existed but at least one delivery failed.
    DeliveryIncomplete,
}

/// Execute one monitoring run against an already-validated configuration.
pub fn run(
    config: &Config,
    client: &reqwest::blocking::Client,
    now: DateTime<Utc>,
) -> Result<RunOutcome, CheckError> {
    logging::info(
        DataSource::System,
        None,
        &format!("location: lat {}, lon {}", config.latitude, config.longitude),
    );
    logging::info(
        DataSource::System,
        None,
        &format!(
            "thresholds: gusts {} m/s, precipitation {} mm",
            config.wind_gust_threshold_mps, config.precipitation_threshold_mm
        ),
    );
    logging::info(DataSource::System, None, &format!("today: {}", now.date_naive()));

    let raw_feed = match &config.replay_file {
        Some(path) => {
            logging::warn(DataSource::Feed, None, &format!("replaying saved feed from {}", path));
            dev_mode::load_saved_feed(path)?
        }
        None => metno::fetch_feed(client, &config.api_url())?,
    };

    let precipitation_data = metno::parse_feed(&raw_feed, config.precipitation_days_ahead, now)?;
    log_forecast_summary(
        "precipitation forecast",
        &precipitation_data,
        config.precipitation_days_ahead,
        Phenomenon::Precipitation,
    );
    let (precipitation_warnings, precipitation_dates) = thresholds::evaluate(
        &precipitation_data,
        Phenomenon::Precipitation,
        &Thresholds::from_config(config),
    );

    let wind_data = metno::parse_feed(&raw_feed, config.wind_days_ahead, now)?;
    log_forecast_summary("wind forecast", &wind_data, config.wind_days_ahead, Phenomenon::Wind);
    let (wind_warnings, wind_dates) =
        thresholds::evaluate(&wind_data, Phenomenon::Wind, &Thresholds::from_config(config));

    logging::info(
        DataSource::System,
        None,
        &format!(
            "warnings: {} precipitation across {} days, {} wind across {} days",
            precipitation_warnings.len(),
            precipitation_dates.len(),
            wind_warnings.len(),
            wind_dates.len()
        ),
    );

    if !wind_warnings.is_empty() {
        logging::info(DataSource::System, None, "first wind warnings:");
        for warning in wind_warnings.iter().take(5) {
            logging::info(
                DataSource::System,
                None,
                &format!(
                    "  {} {}: {}",
                    warning.date,
                    warning.timestamp.format("%H:%M"),
                    warning.reasons.join(", ")
                ),
            );
        }
        if wind_warnings.len() > 5 {
            logging::info(
                DataSource::System,
                None,
                &format!("  ... and {} more", wind_warnings.len() - 5),
            );
        }
    }

    let messages = notify::generate_messages(&precipitation_warnings, &wind_warnings, config);
    if messages.is_empty() {
        logging::info(DataSource::System, None, "no warnings to send");
        return Ok(RunOutcome::NoWarnings);
    }

    log_message_bodies(&messages, Phenomenon::Precipitation, "precipitation messages:");
    log_message_bodies(&messages, Phenomenon::Wind, "wind messages:");

    logging::info(DataSource::System, None, &format!("sending {} messages", messages.len()));
    let delivered = webhook::deliver_all(client, config, &messages);
    logging::log_delivery_summary(messages.len(), delivered, messages.len() - delivered);

    if delivered == messages.len() {
        Ok(RunOutcome::Delivered)
    } else {
        Ok(RunOutcome::DeliveryIncomplete)
    }
}

fn log_forecast_summary(
    title: &str,
    observations: &[Observation],
    horizon_days: i64,
    phenomenon: Phenomenon,
) {
    logging::info(
        DataSource::Feed,
        None,
        &format!("{} ({} days, {} observations):", title, horizon_days, observations.len()),
    );
    for (date, day) in summary::summarize_by_day(observations) {
        logging::info(
            DataSource::Feed,
            None,
            &format!("  {}: {}", date, summary::display_line(&day, phenomenon)),
        );
    }
}

/// Messages are grouped for the log by their explicit phenomenon tag,
/// never by matching the rendered text.
fn log_message_bodies(messages: &[crate::model::Message], phenomenon: Phenomenon, title: &str) {
    let group: Vec<_> = messages.iter().filter(|m| m.phenomenon == phenomenon).collect();
    if group.is_empty() {
        return;
    }

    logging::info(DataSource::System, None, title);
    for message in group {
        let rendered = serde_json::to_string_pretty(message)
            .unwrap_or_else(|_| format!("to {}: {}", message.recipient, message.body));
        logging::info(DataSource::System, None, &rendered);
    }
}
