//! Warning aggregation and message rendering.
//!
//! Wind warnings collapse to one line per day carrying the day's maximum
//! gust and maximum sustained wind (daily-max policy). Precipitation
//! warnings collapse to one line per day carrying the day's total
//! amount, rendered as a `min - max` range when the feed supplied bands
//! with differing bounds. All magnitudes render with exactly one
//! fractional digit and dates as ISO calendar dates; iteration over a
//! `BTreeMap` gives ascending date order.
//!
//! A phenomenon with nothing to say yields `None`, never an empty-bodied
//! message.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::model::{Precipitation, Warning};

/// Header prepended to every precipitation message. The word
/// "precipitation" is the stable marker for this phenomenon.
pub const PRECIPITATION_HEADER: &str = "⚠️ Heavy precipitation expected:";

/// Header prepended to every wind message. The word "gusts" is the
/// stable marker for this phenomenon.
pub const WIND_HEADER: &str = "⚠️ Strong wind gusts expected:";

// ---------------------------------------------------------------------------
// Precipitation
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy)]
struct DayPrecipitation {
    total: f64,
    min_total: f64,
    max_total: f64,
    banded: bool,
}

/// Render the per-day precipitation summary, or `None` when no day ends
/// up with a positive total.
pub fn format_precipitation_message(warnings: &[Warning]) -> Option<String> {
    let mut days: BTreeMap<NaiveDate, DayPrecipitation> = BTreeMap::new();

    for warning in warnings {
        let Some(precipitation) = warning.precipitation_mm else {
            continue;
        };
        let day = days.entry(warning.date).or_default();
        let (min, max) = precipitation.bounds();
        day.total += precipitation.amount();
        day.min_total += min;
        day.max_total += max;
        if matches!(precipitation, Precipitation::Band { .. }) {
            day.banded = true;
        }
    }

    let mut lines = Vec::new();
    for (date, day) in &days {
        if day.total <= 0.0 {
            continue;
        }
        if day.banded && day.min_total != day.max_total {
            lines.push(format!(
                "{} – precipitation {:.1} - {:.1} mm",
                date, day.min_total, day.max_total
            ));
        } else {
            lines.push(format!("{} – precipitation {:.1} mm", date, day.total));
        }
    }

    if lines.is_empty() {
        return None;
    }
    Some(format!("{}\n{}", PRECIPITATION_HEADER, lines.join("\n")))
}

// ---------------------------------------------------------------------------
// Wind
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy)]
struct DayWind {
    max_gust: f64,
    max_speed: f64,
}

/// Render the per-day wind summary (daily-max policy), or `None` when no
/// day has a positive maximum.
///
/// A day whose warnings were all sustained-wind fallbacks (no gust
/// figure the whole day) still renders, with a gust-free line.
pub fn format_wind_message(warnings: &[Warning]) -> Option<String> {
    let mut days: BTreeMap<NaiveDate, DayWind> = BTreeMap::new();

    for warning in warnings {
        let day = days.entry(warning.date).or_default();
        if let Some(gust) = warning.wind_gust_mps {
            day.max_gust = day.max_gust.max(gust);
        }
        if let Some(speed) = warning.wind_speed_mps {
            day.max_speed = day.max_speed.max(speed);
        }
    }

    let mut lines = Vec::new();
    for (date, day) in &days {
        if day.max_gust > 0.0 {
            let mut line = format!("{} – gusts up to {:.1} m/s", date, day.max_gust);
            if day.max_speed > 0.0 {
                line.push_str(&format!(", wind up to {:.1} m/s", day.max_speed));
            }
            lines.push(line);
        } else if day.max_speed > 0.0 {
            lines.push(format!("{} – wind up to {:.1} m/s", date, day.max_speed));
        }
    }

    if lines.is_empty() {
        return None;
    }
    Some(format!("{}\n{}", WIND_HEADER, lines.join("\n")))
}
