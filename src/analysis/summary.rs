//! Per-day observation rollups for the progress log.
//!
//! These summaries describe everything the parser produced, qualifying
//! or not, so the log shows the forecast the thresholds were judged
//! against. They feed the log only and play no part in warning
//! evaluation.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::model::{Observation, Phenomenon};

/// Rollup of one day's observations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DaySummary {
    pub max_wind_gust_mps: f64,
    pub max_wind_speed_mps: f64,
    pub total_precipitation_mm: f64,
    pub wind_samples: usize,
    pub precipitation_samples: usize,
}

/// Group observations by calendar date. Ascending date order falls out
/// of the `BTreeMap`.
pub fn summarize_by_day(observations: &[Observation]) -> BTreeMap<NaiveDate, DaySummary> {
    let mut days: BTreeMap<NaiveDate, DaySummary> = BTreeMap::new();

    for observation in observations {
        let day = days.entry(observation.date).or_default();

        if let Some(gust) = observation.wind_gust_mps {
            day.max_wind_gust_mps = day.max_wind_gust_mps.max(gust);
            day.wind_samples += 1;
        }
        if let Some(speed) = observation.wind_speed_mps {
            day.max_wind_speed_mps = day.max_wind_speed_mps.max(speed);
        }
        if let Some(precipitation) = observation.precipitation_mm {
            day.total_precipitation_mm += precipitation.amount();
            day.precipitation_samples += 1;
        }
    }

    days
}

/// One log line for a day's summary, phrased for the phenomenon being
/// reported. Days without samples get an explicit no-data marker so a
/// silent feed gap is visible in the log.
pub fn display_line(summary: &DaySummary, phenomenon: Phenomenon) -> String {
    match phenomenon {
        Phenomenon::Precipitation => {
            if summary.precipitation_samples == 0 {
                "no precipitation data".to_string()
            } else {
                format!("{:.1} mm", summary.total_precipitation_mm)
            }
        }
        Phenomenon::Wind => {
            if summary.wind_samples == 0 {
                "no wind data".to_string()
            } else {
                let mut line = format!("gusts {:.1} m/s", summary.max_wind_gust_mps);
                if summary.max_wind_speed_mps > 0.0 {
                    line.push_str(&format!(", wind {:.1} m/s", summary.max_wind_speed_mps));
                }
                line
            }
        }
        Phenomenon::Both => {
            let wind = display_line(summary, Phenomenon::Wind);
            let precipitation = display_line(summary, Phenomenon::Precipitation);
            format!("{}; precipitation {}", wind, precipitation)
        }
    }
}
