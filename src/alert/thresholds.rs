//! Threshold crossing detection.
//!
//! Classifies parsed observations into warnings for a requested
//! phenomenon class. Gust data takes precedence over sustained wind:
//! an instant that published a gust figure is judged on the gust alone,
//! and sustained wind is evaluated only as a fallback for instants with
//! no gust figure at all.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::config::Config;
use crate::model::{Observation, Phenomenon, Warning, THRESHOLD_CMP};

/// Configured warning thresholds, read-only for the duration of a run.
///
/// `wind_speed_mps` is optional: without it, sustained-wind fallback
/// alerting is disabled and gust-free instants never warn for wind.
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    pub wind_gust_mps: f64,
    pub wind_speed_mps: Option<f64>,
    pub precipitation_mm: f64,
}

impl Thresholds {
    pub fn from_config(config: &Config) -> Self {
        Thresholds {
            wind_gust_mps: config.wind_gust_threshold_mps,
            wind_speed_mps: config.wind_speed_threshold_mps,
            precipitation_mm: config.precipitation_threshold_mm,
        }
    }
}

/// Classify observations against thresholds for one phenomenon class.
///
/// Returns the warnings in input order together with the distinct set of
/// dates they fall on. Empty input yields empty output; evaluation never
/// fails.
pub fn evaluate(
    observations: &[Observation],
    phenomenon: Phenomenon,
    thresholds: &Thresholds,
) -> (Vec<Warning>, BTreeSet<NaiveDate>) {
    let mut warnings = Vec::new();
    let mut warning_dates = BTreeSet::new();

    for observation in observations {
        let strong_gust = match observation.wind_gust_mps {
            Some(gust) => THRESHOLD_CMP.crossed(gust, thresholds.wind_gust_mps),
            None => false,
        };

        // Sustained wind is a fallback: it only fires when the instant
        // published no gust figure at all.
        let strong_sustained = observation.wind_gust_mps.is_none()
            && match (observation.wind_speed_mps, thresholds.wind_speed_mps) {
                (Some(speed), Some(threshold)) => THRESHOLD_CMP.crossed(speed, threshold),
                _ => false,
            };

        let heavy_precipitation = match observation.precipitation_mm {
            Some(precipitation) => {
                THRESHOLD_CMP.crossed(precipitation.amount(), thresholds.precipitation_mm)
            }
            None => false,
        };

        let include = match phenomenon {
            Phenomenon::Wind => strong_gust || strong_sustained,
            Phenomenon::Precipitation => heavy_precipitation,
            Phenomenon::Both => strong_gust || strong_sustained || heavy_precipitation,
        };
        if !include {
            continue;
        }

        // One reason per crossing, naming the phenomenon and the measured
        // value (never the threshold).
        let mut reasons = Vec::new();
        if strong_gust {
            if let Some(gust) = observation.wind_gust_mps {
                reasons.push(format!("wind gusts {:.1} m/s", gust));
            }
        }
        if strong_sustained {
            if let Some(speed) = observation.wind_speed_mps {
                reasons.push(format!("sustained wind {:.1} m/s", speed));
            }
        }
        if heavy_precipitation {
            if let Some(precipitation) = observation.precipitation_mm {
                reasons.push(format!("precipitation {:.1} mm", precipitation.amount()));
            }
        }

        warning_dates.insert(observation.date);
        warnings.push(Warning {
            date: observation.date,
            timestamp: observation.timestamp,
            wind_gust_mps: observation.wind_gust_mps,
            wind_speed_mps: observation.wind_speed_mps,
            precipitation_mm: observation.precipitation_mm,
            reasons,
        });
    }

    (warnings, warning_dates)
}
