use std::process;
use std::time::Duration;

use chrono::Utc;

use metwarn_service::config::Config;
use metwarn_service::logging::{self, DataSource, LogLevel};
use metwarn_service::run::{run, RunOutcome};

const DEFAULT_LOG_FILE: &str = "metwarn.log";
const HTTP_TIMEOUT_SECS: u64 = 30;

fn main() {
    dotenv::dotenv().ok();

    let log_file = std::env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    logging::init_logger(LogLevel::Info, Some(log_file.as_str()));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            logging::error(DataSource::System, None, &e.to_string());
            process::exit(3);
        }
    };

    let client = match reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            logging::error(DataSource::System, None, &format!("HTTP client init failed: {}", e));
            process::exit(3);
        }
    };

    // Computed exactly once and threaded through the whole run.
    let now = Utc::now();

    match run(&config, &client, now) {
        Ok(RunOutcome::NoWarnings) => {
            logging::info(DataSource::System, None, "forecast is within thresholds");
            process::exit(0);
        }
        Ok(RunOutcome::Delivered) => process::exit(1),
        Ok(RunOutcome::DeliveryIncomplete) => process::exit(2),
        Err(e) => {
            logging::error(DataSource::System, None, &e.to_string());
            process::exit(3);
        }
    }
}
