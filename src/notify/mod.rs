//! Outbound notification assembly and delivery.
//!
//! Submodules:
//! - `webhook` - delivers rendered messages to the configured endpoint.
//!
//! This module owns the mapping stage: turning per-phenomenon warning
//! lists into the ordered batch of (recipient, body) messages that the
//! webhook then delivers one at a time.

pub mod webhook;

use crate::alert::messages;
use crate::config::Config;
use crate::model::{Message, Phenomenon, Warning};

/// Fan one rendered body out across its recipient list.
///
/// Every recipient receives an identical body (broadcast, no
/// per-recipient customization). An absent body or an empty recipient
/// list yields no messages.
pub fn expand(phenomenon: Phenomenon, body: Option<&str>, recipients: &[String]) -> Vec<Message> {
    let Some(body) = body else {
        return Vec::new();
    };

    recipients
        .iter()
        .map(|recipient| Message {
            phenomenon,
            recipient: recipient.clone(),
            body: body.to_string(),
        })
        .collect()
}

/// Assemble the full outbound batch: precipitation messages first, then
/// wind messages, each group in recipient-list order.
///
/// A phenomenon with no warnings or no configured recipients is skipped
/// before any formatting work happens.
pub fn generate_messages(
    precipitation_warnings: &[Warning],
    wind_warnings: &[Warning],
    config: &Config,
) -> Vec<Message> {
    let mut batch = Vec::new();

    if !precipitation_warnings.is_empty() && !config.precipitation_recipients.is_empty() {
        let body = messages::format_precipitation_message(precipitation_warnings);
        batch.extend(expand(
            Phenomenon::Precipitation,
            body.as_deref(),
            &config.precipitation_recipients,
        ));
    }

    if !wind_warnings.is_empty() && !config.wind_recipients.is_empty() {
        let body = messages::format_wind_message(wind_warnings);
        batch.extend(expand(Phenomenon::Wind, body.as_deref(), &config.wind_recipients));
    }

    batch
}
