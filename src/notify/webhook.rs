//! Webhook delivery for rendered messages.
//!
//! Each message is POSTed to the configured endpoint as a small JSON
//! document with a bearer token. One request per message, one attempt
//! per request: a failed delivery is logged and reported to the caller
//! as `false`, and later recipients are still attempted.

use serde::Serialize;

use crate::config::Config;
use crate::logging::{self, DataSource};
use crate::model::Message;

/// Wire format accepted by the notification endpoint.
#[derive(Debug, Serialize)]
struct DeliveryPayload<'a> {
    recipient: &'a str,
    message: &'a str,
}

/// POST one message. Returns whether the endpoint acknowledged it with a
/// 2xx status.
pub fn deliver(
    client: &reqwest::blocking::Client,
    endpoint_url: &str,
    bearer_token: &str,
    message: &Message,
) -> bool {
    let payload = DeliveryPayload {
        recipient: &message.recipient,
        message: &message.body,
    };

    let result = client
        .post(endpoint_url)
        .bearer_auth(bearer_token)
        .json(&payload)
        .send();

    match result {
        Ok(response) if response.status().is_success() => {
            logging::info(DataSource::Webhook, Some(message.recipient.as_str()), "message delivered");
            true
        }
        Ok(response) => {
            logging::error(
                DataSource::Webhook,
                Some(message.recipient.as_str()),
                &format!("delivery rejected: HTTP {}", response.status().as_u16()),
            );
            false
        }
        Err(e) => {
            logging::error(
                DataSource::Webhook,
                Some(message.recipient.as_str()),
                &format!("delivery failed: {}", e),
            );
            false
        }
    }
}

/// Deliver a batch in order, one attempt per message. Returns the number
/// delivered; a failure never blocks the remaining recipients.
///
/// Without a configured endpoint and token nothing can be sent; the
/// batch counts as fully failed.
pub fn deliver_all(
    client: &reqwest::blocking::Client,
    config: &Config,
    messages: &[Message],
) -> usize {
    let (Some(endpoint_url), Some(bearer_token)) = (&config.endpoint_url, &config.bearer_token)
    else {
        logging::error(
            DataSource::Webhook,
            None,
            "ENDPOINT_URL or BEARER_TOKEN is not configured; cannot deliver",
        );
        return 0;
    };

    let mut delivered = 0;
    for message in messages {
        logging::info(
            DataSource::Webhook,
            Some(message.recipient.as_str()),
            "sending message",
        );
        if deliver(client, endpoint_url, bearer_token, message) {
            delivered += 1;
        }
    }
    delivered
}
