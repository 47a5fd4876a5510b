//! Development mode utilities for working with saved feed documents.
//!
//! When the live API is unavailable (offline development, rate limits),
//! set `REPLAY_FILE` to a previously saved classic-format document and
//! the run reads it instead of fetching. Everything downstream of the
//! fetch behaves identically.

use std::fs;

use crate::model::CheckError;

/// Read a saved raw feed document from disk.
pub fn load_saved_feed(path: &str) -> Result<String, CheckError> {
    fs::read_to_string(path)
        .map_err(|e| CheckError::FeedTransport(format!("replay file {}: {}", path, e)))
}
