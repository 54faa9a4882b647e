//! Blocking HTTP fetch of the letters document.

use std::time::Duration;

use tracing::debug;

use crate::error::{LetterError, Result};
use crate::model::letter::Letter;

/// GET `url` and decode the letters document.
pub fn fetch(url: &str, timeout: Duration) -> Result<Vec<Letter>> {
    debug!(url, timeout_ms = timeout.as_millis() as u64, "Fetching letters");

    let response = ureq::get(url)
        .timeout(timeout)
        .set("Accept", "application/json")
        .call();

    match response {
        Ok(resp) => {
            let status = resp.status();
            let body = resp
                .into_string()
                .map_err(|e| LetterError::Transport(format!("read body: {e}")))?;
            super::parse_response(status, &body)
        }
        Err(ureq::Error::Status(code, resp)) => {
            let body = resp.into_string().unwrap_or_default();
            super::parse_response(code, &body)
        }
        Err(err) => Err(LetterError::Transport(err.to_string())),
    }
}
