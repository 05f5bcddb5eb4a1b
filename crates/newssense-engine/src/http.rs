//! Blocking JSON client shared by the HTTP model back-ends.
//!
//! Clients built here block the calling thread. Build and call them from
//! `spawn_blocking` or a plain thread, never from an async task.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::EngineError;

pub(crate) fn build_client(timeout: Duration) -> Result<Client, EngineError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| EngineError::ModelUnavailable(format!("failed to build HTTP client: {e}")))
}

/// POST `body` as JSON and decode the JSON reply.
///
/// A refused connection means the whole back-end is gone and maps to
/// [`EngineError::ModelUnavailable`]. Timeouts, error statuses and bad
/// payloads map to [`EngineError::Inference`].
pub(crate) fn post_json<B, R>(
    client: &Client,
    url: &str,
    body: &B,
    stage: &'static str,
) -> Result<R, EngineError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let response = client.post(url).json(body).send().map_err(|e| {
        if e.is_connect() {
            EngineError::ModelUnavailable(format!("{stage} service unreachable at {url}: {e}"))
        } else {
            EngineError::Inference {
                stage,
                reason: format!("request failed: {e}"),
            }
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(EngineError::Inference {
            stage,
            reason: format!("service returned status {status}"),
        });
    }

    response.json().map_err(|e| EngineError::Inference {
        stage,
        reason: format!("response parse error: {e}"),
    })
}
