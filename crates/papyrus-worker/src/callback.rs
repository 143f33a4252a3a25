use papyrus_core::models::outcome::JobOutcome;
use papyrus_core::models::status::Status;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

pub const DELIVERY_FAILED: &str = "Callback: unexpected error";

/// Result of posting a job outcome to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackOutcome {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CallbackOutcome {
    pub fn delivered(status: Status) -> Self {
        Self {
            status,
            message: None,
        }
    }

    pub fn failed() -> Self {
        Self {
            status: Status::Error,
            message: Some(DELIVERY_FAILED.to_string()),
        }
    }
}

/// POST `outcome` to `url`.
///
/// A transport error or a non-2xx answer is a failed delivery: it is logged,
/// followed by a single best-effort `{"error": ...}` POST, and reported as
/// an error outcome. Nothing is retried beyond that.
pub async fn deliver(client: &reqwest::Client, url: &str, outcome: &JobOutcome) -> CallbackOutcome {
    let sent = client
        .post(url)
        .json(&outcome.callback_body())
        .send()
        .await
        .and_then(|response| response.error_for_status());

    match sent {
        Ok(response) => {
            info!(url = %url, status = %outcome.status, code = response.status().as_u16(), "callback delivered");
            CallbackOutcome::delivered(outcome.status)
        }
        Err(e) => {
            error!(url = %url, error = %e, "callback delivery failed");
            if let Err(e) = client
                .post(url)
                .json(&json!({ "error": e.to_string() }))
                .send()
                .await
            {
                warn!(url = %url, error = %e, "error notification failed");
            }
            CallbackOutcome::failed()
        }
    }
}
