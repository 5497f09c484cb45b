use reqwest::StatusCode;
use thiserror::Error;

/// Failure while fetching advisories. All variants are terminal for the run;
/// nothing is retried.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The API answered with a non-success status. Carries the best-effort
    /// response body, or the status reason phrase when the body is unreadable.
    #[error("GitHub API error {status} for {url}: {message}")]
    Remote {
        status: StatusCode,
        url: String,
        message: String,
    },

    /// The response decoded, but not to the JSON array the endpoint promises.
    #[error("unexpected response from {url}: {detail}")]
    Protocol { url: String, detail: String },

    /// Transport-level failure: connect, timeout, or reading the body.
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build HTTP client")]
    BuildClient(#[source] reqwest::Error),
}

impl FetchError {
    /// Status code for remote errors, `None` otherwise.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}
