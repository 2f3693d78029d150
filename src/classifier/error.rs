//! Classifier failure causes.

use thiserror::Error;

/// Why a classification attempt failed.
///
/// Everything except `MissingCredential` is recovered by the gateway: the
/// cause is logged and every title falls back to Distracting.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The backend needs a credential that was not configured.
    #[error("{0} not found")]
    MissingCredential(&'static str),

    /// The model did not answer within the transport timeout.
    #[error("model request timed out after {0}s")]
    Timeout(u64),

    /// The model endpoint could not be reached.
    #[error("cannot connect to model endpoint at {0}")]
    Connect(String),

    /// Any other transport failure. Built only through
    /// [`ClassifierError::from_request`], which drops the request URL.
    #[error("model request failed: {0}")]
    Transport(reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("model API error {status}: {body}")]
    Api { status: u16, body: String },

    /// The model answered with no text.
    #[error("model returned an empty response")]
    EmptyResponse,

    /// The text was not a JSON object of string values.
    #[error("unparseable classification response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ClassifierError {
    /// Map a reqwest failure onto the more specific variants.
    ///
    /// The URL is stripped from the wrapped error so credentials carried in
    /// it never reach the logs.
    pub fn from_request(err: reqwest::Error, endpoint: &str, timeout_seconds: u64) -> Self {
        if err.is_timeout() {
            ClassifierError::Timeout(timeout_seconds)
        } else if err.is_connect() {
            ClassifierError::Connect(endpoint.to_string())
        } else {
            ClassifierError::Transport(err.without_url())
        }
    }
}
