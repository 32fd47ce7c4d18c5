use reqwest::StatusCode;
use thiserror::Error;

/// Raised before any request is made, when the entered location is unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a location")]
    EmptyLocation,
}

/// Anything that goes wrong between sending a prediction request and
/// holding a decoded [`Forecast`](crate::Forecast).
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("failed to reach prediction service at {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("prediction service returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to parse prediction response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("prediction response has {dates} dates but {temperatures} temperatures")]
    MismatchedLengths { dates: usize, temperatures: usize },

    #[error("prediction request stopped unexpectedly: {0}")]
    TaskFailed(#[source] tokio::task::JoinError),
}
