//! Typed error for the wellness relay.

use std::time::Duration;

use thiserror::Error;

/// Message returned when no upstream credential is configured.
pub const NOT_CONFIGURED_MESSAGE: &str =
    "AI service is not configured yet. Please set the GROQ_API_KEY environment variable.";

#[derive(Debug, Error)]
pub enum RelayError {
    /// No upstream credential; no call was attempted.
    #[error("{}", NOT_CONFIGURED_MESSAGE)]
    ConfigurationMissing,

    /// The request's `message` is blank.
    #[error("message must not be empty")]
    EmptyMessage,

    /// Upstream answered with a non-success status; body is relayed verbatim.
    #[error("{provider} API error: {body}")]
    UpstreamRejected {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// Upstream did not answer within the bound.
    #[error("AI service timeout")]
    Timeout(Duration),

    /// Upstream could not be reached. The detail is for logs only.
    #[error("Service temporarily unavailable")]
    TransportFailure(String),

    /// Catch-all for everything else.
    #[error("Internal server error: {0}")]
    UnexpectedInternal(String),
}
