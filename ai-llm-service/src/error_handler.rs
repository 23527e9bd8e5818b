//! Unified error handling for `ai-llm-service`.
//!
//! This module exposes a single top-level error type [`AiLlmError`] for the whole
//! library, and groups domain-specific errors in nested types ([`ConfigError`],
//! [`HttpError`]). Small helpers for reading/validating environment variables are
//! provided and return the unified [`Result<T>`] alias.
//!
//! All messages include the suffix `[AI LLM Service]` to simplify attribution in logs.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, AiLlmError>;

/// Maximum number of characters kept by [`make_snippet`].
pub const SNIPPET_MAX_CHARS: usize = 300;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `ai-llm-service` crate.
///
/// A slow upstream ([`AiLlmError::Timeout`]), an unreachable one
/// ([`AiLlmError::Transport`]) and one that answered with an error status
/// ([`AiLlmError::Http`]) are separate variants.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiLlmError {
    /// Configuration/validation errors (startup).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A client was requested but no API key is configured.
    #[error("[AI LLM Service] API key is not configured")]
    MissingApiKey,

    /// Upstream answered with a non-successful HTTP status.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Operation exceeded the configured timeout.
    #[error("[AI LLM Service] operation timed out after {0:?}")]
    Timeout(Duration),

    /// Connection-level failure (DNS, connect, reset, TLS).
    #[error("[AI LLM Service] transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The completion envelope could not be decoded.
    #[error("[AI LLM Service] decode error: {0}")]
    Decode(String),

    /// The completion envelope held no message content.
    #[error("[AI LLM Service] completion returned no choices with content")]
    EmptyChoices,
}

impl AiLlmError {
    /// Classifies a `reqwest` failure that happened while sending the request
    /// or reading the response body.
    ///
    /// Timeouts carry the configured bound, not the elapsed time.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            AiLlmError::Timeout(timeout)
        } else {
            AiLlmError::Transport(err)
        }
    }
}

/* ------------------------------------------------------------------------- */
/* HTTP status errors                                                        */
/* ------------------------------------------------------------------------- */

/// Non-success response from the upstream.
#[derive(Debug, Error)]
#[error("[AI LLM Service] HTTP {status} from {url}: {snippet}")]
pub struct HttpError {
    /// HTTP status returned by the upstream.
    pub status: StatusCode,
    /// Request URL.
    pub url: String,
    /// Full response body as text (may be empty).
    pub body: String,
    /// Trimmed body for logs, see [`make_snippet`].
    pub snippet: String,
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A number failed to parse (like ports, limits, timeouts).
    #[error("[AI LLM Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `LLM_MAX_TOKENS`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u32`).
        reason: &'static str,
    },

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[AI LLM Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `GROQ_API_URL`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },

    /// A numeric field was outside of the allowed range.
    #[error("[AI LLM Service] {field} is out of range: {detail}")]
    OutOfRange {
        /// Field name (e.g., `LLM_TEMPERATURE`).
        field: &'static str,
        /// Description of the expected range.
        detail: &'static str,
    },

    /// Model name was empty.
    #[error("[AI LLM Service] model name must not be empty")]
    EmptyModel,
}

/* ------------------------------------------------------------------------- */
/* Env helpers (return unified `Result<T>`)                                  */
/* ------------------------------------------------------------------------- */

/// Reads an optional environment variable; blank values count as unset.
///
/// This is the default lookup passed to the `*_with` config constructors.
pub fn env_opt_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses an optional `u32` (`Ok(None)` if unset).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the value is set but not a valid `u32`.
pub fn parse_opt_u32(name: &'static str, raw: Option<String>) -> Result<Option<u32>> {
    parse_opt(name, raw, "expected u32")
}

/// Parses an optional `u64` (`Ok(None)` if unset).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the value is set but not a valid `u64`.
pub fn parse_opt_u64(name: &'static str, raw: Option<String>) -> Result<Option<u64>> {
    parse_opt(name, raw, "expected u64")
}

/// Parses an optional `u16` (`Ok(None)` if unset).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the value is set but not a valid `u16`.
pub fn parse_opt_u16(name: &'static str, raw: Option<String>) -> Result<Option<u16>> {
    parse_opt(name, raw, "expected u16 (0..=65535)")
}

/// Parses an optional `f32` (`Ok(None)` if unset).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the value is set but not a valid `f32`.
pub fn parse_opt_f32(name: &'static str, raw: Option<String>) -> Result<Option<f32>> {
    parse_opt(name, raw, "expected floating point number")
}

fn parse_opt<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    reason: &'static str,
) -> Result<Option<T>> {
    match raw {
        Some(v) => v
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| AiLlmError::from(ConfigError::InvalidNumber { var: name, reason })),
        None => Ok(None),
    }
}

/* ------------------------------------------------------------------------- */
/* Validation helpers (return unified `Result<T>`)                           */
/* ------------------------------------------------------------------------- */

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`ConfigError::InvalidFormat`] when the string does not start with
/// a valid HTTP scheme.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

/// Validates that a floating-point value lies within an inclusive range.
///
/// # Errors
/// Returns [`ConfigError::OutOfRange`] if `value` is outside `[min, max]` or not finite.
pub fn validate_range_f32(
    field: &'static str,
    detail: &'static str,
    value: f32,
    min: f32,
    max: f32,
) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, detail }.into())
    }
}

/// Validates that an integer lies within an inclusive range.
///
/// # Errors
/// Returns [`ConfigError::OutOfRange`] if `value` is outside `[min, max]`.
pub fn validate_range_u64(
    field: &'static str,
    detail: &'static str,
    value: u64,
    min: u64,
    max: u64,
) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, detail }.into())
    }
}

/* ------------------------------------------------------------------------- */
/* Misc                                                                      */
/* ------------------------------------------------------------------------- */

/// Shortens a response body for logging: trims whitespace and keeps at most
/// [`SNIPPET_MAX_CHARS`] characters, appending `…` when truncated.
pub fn make_snippet(text: &str) -> String {
    let trimmed = text.trim();
    let mut chars = trimmed.chars();
    let head: String = chars.by_ref().take(SNIPPET_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}
