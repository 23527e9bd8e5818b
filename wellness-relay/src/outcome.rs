//! Classification of one upstream exchange.
//!
//! [`UpstreamOutcome::classify`] turns the raw client result into exactly one
//! outcome; [`crate::Relay`] then switches on it.

use std::time::Duration;

use ai_llm_service::AiLlmError;
use serde_json::Value;

use crate::api_types::{ChatResponse, WellnessData};

/// Why model content was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// Content is not JSON at all.
    NotJson(String),
    /// Content is JSON but not an object.
    NotAnObject,
    /// A required top-level key is absent.
    MissingKey(&'static str),
    /// `reply` is present but not a string.
    ReplyNotText,
    /// `data` is present but not an object.
    DataNotObject,
}

impl std::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedReason::NotJson(e) => write!(f, "content is not valid JSON: {e}"),
            MalformedReason::NotAnObject => f.write_str("content is not a JSON object"),
            MalformedReason::MissingKey(k) => write!(f, "content lacks `{k}`"),
            MalformedReason::ReplyNotText => f.write_str("`reply` is not a string"),
            MalformedReason::DataNotObject => f.write_str("`data` is not an object"),
        }
    }
}

/// Result of one upstream exchange, as seen by the relay.
#[derive(Debug)]
pub enum UpstreamOutcome {
    /// Content parsed into a complete, repaired response.
    Success(ChatResponse),
    /// No credential; no call was made.
    ConfigMissing,
    /// Upstream answered with a non-success status.
    UpstreamRejected { status: u16, body: String },
    /// The call exceeded its bound.
    Timeout(Duration),
    /// Connection-level failure.
    TransportFailure(String),
    /// Upstream answered but the model text is unusable.
    MalformedPayload { reason: MalformedReason, content: String },
    /// Anything else (undecodable envelope, client setup).
    UnexpectedInternal(String),
}

impl UpstreamOutcome {
    /// Maps the client result onto an outcome.
    pub fn classify(result: Result<String, AiLlmError>) -> Self {
        match result {
            Ok(content) => match parse_model_content(&content) {
                Ok(response) => UpstreamOutcome::Success(response),
                Err(reason) => UpstreamOutcome::MalformedPayload { reason, content },
            },
            Err(AiLlmError::MissingApiKey) => UpstreamOutcome::ConfigMissing,
            Err(AiLlmError::Http(e)) => UpstreamOutcome::UpstreamRejected {
                status: e.status.as_u16(),
                body: e.body,
            },
            Err(AiLlmError::Timeout(d)) => UpstreamOutcome::Timeout(d),
            Err(AiLlmError::Transport(e)) => UpstreamOutcome::TransportFailure(e.to_string()),
            Err(AiLlmError::Decode(_) | AiLlmError::EmptyChoices) => {
                UpstreamOutcome::UnexpectedInternal("AI returned invalid response format".into())
            }
            Err(other) => UpstreamOutcome::UnexpectedInternal(other.to_string()),
        }
    }
}

/// Parses the model's text into a [`ChatResponse`], repairing `data`.
///
/// Requires a JSON object with a string `reply` and an object `data`.
/// Extra top-level keys are ignored.
pub fn parse_model_content(content: &str) -> Result<ChatResponse, MalformedReason> {
    let value: Value =
        serde_json::from_str(content.trim()).map_err(|e| MalformedReason::NotJson(e.to_string()))?;

    let Value::Object(mut obj) = value else {
        return Err(MalformedReason::NotAnObject);
    };

    let reply = match obj.remove("reply") {
        Some(Value::String(s)) => s,
        Some(_) => return Err(MalformedReason::ReplyNotText),
        None => return Err(MalformedReason::MissingKey("reply")),
    };

    let data = match obj.remove("data") {
        Some(Value::Object(map)) => WellnessData::repair(map),
        Some(_) => return Err(MalformedReason::DataNotObject),
        None => return Err(MalformedReason::MissingKey("data")),
    };

    Ok(ChatResponse { reply, data })
}
