//! Normalizing relay between the chat endpoint and the completion upstream.
//!
//! Public API: [`Relay::handle`]. It assembles the fixed system prompt, the
//! most recent history and the user message, performs one upstream call,
//! classifies the result ([`UpstreamOutcome`]) and returns either a
//! schema-complete [`ChatResponse`] or a [`RelayError`].
//!
//! Malformed model output never surfaces as an error: it is replaced by
//! [`ChatResponse::fallback`].

mod api_types;
mod error;
mod outcome;
mod prompt;
mod relay;

pub use api_types::{
    ChatRequest, ChatResponse, FALLBACK_INSIGHT, FALLBACK_REPLY, WELLNESS_KEYS, WellnessData,
};
pub use error::{NOT_CONFIGURED_MESSAGE, RelayError};
pub use outcome::{MalformedReason, UpstreamOutcome, parse_model_content};
pub use prompt::{HISTORY_WINDOW, SYSTEM_PROMPT, build_messages};
pub use relay::Relay;
