use std::time::Duration;

use crate::config::llm_provider::LlmProvider;

/// Hard ceiling for a single upstream call.
pub const MAX_TIMEOUT_SECS: u64 = 30;

/// Configuration for one chat-completion model.
///
/// Built once at startup and shared read-only afterwards.
///
/// # Fields
///
/// - `provider`: which OpenAI-compatible upstream is targeted.
/// - `model`: model identifier (e.g. `"llama-3.3-70b-versatile"`).
/// - `endpoint`: base URL; `/v1/chat/completions` is appended.
/// - `api_key`: bearer credential. `None` means the service is not configured.
/// - `max_tokens`: completion token cap.
/// - `temperature`: sampling temperature.
/// - `json_mode`: request `response_format = {"type": "json_object"}`.
/// - `timeout_secs`: per-call timeout, clamped to [`MAX_TIMEOUT_SECS`].
///
/// # Examples
///
/// ```
/// use ai_llm_service::{LlmModelConfig, LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::Groq,
///     model: "llama-3.3-70b-versatile".to_string(),
///     endpoint: "https://api.groq.com/openai".to_string(),
///     api_key: Some("gsk-...".to_string()),
///     max_tokens: Some(500),
///     temperature: Some(0.7),
///     json_mode: true,
///     timeout_secs: Some(30),
/// };
/// assert_eq!(cfg.timeout().as_secs(), 30);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub json_mode: bool,
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Effective timeout: configured value bounded to `1..=MAX_TIMEOUT_SECS`.
    pub fn timeout(&self) -> Duration {
        let secs = self
            .timeout_secs
            .unwrap_or(MAX_TIMEOUT_SECS)
            .clamp(1, MAX_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    /// Whether a usable (non-blank) credential is present.
    pub fn has_credential(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }
}
