/// Upstream provider serving the OpenAI-compatible `/v1/chat/completions` API.
///
/// The provider decides the default base URL and how the upstream is named
/// in logs and error messages.
///
/// # Examples
///
/// ```
/// use ai_llm_service::LlmProvider;
///
/// assert_eq!(LlmProvider::Groq.default_endpoint(), "https://api.groq.com/openai");
/// assert_eq!(LlmProvider::Groq.display_name(), "Groq");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Groq Cloud (OpenAI-compatible surface under `/openai`).
    Groq,
}

impl LlmProvider {
    /// Base URL used when no explicit endpoint is configured.
    pub fn default_endpoint(self) -> &'static str {
        match self {
            LlmProvider::Groq => "https://api.groq.com/openai",
        }
    }

    /// Human-readable name used in error messages surfaced to callers.
    pub fn display_name(self) -> &'static str {
        match self {
            LlmProvider::Groq => "Groq",
        }
    }
}
