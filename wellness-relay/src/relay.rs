use std::time::Instant;

use ai_llm_service::{
    AiLlmError, ChatCompletion, ChatCompletionService, ChatMessage, LlmModelConfig,
};
use tracing::{error, info, instrument, warn};

use crate::{
    api_types::{ChatRequest, ChatResponse},
    error::RelayError,
    outcome::UpstreamOutcome,
    prompt::{build_messages, preview},
};

const LOG_PREVIEW_CHARS: usize = 50;

/// The normalizing relay.
///
/// Holds the upstream client (absent when no credential is configured) and
/// nothing else; it is immutable after construction and shared across
/// concurrent requests.
pub struct Relay<C = ChatCompletionService> {
    backend: Option<C>,
    provider: &'static str,
}

impl Relay<ChatCompletionService> {
    /// Builds the relay from the model config.
    ///
    /// A missing credential is not an error: the relay is built unconfigured
    /// and every [`Relay::handle`] call reports [`RelayError::ConfigurationMissing`].
    ///
    /// # Errors
    /// Propagates [`AiLlmError`] if the HTTP client cannot be built.
    pub fn from_config(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        let provider = cfg.provider.display_name();
        if !cfg.has_credential() {
            warn!(provider, "API key not set; chat requests will report the service as not configured");
            return Ok(Self::unconfigured(provider));
        }
        Ok(Self::new(ChatCompletionService::new(cfg)?, provider))
    }
}

impl<C: ChatCompletion> Relay<C> {
    /// Relay backed by `backend`. `provider` names the upstream in error messages.
    pub fn new(backend: C, provider: &'static str) -> Self {
        Self {
            backend: Some(backend),
            provider,
        }
    }

    /// Relay without a credential.
    pub fn unconfigured(provider: &'static str) -> Self {
        Self {
            backend: None,
            provider,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    /// Handles one chat request.
    ///
    /// Returns a schema-complete [`ChatResponse`] on success and on malformed
    /// model output (fixed fallback), or a classified [`RelayError`].
    #[instrument(
        name = "relay.handle",
        skip_all,
        fields(history = request.history().len())
    )]
    pub async fn handle(&self, request: &ChatRequest) -> Result<ChatResponse, RelayError> {
        let Some(backend) = self.backend.as_ref() else {
            warn!("chat request rejected: upstream credential not configured");
            return Err(RelayError::ConfigurationMissing);
        };

        if request.message.trim().is_empty() {
            return Err(RelayError::EmptyMessage);
        }

        let messages = build_messages(request);
        let started = Instant::now();

        info!(model = backend.model(), messages = messages.len(), "sending chat completion request");
        let outcome = exchange(backend, &messages).await;

        match outcome {
            UpstreamOutcome::Success(response) => {
                info!(
                    latency_ms = started.elapsed().as_millis(),
                    message = preview(&request.message, LOG_PREVIEW_CHARS),
                    "chat request processed"
                );
                Ok(response)
            }
            UpstreamOutcome::MalformedPayload { reason, content } => {
                warn!(
                    %reason,
                    content = preview(&content, 200),
                    "model returned unusable content; substituting fallback reply"
                );
                Ok(ChatResponse::fallback())
            }
            UpstreamOutcome::ConfigMissing => Err(RelayError::ConfigurationMissing),
            UpstreamOutcome::UpstreamRejected { status, body } => {
                error!(status, provider = self.provider, "upstream rejected chat request");
                Err(RelayError::UpstreamRejected {
                    provider: self.provider,
                    status,
                    body,
                })
            }
            UpstreamOutcome::Timeout(limit) => {
                error!(limit_secs = limit.as_secs(), "upstream request timed out");
                Err(RelayError::Timeout(limit))
            }
            UpstreamOutcome::TransportFailure(detail) => {
                error!(%detail, "network error while calling upstream");
                Err(RelayError::TransportFailure(detail))
            }
            UpstreamOutcome::UnexpectedInternal(detail) => {
                error!(%detail, "unexpected error while relaying chat request");
                Err(RelayError::UnexpectedInternal(detail))
            }
        }
    }
}

/// The single outbound call of a request, classified.
async fn exchange<C: ChatCompletion>(backend: &C, messages: &[ChatMessage]) -> UpstreamOutcome {
    UpstreamOutcome::classify(backend.complete(messages).await)
}
