//! OpenAI-compatible chat completion client (Groq).
//!
//! Minimal, non-streaming client. The endpoint is derived from
//! `LlmModelConfig::endpoint`:
//! - POST {endpoint}/v1/chat/completions
//!
//! Constructor validation:
//! - `cfg.api_key` must be present and non-blank
//! - `cfg.endpoint` must start with http:// or https://
//!
//! Every call is bounded by `LlmModelConfig::timeout`. Failures are
//! classified into [`AiLlmError`] variants: `Timeout`, `Transport`, `Http`,
//! `Decode`, `EmptyChoices`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{AiLlmError, HttpError, make_snippet},
    services::{ChatCompletion, chat_message::ChatMessage},
};

/// Thin client for an OpenAI-compatible `/v1/chat/completions` endpoint.
///
/// Keeps a preconfigured `reqwest::Client` (timeout + default headers), so
/// one instance is built at startup and shared across requests.
#[derive(Debug)]
pub struct ChatCompletionService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
    timeout: Duration,
}

impl ChatCompletionService {
    /// Creates a new [`ChatCompletionService`] from the given config.
    ///
    /// # Errors
    /// - [`AiLlmError::MissingApiKey`] if `cfg.api_key` is absent or blank
    /// - [`AiLlmError::Config`] if `cfg.endpoint` is not http/https
    /// - [`AiLlmError::Decode`] if the key cannot be used as a header value
    /// - [`AiLlmError::Transport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        let api_key = cfg
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(AiLlmError::MissingApiKey)?;

        let endpoint = cfg.endpoint.trim();
        crate::error_handler::validate_http_endpoint("GROQ_API_URL", endpoint)?;

        let timeout = cfg.timeout();

        let mut headers = header::HeaderMap::new();
        let mut auth = header::HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| AiLlmError::Decode(format!("invalid API key header: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(AiLlmError::Transport)?;

        let url_chat = format!("{}/v1/chat/completions", endpoint.trim_end_matches('/'));

        info!(
            provider = ?cfg.provider,
            model = %cfg.model,
            url = %url_chat,
            timeout_secs = timeout.as_secs(),
            "ChatCompletionService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_chat,
            timeout,
        })
    }

    /// Full URL of the completion endpoint.
    pub fn url(&self) -> &str {
        &self.url_chat
    }

    /// Performs a **non-streaming** chat completion request.
    ///
    /// Mapped options from config: `model`, `temperature`, `max_tokens`, and
    /// `response_format = {"type": "json_object"}` when `json_mode` is set.
    ///
    /// # Errors
    /// - [`AiLlmError::Timeout`] when the call exceeds the configured bound
    /// - [`AiLlmError::Transport`] for connection-level failures
    /// - [`AiLlmError::Http`] for non-2xx responses
    /// - [`AiLlmError::Decode`] if the envelope cannot be parsed
    /// - [`AiLlmError::EmptyChoices`] if no choice carries content
    pub async fn generate(&self, messages: &[ChatMessage]) -> Result<String, AiLlmError> {
        let started = Instant::now();
        let body = ChatCompletionRequest::from_cfg(&self.cfg, messages);

        debug!(
            model = %self.cfg.model,
            messages = messages.len(),
            "POST {}", self.url_chat
        );

        let resp = self
            .client
            .post(&self.url_chat)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.log_transport(e, started))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| self.log_transport(e, started))?;

        if !status.is_success() {
            let snippet = make_snippet(&text);
            error!(
                %status,
                url = %self.url_chat,
                %snippet,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "chat completion returned non-success status"
            );
            return Err(HttpError {
                status,
                url: self.url_chat.clone(),
                body: text,
                snippet,
            }
            .into());
        }

        let out: ChatCompletionResponse = serde_json::from_str(&text).map_err(|e| {
            error!(
                error = %e,
                model = %self.cfg.model,
                snippet = %make_snippet(&text),
                latency_ms = started.elapsed().as_millis(),
                "failed to decode chat completion response"
            );
            AiLlmError::Decode(format!(
                "serde error: {e}; expected `choices[0].message.content`"
            ))
        })?;

        let content = out
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .ok_or(AiLlmError::EmptyChoices)?;

        info!(
            model = %self.cfg.model,
            latency_ms = started.elapsed().as_millis(),
            content_len = content.len(),
            "chat completion completed"
        );

        Ok(content)
    }

    fn log_transport(&self, err: reqwest::Error, started: Instant) -> AiLlmError {
        let err = AiLlmError::from_reqwest(err, self.timeout);
        error!(
            error = %err,
            url = %self.url_chat,
            model = %self.cfg.model,
            latency_ms = started.elapsed().as_millis(),
            "chat completion request failed"
        );
        err
    }
}

#[async_trait]
impl ChatCompletion for ChatCompletionService {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, AiLlmError> {
        self.generate(messages).await
    }

    fn model(&self) -> &str {
        &self.cfg.model
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

/// Request body for `/v1/chat/completions` (non-streaming).
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

impl<'a> ChatCompletionRequest<'a> {
    fn from_cfg(cfg: &'a LlmModelConfig, messages: &'a [ChatMessage]) -> Self {
        Self {
            model: &cfg.model,
            messages,
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
            response_format: cfg.json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
}
