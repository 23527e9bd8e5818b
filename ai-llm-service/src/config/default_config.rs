//! Default chat model config loaded from environment variables.
//!
//! # Environment variables
//!
//! - `GROQ_API_KEY`     = bearer credential (optional; absence leaves the
//!   service unconfigured instead of failing startup)
//! - `GROQ_API_URL`     = base URL, `/v1/chat/completions` is appended
//!   (default `https://api.groq.com/openai`)
//! - `GROQ_MODEL`       = model identifier (default `llama-3.3-70b-versatile`)
//! - `LLM_TEMPERATURE`  = sampling temperature in `0.0..=2.0` (default `0.7`)
//! - `LLM_MAX_TOKENS`   = completion token cap (default `500`)
//! - `LLM_TIMEOUT_SECS` = per-call timeout in `1..=30` (default `30`)

use crate::{
    config::{
        llm_model_config::{LlmModelConfig, MAX_TIMEOUT_SECS},
        llm_provider::LlmProvider,
    },
    error_handler::{
        ConfigError, Result, env_opt_string, parse_opt_f32, parse_opt_u32, parse_opt_u64,
        validate_http_endpoint, validate_range_f32, validate_range_u64,
    },
};

pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 500;

/// Constructs the Groq chat config from the process environment.
///
/// # Errors
/// See [`config_groq_chat_with`].
pub fn config_groq_chat() -> Result<LlmModelConfig> {
    config_groq_chat_with(env_opt_string)
}

/// Constructs the Groq chat config from an arbitrary variable lookup.
///
/// `lookup` returns `None` for unset (or blank) variables.
///
/// # Errors
/// - [`ConfigError::InvalidFormat`] if `GROQ_API_URL` is not http/https
/// - [`ConfigError::EmptyModel`] if `GROQ_MODEL` is set to an empty name
/// - [`ConfigError::InvalidNumber`] if a numeric variable does not parse
/// - [`ConfigError::OutOfRange`] for temperature or timeout outside their range
pub fn config_groq_chat_with<F>(lookup: F) -> Result<LlmModelConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let provider = LlmProvider::Groq;

    let endpoint = lookup("GROQ_API_URL")
        .unwrap_or_else(|| provider.default_endpoint().to_string());
    validate_http_endpoint("GROQ_API_URL", &endpoint)?;

    let model = lookup("GROQ_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
    if model.trim().is_empty() {
        return Err(ConfigError::EmptyModel.into());
    }

    let temperature = parse_opt_f32("LLM_TEMPERATURE", lookup("LLM_TEMPERATURE"))?
        .unwrap_or(DEFAULT_TEMPERATURE);
    validate_range_f32("LLM_TEMPERATURE", "expected 0.0..=2.0", temperature, 0.0, 2.0)?;

    let max_tokens =
        parse_opt_u32("LLM_MAX_TOKENS", lookup("LLM_MAX_TOKENS"))?.unwrap_or(DEFAULT_MAX_TOKENS);

    let timeout_secs =
        parse_opt_u64("LLM_TIMEOUT_SECS", lookup("LLM_TIMEOUT_SECS"))?.unwrap_or(MAX_TIMEOUT_SECS);
    validate_range_u64(
        "LLM_TIMEOUT_SECS",
        "expected 1..=30 seconds",
        timeout_secs,
        1,
        MAX_TIMEOUT_SECS,
    )?;

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key: lookup("GROQ_API_KEY"),
        max_tokens: Some(max_tokens),
        temperature: Some(temperature),
        json_mode: true,
        timeout_secs: Some(timeout_secs),
    })
}
