//! OpenAI-compatible chat completion client used by the wellness relay.
//!
//! - [`config`]: model/provider configuration loaded from the environment.
//! - [`services`]: the HTTP client ([`ChatCompletionService`]) and the
//!   [`ChatCompletion`] seam consumers program against.
//! - [`error_handler`]: the crate-wide [`AiLlmError`] taxonomy.
//! - [`telemetry`]: `tracing-subscriber` helpers shared by the binary.

pub mod config;
pub mod error_handler;
pub mod services;
pub mod telemetry;

pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{AiLlmError, ConfigError, HttpError};
pub use services::{
    ChatCompletion,
    chat_completion_service::ChatCompletionService,
    chat_message::{ChatMessage, Role},
};
