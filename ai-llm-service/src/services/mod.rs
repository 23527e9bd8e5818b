pub mod chat_completion_service;
pub mod chat_message;

use async_trait::async_trait;

use crate::{error_handler::AiLlmError, services::chat_message::ChatMessage};

/// A backend able to run one non-streaming chat completion.
///
/// Implemented by [`chat_completion_service::ChatCompletionService`]; tests
/// substitute in-memory stubs.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Sends `messages` upstream once and returns the first choice's content.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, AiLlmError>;

    /// Model identifier, for logs.
    fn model(&self) -> &str;
}
