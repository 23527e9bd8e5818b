//! Inbound/outbound payloads of the chat relay.

use ai_llm_service::ChatMessage;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reply used when the model's content cannot be used.
pub const FALLBACK_REPLY: &str =
    "I understand your message about health and wellness. Let me help you track your progress!";

/// `insights` value paired with [`FALLBACK_REPLY`].
pub const FALLBACK_INSIGHT: &str = "Start tracking daily habits for better insights";

/// The six keys every [`WellnessData`] carries, in wire order.
pub const WELLNESS_KEYS: [&str; 6] = ["goal", "diet", "time", "energy", "consistency", "insights"];

/// Request payload for `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's new message. Must not be blank.
    pub message: String,
    /// Prior turns, oldest first. Only the most recent few are forwarded.
    #[serde(default)]
    pub conversation_history: Option<Vec<ChatMessage>>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            conversation_history: None,
        }
    }

    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.conversation_history = Some(history);
        self
    }

    /// Prior turns, empty when none were sent.
    pub fn history(&self) -> &[ChatMessage] {
        self.conversation_history.as_deref().unwrap_or_default()
    }
}

/// Wellness metrics extracted from the conversation.
///
/// The six named fields are always present; an empty string means "not
/// mentioned". Any additional keys the model returned are kept in `extra`
/// and serialized alongside them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WellnessData {
    pub goal: String,
    pub diet: String,
    pub time: String,
    pub energy: String,
    pub consistency: String,
    pub insights: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WellnessData {
    /// Builds a complete record from whatever object the model produced.
    ///
    /// Absent keys become `""`, `null` becomes `""`, and other non-string
    /// values are kept as their compact JSON text. Unknown keys go to `extra`.
    pub fn repair(mut raw: Map<String, Value>) -> Self {
        let mut take = |key: &str| raw.remove(key).map(into_text).unwrap_or_default();

        let goal = take("goal");
        let diet = take("diet");
        let time = take("time");
        let energy = take("energy");
        let consistency = take("consistency");
        let insights = take("insights");

        Self {
            goal,
            diet,
            time,
            energy,
            consistency,
            insights,
            extra: raw,
        }
    }

    /// All-empty record with the fixed encouragement in `insights`.
    pub fn fallback() -> Self {
        Self {
            insights: FALLBACK_INSIGHT.to_string(),
            ..Self::default()
        }
    }
}

fn into_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Response payload for `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub data: WellnessData,
}

impl ChatResponse {
    /// The fixed reply returned when model output is malformed.
    pub fn fallback() -> Self {
        Self {
            reply: FALLBACK_REPLY.to_string(),
            data: WellnessData::fallback(),
        }
    }
}
