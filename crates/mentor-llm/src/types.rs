//! LLM types for requests and replies

use mentor_core::Message;
use serde::{Deserialize, Serialize};

/// How a provider keeps track of earlier turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContinuityMode {
    /// The provider stores the conversation and hands back an id to continue from.
    Chained,
    /// The client resends the whole role-tagged transcript each call.
    Transcript,
}

/// Conversation state attached to a single call.
#[derive(Clone, Debug, PartialEq)]
pub enum Continuity {
    Fresh,
    Previous(String),
    /// Prior turns, system entry first. Does not include the new input.
    Transcript(Vec<Message>),
}

impl Continuity {
    pub fn previous_response_id(&self) -> Option<&str> {
        match self {
            Continuity::Previous(id) => Some(id),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Low,
    Medium,
    High,
}

/// Call configuration built fresh for every request.
#[derive(Clone, Debug)]
pub struct LlmRequest {
    pub model: String,
    pub instructions: String,
    pub input: String,
    pub continuity: Continuity,
    pub temperature: Option<f32>,
    pub reasoning: Option<ReasoningEffort>,
}

impl LlmRequest {
    pub fn new(
        model: impl Into<String>,
        instructions: impl Into<String>,
        input: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            instructions: instructions.into(),
            input: input.into(),
            continuity: Continuity::Fresh,
            temperature: None,
            reasoning: None,
        }
    }

    pub fn with_continuity(mut self, continuity: Continuity) -> Self {
        self.continuity = continuity;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_reasoning(mut self, effort: ReasoningEffort) -> Self {
        self.reasoning = Some(effort);
        self
    }
}

/// Provider reply normalized across transports.
#[derive(Clone, Debug, Default)]
pub struct LlmReply {
    /// Continuity token for the next call (chained providers only).
    pub id: Option<String>,
    pub text: Option<String>,
    pub model: Option<String>,
    pub usage: Option<Usage>,
}

impl LlmReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

/// Token usage
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}
