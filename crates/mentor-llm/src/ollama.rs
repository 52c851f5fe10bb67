//! Ollama chat provider. Ollama keeps no server-side history, so every call
//! carries the full transcript.

use crate::provider::{status_error, LlmError, LlmProvider, LlmResult};
use crate::types::{Continuity, ContinuityMode, LlmReply, LlmRequest, Usage};
use mentor_core::Message;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

const OLLAMA_API_URL: &str = "http://localhost:11434";

pub struct OllamaProvider {
    client: Client,
    base_url: String,
}

impl Default for OllamaProvider {
    fn default() -> Self { Self::new() }
}

impl OllamaProvider {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: OLLAMA_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait::async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str { "ollama" }

    fn continuity(&self) -> ContinuityMode { ContinuityMode::Transcript }

    async fn complete(&self, request: LlmRequest) -> LlmResult<LlmReply> {
        let body = ChatRequest::from_request(&request)?;

        if request.reasoning.is_some() {
            debug!("Ollama ignores reasoning effort {:?}", request.reasoning);
        }
        debug!("Ollama request: model={} messages={}", body.model, body.messages.len());

        let response = self.client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Ollama error {}: {}", status, error_text);
            return Err(status_error(status, error_text));
        }

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("failed to parse response: {}", e)))?;

        Ok(reply.into_reply())
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<ChatOptions>,
}

impl<'a> ChatRequest<'a> {
    fn from_request(request: &'a LlmRequest) -> LlmResult<Self> {
        let history: &[Message] = match &request.continuity {
            Continuity::Fresh => &[],
            Continuity::Transcript(messages) => messages,
            Continuity::Previous(_) => {
                return Err(LlmError::UnsupportedContinuity {
                    provider: "ollama".to_string(),
                    continuity: "a response id",
                })
            }
        };

        let mut messages = Vec::with_capacity(history.len() + 2);
        if !history.first().map(Message::is_system).unwrap_or(false) {
            messages.push(ChatMessage { role: "system", content: &request.instructions });
        }
        messages.extend(
            history
                .iter()
                .map(|m| ChatMessage { role: m.role.as_str(), content: &m.content }),
        );
        messages.push(ChatMessage { role: "user", content: &request.input });

        Ok(Self {
            model: &request.model,
            messages,
            stream: false,
            options: request.temperature.map(|temperature| ChatOptions { temperature }),
        })
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    model: Option<String>,
    message: Option<ChatResponseMessage>,
    prompt_eval_count: Option<u32>,
    eval_count: Option<u32>,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}

impl ChatResponse {
    fn into_reply(self) -> LlmReply {
        let usage = match (self.prompt_eval_count, self.eval_count) {
            (None, None) => None,
            (input, output) => Some(Usage {
                input_tokens: input.unwrap_or(0),
                output_tokens: output.unwrap_or(0),
            }),
        };
        LlmReply {
            id: None,
            text: self.message.map(|m| m.content).filter(|c| !c.is_empty()),
            model: self.model,
            usage,
        }
    }
}
