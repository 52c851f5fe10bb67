//! OpenAI Responses API provider. Conversation history lives on the server and
//! is continued through `previous_response_id`.

use crate::provider::{status_error, LlmError, LlmProvider, LlmResult};
use crate::types::{Continuity, ContinuityMode, LlmReply, LlmRequest, ReasoningEffort, Usage};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

const OPENAI_API_URL: &str = "https://api.openai.com/v1";

pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: OPENAI_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/responses", self.base_url)
    }
}

#[async_trait::async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str { "openai" }

    fn continuity(&self) -> ContinuityMode { ContinuityMode::Chained }

    async fn complete(&self, request: LlmRequest) -> LlmResult<LlmReply> {
        let body = ResponsesRequest::from_request(&request);

        debug!(
            "OpenAI request: model={} chained={} reasoning={:?}",
            body.model,
            body.previous_response_id.is_some(),
            request.reasoning
        );

        let response = self.client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("OpenAI error {}: {}", status, error_text);
            return Err(status_error(status, error_text));
        }

        let reply: ResponsesReply = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("failed to parse response: {}", e)))?;

        Ok(reply.into_reply())
    }
}

#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    instructions: &'a str,
    input: ResponsesInput<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    previous_response_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning: Option<ReasoningParam>,
}

impl<'a> ResponsesRequest<'a> {
    fn from_request(request: &'a LlmRequest) -> Self {
        let input = match &request.continuity {
            Continuity::Transcript(messages) => {
                // Instructions carry the system entry; only the turns go in `input`.
                let mut items: Vec<InputMessage<'a>> = messages
                    .iter()
                    .filter(|m| !m.is_system())
                    .map(|m| InputMessage { role: m.role.as_str(), content: &m.content })
                    .collect();
                items.push(InputMessage { role: "user", content: &request.input });
                ResponsesInput::Messages(items)
            }
            _ => ResponsesInput::Text(&request.input),
        };

        Self {
            model: &request.model,
            instructions: &request.instructions,
            input,
            previous_response_id: request.continuity.previous_response_id(),
            temperature: request.temperature,
            reasoning: request.reasoning.map(|effort| ReasoningParam { effort }),
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum ResponsesInput<'a> {
    Text(&'a str),
    Messages(Vec<InputMessage<'a>>),
}

#[derive(Serialize)]
struct InputMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ReasoningParam {
    effort: ReasoningEffort,
}

#[derive(Deserialize)]
struct ResponsesReply {
    id: String,
    model: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
    usage: Option<Usage>,
}

impl ResponsesReply {
    fn into_reply(self) -> LlmReply {
        let text: String = self.output
            .iter()
            .filter_map(|item| match item {
                OutputItem::Message { content } => Some(content),
                OutputItem::Other => None,
            })
            .flatten()
            .filter_map(|part| match part {
                OutputContent::OutputText { text } => Some(text.as_str()),
                OutputContent::Other => None,
            })
            .collect();

        LlmReply {
            id: Some(self.id),
            text: if text.is_empty() { None } else { Some(text) },
            model: self.model,
            usage: self.usage,
        }
    }
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum OutputItem {
    #[serde(rename = "message")]
    Message {
        #[serde(default)]
        content: Vec<OutputContent>,
    },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum OutputContent {
    #[serde(rename = "output_text")]
    OutputText { text: String },
    #[serde(other)]
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentor_core::Message;

    #[test]
    fn chained_request_carries_previous_id() {
        let request = LlmRequest::new("gpt-5-nano", "be a tutor", "what is a monad?")
            .with_continuity(Continuity::Previous("resp_1".into()))
            .with_reasoning(ReasoningEffort::Medium);
        let json = serde_json::to_value(ResponsesRequest::from_request(&request)).unwrap();
        assert_eq!(json["previous_response_id"], "resp_1");
        assert_eq!(json["input"], "what is a monad?");
        assert_eq!(json["reasoning"]["effort"], "medium");
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn transcript_request_becomes_message_array() {
        let request = LlmRequest::new("gpt-5-nano", "be a tutor", "and then?").with_continuity(
            Continuity::Transcript(vec![
                Message::system("be a tutor"),
                Message::user("first"),
                Message::assistant("answer"),
            ]),
        );
        let json = serde_json::to_value(ResponsesRequest::from_request(&request)).unwrap();
        let input = json["input"].as_array().unwrap();
        assert_eq!(input.len(), 3);
        assert_eq!(input[0]["role"], "user");
        assert_eq!(input[2]["content"], "and then?");
        assert!(json.get("previous_response_id").is_none());
    }

    #[test]
    fn reply_joins_output_text_and_skips_reasoning() {
        let raw = serde_json::json!({
            "id": "resp_2",
            "model": "gpt-5-nano",
            "output": [
                {"type": "reasoning", "summary": []},
                {"type": "message", "content": [
                    {"type": "output_text", "text": "Recursion is "},
                    {"type": "refusal", "refusal": "n/a"},
                    {"type": "output_text", "text": "self-reference."}
                ]}
            ],
            "usage": {"input_tokens": 12, "output_tokens": 5, "total_tokens": 17}
        });
        let reply: ResponsesReply = serde_json::from_value(raw).unwrap();
        let reply = reply.into_reply();
        assert_eq!(reply.id.as_deref(), Some("resp_2"));
        assert_eq!(reply.text.as_deref(), Some("Recursion is self-reference."));
        assert_eq!(reply.usage, Some(Usage { input_tokens: 12, output_tokens: 5 }));
    }

    #[test]
    fn reply_without_text_has_none() {
        let raw = serde_json::json!({"id": "resp_3", "output": []});
        let reply: ResponsesReply = serde_json::from_value(raw).unwrap();
        assert!(reply.into_reply().text.is_none());
    }
}
