//! ScriptedProvider — deterministic LLM replies for testing
//!
//! Each call to `complete` pops the next scripted reply and records the
//! request it was given, so tests can assert on the exact call configuration.

use crate::provider::{LlmError, LlmProvider, LlmResult};
use crate::types::{ContinuityMode, LlmReply, LlmRequest};
use std::collections::VecDeque;
use tokio::sync::Mutex;

/// Mock behavior for a single call
#[derive(Clone, Debug)]
pub enum MockReply {
    /// Reply with text
    Text(String),
    /// Reply with no text at all
    Empty,
    /// Fail with `LlmError::RequestFailed`
    Error(String),
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        MockReply::Text(text.into())
    }
}

pub struct ScriptedProvider {
    mode: ContinuityMode,
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedProvider {
    pub fn new(mode: ContinuityMode, replies: Vec<MockReply>) -> Self {
        Self {
            mode,
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn chained(replies: Vec<MockReply>) -> Self {
        Self::new(ContinuityMode::Chained, replies)
    }

    pub fn transcript(replies: Vec<MockReply>) -> Self {
        Self::new(ContinuityMode::Transcript, replies)
    }

    /// Every request received so far, in call order.
    pub async fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait::async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str { "scripted" }

    fn continuity(&self) -> ContinuityMode { self.mode }

    async fn complete(&self, request: LlmRequest) -> LlmResult<LlmReply> {
        let call = {
            let mut requests = self.requests.lock().await;
            requests.push(request);
            requests.len()
        };

        let next = self.replies.lock().await.pop_front();
        let reply = match next {
            Some(MockReply::Text(text)) => LlmReply::text(text),
            Some(MockReply::Empty) => LlmReply::default(),
            Some(MockReply::Error(message)) => return Err(LlmError::RequestFailed(message)),
            None => LlmReply::text("(mock: script exhausted)"),
        };

        Ok(match self.mode {
            ContinuityMode::Chained => reply.with_id(format!("resp_{}", call)),
            ContinuityMode::Transcript => reply,
        })
    }
}
