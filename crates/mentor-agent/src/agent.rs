//! Core agent - one request/response exchange against a provider
//!
//! Specializations do not override hooks; they pass a [`CallProfile`] that
//! carries the instruction override, tuning, and reply shaping for the call.

use crate::history::HistoryManager;
use mentor_core::{Error, MentorConfig, Result};
use mentor_llm::{ContinuityMode, LlmProvider, LlmReply, LlmRequest, ReasoningEffort};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Text returned in place of a reply that carried no text.
pub const NO_RESPONSE_FALLBACK: &str = "No response was received.";

const SUMMARY_REQUEST: &str = "Summarize our conversation so far in a few sentences. \
Keep every fact, definition, and open question the user may refer back to. \
Respond ONLY with the summary.";

/// What `ask` returns when the provider reply has no text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum EmptyReply {
    #[default]
    Empty,
    Fallback(String),
}

impl EmptyReply {
    pub fn fallback() -> Self {
        EmptyReply::Fallback(NO_RESPONSE_FALLBACK.to_string())
    }

    /// Transcript providers answer with the fallback text, chained ones with "".
    pub fn for_mode(mode: ContinuityMode) -> Self {
        match mode {
            ContinuityMode::Transcript => Self::fallback(),
            ContinuityMode::Chained => EmptyReply::Empty,
        }
    }

    fn apply(&self, text: String) -> String {
        if !text.is_empty() {
            return text;
        }
        match self {
            EmptyReply::Empty => text,
            EmptyReply::Fallback(fallback) => fallback.clone(),
        }
    }
}

/// Per-call strategy for [`Agent::ask`].
#[derive(Clone, Debug, Default)]
pub struct CallProfile {
    /// Replaces the agent's default system behavior for this call.
    pub instructions: Option<String>,
    pub reasoning: Option<ReasoningEffort>,
    /// Characters stripped from both ends of the reply text.
    pub trim: &'static [char],
    pub on_empty: EmptyReply,
}

impl CallProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn with_reasoning(mut self, effort: ReasoningEffort) -> Self {
        self.reasoning = Some(effort);
        self
    }

    pub fn with_trim(mut self, chars: &'static [char]) -> Self {
        self.trim = chars;
        self
    }

    pub fn with_on_empty(mut self, on_empty: EmptyReply) -> Self {
        self.on_empty = on_empty;
        self
    }

    fn extract(&self, reply: &LlmReply) -> String {
        let text = reply.text_or_empty().trim_matches(self.trim).to_string();
        self.on_empty.apply(text)
    }
}

#[derive(Clone, Debug)]
pub struct AgentSettings {
    pub model: String,
    pub temperature: Option<f32>,
    /// Summarize the history once this many turns are recorded. Zero disables it.
    pub summarize_after: usize,
}

impl AgentSettings {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: None,
            summarize_after: 0,
        }
    }

    pub fn from_config(config: &MentorConfig) -> Self {
        Self {
            model: config.model_id.clone(),
            temperature: Some(config.temperature),
            summarize_after: config.amount_before_summarizing,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_summarize_after(mut self, turns: usize) -> Self {
        self.summarize_after = turns;
        self
    }
}

pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    settings: AgentSettings,
    history: HistoryManager,
}

impl Agent {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        settings: AgentSettings,
        system_behavior: impl Into<String>,
    ) -> Result<Self> {
        if settings.model.trim().is_empty() {
            return Err(Error::configuration("model identifier must not be empty"));
        }
        let history = HistoryManager::new(system_behavior, provider.continuity())?;
        Ok(Self { provider, settings, history })
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    /// Call configuration for `request` under `profile`, continuing the current history.
    pub fn build_request(&mut self, request: &str, profile: &CallProfile) -> LlmRequest {
        let persona = profile
            .instructions
            .as_deref()
            .unwrap_or_else(|| self.history.system_behavior());
        let instructions = self.history.instructions_for(persona);
        let continuity = self.history.continuity(&instructions);

        LlmRequest {
            model: self.settings.model.clone(),
            instructions,
            input: request.to_string(),
            continuity,
            temperature: self.settings.temperature,
            reasoning: profile.reasoning,
        }
    }

    /// One full exchange: build, call, record, extract.
    pub async fn ask(&mut self, request: &str, profile: &CallProfile) -> Result<String> {
        let call = self.build_request(request, profile);
        let reply = self.complete(call).await?;
        self.history.record_turn(request, &reply);

        let text = profile.extract(&reply);
        if reply.text.is_none() {
            warn!("{} returned no text", self.provider.name());
        }

        // The answer has arrived and is recorded; a failed summary only delays compaction.
        if self.settings.summarize_after > 0 && self.history.turns() >= self.settings.summarize_after {
            if let Err(e) = self.summarize(profile).await {
                warn!("Summarization failed; keeping {} turns: {}", self.history.turns(), e);
            }
        }

        Ok(text)
    }

    async fn complete(&self, request: LlmRequest) -> Result<LlmReply> {
        debug!(
            "Calling {}: model={} input_chars={}",
            self.provider.name(),
            request.model,
            request.input.len()
        );
        self.provider
            .complete(request)
            .await
            .map_err(|e| Error::provider(self.provider.name(), e))
    }

    async fn summarize(&mut self, profile: &CallProfile) -> Result<()> {
        let call = self.build_request(SUMMARY_REQUEST, profile);
        let reply = self.complete(call).await?;
        let summary = reply.text_or_empty().trim();
        if summary.is_empty() {
            warn!("Summary came back empty; keeping {} turns", self.history.turns());
            return Ok(());
        }
        info!("Summarized {} turns into {} chars", self.history.turns(), summary.len());
        self.history.absorb_summary(summary);
        Ok(())
    }
}
