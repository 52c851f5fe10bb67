//! Per-agent conversation state: the system behavior plus whatever the
//! provider needs to continue the conversation.

use mentor_core::{Error, Message, Result};
use mentor_llm::{Continuity, ContinuityMode, LlmReply};

enum ContinuityState {
    Chained { last_response_id: Option<String> },
    Transcript { messages: Vec<Message> },
}

pub struct HistoryManager {
    system_behavior: String,
    state: ContinuityState,
    summary: Option<String>,
    turns: usize,
}

impl HistoryManager {
    pub fn new(system_behavior: impl Into<String>, mode: ContinuityMode) -> Result<Self> {
        let system_behavior = system_behavior.into();
        if system_behavior.trim().is_empty() {
            return Err(Error::invalid_input("system behavior must not be empty"));
        }
        let state = match mode {
            ContinuityMode::Chained => ContinuityState::Chained { last_response_id: None },
            ContinuityMode::Transcript => ContinuityState::Transcript { messages: Vec::new() },
        };
        Ok(Self {
            system_behavior,
            state,
            summary: None,
            turns: 0,
        })
    }

    pub fn system_behavior(&self) -> &str {
        &self.system_behavior
    }

    pub fn last_response_id(&self) -> Option<&str> {
        match &self.state {
            ContinuityState::Chained { last_response_id } => last_response_id.as_deref(),
            ContinuityState::Transcript { .. } => None,
        }
    }

    /// Recorded transcript. Empty for chained histories.
    pub fn transcript(&self) -> &[Message] {
        match &self.state {
            ContinuityState::Chained { .. } => &[],
            ContinuityState::Transcript { messages } => messages,
        }
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Turns recorded since construction or the last summary.
    pub fn turns(&self) -> usize {
        self.turns
    }

    /// Effective instructions for `persona`, with the running summary appended.
    pub fn instructions_for(&self, persona: &str) -> String {
        match &self.summary {
            Some(summary) => format!(
                "{}\n\nSummary of the conversation so far:\n{}",
                persona, summary
            ),
            None => persona.to_string(),
        }
    }

    /// Continuity for the next call made under `instructions`.
    ///
    /// For transcripts, entry 0 is always the system entry carrying
    /// `instructions`; it is inserted on first read and refreshed whenever the
    /// effective instructions change.
    pub fn continuity(&mut self, instructions: &str) -> Continuity {
        match &mut self.state {
            ContinuityState::Chained { last_response_id } => match last_response_id {
                Some(id) => Continuity::Previous(id.clone()),
                None => Continuity::Fresh,
            },
            ContinuityState::Transcript { messages } => {
                if messages.first().map(Message::is_system).unwrap_or(false) {
                    if messages[0].content != instructions {
                        messages[0].content = instructions.to_string();
                    }
                } else {
                    messages.insert(0, Message::system(instructions));
                }
                Continuity::Transcript(messages.clone())
            }
        }
    }

    pub fn record_turn(&mut self, request: &str, reply: &LlmReply) {
        match &mut self.state {
            ContinuityState::Chained { last_response_id } => {
                *last_response_id = reply.id.clone();
            }
            ContinuityState::Transcript { messages } => {
                messages.push(Message::user(request));
                messages.push(Message::assistant(reply.text_or_empty()));
            }
        }
        self.turns += 1;
    }

    /// Replace the recorded conversation with `summary`.
    pub fn absorb_summary(&mut self, summary: impl Into<String>) {
        match &mut self.state {
            ContinuityState::Chained { last_response_id } => *last_response_id = None,
            ContinuityState::Transcript { messages } => messages.clear(),
        }
        self.summary = Some(summary.into());
        self.turns = 0;
    }
}
