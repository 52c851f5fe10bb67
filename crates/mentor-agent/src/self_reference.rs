//! Companion agent that looks at a question and proposes the tutor's persona.

use crate::agent::{Agent, AgentSettings, CallProfile, EmptyReply};
use mentor_core::Result;
use mentor_llm::{LlmProvider, ReasoningEffort};
use std::sync::Arc;
use tracing::debug;

pub const SELF_REFERENCE_BEHAVIOR: &str = "You are a companion for AI Tutor. \
You will provide self-referential information that will help the AI tutor to assume a proper role in proper area of knowledge.\n\
Be as concrete as possible in your answers. \
Always answer concisely.";

const TRIM: &[char] = &[' ', '.', ','];

pub struct SelfReference {
    agent: Agent,
    profile: CallProfile,
}

impl SelfReference {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: AgentSettings) -> Result<Self> {
        Ok(Self {
            agent: Agent::new(provider, settings, SELF_REFERENCE_BEHAVIOR)?,
            // Empty replies stay empty so the tutor can tell "no area" apart.
            profile: CallProfile::new()
                .with_reasoning(ReasoningEffort::Medium)
                .with_trim(TRIM)
                .with_on_empty(EmptyReply::Empty),
        })
    }

    /// Subject area of `question`, as named by the model. Not validated.
    pub async fn infer_area_of_knowledge(&mut self, question: &str) -> Result<String> {
        let prompt = infer_area_prompt(question);
        let area = self.agent.ask(&prompt, &self.profile).await?;
        debug!("Inferred area of knowledge: {:?}", area);
        Ok(area)
    }

    /// `previous_role` rewritten to describe an expert in `area`. Trusted verbatim.
    pub async fn clarify_tutor_role(&mut self, area: &str, previous_role: &str) -> Result<String> {
        let prompt = clarify_role_prompt(area, previous_role);
        self.agent.ask(&prompt, &self.profile).await
    }
}

pub fn infer_area_prompt(question: &str) -> String {
    format!(
        "User question: {}\n\
         Based on the question, infer the area of knowledge.\n\
         Respond with the inferred area of knowledge and nothing else.",
        question
    )
}

pub fn clarify_role_prompt(area: &str, previous_role: &str) -> String {
    format!(
        "Area of knowledge: {}\n\
         Previous tutor's role: {}\n\
         Based on the area of knowledge and previous behavior, correct the tutor's role \
         to reflect that tutor is an expert in the provided area of knowledge.\n\
         Respond ONLY with the corrected tutor's role, nothing else.",
        area, previous_role
    )
}
