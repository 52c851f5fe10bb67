//! Tutor agent - answers questions under a persona clarified for their subject

use crate::agent::{Agent, AgentSettings, CallProfile, EmptyReply};
use crate::self_reference::SelfReference;
use mentor_core::{Error, Result};
use mentor_llm::LlmProvider;
use std::sync::Arc;
use tracing::{debug, info};

pub const TUTOR_BEHAVIOR: &str = "You are a helpful tutor, who excels at explaining complex concepts in simple terms. \
You will provide detailed explanations and examples to help the user understand. \
If it will be needed - use analogies.";

/// When the tutor asks its companion for a new persona.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PersonaPolicy {
    /// Clarify once; every later question reuses that persona until reset.
    #[default]
    Sticky,
    /// Clarify for every question. An empty area keeps the current persona.
    PerQuestion,
}

pub struct Tutor {
    agent: Agent,
    self_reference: SelfReference,
    clarified: Option<String>,
    policy: PersonaPolicy,
    on_empty: EmptyReply,
}

impl Tutor {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: AgentSettings) -> Result<Self> {
        let on_empty = EmptyReply::for_mode(provider.continuity());
        let self_reference = SelfReference::new(provider.clone(), settings.clone())?;
        Ok(Self {
            agent: Agent::new(provider, settings, TUTOR_BEHAVIOR)?,
            self_reference,
            clarified: None,
            policy: PersonaPolicy::default(),
            on_empty,
        })
    }

    pub fn with_policy(mut self, policy: PersonaPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_empty_reply(mut self, on_empty: EmptyReply) -> Self {
        self.on_empty = on_empty;
        self
    }

    pub fn policy(&self) -> PersonaPolicy {
        self.policy
    }

    pub fn clarified_persona(&self) -> Option<&str> {
        self.clarified.as_deref()
    }

    /// Persona the next explanation call will be made under.
    pub fn effective_persona(&self) -> &str {
        self.clarified
            .as_deref()
            .unwrap_or_else(|| self.agent.history().system_behavior())
    }

    /// Forget the clarified persona; the next question is clarified afresh.
    pub fn reset_persona(&mut self) {
        if self.clarified.take().is_some() {
            info!("Tutor persona reset to default");
        }
    }

    pub async fn explain_this(&mut self, question: &str) -> Result<String> {
        if question.trim().is_empty() {
            return Err(Error::invalid_input("question must not be empty"));
        }

        if self.needs_clarification() {
            self.clarify_for(question).await?;
        } else {
            debug!("Reusing clarified persona");
        }

        let mut profile = CallProfile::new().with_on_empty(self.on_empty.clone());
        if let Some(persona) = &self.clarified {
            profile = profile.with_instructions(persona.clone());
        }
        self.agent.ask(question, &profile).await
    }

    fn needs_clarification(&self) -> bool {
        match self.policy {
            PersonaPolicy::Sticky => self.clarified.is_none(),
            PersonaPolicy::PerQuestion => true,
        }
    }

    async fn clarify_for(&mut self, question: &str) -> Result<()> {
        let area = self.self_reference.infer_area_of_knowledge(question).await?;
        if area.is_empty() {
            debug!("No area of knowledge inferred; keeping current persona");
            return Ok(());
        }

        let previous = self.agent.history().system_behavior().to_string();
        let role = self.self_reference.clarify_tutor_role(&area, &previous).await?;
        if role.is_empty() {
            debug!("Role clarification came back empty; keeping current persona");
            return Ok(());
        }

        info!("Tutor persona clarified for area: {}", area);
        self.clarified = Some(role);
        Ok(())
    }
}
