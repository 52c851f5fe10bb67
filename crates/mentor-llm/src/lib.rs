//! Mentor LLM - Provider adapters for server-retained and client-retained conversations

pub mod factory;
pub mod mock;
pub mod ollama;
pub mod openai;
pub mod provider;
pub mod types;

pub use factory::provider_from_config;
pub use mock::{MockReply, ScriptedProvider};
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
pub use provider::{LlmError, LlmProvider, LlmResult};
pub use types::*;
