//! Provider construction from configuration

use crate::ollama::OllamaProvider;
use crate::openai::OpenAiProvider;
use crate::provider::LlmProvider;
use mentor_core::{config, Backend, Error, MentorConfig, Result};
use std::sync::Arc;
use tracing::info;

/// Build the provider selected by `config.backend`.
///
/// Fails before any network activity when the backend's credentials are missing.
pub fn provider_from_config(config: &MentorConfig) -> Result<Arc<dyn LlmProvider>> {
    let provider: Arc<dyn LlmProvider> = match config.backend {
        Backend::OpenAi => {
            let api_key = config.api_key.as_deref().ok_or_else(|| {
                Error::configuration(format!(
                    "environment variable '{}' not found",
                    config::OPENAI_API_KEY
                ))
            })?;
            let mut provider = OpenAiProvider::new(api_key);
            if let Some(url) = &config.base_url {
                provider = provider.with_base_url(url);
            }
            Arc::new(provider)
        }
        Backend::Ollama => {
            let mut provider = OllamaProvider::new();
            if let Some(url) = &config.base_url {
                provider = provider.with_base_url(url);
            }
            Arc::new(provider)
        }
    };

    info!("Using {} provider with model {}", provider.name(), config.model_id);
    Ok(provider)
}
