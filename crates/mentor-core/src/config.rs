//! Environment configuration
//!
//! Every value is read once, up front. Required values that are absent,
//! blank, or not parseable fail with [`Error::Configuration`]; nothing is
//! silently defaulted except the optional backend and endpoint overrides.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

pub const MODEL_ID: &str = "MODEL_ID";
pub const TEMPERATURE: &str = "TEMPERATURE";
pub const AMOUNT_BEFORE_SUMMARIZING: &str = "AMOUNT_BEFORE_SUMMARIZING";
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const MENTOR_BACKEND: &str = "MENTOR_BACKEND";
pub const MENTOR_BASE_URL: &str = "MENTOR_BASE_URL";

/// Which provider transport carries the conversation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// OpenAI Responses API; the server retains history behind a response id.
    OpenAi,
    /// Ollama chat API; the client resends the transcript.
    Ollama,
}

impl std::str::FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Backend::OpenAi),
            "ollama" => Ok(Backend::Ollama),
            other => Err(Error::configuration(format!(
                "environment variable '{}' must be 'openai' or 'ollama', got '{}'",
                MENTOR_BACKEND, other
            ))),
        }
    }
}

#[derive(Clone)]
pub struct MentorConfig {
    pub backend: Backend,
    pub model_id: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    /// Recorded turns before an agent's history is summarized. Zero disables it.
    pub amount_before_summarizing: usize,
    pub base_url: Option<String>,
}

impl std::fmt::Debug for MentorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MentorConfig")
            .field("backend", &self.backend)
            .field("model_id", &self.model_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("temperature", &self.temperature)
            .field("amount_before_summarizing", &self.amount_before_summarizing)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl MentorConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match optional(&lookup, MENTOR_BACKEND) {
            Some(name) => name.parse()?,
            None => Backend::OpenAi,
        };

        let model_id = required(&lookup, MODEL_ID)?;
        let temperature = required(&lookup, TEMPERATURE)?
            .parse::<f32>()
            .ok()
            .filter(|t| t.is_finite())
            .ok_or_else(|| {
                Error::configuration(format!("environment variable '{}' must be a float", TEMPERATURE))
            })?;
        let amount_before_summarizing = required(&lookup, AMOUNT_BEFORE_SUMMARIZING)?
            .parse::<usize>()
            .map_err(|_| {
                Error::configuration(format!(
                    "environment variable '{}' must be an integer",
                    AMOUNT_BEFORE_SUMMARIZING
                ))
            })?;

        let api_key = match backend {
            Backend::OpenAi => Some(required(&lookup, OPENAI_API_KEY)?),
            Backend::Ollama => optional(&lookup, OPENAI_API_KEY),
        };

        Ok(Self {
            backend,
            model_id,
            api_key,
            temperature,
            amount_before_summarizing,
            base_url: optional(&lookup, MENTOR_BASE_URL),
        })
    }
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key)
        .ok_or_else(|| Error::configuration(format!("environment variable '{}' not found", key)))
}
