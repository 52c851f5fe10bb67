//! Error types for Mentor

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum Error {
    /// A required configuration value is absent or malformed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The provider call failed. The transport error is kept as the source.
    #[error("provider error: {provider} - {source}")]
    Provider {
        provider: String,
        #[source]
        source: BoxError,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn provider(provider: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Provider {
            provider: provider.into(),
            source: source.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_provider(&self) -> bool {
        matches!(self, Self::Provider { .. })
    }
}
