//! LLM Provider trait

use crate::types::{ContinuityMode, LlmReply, LlmRequest};

/// Result type for LLM operations
pub type LlmResult<T> = Result<T, LlmError>;

/// LLM error types
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("rate limited: retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("{provider} cannot continue a conversation from {continuity}")]
    UnsupportedContinuity {
        provider: String,
        continuity: &'static str,
    },

    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

/// LLM Provider trait
///
/// One call, one reply. Retries and timeouts belong to the transport, not to
/// callers of this trait.
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Whether the provider keeps history itself or needs the transcript resent.
    fn continuity(&self) -> ContinuityMode;

    async fn complete(&self, request: LlmRequest) -> LlmResult<LlmReply>;
}

/// Map a non-success HTTP status to an [`LlmError`].
pub(crate) fn status_error(status: reqwest::StatusCode, body: String) -> LlmError {
    match status.as_u16() {
        401 => LlmError::AuthFailed(body),
        429 => LlmError::RateLimited { retry_after_ms: 60000 },
        _ => LlmError::RequestFailed(format!("{}: {}", status, body)),
    }
}
