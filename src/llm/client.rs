//! Core LLM client trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::llm::types::{CompletionRequest, CompletionResponse};

/// Stateless model client - each call is independent (fresh context).
///
/// Implementations make exactly one request per `complete` call; retry
/// policy belongs to the caller, not the boundary.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Single completion request (blocking until complete)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Model identifier used for requests without an explicit override
    fn model(&self) -> &str;
}
