//! LLM client abstraction and the Anthropic implementation.
//!
//! Each workflow step is a single blocking request/response against the
//! model boundary; there is no streaming and no internal retry policy.

pub mod anthropic;
pub mod client;
pub mod types;

pub use anthropic::{AnthropicClient, AnthropicConfig};
pub use client::LlmClient;
pub use types::{CompletionRequest, CompletionResponse, ImageSource, Message, Role, Segment, StopReason, Usage};
