//! Message types for model requests and responses.
//!
//! Message content is a sequence of tagged segments (text or image) so
//! downstream code extracts sub-fields with exhaustive matches instead of
//! inspecting value shapes.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CadreError, Result};

/// Role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One content segment of a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Segment {
    Text { text: String },
    Image { source: ImageSource },
}

/// Base64-encoded image payload in the Anthropic wire shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSource {
    #[serde(rename = "type")]
    pub kind: String,
    pub media_type: String,
    pub data: String,
}

impl Segment {
    /// Create a text segment
    pub fn text(content: impl Into<String>) -> Self {
        Segment::Text { text: content.into() }
    }

    /// Create an image segment from raw bytes
    pub fn image(media_type: impl Into<String>, bytes: &[u8]) -> Self {
        Segment::Image {
            source: ImageSource {
                kind: "base64".to_string(),
                media_type: media_type.into(),
                data: STANDARD.encode(bytes),
            },
        }
    }

    /// Read an image file and encode it as a segment.
    ///
    /// The media type is derived from the file extension.
    pub fn image_from_file(path: &Path) -> Result<Self> {
        let media_type = match path.extension().and_then(|e| e.to_str()) {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            other => {
                return Err(CadreError::InvalidState(format!(
                    "Unsupported image extension {:?} for {}",
                    other,
                    path.display()
                )));
            }
        };

        let bytes = std::fs::read(path)?;
        Ok(Self::image(media_type, &bytes))
    }
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<Segment>,
}

impl Message {
    /// Create a user message with a single text segment
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![Segment::text(content)],
        }
    }

    /// Create an assistant message with a single text segment
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: vec![Segment::text(content)],
        }
    }

    /// Create a user message from prepared segments
    pub fn user_segments(content: Vec<Segment>) -> Self {
        Self {
            role: Role::User,
            content,
        }
    }

    /// Concatenate the text segments, skipping images
    pub fn text(&self) -> String {
        let mut out = String::new();
        for segment in &self.content {
            match segment {
                Segment::Text { text } => {
                    if !out.is_empty() {
                        out.push('\n');
                    }
                    out.push_str(text);
                }
                Segment::Image { .. } => {}
            }
        }
        out
    }
}

/// Request to the model for one completion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub system: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl CompletionRequest {
    /// Create a new completion request with a system prompt
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            ..Default::default()
        }
    }

    /// Add a message to the request
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Add a user message
    pub fn with_user_message(self, content: impl Into<String>) -> Self {
        self.with_message(Message::user(content))
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Response from the model
#[derive(Debug, Clone, Default)]
pub struct CompletionResponse {
    pub content: String,
    pub stop_reason: StopReason,
    pub usage: Usage,
}

/// Reason why the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopReason {
    #[default]
    EndTurn,
    MaxTokens,
    StopSequence,
}

/// Token usage statistics
#[derive(Debug, Clone, Default)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl Usage {
    /// Create new usage stats
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Calculate total tokens
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }

    /// Accumulate usage from another instance
    pub fn add(&mut self, other: &Usage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}
