//! CompletionModel trait — the abstraction over the language model.
//!
//! A `CompletionModel` accepts a structured `Prompt` (goal instructions +
//! tool schemas + the memory transcript) and returns a `ModelReply` exposing
//! free-text content and any requested tool calls. The agent loop calls
//! `complete()` without knowing which backend is behind it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::turn::{ToolCallRequest, Turn};

/// A structured request for one model turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompt {
    /// Concatenated goal texts, sent as system-level instructions
    pub instructions: String,

    /// The full current memory transcript
    pub transcript: Vec<Turn>,

    /// Schemas for the actions the model may invoke
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
}

/// A tool definition sent to the model so it knows what it can call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,

    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

/// A complete reply from the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelReply {
    /// Free-text content (may be empty when the model only calls tools)
    #[serde(default)]
    pub content: String,

    /// Requested tool calls, in the model's order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallRequest>,
}

impl ModelReply {
    /// A plain text reply.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// A reply requesting a single tool call with the given JSON arguments.
    pub fn tool_call(name: impl Into<String>, arguments: &serde_json::Value) -> Self {
        Self {
            content: String::new(),
            tool_calls: vec![ToolCallRequest {
                id: uuid::Uuid::new_v4().to_string(),
                name: name.into(),
                arguments: arguments.to_string(),
            }],
        }
    }
}

/// The external model-completion collaborator contract.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// A human-readable name for this backend (e.g., "openrouter").
    fn name(&self) -> &str;

    /// Send a prompt and get a complete reply.
    async fn complete(&self, prompt: Prompt) -> std::result::Result<ModelReply, ModelError>;
}
