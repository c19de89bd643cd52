//! Turn and Memory domain types.
//!
//! A `Turn` is one entry in an agent's conversation: the user's request, the
//! model's reply (possibly carrying tool call requests), or the synthesized
//! result of a tool execution fed back as a user turn. `Memory` is the
//! bounded sliding window of turns one agent run sees.

use serde::{Deserialize, Serialize};

/// The role of a turn's author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user (or a tool result fed back as user content)
    User,
    /// The language model
    Assistant,
}

/// A tool call requested by the model inside an assistant turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Unique ID for this tool call (matches the model's tool_call.id)
    pub id: String,

    /// Name of the tool to invoke
    pub name: String,

    /// Arguments as a JSON string
    pub arguments: String,
}

/// A single turn in an agent's conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Who authored this turn
    pub role: Role,

    /// The text content
    pub content: String,

    /// Tool calls requested by the assistant (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallRequest>,
}

impl Turn {
    /// Create a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Create an assistant turn without tool calls.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Create an assistant turn carrying the model's tool call requests.
    pub fn assistant_with_calls(
        content: impl Into<String>,
        tool_calls: Vec<ToolCallRequest>,
    ) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_calls,
        }
    }
}

/// An ordered, append-only, optionally bounded record of turns for one run.
///
/// When `max_history` is set and an append pushes the length past it, the
/// oldest turns are evicted from the front — the agent keeps a sliding
/// window of conversational context, not unbounded recall.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Memory {
    turns: Vec<Turn>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_history: Option<usize>,
}

impl Memory {
    /// Create an unbounded memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory bounded to the most recent `max_history` turns.
    pub fn bounded(max_history: usize) -> Self {
        Self {
            turns: Vec::new(),
            max_history: Some(max_history),
        }
    }

    /// Append a turn, evicting from the front if the bound is exceeded.
    pub fn add(&mut self, turn: Turn) {
        self.turns.push(turn);
        if let Some(cap) = self.max_history {
            while self.turns.len() > cap {
                self.turns.remove(0);
            }
        }
    }

    /// Read-only view of the turns in order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The most recent assistant turn with non-empty content, scanning
    /// backwards. This is how delegation extracts a sub-agent's answer.
    pub fn last_assistant_content(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.role == Role::Assistant && !t.content.is_empty())
            .map(|t| t.content.as_str())
    }
}
