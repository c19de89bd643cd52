//! Translation between the runtime's view of a turn and the model's.
//!
//! `construct_prompt` packs goals, action schemas, and the memory transcript
//! into a [`Prompt`]; `parse_response` turns a [`ModelReply`] back into a
//! structured [`Invocation`] without ever failing the loop.

use conclave_core::{Action, Goal, Memory, ModelReply, Prompt};
use tracing::warn;

/// The parsed result of one model turn: the tool it wants to invoke with its
/// arguments, or no tool at all (`tool = None` means the model chose to
/// respond with free text).
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub tool: Option<String>,
    pub args: serde_json::Map<String, serde_json::Value>,
}

impl Invocation {
    /// The "model is talking, not acting" invocation.
    pub fn none() -> Self {
        Self {
            tool: None,
            args: serde_json::Map::new(),
        }
    }
}

/// Prompt/response contract based on native function calling.
#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionCallingLanguage;

impl FunctionCallingLanguage {
    pub fn new() -> Self {
        Self
    }

    /// Build a structured request: concatenated goal texts as system-level
    /// instructions, one schema per visible action (regenerated from the
    /// declared parameters, introspection only), and the full current
    /// transcript.
    pub fn construct_prompt(&self, actions: &[Action], goals: &[Goal], memory: &Memory) -> Prompt {
        let instructions = goals
            .iter()
            .map(|g| g.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        Prompt {
            instructions,
            transcript: memory.turns().to_vec(),
            tools: actions.iter().map(Action::to_definition).collect(),
        }
    }

    /// Parse a model reply into an invocation. Three shapes are handled:
    ///
    /// 1. exactly one structured tool call → `{tool, args}`
    /// 2. no tool call (free text) → `{tool: None}`
    /// 3. malformed arguments → degraded to shape 2, so the loop treats it
    ///    as "the model is talking" and never crashes
    ///
    /// Replies with multiple tool calls are out of contract; only the first
    /// is honored, the rest are logged and dropped.
    pub fn parse_response(&self, reply: &ModelReply) -> Invocation {
        let Some(call) = reply.tool_calls.first() else {
            return Invocation::none();
        };

        if reply.tool_calls.len() > 1 {
            warn!(
                tool = %call.name,
                dropped = reply.tool_calls.len() - 1,
                "Model requested multiple tool calls; honoring only the first"
            );
        }

        match serde_json::from_str::<serde_json::Value>(&call.arguments) {
            Ok(serde_json::Value::Object(args)) => Invocation {
                tool: Some(call.name.clone()),
                args,
            },
            Ok(_) | Err(_) => {
                warn!(
                    tool = %call.name,
                    "Tool call arguments were not a JSON object; treating reply as free text"
                );
                Invocation::none()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conclave_core::ToolCallRequest;

    #[test]
    fn free_text_reply_parses_to_no_tool() {
        let lang = FunctionCallingLanguage::new();
        let invocation = lang.parse_response(&ModelReply::text("All done."));
        assert_eq!(invocation, Invocation::none());
    }

    #[test]
    fn single_tool_call_parses_name_and_args() {
        let lang = FunctionCallingLanguage::new();
        let reply = ModelReply::tool_call("list_files", &serde_json::json!({"dir_path": "."}));
        let invocation = lang.parse_response(&reply);
        assert_eq!(invocation.tool.as_deref(), Some("list_files"));
        assert_eq!(invocation.args["dir_path"], ".");
    }

    #[test]
    fn malformed_arguments_degrade_to_free_text() {
        let lang = FunctionCallingLanguage::new();
        let reply = ModelReply {
            content: String::new(),
            tool_calls: vec![ToolCallRequest {
                id: "1".into(),
                name: "list_files".into(),
                arguments: "{not json".into(),
            }],
        };
        assert_eq!(lang.parse_response(&reply), Invocation::none());
    }

    #[test]
    fn non_object_arguments_degrade_to_free_text() {
        let lang = FunctionCallingLanguage::new();
        let reply = ModelReply {
            content: String::new(),
            tool_calls: vec![ToolCallRequest {
                id: "1".into(),
                name: "list_files".into(),
                arguments: "[1, 2, 3]".into(),
            }],
        };
        assert_eq!(lang.parse_response(&reply), Invocation::none());
    }

    #[test]
    fn multiple_tool_calls_honor_only_the_first() {
        let lang = FunctionCallingLanguage::new();
        let reply = ModelReply {
            content: String::new(),
            tool_calls: vec![
                ToolCallRequest {
                    id: "1".into(),
                    name: "first".into(),
                    arguments: "{}".into(),
                },
                ToolCallRequest {
                    id: "2".into(),
                    name: "second".into(),
                    arguments: "{}".into(),
                },
            ],
        };
        let invocation = lang.parse_response(&reply);
        assert_eq!(invocation.tool.as_deref(), Some("first"));
    }

    #[test]
    fn prompt_concatenates_goals_and_transcript() {
        use conclave_core::{Goal, Memory, Turn};

        let lang = FunctionCallingLanguage::new();
        let goals = vec![Goal::new("Be a file manager."), Goal::new("Be concise.")];
        let mut memory = Memory::new();
        memory.add(Turn::user("list my files"));

        let prompt = lang.construct_prompt(&[], &goals, &memory);
        assert!(prompt.instructions.contains("file manager"));
        assert!(prompt.instructions.contains("concise"));
        assert_eq!(prompt.transcript.len(), 1);
        assert!(prompt.tools.is_empty());
    }
}
