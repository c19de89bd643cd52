//! Shared fixtures for loop and delegation tests.

use async_trait::async_trait;
use conclave_core::{
    Action, ActionContext, ActionError, ActionHandler, ActionRegistry, CompletionModel,
    ModelError, ModelReply, ParamSpec, Prompt,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A model that pops pre-scripted replies in order.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<ModelReply>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<ModelReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
        }
    }
}

#[async_trait]
impl CompletionModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, _prompt: Prompt) -> Result<ModelReply, ModelError> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ModelError::MalformedReply("scripted model ran out of replies".into()))
    }
}

struct EchoHandler;

#[async_trait]
impl ActionHandler for EchoHandler {
    async fn call(
        &self,
        _ctx: &ActionContext,
        args: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<serde_json::Value, ActionError> {
        Ok(args.get("text").cloned().unwrap_or_default())
    }
}

/// A registry holding a single "echo" action.
pub fn echo_registry() -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    registry.register(
        Action::new("echo", "Echoes back the input text", Arc::new(EchoHandler))
            .with_params([ParamSpec::string("text", "The text to echo")]),
    );
    registry
}

/// An echo action with the terminal flag set, under the given name.
pub fn terminal_echo(name: &str) -> Action {
    Action::new(name, "Echoes and ends the run", Arc::new(EchoHandler))
        .with_params([ParamSpec::string("text", "The text to echo")])
        .with_terminal(true)
}
