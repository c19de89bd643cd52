//! The privileged `call_agent` action: one agent invoking another as a
//! synchronous sub-routine.
//!
//! Registered only on coordinating agents. Every failure path — missing
//! registry, unknown agent, exhausted delegation depth, sub-run error — is
//! surfaced as a structured `{success: false, error}` value, never as an
//! error propagated into the caller's loop. The sub-agent always runs on a
//! brand-new, empty memory: isolation is the core invariant of delegation.

use async_trait::async_trait;
use conclave_core::{Action, ActionContext, ActionError, ActionHandler, ParamSpec};
use std::sync::Arc;
use tracing::{debug, info};

/// The well-known name of the delegation action.
pub const CALL_AGENT: &str = "call_agent";

struct CallAgentHandler;

fn delegation_failure(error: impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({ "success": false, "error": error.to_string() })
}

#[async_trait]
impl ActionHandler for CallAgentHandler {
    async fn call(
        &self,
        ctx: &ActionContext,
        args: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<serde_json::Value, ActionError> {
        let agent_name = args
            .get("agent_name")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let task = args.get("task").and_then(|v| v.as_str()).unwrap_or_default();

        let Some(registry) = ctx.agent_registry() else {
            return Ok(delegation_failure("No agent registry found in context"));
        };
        let Some(runner) = registry.get(agent_name) else {
            return Ok(delegation_failure(format!(
                "Agent '{agent_name}' not found in registry"
            )));
        };

        // One level deeper; refuse past the configured maximum.
        let child_ctx = match ctx.descend() {
            Ok(child) => child,
            Err(e) => return Ok(delegation_failure(e)),
        };

        info!(agent = %agent_name, depth = child_ctx.depth(), "Delegating task");
        debug!(agent = %agent_name, task = %task, "Delegated task text");

        match runner.run_task(task, &child_ctx).await {
            Ok(memory) => {
                if memory.is_empty() {
                    return Ok(delegation_failure("Agent failed to run."));
                }
                let result = memory
                    .last_assistant_content()
                    .unwrap_or("No assistant message found.");
                Ok(serde_json::json!({
                    "success": true,
                    "agent": agent_name,
                    "result": result,
                }))
            }
            Err(e) => Ok(delegation_failure(e)),
        }
    }
}

/// Build the delegation action. The description is a placeholder: the runner
/// patches it at prompt time with the list of currently registered agents.
pub fn call_agent_action() -> Action {
    Action::new(
        CALL_AGENT,
        "Call another agent to finish a task.",
        Arc::new(CallAgentHandler),
    )
    .with_params([
        ParamSpec::string("agent_name", "Name of the agent to call"),
        ParamSpec::string("task", "The task to ask the agent to perform"),
    ])
}
