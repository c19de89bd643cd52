//! Environment — the system's sole exception-to-data boundary.
//!
//! Every tool, however it implements its own domain, surfaces failures
//! through this one channel: the environment validates arguments against the
//! action's declared schema, invokes the handler, and folds any error into a
//! structured [`ExecutionResult`] instead of propagating it to the loop.

use conclave_core::{Action, ActionContext};
use tracing::{debug, warn};

/// The outcome of resolving and executing one model turn, with an explicit
/// success/failure tag.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResult {
    /// The tool ran; carries its raw return value.
    Executed { result: serde_json::Value },

    /// The model chose to respond without using a tool.
    Skipped { message: String },

    /// The requested tool was absent, its arguments were invalid, or its
    /// handler failed.
    Failed { error: String },
}

impl ExecutionResult {
    pub fn skipped(message: impl Into<String>) -> Self {
        Self::Skipped {
            message: message.into(),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    pub fn is_executed(&self) -> bool {
        matches!(self, Self::Executed { .. })
    }

    /// The JSON shape recorded into memory and shown to the model.
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            Self::Executed { result } => serde_json::json!({
                "tool_executed": true,
                "result": result,
            }),
            Self::Skipped { message } => serde_json::json!({
                "tool_executed": false,
                "message": message,
            }),
            Self::Failed { error } => serde_json::json!({
                "tool_executed": false,
                "error": error,
            }),
        }
    }
}

/// Executes resolved actions. Looks up nothing itself — the action has
/// already been resolved by the loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct Environment;

impl Environment {
    pub fn new() -> Self {
        Self
    }

    /// Validate and run an action against its arguments, isolating any
    /// failure into a structured result.
    pub async fn execute_action(
        &self,
        action: &Action,
        ctx: &ActionContext,
        args: &serde_json::Map<String, serde_json::Value>,
    ) -> ExecutionResult {
        if let Err(e) = action.validate_args(args) {
            warn!(action = %action.name, error = %e, "Rejected invalid arguments");
            return ExecutionResult::failed(e.to_string());
        }

        debug!(action = %action.name, "Executing action");
        match action.invoke(ctx, args).await {
            Ok(result) => ExecutionResult::Executed { result },
            Err(e) => {
                warn!(action = %action.name, error = %e, "Action execution failed");
                ExecutionResult::failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use conclave_core::{ActionError, ActionHandler, ParamSpec};
    use std::sync::Arc;

    struct Upper;

    #[async_trait]
    impl ActionHandler for Upper {
        async fn call(
            &self,
            _ctx: &ActionContext,
            args: &serde_json::Map<String, serde_json::Value>,
        ) -> Result<serde_json::Value, ActionError> {
            let text = args.get("text").and_then(|v| v.as_str()).unwrap_or_default();
            Ok(serde_json::json!(text.to_uppercase()))
        }
    }

    struct AlwaysFails;

    #[async_trait]
    impl ActionHandler for AlwaysFails {
        async fn call(
            &self,
            _ctx: &ActionContext,
            _args: &serde_json::Map<String, serde_json::Value>,
        ) -> Result<serde_json::Value, ActionError> {
            Err(ActionError::ExecutionFailed {
                action: "broken".into(),
                reason: "disk on fire".into(),
            })
        }
    }

    fn upper_action() -> Action {
        Action::new("upper", "Uppercase text", Arc::new(Upper))
            .with_params([ParamSpec::string("text", "The text")])
    }

    #[tokio::test]
    async fn success_wraps_raw_value() {
        let env = Environment::new();
        let ctx = ActionContext::default();
        let args = serde_json::json!({"text": "hi"});
        let result = env
            .execute_action(&upper_action(), &ctx, args.as_object().unwrap())
            .await;
        assert_eq!(
            result.to_value(),
            serde_json::json!({"tool_executed": true, "result": "HI"})
        );
    }

    #[tokio::test]
    async fn handler_error_becomes_structured_failure() {
        let env = Environment::new();
        let ctx = ActionContext::default();
        let action = Action::new("broken", "Always fails", Arc::new(AlwaysFails));
        let result = env
            .execute_action(&action, &ctx, &serde_json::Map::new())
            .await;
        let value = result.to_value();
        assert_eq!(value["tool_executed"], false);
        assert!(value["error"].as_str().unwrap().contains("disk on fire"));
    }

    #[tokio::test]
    async fn invalid_arguments_fail_before_invocation() {
        let env = Environment::new();
        let ctx = ActionContext::default();
        let result = env
            .execute_action(&upper_action(), &ctx, &serde_json::Map::new())
            .await;
        assert!(!result.is_executed());
        assert!(result.to_value()["error"]
            .as_str()
            .unwrap()
            .contains("text"));
    }
}
