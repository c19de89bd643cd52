//! Report the current working directory.

use async_trait::async_trait;
use conclave_core::{Action, ActionContext, ActionError, ActionHandler};
use std::sync::Arc;

struct WorkingDir;

#[async_trait]
impl ActionHandler for WorkingDir {
    async fn call(
        &self,
        _ctx: &ActionContext,
        _args: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<serde_json::Value, ActionError> {
        let cwd = std::env::current_dir().map_err(ActionError::from)?;
        Ok(serde_json::json!(cwd.display().to_string()))
    }
}

pub fn action() -> Action {
    Action::new(
        "working_dir",
        "Get the current working directory. Takes no arguments.",
        Arc::new(WorkingDir),
    )
    .with_tags([crate::TAG_FILES])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_an_absolute_path() {
        let ctx = ActionContext::default();
        let result = action()
            .invoke(&ctx, &serde_json::Map::new())
            .await
            .unwrap();
        assert!(std::path::Path::new(result.as_str().unwrap()).is_absolute());
    }
}
