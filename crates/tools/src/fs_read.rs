//! Read the contents of a file.

use async_trait::async_trait;
use conclave_core::{Action, ActionContext, ActionError, ActionHandler, ParamSpec};
use std::sync::Arc;

struct ReadFile;

#[async_trait]
impl ActionHandler for ReadFile {
    async fn call(
        &self,
        _ctx: &ActionContext,
        args: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<serde_json::Value, ActionError> {
        let file_path = args
            .get("file_path")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        match tokio::fs::read_to_string(file_path).await {
            Ok(content) => Ok(serde_json::json!(content)),
            Err(e) => Ok(serde_json::json!(format!(
                "Failed to read '{file_path}': {e}"
            ))),
        }
    }
}

pub fn action() -> Action {
    Action::new(
        "read_file",
        "Read the content of the specified file.",
        Arc::new(ReadFile),
    )
    .with_tags([crate::TAG_FILES])
    .with_params([ParamSpec::string("file_path", "The file path to read")])
}
