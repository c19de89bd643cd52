//! Save content to a file.

use async_trait::async_trait;
use conclave_core::{Action, ActionContext, ActionError, ActionHandler, ParamSpec};
use std::sync::Arc;

struct SaveFile;

#[async_trait]
impl ActionHandler for SaveFile {
    async fn call(
        &self,
        _ctx: &ActionContext,
        args: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<serde_json::Value, ActionError> {
        let content = args
            .get("content")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let file_path = args
            .get("file_path")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        if let Some(parent) = std::path::Path::new(file_path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(ActionError::from)?;
            }
        }
        match tokio::fs::write(file_path, content).await {
            Ok(()) => Ok(serde_json::json!(format!("Content saved to {file_path}"))),
            Err(e) => Ok(serde_json::json!(format!(
                "Failed to save '{file_path}': {e}"
            ))),
        }
    }
}

pub fn action() -> Action {
    Action::new(
        "save_file",
        "Save content to a file. Provide the content and the file path with the correct extension.",
        Arc::new(SaveFile),
    )
    .with_tags([crate::TAG_FILES])
    .with_params([
        ParamSpec::string("content", "The content to be saved"),
        ParamSpec::string("file_path", "Where to save it"),
    ])
}
