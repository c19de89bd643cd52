//! List the entries of a directory.

use async_trait::async_trait;
use conclave_core::{Action, ActionContext, ActionError, ActionHandler, ParamSpec};
use std::sync::Arc;

struct ListFiles;

#[async_trait]
impl ActionHandler for ListFiles {
    async fn call(
        &self,
        _ctx: &ActionContext,
        args: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<serde_json::Value, ActionError> {
        let dir_path = args
            .get("dir_path")
            .and_then(|v| v.as_str())
            .unwrap_or(".");

        let mut entries = Vec::new();
        let mut read_dir = match tokio::fs::read_dir(dir_path).await {
            Ok(rd) => rd,
            Err(e) => return Ok(serde_json::json!(format!("Failed to list '{dir_path}': {e}"))),
        };
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(ActionError::from)?
        {
            entries.push(entry.file_name().to_string_lossy().into_owned());
        }
        entries.sort();

        Ok(serde_json::json!(entries))
    }
}

pub fn action() -> Action {
    Action::new(
        "list_files",
        "List the files in the designated directory.",
        Arc::new(ListFiles),
    )
    .with_tags([crate::TAG_FILES])
    .with_params([ParamSpec::string("dir_path", "The directory to list")])
}
