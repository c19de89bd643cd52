//! Append-only bookkeeping ledger stored as line-delimited JSON.

use async_trait::async_trait;
use chrono::Utc;
use conclave_core::{Action, ActionContext, ActionError, ActionHandler, ParamKind, ParamSpec};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::debug;

const DEFAULT_LEDGER_PATH: &str = "ledger.jsonl";
const DEFAULT_TAIL_LIMIT: usize = 10;

fn ledger_path(ctx: &ActionContext) -> String {
    ctx.property_str("ledger_path")
        .unwrap_or(DEFAULT_LEDGER_PATH)
        .to_string()
}

struct LedgerAppend;

#[async_trait]
impl ActionHandler for LedgerAppend {
    async fn call(
        &self,
        ctx: &ActionContext,
        args: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<serde_json::Value, ActionError> {
        let description = args
            .get("description")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let amount = args.get("amount").and_then(|v| v.as_f64()).unwrap_or(0.0);

        let path = ledger_path(ctx);
        let entry = serde_json::json!({
            "time": Utc::now().to_rfc3339(),
            "description": description,
            "amount": amount,
        });
        let mut line = serde_json::to_string(&entry)
            .map_err(|e| ActionError::ExecutionFailed {
                action: "ledger_append".to_string(),
                reason: e.to_string(),
            })?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        debug!(path = %path, amount, "Appended ledger entry");
        Ok(serde_json::json!(format!(
            "Recorded '{description}' ({amount}) in {path}"
        )))
    }
}

struct LedgerTail;

#[async_trait]
impl ActionHandler for LedgerTail {
    async fn call(
        &self,
        ctx: &ActionContext,
        args: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<serde_json::Value, ActionError> {
        let limit = args
            .get("limit")
            .and_then(|v| v.as_u64())
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_TAIL_LIMIT);

        let path = ledger_path(ctx);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(s) => s,
            Err(e) => {
                return Ok(serde_json::json!(format!(
                    "Failed to read ledger '{path}': {e}"
                )));
            }
        };

        let entries: Vec<serde_json::Value> = raw
            .lines()
            .filter(|l| !l.trim().is_empty())
            .filter_map(|l| serde_json::from_str(l).ok())
            .collect();
        let start = entries.len().saturating_sub(limit);
        Ok(serde_json::Value::Array(entries[start..].to_vec()))
    }
}

pub fn append_action() -> Action {
    Action::new(
        "ledger_append",
        "Record a bookkeeping entry with a description and a numeric amount.",
        Arc::new(LedgerAppend),
    )
    .with_tags([crate::TAG_BOOKKEEPING])
    .with_params([
        ParamSpec::string("description", "What the entry is for"),
        ParamSpec::new(
            "amount",
            ParamKind::Number,
            true,
            "The amount, positive for income and negative for expenses",
        ),
    ])
}

pub fn tail_action() -> Action {
    Action::new(
        "ledger_tail",
        "Show the most recent ledger entries, newest last.",
        Arc::new(LedgerTail),
    )
    .with_tags([crate::TAG_BOOKKEEPING])
    .with_params([ParamSpec::new(
        "limit",
        ParamKind::Integer,
        false,
        "How many entries to show (default 10)",
    )])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_for(dir: &tempfile::TempDir) -> ActionContext {
        let path = dir.path().join("ledger.jsonl");
        ActionContext::builder()
            .property("ledger_path", serde_json::json!(path.to_string_lossy()))
            .build()
    }

    #[tokio::test]
    async fn append_then_tail_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ctx_for(&dir);

        for (desc, amount) in [("coffee", -3.5), ("invoice 42", 1200.0)] {
            let args = serde_json::json!({"description": desc, "amount": amount});
            append_action()
                .invoke(&ctx, args.as_object().unwrap())
                .await
                .unwrap();
        }

        let args = serde_json::json!({});
        let tail = tail_action()
            .invoke(&ctx, args.as_object().unwrap())
            .await
            .unwrap();
        let entries = tail.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["description"], "coffee");
        assert_eq!(entries[1]["amount"], 1200.0);
        assert!(entries[1]["time"].as_str().unwrap().contains('T'));
    }

    #[tokio::test]
    async fn tail_honors_limit() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ctx_for(&dir);

        for n in 0..5 {
            let args = serde_json::json!({"description": format!("entry {n}"), "amount": n});
            append_action()
                .invoke(&ctx, args.as_object().unwrap())
                .await
                .unwrap();
        }

        let args = serde_json::json!({"limit": 2});
        let tail = tail_action()
            .invoke(&ctx, args.as_object().unwrap())
            .await
            .unwrap();
        let entries = tail.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["description"], "entry 3");
        assert_eq!(entries[1]["description"], "entry 4");
    }

    #[tokio::test]
    async fn tail_of_missing_ledger_is_descriptive() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ctx_for(&dir);

        let args = serde_json::json!({});
        let tail = tail_action()
            .invoke(&ctx, args.as_object().unwrap())
            .await
            .unwrap();
        assert!(tail.as_str().unwrap().contains("Failed to read ledger"));
    }
}
