//! End-to-end integration tests for the Conclave agent runtime.
//!
//! These tests exercise the full pipeline from user input to agent output
//! with a scripted model: tool resolution against the real public registry,
//! actual tool execution on disk, and manager-to-specialist delegation.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use conclave_agent::{Agent, Termination, call_agent_action};
use conclave_core::{
    ActionContext, ActionRegistry, AgentRegistry, CompletionModel, Goal, ModelError, ModelReply,
    Prompt, Role,
};
use conclave_tools::{TAG_FILES, public_registry};

// ── Scripted model ───────────────────────────────────────────────────────

/// Returns canned replies in sequence; panics if asked for more.
struct ScriptedModel {
    replies: Mutex<Vec<ModelReply>>,
    call_count: Mutex<usize>,
}

impl ScriptedModel {
    fn new(replies: Vec<ModelReply>) -> Self {
        Self {
            replies: Mutex::new(replies),
            call_count: Mutex::new(0),
        }
    }
}

#[async_trait]
impl CompletionModel for ScriptedModel {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, _prompt: Prompt) -> Result<ModelReply, ModelError> {
        let mut count = self.call_count.lock().unwrap();
        let replies = self.replies.lock().unwrap();
        if *count >= replies.len() {
            panic!(
                "ScriptedModel exhausted: call #{}, have {}",
                *count,
                replies.len()
            );
        }
        let reply = replies[*count].clone();
        *count += 1;
        Ok(reply)
    }
}

fn file_agent(name: &str, replies: Vec<ModelReply>) -> Agent {
    let mut actions = ActionRegistry::new();
    actions.copy_from(&public_registry(), Some(&[TAG_FILES.to_string()]));
    Agent::new(
        name,
        vec![Goal::new("You manage files on behalf of the user.")],
        actions,
        Arc::new(ScriptedModel::new(replies)),
    )
}

// ── E2E: listing real files ──────────────────────────────────────────────

#[tokio::test]
async fn e2e_file_listing_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("notes.md"), "notes").unwrap();
    std::fs::write(dir.path().join("todo.txt"), "todo").unwrap();

    let agent = file_agent(
        "file_manager",
        vec![
            ModelReply::tool_call(
                "list_files",
                &serde_json::json!({"dir_path": dir.path().to_string_lossy()}),
            ),
            ModelReply::text("The directory contains notes.md and todo.txt."),
        ],
    );
    let ctx = ActionContext::default();

    let run = agent.run("what files are here?", None, &ctx).await.unwrap();
    assert_eq!(run.termination, Termination::NoToolInvoked);
    assert_eq!(run.iterations, 2);

    // user, assistant, tool result, assistant, final result.
    let turns = run.memory.turns();
    assert_eq!(turns.len(), 5);
    let roles: Vec<Role> = turns.iter().map(|t| t.role).collect();
    assert_eq!(
        roles,
        vec![Role::User, Role::Assistant, Role::User, Role::Assistant, Role::User]
    );

    // The tool really ran against the filesystem.
    let tool_result: serde_json::Value = serde_json::from_str(&turns[2].content).unwrap();
    assert_eq!(tool_result["tool_executed"], true);
    let listing = tool_result["result"].as_array().unwrap();
    assert_eq!(listing, &[serde_json::json!("notes.md"), serde_json::json!("todo.txt")]);

    assert_eq!(
        run.memory.last_assistant_content(),
        Some("The directory contains notes.md and todo.txt.")
    );
}

// ── E2E: manager delegation ──────────────────────────────────────────────

#[tokio::test]
async fn e2e_manager_delegates_to_file_specialist() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("report.pdf"), "x").unwrap();

    let specialist = file_agent(
        "file_manager",
        vec![
            ModelReply::tool_call(
                "list_files",
                &serde_json::json!({"dir_path": dir.path().to_string_lossy()}),
            ),
            ModelReply::text("The folder holds one file: report.pdf."),
        ],
    );

    let mut agents = AgentRegistry::new();
    agents.register(Arc::new(specialist));

    let mut manager_actions = ActionRegistry::new();
    manager_actions.register(call_agent_action());
    let manager = Agent::new(
        "manager",
        vec![Goal::new("Delegate tasks to sub-agents and compile their results.")],
        manager_actions,
        Arc::new(ScriptedModel::new(vec![
            ModelReply::tool_call(
                "call_agent",
                &serde_json::json!({
                    "agent_name": "file_manager",
                    "task": format!("list the files in {}", dir.path().display()),
                }),
            ),
            ModelReply::text("The file manager found one file: report.pdf."),
        ])),
    );

    let ctx = ActionContext::builder().agents(Arc::new(agents)).build();
    let run = manager.run("what's in that folder?", None, &ctx).await.unwrap();
    assert_eq!(run.termination, Termination::NoToolInvoked);

    // The delegation result carries the specialist's final answer.
    let delegation: serde_json::Value =
        serde_json::from_str(&run.memory.turns()[2].content).unwrap();
    assert_eq!(delegation["tool_executed"], true);
    assert_eq!(delegation["result"]["success"], true);
    assert_eq!(delegation["result"]["agent"], "file_manager");
    assert_eq!(
        delegation["result"]["result"],
        "The folder holds one file: report.pdf."
    );

    // Both agents left entries in the shared audit log; the specialist's
    // turns never entered the manager's memory.
    assert!(!ctx.audit().for_agent("manager").is_empty());
    assert!(!ctx.audit().for_agent("file_manager").is_empty());
    assert_eq!(run.memory.turns().len(), 5);
}

#[tokio::test]
async fn e2e_ghost_agent_delegation_reports_failure() {
    let mut manager_actions = ActionRegistry::new();
    manager_actions.register(call_agent_action());
    let manager = Agent::new(
        "manager",
        vec![],
        manager_actions,
        Arc::new(ScriptedModel::new(vec![
            ModelReply::tool_call(
                "call_agent",
                &serde_json::json!({"agent_name": "ghost", "task": "anything"}),
            ),
            ModelReply::text("That agent does not exist."),
        ])),
    );

    let ctx = ActionContext::builder()
        .agents(Arc::new(AgentRegistry::new()))
        .build();
    let run = manager.run("ask the ghost", None, &ctx).await.unwrap();

    // The failure is data the loop keeps running on, not an error.
    assert_eq!(run.termination, Termination::NoToolInvoked);
    let delegation: serde_json::Value =
        serde_json::from_str(&run.memory.turns()[2].content).unwrap();
    assert_eq!(delegation["tool_executed"], true);
    assert_eq!(delegation["result"]["success"], false);
    assert!(
        delegation["result"]["error"]
            .as_str()
            .unwrap()
            .contains("not found")
    );
}
