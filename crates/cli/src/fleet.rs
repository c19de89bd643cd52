//! Assembly of the default agent fleet: a delegating manager plus the
//! specialist sub-agents it can call.

use std::sync::Arc;

use conclave_agent::{Agent, call_agent_action};
use conclave_config::AppConfig;
use conclave_core::{
    ActionContext, ActionRegistry, AgentRegistry, CompletionModel, Goal, UiMode,
};
use conclave_tools::{TAG_BOOKKEEPING, TAG_FILES, TAG_WEB, public_registry};

/// A specialist's static description: who it is and which public tools it
/// gets. An empty tag list means every public tool.
pub struct Blueprint {
    pub name: &'static str,
    pub goals: &'static [&'static str],
    pub tags: &'static [&'static str],
}

pub const SPECIALISTS: &[Blueprint] = &[
    Blueprint {
        name: "file_manager",
        goals: &[
            "You are a secretary manager. You can perform various file operations based on \
             user requests.",
        ],
        tags: &[TAG_FILES],
    },
    Blueprint {
        name: "web_researcher",
        goals: &[
            "You are a competent secretary that gathers information from web pages. You can \
             fetch a webpage from a URL and read its content.",
            "Do not rewrite any result from the information gathering process. Return the raw \
             retrieved result to the user / manager agent.",
        ],
        tags: &[TAG_WEB],
    },
    Blueprint {
        name: "bookkeeper",
        goals: &[
            "You are a bookkeeper. You record income and expenses in the ledger and report on \
             recent entries when asked.",
        ],
        tags: &[TAG_BOOKKEEPING],
    },
    Blueprint {
        name: "writer",
        goals: &[
            "You are a professional writer, who is especially adept at writing technical \
             articles. Your task is to write the requested text in the specified form.",
            "Be concise and to the point. Use relevant language and tone.",
        ],
        tags: &[],
    },
];

/// The assembled fleet: the manager agent and the shared run context that
/// carries the audit log and the registry of callable specialists.
pub struct Fleet {
    pub manager: Agent,
    pub ctx: ActionContext,
}

/// Build the manager and its specialists from one shared model handle.
pub fn build(config: &AppConfig, model: Arc<dyn CompletionModel>) -> Fleet {
    let public = public_registry();

    let mut agents = AgentRegistry::new();
    for blueprint in SPECIALISTS {
        let tags: Vec<String> = blueprint.tags.iter().map(ToString::to_string).collect();
        let mut actions = ActionRegistry::new();
        actions.copy_from(&public, Some(&tags));

        let agent = Agent::new(
            blueprint.name,
            blueprint.goals.iter().copied().map(Goal::new).collect(),
            actions,
            Arc::clone(&model),
        )
        .with_max_iterations(config.runtime.max_iterations)
        .with_history_limit(config.runtime.max_history);

        agents.register(Arc::new(agent));
    }

    // The manager only delegates; call_agent is its single tool.
    let mut manager_actions = ActionRegistry::new();
    manager_actions.register(call_agent_action());

    let manager = Agent::new(
        "manager",
        vec![
            Goal::new(
                "You are a project manager in a software development team. Your task is to \
                 delegate tasks to specialized sub-agents based on user requests and compile \
                 their results.",
            ),
            Goal::new(
                "Effectively utilize the 'call_agent' tool to assign tasks to the appropriate \
                 sub-agents and gather their outputs.",
            ),
            Goal::new(
                "Do not include any JSON format when you are simply replying to a question \
                 without calling a tool.",
            ),
        ],
        manager_actions,
        model,
    )
    .with_max_iterations(config.runtime.max_iterations)
    .with_history_limit(config.runtime.max_history);

    let ctx = ActionContext::builder()
        .agents(Arc::new(agents))
        .property("ledger_path", serde_json::json!(config.ledger_path))
        .debug(config.runtime.debug)
        .ui(UiMode::Cli)
        .max_depth(config.runtime.max_delegation_depth)
        .build();

    Fleet { manager, ctx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use conclave_core::{ModelError, ModelReply, Prompt};

    struct NeverCalled;

    #[async_trait]
    impl CompletionModel for NeverCalled {
        fn name(&self) -> &str {
            "never"
        }
        async fn complete(&self, _prompt: Prompt) -> Result<ModelReply, ModelError> {
            Err(ModelError::NotConfigured("test model".into()))
        }
    }

    #[test]
    fn fleet_registers_every_specialist() {
        let config = AppConfig::default();
        let fleet = build(&config, Arc::new(NeverCalled));

        let registry = fleet.ctx.agent_registry().unwrap();
        assert_eq!(
            registry.names(),
            vec!["file_manager", "web_researcher", "bookkeeper", "writer"]
        );
        assert_eq!(fleet.manager.actions().names(), vec!["call_agent"]);
    }

    #[test]
    fn context_carries_runtime_limits() {
        let mut config = AppConfig::default();
        config.runtime.max_delegation_depth = 2;
        config.ledger_path = "/tmp/books.jsonl".into();
        let fleet = build(&config, Arc::new(NeverCalled));

        assert_eq!(fleet.ctx.max_depth(), 2);
        assert_eq!(fleet.ctx.property_str("ledger_path"), Some("/tmp/books.jsonl"));
    }
}
