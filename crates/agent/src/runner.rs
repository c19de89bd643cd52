//! The agent control loop implementation.

use std::sync::Arc;

use async_trait::async_trait;
use conclave_core::{
    ActionContext, ActionRegistry, AgentRunner, CompletionModel, Error, Goal, Memory, Turn,
};
use tracing::{debug, info, warn};

use crate::delegate::CALL_AGENT;
use crate::environment::{Environment, ExecutionResult};
use crate::language::FunctionCallingLanguage;

/// Why a run ended. The "free text ends the run" rule is an explicit
/// transition here, not inferred control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The model replied with free text instead of invoking a tool.
    NoToolInvoked,

    /// The resolved action carried the terminal flag.
    TerminalAction,

    /// The iteration ceiling was reached without a terminal turn. Not an
    /// error: the accumulated memory is still returned.
    IterationsExhausted,
}

/// The outcome of one agent run.
#[derive(Debug)]
pub struct AgentRun {
    /// The run's local memory, including the seed turn and every
    /// assistant/result pair.
    pub memory: Memory,

    /// How the loop ended.
    pub termination: Termination,

    /// How many iterations were used.
    pub iterations: u32,
}

/// One configured instance of the control loop: goals + action registry +
/// model + environment.
pub struct Agent {
    name: String,
    goals: Vec<Goal>,
    actions: ActionRegistry,
    model: Arc<dyn CompletionModel>,
    language: FunctionCallingLanguage,
    environment: Environment,

    /// When set, only actions carrying one of these tags are exposed.
    tags: Option<Vec<String>>,

    max_iterations: u32,
    history_limit: Option<usize>,
}

const DEFAULT_MAX_ITERATIONS: u32 = 50;

impl Agent {
    pub fn new(
        name: impl Into<String>,
        goals: Vec<Goal>,
        actions: ActionRegistry,
        model: Arc<dyn CompletionModel>,
    ) -> Self {
        Self {
            name: name.into(),
            goals,
            actions,
            model,
            language: FunctionCallingLanguage::new(),
            environment: Environment::new(),
            tags: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            history_limit: None,
        }
    }

    /// Restrict the exposed actions to those carrying one of these tags.
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    /// Bound the memory window of runs this agent creates itself.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    /// The action list sent to the model this run.
    ///
    /// If this agent carries the delegation action and the context holds an
    /// agent registry, the delegation schema is patched to list the agents
    /// currently registered — the loop's only dynamic self-modification.
    fn prompt_actions(&self, ctx: &ActionContext) -> Vec<conclave_core::Action> {
        let mut actions = self.actions.get_actions(self.tags.as_deref());
        if let Some(registry) = ctx.agent_registry() {
            if let Some(delegate) = actions.iter_mut().find(|a| a.name == CALL_AGENT) {
                delegate.description = format!(
                    "Call another agent to finish a task. List of available agents: {:?}",
                    registry.names()
                );
            }
        }
        actions
    }

    /// Execute the loop for this agent.
    ///
    /// A fresh (or supplied) memory receives `user_input` as a user turn,
    /// then the loop iterates until the model answers with free text, a
    /// terminal action runs, or `max_iterations` is reached. Every raw model
    /// reply and every synthesized result turn is mirrored into the audit
    /// log, win or lose.
    pub async fn run(
        &self,
        user_input: &str,
        memory: Option<Memory>,
        ctx: &ActionContext,
    ) -> Result<AgentRun, Error> {
        let mut memory = memory.unwrap_or_else(|| match self.history_limit {
            Some(limit) => Memory::bounded(limit),
            None => Memory::new(),
        });

        let seed = Turn::user(user_input);
        ctx.audit().append(&self.name, &seed);
        memory.add(seed);

        let actions = self.prompt_actions(ctx);

        info!(
            agent = %self.name,
            actions = actions.len(),
            depth = ctx.depth(),
            "Starting run"
        );

        for iteration in 1..=self.max_iterations {
            // 1. Build the prompt from goals, visible actions, and memory.
            let prompt = self
                .language
                .construct_prompt(&actions, &self.goals, &memory);

            if ctx.debug() {
                info!(agent = %self.name, iteration, "Agent thinking...");
            }

            // 2. Ask the model; record the raw reply into the audit log
            //    whether or not it parses.
            let reply = self.model.complete(prompt).await?;
            let assistant = Turn::assistant_with_calls(reply.content.clone(), reply.tool_calls.clone());
            ctx.audit().append(&self.name, &assistant);

            if ctx.debug() {
                info!(agent = %self.name, iteration, decision = %reply.content, "Agent decision");
            }

            // 3. Parse the reply and resolve the requested tool.
            let invocation = self.language.parse_response(&reply);

            // 4. Execute (or synthesize the non-execution result).
            let (result, terminal) = match invocation.tool.as_deref() {
                None => (
                    ExecutionResult::skipped("LLM chose to respond without using a tool."),
                    false,
                ),
                Some(tool) => match self.actions.get_action(tool) {
                    None => (
                        ExecutionResult::failed(format!(
                            "Tool '{tool}' does not exist. Please check your available tools."
                        )),
                        false,
                    ),
                    Some(action) => {
                        let result = self
                            .environment
                            .execute_action(action, ctx, &invocation.args)
                            .await;
                        (result, action.terminal)
                    }
                },
            };

            if ctx.debug() {
                debug!(agent = %self.name, iteration, result = %result.to_value(), "Action result");
            }

            // 5. Append the assistant turn and the JSON-encoded result to
            //    local memory; mirror the result to the audit log.
            let result_turn = Turn::user(serde_json::to_string(&result.to_value())?);
            ctx.audit().append(&self.name, &result_turn);
            memory.add(assistant);
            memory.add(result_turn);

            // 6. Explicit termination transitions.
            if invocation.tool.is_none() {
                debug!(agent = %self.name, iteration, "Terminating: no tool invoked");
                return Ok(AgentRun {
                    memory,
                    termination: Termination::NoToolInvoked,
                    iterations: iteration,
                });
            }
            if terminal {
                debug!(agent = %self.name, iteration, "Terminating: terminal action executed");
                return Ok(AgentRun {
                    memory,
                    termination: Termination::TerminalAction,
                    iterations: iteration,
                });
            }
        }

        warn!(
            agent = %self.name,
            iterations = self.max_iterations,
            "Run exhausted its iteration ceiling"
        );
        Ok(AgentRun {
            memory,
            termination: Termination::IterationsExhausted,
            iterations: self.max_iterations,
        })
    }
}

#[async_trait]
impl AgentRunner for Agent {
    fn name(&self) -> &str {
        &self.name
    }

    /// The delegation entry point: a brand-new memory, never the caller's.
    async fn run_task(&self, task: &str, ctx: &ActionContext) -> Result<Memory, Error> {
        let run = self.run(task, None, ctx).await?;
        Ok(run.memory)
    }
}
