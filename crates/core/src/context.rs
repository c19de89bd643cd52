//! ActionContext and the agent registry.
//!
//! The context is a read-only bag of shared configuration threaded by
//! reference into every tool invocation: credential/config properties, the
//! agent registry for delegation, the injected audit log, debug flag, UI
//! mode, and the delegation depth counter. Tools read configuration out of
//! `properties` by key, never by global lookup.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::audit::AuditLog;
use crate::error::{DelegationError, Error};
use crate::turn::Memory;

/// Which surface the driving session runs behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiMode {
    #[default]
    Cli,
    Web,
}

/// The delegation entry point every registrable agent exposes.
///
/// `run_task` must create a brand-new memory for the run — a delegated agent
/// never shares or inherits its caller's local memory.
#[async_trait]
pub trait AgentRunner: Send + Sync {
    fn name(&self) -> &str;

    async fn run_task(&self, task: &str, ctx: &ActionContext) -> Result<Memory, Error>;
}

/// Maps agent name to that agent's runnable entry point. Used exclusively by
/// the delegation action.
#[derive(Default)]
pub struct AgentRegistry {
    agents: HashMap<String, Arc<dyn AgentRunner>>,
    order: Vec<String>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent. Replaces any existing agent with the same name.
    pub fn register(&mut self, runner: Arc<dyn AgentRunner>) {
        let name = runner.name().to_string();
        if !self.agents.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.agents.insert(name, runner);
    }

    /// Get an agent's entry point by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn AgentRunner>> {
        self.agents.get(name).cloned()
    }

    /// Registered agent names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl std::fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRegistry")
            .field("agents", &self.order)
            .finish()
    }
}

/// Immutable-after-construction bag of shared run configuration.
///
/// Cloning is cheap (shared handles); a delegated call receives a `descend()`
/// clone that differs only in its depth counter.
#[derive(Debug, Clone)]
pub struct ActionContext {
    properties: serde_json::Map<String, serde_json::Value>,
    agents: Option<Arc<AgentRegistry>>,
    audit: Arc<AuditLog>,
    debug: bool,
    ui: UiMode,
    depth: u32,
    max_depth: u32,
}

const DEFAULT_MAX_DEPTH: u32 = 4;

impl ActionContext {
    pub fn builder() -> ActionContextBuilder {
        ActionContextBuilder::default()
    }

    /// Look up a shared configuration value by key.
    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.get(key)
    }

    /// Convenience accessor for string-valued properties.
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.property(key).and_then(serde_json::Value::as_str)
    }

    pub fn agent_registry(&self) -> Option<&Arc<AgentRegistry>> {
        self.agents.as_ref()
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    pub fn audit_handle(&self) -> Arc<AuditLog> {
        Arc::clone(&self.audit)
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn ui(&self) -> UiMode {
        self.ui
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Clone this context for a delegated sub-run, one level deeper.
    ///
    /// Fails once the configured maximum is reached — the explicit backstop
    /// against runaway mutual delegation between agents.
    pub fn descend(&self) -> Result<ActionContext, DelegationError> {
        let depth = self.depth + 1;
        if depth > self.max_depth {
            return Err(DelegationError::DepthExceeded {
                depth,
                max: self.max_depth,
            });
        }
        Ok(Self {
            depth,
            ..self.clone()
        })
    }
}

impl Default for ActionContext {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Default)]
pub struct ActionContextBuilder {
    properties: serde_json::Map<String, serde_json::Value>,
    agents: Option<Arc<AgentRegistry>>,
    audit: Option<Arc<AuditLog>>,
    debug: bool,
    ui: UiMode,
    max_depth: Option<u32>,
}

impl ActionContextBuilder {
    pub fn property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn agents(mut self, registry: Arc<AgentRegistry>) -> Self {
        self.agents = Some(registry);
        self
    }

    pub fn audit(mut self, audit: Arc<AuditLog>) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn ui(mut self, ui: UiMode) -> Self {
        self.ui = ui;
        self
    }

    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn build(self) -> ActionContext {
        ActionContext {
            properties: self.properties,
            agents: self.agents,
            audit: self.audit.unwrap_or_default(),
            debug: self.debug,
            ui: self.ui,
            depth: 0,
            max_depth: self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
        }
    }
}
