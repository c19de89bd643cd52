//! Action model and registry — the abstraction over agent capabilities.
//!
//! An `Action` is a named, described, invocable capability with a declared
//! parameter schema. Actions are registered in an `ActionRegistry` and made
//! available to the agent loop, which filters them by tag when an agent only
//! exposes a subset.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::context::ActionContext;
use crate::error::ActionError;
use crate::model::ToolDefinition;

/// The callable body of an action.
///
/// Expected failure modes should be reported as descriptive `Ok` values so
/// the model can react to them; `Err` is reserved for unexpected failures and
/// is caught at the environment boundary, never propagated into the loop.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn call(
        &self,
        ctx: &ActionContext,
        args: &serde_json::Map<String, serde_json::Value>,
    ) -> std::result::Result<serde_json::Value, ActionError>;
}

/// The JSON type of a declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
}

impl ParamKind {
    /// JSON Schema type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Integer => "integer",
            ParamKind::Number => "number",
            ParamKind::Boolean => "boolean",
            ParamKind::Object => "object",
            ParamKind::Array => "array",
        }
    }

    fn matches(&self, value: &serde_json::Value) -> bool {
        match self {
            ParamKind::String => value.is_string(),
            ParamKind::Integer => value.is_i64() || value.is_u64(),
            ParamKind::Number => value.is_number(),
            ParamKind::Boolean => value.is_boolean(),
            ParamKind::Object => value.is_object(),
            ParamKind::Array => value.is_array(),
        }
    }
}

/// A declared parameter: name, type, and whether it is required.
///
/// The schema sent to the model is generated from these declarations, never
/// from handler introspection, and arguments are validated against them
/// before invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
    pub required: bool,
    pub description: String,
}

impl ParamSpec {
    pub fn new(
        name: impl Into<String>,
        kind: ParamKind,
        required: bool,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            required,
            description: description.into(),
        }
    }

    /// Shorthand for a required string parameter.
    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ParamKind::String, true, description)
    }
}

/// An executable capability descriptor.
///
/// Cloning an action clones its definition; the handler body is shared by
/// `Arc`, so registries compose by copying definitions across them.
#[derive(Clone)]
pub struct Action {
    /// Unique name within one registry
    pub name: String,

    /// Description sent to the model as part of the tool schema
    pub description: String,

    /// Tags for registry filtering (e.g. "file_operations", "web")
    pub tags: Vec<String>,

    /// When true, successful execution ends the run regardless of model intent
    pub terminal: bool,

    /// Declared parameter schema
    pub params: Vec<ParamSpec>,

    handler: Arc<dyn ActionHandler>,
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .field("terminal", &self.terminal)
            .field("params", &self.params)
            .finish()
    }
}

impl Action {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: Arc<dyn ActionHandler>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            tags: Vec::new(),
            terminal: false,
            params: Vec::new(),
            handler,
        }
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_params(mut self, params: impl IntoIterator<Item = ParamSpec>) -> Self {
        self.params = params.into_iter().collect();
        self
    }

    pub fn with_terminal(mut self, terminal: bool) -> Self {
        self.terminal = terminal;
        self
    }

    /// Generate the tool definition sent to the model. Pure introspection of
    /// the declared schema — no side effects, regenerable at any time.
    pub fn to_definition(&self) -> ToolDefinition {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();
        for p in &self.params {
            properties.insert(
                p.name.clone(),
                serde_json::json!({
                    "type": p.kind.type_name(),
                    "description": p.description,
                }),
            );
            if p.required {
                required.push(serde_json::Value::String(p.name.clone()));
            }
        }
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": properties,
                "required": required,
            }),
        }
    }

    /// Validate arguments against the declared parameter schema.
    pub fn validate_args(
        &self,
        args: &serde_json::Map<String, serde_json::Value>,
    ) -> std::result::Result<(), ActionError> {
        for p in &self.params {
            match args.get(&p.name) {
                None | Some(serde_json::Value::Null) => {
                    if p.required {
                        return Err(ActionError::InvalidArguments(format!(
                            "missing required argument '{}'",
                            p.name
                        )));
                    }
                }
                Some(value) => {
                    if !p.kind.matches(value) {
                        return Err(ActionError::InvalidArguments(format!(
                            "argument '{}' must be of type {}",
                            p.name,
                            p.kind.type_name()
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Invoke the handler. Callers go through `Environment::execute_action`,
    /// which validates first and folds errors into a structured result.
    pub async fn invoke(
        &self,
        ctx: &ActionContext,
        args: &serde_json::Map<String, serde_json::Value>,
    ) -> std::result::Result<serde_json::Value, ActionError> {
        self.handler.call(ctx, args).await
    }

    fn matches_tags(&self, tags: &[String]) -> bool {
        self.tags.iter().any(|t| tags.contains(t))
    }
}

/// A registry of available actions with a secondary tag index.
///
/// Names are unique within one registry; registering a duplicate name
/// overwrites the definition in place so prompt ordering stays stable.
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    actions: HashMap<String, Action>,
    order: Vec<String>,
    by_tag: HashMap<String, BTreeSet<String>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action. Replaces any existing action with the same name.
    pub fn register(&mut self, action: Action) {
        let name = action.name.clone();
        if let Some(previous) = self.actions.get(&name) {
            for tag in &previous.tags {
                if let Some(set) = self.by_tag.get_mut(tag) {
                    set.remove(&name);
                }
            }
        } else {
            self.order.push(name.clone());
        }
        for tag in &action.tags {
            self.by_tag.entry(tag.clone()).or_default().insert(name.clone());
        }
        self.actions.insert(name, action);
    }

    /// Get an action by name. Unknown names are not an error; callers treat
    /// `None` as "capability unavailable" and surface that to the model.
    pub fn get_action(&self, name: &str) -> Option<&Action> {
        self.actions.get(name)
    }

    /// Enumerate actions, optionally filtered by tag.
    ///
    /// With no tags (or an empty list), every registered action is returned.
    /// Otherwise the union of actions whose tag set intersects the requested
    /// tags, each appearing once, in registration order.
    pub fn get_actions(&self, tags: Option<&[String]>) -> Vec<Action> {
        match tags {
            None | Some([]) => self
                .order
                .iter()
                .filter_map(|n| self.actions.get(n))
                .cloned()
                .collect(),
            Some(tags) => self
                .order
                .iter()
                .filter_map(|n| self.actions.get(n))
                .filter(|a| a.matches_tags(tags))
                .cloned()
                .collect(),
        }
    }

    /// Copy matching action definitions from another registry into this one.
    /// This is how per-agent registries are composed from a shared public
    /// registry — no shared mutable action is implied.
    pub fn copy_from(&mut self, other: &ActionRegistry, tags: Option<&[String]>) {
        for action in other.get_actions(tags) {
            self.register(action);
        }
    }

    /// Names registered under a tag.
    pub fn tagged(&self, tag: &str) -> Vec<&str> {
        self.by_tag
            .get(tag)
            .map(|set| set.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// All registered names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
