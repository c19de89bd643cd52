//! # Conclave Core
//!
//! Domain types, traits, and error definitions for the Conclave multi-agent
//! orchestration runtime. This crate has **zero framework dependencies** — it
//! defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator is defined as a trait here: the language model
//! behind [`CompletionModel`], tool bodies behind [`ActionHandler`], and
//! delegatable agents behind [`AgentRunner`]. Implementations live in their
//! respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with scripted/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod action;
pub mod audit;
pub mod context;
pub mod error;
pub mod goal;
pub mod model;
pub mod turn;

// Re-export key types at crate root for ergonomics
pub use action::{Action, ActionHandler, ActionRegistry, ParamKind, ParamSpec};
pub use audit::{AuditEntry, AuditLog};
pub use context::{ActionContext, AgentRegistry, AgentRunner, UiMode};
pub use error::{ActionError, DelegationError, Error, ModelError, Result};
pub use goal::Goal;
pub use model::{CompletionModel, ModelReply, Prompt, ToolDefinition};
pub use turn::{Memory, Role, ToolCallRequest, Turn};
