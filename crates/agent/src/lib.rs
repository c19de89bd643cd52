//! The Conclave agent loop — the heart of the runtime.
//!
//! Each agent follows an **ask → act → record** cycle:
//!
//! 1. **Build a prompt** from its goals, its visible actions, and the current
//!    memory window
//! 2. **Ask the model** what to do next
//! 3. **If a tool was requested**: resolve and execute it, feed the result
//!    back into memory, loop
//! 4. **If the model replied with free text**: the run is over
//!
//! Free text ending the run is a deliberate simplicity/capability trade-off:
//! an agent cannot think out loud mid-task, but every delegation chain has an
//! unambiguous end. The transition is modelled explicitly in
//! [`Termination`], not inferred.
//!
//! A coordinating agent additionally registers the privileged `call_agent`
//! action, which runs another registered agent as a synchronous sub-routine
//! with an isolated, brand-new memory.

pub mod delegate;
pub mod environment;
pub mod language;
pub mod runner;

#[cfg(test)]
mod test_support;

pub use delegate::{CALL_AGENT, call_agent_action};
pub use environment::{Environment, ExecutionResult};
pub use language::{FunctionCallingLanguage, Invocation};
pub use runner::{Agent, AgentRun, Termination};
