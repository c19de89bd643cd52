//! Error types for the Conclave domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant. None of the loop-level
//! kinds is fatal: the runner and the environment fold them into structured
//! results that are fed back to the model.

use thiserror::Error;

/// The top-level error type for all Conclave operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Model errors ---
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    // --- Action errors ---
    #[error("Action error: {0}")]
    Action(#[from] ActionError),

    // --- Delegation errors ---
    #[error("Delegation error: {0}")]
    Delegation(#[from] DelegationError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Malformed model reply: {0}")]
    MalformedReply(String),

    #[error("Model not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Action not found: {0}")]
    NotFound(String),

    #[error("Invalid action arguments: {0}")]
    InvalidArguments(String),

    #[error("Action execution failed: {action} — {reason}")]
    ExecutionFailed { action: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Error)]
pub enum DelegationError {
    #[error("No agent registry found in context")]
    NoRegistry,

    #[error("Agent '{0}' not found in registry")]
    UnknownAgent(String),

    #[error("Delegation depth {depth} exceeds the configured maximum of {max}")]
    DepthExceeded { depth: u32, max: u32 },
}
