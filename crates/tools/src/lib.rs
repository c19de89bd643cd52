//! Built-in tool actions for Conclave agents.
//!
//! Tools give agents the ability to act in the world: list and read files,
//! save content, fetch web pages, and keep a bookkeeping ledger. Each module
//! exposes an `action()` constructor; `public_registry()` assembles the
//! shared registry that per-agent registries copy from by tag.

pub mod fs_list;
pub mod fs_read;
pub mod fs_write;
pub mod ledger;
pub mod web_fetch;
pub mod working_dir;

use conclave_core::ActionRegistry;

/// Tag for filesystem tools.
pub const TAG_FILES: &str = "file_operations";
/// Tag for web tools.
pub const TAG_WEB: &str = "web";
/// Tag for the bookkeeping ledger tools.
pub const TAG_BOOKKEEPING: &str = "bookkeeping";

/// Create the shared public registry with every built-in tool.
pub fn public_registry() -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    registry.register(fs_list::action());
    registry.register(fs_read::action());
    registry.register(fs_write::action());
    registry.register(working_dir::action());
    registry.register(web_fetch::action());
    registry.register(ledger::append_action());
    registry.register(ledger::tail_action());
    registry
}
