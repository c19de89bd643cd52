//! Goal — an immutable directive injected into every prompt for an agent.

use serde::{Deserialize, Serialize};

/// A directive text an agent pursues. An agent owns an ordered sequence of
/// goals, set at construction and never mutated during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub text: String,
}

impl Goal {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl<T: Into<String>> From<T> for Goal {
    fn from(text: T) -> Self {
        Self::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_from_str() {
        let goal: Goal = "You are a project manager.".into();
        assert_eq!(goal.text, "You are a project manager.");
    }
}
