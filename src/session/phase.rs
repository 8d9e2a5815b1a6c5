use serde::{Deserialize, Serialize};

/// Where the session currently sits in the analysis lifecycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    Analyzing,
    Completed,
    Failed,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Completed | Phase::Failed)
    }
}
