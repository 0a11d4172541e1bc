//! The persisted form of a finished (or abandoned) session.

use crate::session::{SessionState, Turn};
use serde::{Deserialize, Serialize};

/// What callers write to disk once the session ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLog {
    pub participant_name: String,
    pub turns: Vec<Turn>,
    #[serde(default)]
    pub final_feedback: String,
}

impl From<&SessionState> for SessionLog {
    fn from(state: &SessionState) -> Self {
        Self {
            participant_name: state.participant_name().to_string(),
            turns: state.turns().to_vec(),
            final_feedback: state.final_feedback().to_string(),
        }
    }
}

impl SessionLog {
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
