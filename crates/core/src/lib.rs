//! Interview Core
//!
//! The turn-orchestration engine of the AI technical interviewer: session
//! state, the observer, interviewer and feedback nodes, the router between
//! them and the `Orchestrator` that runs one step per candidate answer.

pub mod decision;
pub mod llm_client;
pub mod nodes;
pub mod orchestrator;
pub mod prompts;
pub mod router;
pub mod session;
pub mod transcript;
pub mod vision;

use session::SessionState;

/// Represents what the runtime should do after a step.
///
/// This enum decouples the interview's decision-making from the runtime's
/// side effects (speaking text, showing and persisting the report).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Command the runtime to speak or show the given text to the candidate.
    SpeakText(String),
    /// Command indicating the session is complete, with the final report.
    SessionComplete(String),
}

impl Command {
    /// The commands produced by the step that turned some earlier state into
    /// `state`, given that earlier state's history length.
    ///
    /// A step that reaches the quota asks its last question and writes the
    /// report in one go, so both commands come back, question first.
    pub fn for_step(prior_history_len: usize, state: &SessionState) -> Vec<Self> {
        let mut commands = Vec::new();
        if state.history().len() > prior_history_len
            && let Some(message) = state.last_visible_message()
        {
            commands.push(Command::SpeakText(message.to_string()));
        }
        if state.is_terminal() {
            commands.push(Command::SessionComplete(state.final_feedback().to_string()));
        }
        commands
    }
}
