//! Interview Orchestrator
//!
//! Owns the fixed graph `observer -> interviewer -> (feedback | end)` and
//! exposes `advance`, the only way a session moves forward. One call runs
//! exactly one observer/interviewer step and, when routed, the feedback node.

use crate::{
    llm_client::LLMClient,
    nodes::{interview, observe, summarize},
    router::{DEFAULT_STOP_KEYWORD, Route, route},
    session::SessionState,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Session-independent settings for the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewSettings {
    /// Saying this word ends the interview early.
    pub stop_keyword: String,
}

impl Default for InterviewSettings {
    fn default() -> Self {
        Self {
            stop_keyword: DEFAULT_STOP_KEYWORD.to_string(),
        }
    }
}

/// Runs interview steps against a language model.
///
/// The orchestrator holds no per-session data, so one instance can advance
/// any number of independent sessions concurrently.
#[derive(Clone)]
pub struct Orchestrator {
    client: Arc<dyn LLMClient>,
    settings: InterviewSettings,
}

impl Orchestrator {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self {
            client,
            settings: InterviewSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: InterviewSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &InterviewSettings {
        &self.settings
    }

    /// Feeds `user_input` to the session and returns the updated state.
    ///
    /// An empty input starts the interview. Calling this on a session that
    /// already has its final report returns the state unchanged.
    #[instrument(
        name = "advance",
        skip_all,
        fields(
            participant = %state.participant_name(),
            question = state.current_question_number(),
        )
    )]
    pub async fn advance(
        &self,
        mut state: SessionState,
        user_input: impl Into<String>,
    ) -> SessionState {
        if state.is_terminal() {
            warn!("Session already has a final report, ignoring input");
            return state;
        }

        state.set_last_user_input(user_input.into());

        let update = observe(self.client.as_ref(), &state).await;
        let slot = state.apply_observer(update);

        if let Some(update) = interview(self.client.as_ref(), &state, slot).await {
            state.apply_interviewer(update);
        }

        match route(&state, &self.settings.stop_keyword) {
            Route::End => {
                info!(
                    question = state.current_question_number(),
                    total = state.total_questions(),
                    "Step complete, awaiting next answer"
                );
            }
            Route::Feedback => {
                info!("Conversation over, writing final report");
                state.close();
                let report = summarize(self.client.as_ref(), &state).await;
                state.apply_feedback(report);
            }
        }

        state
    }
}
