//! Observer node: judges the latest answer and steers the interviewer.

use crate::{
    decision::{ObserverOutcome, parse_observer_response},
    llm_client::LLMClient,
    prompts::{PromptContext, PromptRole},
    session::{ObserverUpdate, SessionState, Turn, clamp_difficulty},
};
use tracing::{info, warn};

/// Thought recorded when the interview starts.
pub const START_MARKER: &str = "Start of interview";
/// Thought recorded when the model's verdict could not be used.
pub const PARSE_ERROR_MARKER: &str = "Error parsing";
/// Instruction handed to the interviewer when the verdict could not be used.
pub const FALLBACK_INSTRUCTION: &str = "Continue the interview.";

/// How many recent history lines the observer sees.
const HISTORY_WINDOW: usize = 2;

/// Evaluates the latest candidate input.
///
/// An empty `last_user_input` marks the start of the session: the observer
/// then asks for a greeting without calling the model. Otherwise the model's
/// verdict adjusts the difficulty, opens a turn for the answer and may end the
/// conversation. A failed call or an unreadable verdict leaves difficulty and
/// liveness untouched.
pub async fn observe(client: &dyn LLMClient, state: &SessionState) -> ObserverUpdate {
    if state.last_user_input().is_empty() {
        info!("Interview starting, asking the interviewer for a greeting");
        return ObserverUpdate {
            observer_instruction: format!(
                "Greet {} and start the interview for the {} position.",
                state.participant_name(),
                state.position()
            ),
            thought: START_MARKER.to_string(),
            ..Default::default()
        };
    }

    let outcome = match client.call(PromptRole::Observer, &observer_context(state)).await {
        Ok(raw) => parse_observer_response(&raw),
        Err(e) => {
            warn!(error = ?e, "Observer call failed, continuing with fallback instruction");
            return fallback();
        }
    };

    let decision = match outcome {
        ObserverOutcome::Parsed(decision) => decision,
        ObserverOutcome::Malformed(raw) => {
            warn!(raw_len = raw.len(), "Observer reply was not a JSON verdict");
            return fallback();
        }
    };

    let difficulty = clamp_difficulty(state.current_difficulty(), decision.adjustment());
    let active = !decision.wants_finish();
    info!(
        adjustment = decision.adjustment(),
        difficulty,
        active,
        "Observer verdict applied"
    );

    let turn = Turn {
        turn_id: state.turns().len() + 1,
        user_message: state.last_user_input().to_string(),
        internal_thoughts: format!(
            "[Observer]: {} | [Vision]: {}",
            decision.thought(),
            state.vision_context()
        ),
        agent_visible_message: None,
    };

    ObserverUpdate {
        observer_instruction: decision
            .instruction()
            .unwrap_or(FALLBACK_INSTRUCTION)
            .to_string(),
        thought: decision.thought().to_string(),
        current_difficulty: Some(difficulty),
        opened_turn: Some(turn),
        conversation_active: Some(active),
    }
}

fn fallback() -> ObserverUpdate {
    ObserverUpdate {
        observer_instruction: FALLBACK_INSTRUCTION.to_string(),
        thought: PARSE_ERROR_MARKER.to_string(),
        ..Default::default()
    }
}

fn observer_context(state: &SessionState) -> PromptContext {
    let history = state.history();
    let recent = &history[history.len().saturating_sub(HISTORY_WINDOW)..];

    PromptContext::from([
        ("position".to_string(), state.position().to_string()),
        ("grade".to_string(), state.grade().to_string()),
        (
            "difficulty".to_string(),
            state.current_difficulty().to_string(),
        ),
        ("history".to_string(), recent.join("\n")),
        (
            "last_user_input".to_string(),
            state.last_user_input().to_string(),
        ),
        ("vision_data".to_string(), state.vision_context().to_string()),
    ])
}
