//! Interviewer node: phrases the next candidate-facing message.

use crate::{
    llm_client::LLMClient,
    prompts::{PromptContext, PromptRole},
    session::{InterviewerUpdate, SessionState, Turn, TurnSlot, TurnWrite},
};
use tracing::{debug, info, warn};

/// Shown to the candidate in place of a question when the model call fails.
pub const FAILURE_MESSAGE: &str =
    "Sorry, I could not prepare the next question. Could you expand a little on your last answer?";

/// Thoughts recorded on a turn the interviewer opens at session start.
const INTRO_THOUGHTS: &str = "Intro";

/// Produces the next numbered message, or nothing once the conversation is over.
///
/// The message is prefixed with `"{n}/{total}"`. It is attached to the turn
/// the observer opened in this step (`TurnSlot::Pending`); when there is no
/// such turn a new one is opened for it. Reaching the quota clears the
/// liveness flag.
pub async fn interview(
    client: &dyn LLMClient,
    state: &SessionState,
    slot: TurnSlot,
) -> Option<InterviewerUpdate> {
    if !state.is_active() {
        debug!("Conversation inactive, interviewer has nothing to say");
        return None;
    }

    let message = match client
        .call(PromptRole::Interviewer, &interviewer_context(state))
        .await
    {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            warn!(error = ?e, "Interviewer call failed, sending diagnostic message");
            FAILURE_MESSAGE.to_string()
        }
    };

    let cur = state.current_question_number() + 1;
    let total = state.total_questions();
    let numbered = format!("{cur}/{total} {message}");

    let turn = match slot {
        TurnSlot::Pending { index } => TurnWrite::Attach {
            index,
            message: numbered.clone(),
        },
        TurnSlot::Closed => {
            let internal_thoughts = if state.turns().is_empty() {
                INTRO_THOUGHTS.to_string()
            } else {
                format!(
                    "[Observer]: unavailable | [Vision]: {}",
                    state.vision_context()
                )
            };
            TurnWrite::Open(Turn {
                turn_id: state.turns().len() + 1,
                user_message: state.last_user_input().to_string(),
                internal_thoughts,
                agent_visible_message: Some(numbered.clone()),
            })
        }
    };

    let conversation_active = state.is_active() && cur < total;
    info!(question = cur, total, conversation_active, "Interviewer message ready");

    Some(InterviewerUpdate {
        turn,
        history: [
            format!("User: {}", state.last_user_input()),
            format!("Agent: {numbered}"),
        ],
        current_question_number: cur,
        conversation_active,
    })
}

fn interviewer_context(state: &SessionState) -> PromptContext {
    PromptContext::from([
        (
            "candidate_name".to_string(),
            state.participant_name().to_string(),
        ),
        ("position".to_string(), state.position().to_string()),
        (
            "observer_instruction".to_string(),
            state.observer_instruction().to_string(),
        ),
        (
            "last_user_input".to_string(),
            state.last_user_input().to_string(),
        ),
    ])
}
