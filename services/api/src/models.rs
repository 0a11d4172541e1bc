//! API Models
//!
//! Request payloads and response views of the REST API, with `utoipa`
//! schemas for the OpenAPI document. Views are built from the core
//! `SessionState` and never expose internal observer notes except through
//! the session log.

use crate::store::SessionRecord;
use chrono::{DateTime, Utc};
use interview_core::{
    Command,
    session::Turn,
    transcript::SessionLog,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq)]
pub enum SessionStatus {
    Active,
    Ended,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct SessionView {
    #[schema(value_type = String, format = Uuid)]
    pub id: Uuid,
    pub participant_name: String,
    pub position: String,
    pub grade: String,
    #[schema(value_type = String, example = "Active")]
    pub status: SessionStatus,
    pub conversation_active: bool,
    pub current_question_number: u32,
    pub total_questions: u32,
    pub current_difficulty: u8,
    pub vision_context: String,
    /// The newest candidate-facing message.
    pub last_message: Option<String>,
    /// The Markdown report, once the session has ended.
    pub final_feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&SessionRecord> for SessionView {
    fn from(record: &SessionRecord) -> Self {
        let state = &record.state;
        Self {
            id: record.id,
            participant_name: state.participant_name().to_string(),
            position: state.position().to_string(),
            grade: state.grade().to_string(),
            status: if state.is_terminal() {
                SessionStatus::Ended
            } else {
                SessionStatus::Active
            },
            conversation_active: state.is_active(),
            current_question_number: state.current_question_number(),
            total_questions: state.total_questions(),
            current_difficulty: state.current_difficulty(),
            vision_context: state.vision_context().to_string(),
            last_message: state.last_visible_message().map(str::to_string),
            final_feedback: state
                .is_terminal()
                .then(|| state.final_feedback().to_string()),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// What the client should do with the result of a step.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum CommandView {
    /// Show or speak this text to the candidate.
    SpeakText { text: String },
    /// The interview is over; here is the report.
    SessionComplete { report: String },
}

impl From<Command> for CommandView {
    fn from(command: Command) -> Self {
        match command {
            Command::SpeakText(text) => CommandView::SpeakText { text },
            Command::SessionComplete(report) => CommandView::SessionComplete { report },
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct StepResponse {
    pub session: SessionView,
    /// In order: the next question, then the report if the step ended the session.
    pub commands: Vec<CommandView>,
}

impl StepResponse {
    /// The response for the step that grew the history from `prior_history_len`.
    pub fn new(record: &SessionRecord, prior_history_len: usize) -> Self {
        Self {
            session: SessionView::from(record),
            commands: Command::for_step(prior_history_len, &record.state)
                .into_iter()
                .map(CommandView::from)
                .collect(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct TurnView {
    pub turn_id: usize,
    pub user_message: String,
    pub internal_thoughts: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_visible_message: Option<String>,
}

impl From<&Turn> for TurnView {
    fn from(turn: &Turn) -> Self {
        Self {
            turn_id: turn.turn_id,
            user_message: turn.user_message.clone(),
            internal_thoughts: turn.internal_thoughts.clone(),
            agent_visible_message: turn.agent_visible_message.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct SessionLogView {
    pub participant_name: String,
    pub turns: Vec<TurnView>,
    pub final_feedback: String,
}

impl From<SessionLog> for SessionLogView {
    fn from(log: SessionLog) -> Self {
        Self {
            participant_name: log.participant_name,
            turns: log.turns.iter().map(TurnView::from).collect(),
            final_feedback: log.final_feedback,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct CreateSessionPayload {
    #[schema(example = "Alex")]
    pub participant_name: String,
    #[schema(example = "Python Backend Developer")]
    pub position: String,
    #[schema(example = "Junior")]
    pub grade: String,
    /// Defaults to the server's configured quota.
    #[schema(example = 10)]
    pub total_questions: Option<u32>,
    #[schema(example = 5)]
    pub starting_difficulty: Option<u8>,
    pub vision_context: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct AnswerPayload {
    #[schema(example = "A list is mutable, a tuple is not.")]
    pub text: String,
    /// Replaces the vision signal before the step runs.
    pub vision_context: Option<String>,
}

/// Either a ready-made description or raw object-detection labels.
#[derive(Deserialize, ToSchema)]
pub struct VisionPayload {
    #[schema(example = "Candidate is present. No suspicious objects detected.")]
    pub context: Option<String>,
    #[schema(example = json!(["person", "cell phone"]))]
    pub detections: Option<Vec<String>>,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}
