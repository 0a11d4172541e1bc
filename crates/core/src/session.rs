//! Interview Session State
//!
//! This module defines `SessionState`, the single record threaded through the
//! observer, interviewer and feedback nodes. Nodes never write to it directly:
//! each one returns an update holding only the fields it owns, and the
//! orchestrator merges that update with the matching `apply_*` method.
//!
//! Field ownership:
//! - profile fields (`participant_name`, `position`, `grade`, `total_questions`):
//!   set at creation, never written afterwards.
//! - `last_user_input`, `vision_context`: written by the caller.
//! - `current_difficulty`, `observer_instruction`, `all_observer_thoughts`: observer.
//! - `history`, `current_question_number`: interviewer.
//! - `turns`: opened by the observer, completed (or opened) by the interviewer.
//! - `conversation_active`: observer and interviewer may only clear it.
//! - `final_feedback`: feedback node, once.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 10;
pub const DEFAULT_DIFFICULTY: u8 = 5;
pub const DEFAULT_TOTAL_QUESTIONS: u32 = 10;
pub const MAX_TOTAL_QUESTIONS: u32 = 50;
pub const DEFAULT_VISION_CONTEXT: &str = "Camera active";

/// User input a caller submits when the candidate ran out of time.
pub const SKIPPED_ANSWER: &str = "[SKIPPED - Timeout]";

/// Errors raised while creating a session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("total_questions must be between 1 and {max}, got {got}")]
    InvalidQuota { got: u32, max: u32 },
}

/// Who is being interviewed and for what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub participant_name: String,
    pub position: String,
    pub grade: String,
}

impl CandidateProfile {
    pub fn new(
        participant_name: impl Into<String>,
        position: impl Into<String>,
        grade: impl Into<String>,
    ) -> Self {
        Self {
            participant_name: participant_name.into(),
            position: position.into(),
            grade: grade.into(),
        }
    }
}

/// One question/answer exchange in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// 1-based position in the transcript.
    pub turn_id: usize,
    pub user_message: String,
    /// Observer rationale plus the vision signal. Diagnostic only.
    pub internal_thoughts: String,
    /// The numbered, candidate-facing message. Absent when the session ended
    /// before the interviewer answered this turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_visible_message: Option<String>,
}

/// Whether the current step has a turn waiting for its visible message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnSlot {
    /// The observer opened the turn at `index` during this step.
    Pending { index: usize },
    /// No turn was opened this step; the interviewer must open its own.
    Closed,
}

/// Fields produced by the observer node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObserverUpdate {
    pub observer_instruction: String,
    /// Appended to `all_observer_thoughts`.
    pub thought: String,
    pub current_difficulty: Option<u8>,
    pub opened_turn: Option<Turn>,
    pub conversation_active: Option<bool>,
}

/// How the interviewer records its message in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnWrite {
    Attach { index: usize, message: String },
    Open(Turn),
}

/// Fields produced by the interviewer node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewerUpdate {
    pub turn: TurnWrite,
    /// The `User:` and `Agent:` lines, always appended together.
    pub history: [String; 2],
    pub current_question_number: u32,
    pub conversation_active: bool,
}

/// Clamps `current + adjustment` into the difficulty range.
pub fn clamp_difficulty(current: u8, adjustment: i64) -> u8 {
    let next = i64::from(current).saturating_add(adjustment);
    next.clamp(i64::from(MIN_DIFFICULTY), i64::from(MAX_DIFFICULTY)) as u8
}

/// The mutable record of one interview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub(crate) participant_name: String,
    pub(crate) position: String,
    pub(crate) grade: String,
    pub(crate) history: Vec<String>,
    pub(crate) turns: Vec<Turn>,
    pub(crate) current_difficulty: u8,
    pub(crate) last_user_input: String,
    pub(crate) vision_context: String,
    pub(crate) observer_instruction: String,
    pub(crate) all_observer_thoughts: Vec<String>,
    pub(crate) final_feedback: String,
    pub(crate) conversation_active: bool,
    pub(crate) total_questions: u32,
    pub(crate) current_question_number: u32,
}

impl SessionState {
    /// Creates a fresh, active session with zeroed counters.
    pub fn new(profile: CandidateProfile, total_questions: u32) -> Result<Self, SessionError> {
        if total_questions == 0 || total_questions > MAX_TOTAL_QUESTIONS {
            return Err(SessionError::InvalidQuota {
                got: total_questions,
                max: MAX_TOTAL_QUESTIONS,
            });
        }
        Ok(Self {
            participant_name: profile.participant_name,
            position: profile.position,
            grade: profile.grade,
            history: Vec::new(),
            turns: Vec::new(),
            current_difficulty: DEFAULT_DIFFICULTY,
            last_user_input: String::new(),
            vision_context: DEFAULT_VISION_CONTEXT.to_string(),
            observer_instruction: String::new(),
            all_observer_thoughts: Vec::new(),
            final_feedback: String::new(),
            conversation_active: true,
            total_questions,
            current_question_number: 0,
        })
    }

    /// Overrides the starting difficulty, clamped into range.
    pub fn with_starting_difficulty(mut self, difficulty: u8) -> Self {
        self.current_difficulty = clamp_difficulty(difficulty, 0);
        self
    }

    pub fn participant_name(&self) -> &str {
        &self.participant_name
    }

    pub fn position(&self) -> &str {
        &self.position
    }

    pub fn grade(&self) -> &str {
        &self.grade
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn current_difficulty(&self) -> u8 {
        self.current_difficulty
    }

    pub fn last_user_input(&self) -> &str {
        &self.last_user_input
    }

    pub fn vision_context(&self) -> &str {
        &self.vision_context
    }

    pub fn observer_instruction(&self) -> &str {
        &self.observer_instruction
    }

    pub fn all_observer_thoughts(&self) -> &[String] {
        &self.all_observer_thoughts
    }

    pub fn final_feedback(&self) -> &str {
        &self.final_feedback
    }

    /// The liveness flag.
    pub fn is_active(&self) -> bool {
        self.conversation_active
    }

    /// A session is terminal once the final report exists.
    pub fn is_terminal(&self) -> bool {
        !self.final_feedback.is_empty()
    }

    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    pub fn current_question_number(&self) -> u32 {
        self.current_question_number
    }

    /// The candidate-facing message of the newest turn, if it has one.
    pub fn last_visible_message(&self) -> Option<&str> {
        self.turns
            .last()
            .and_then(|turn| turn.agent_visible_message.as_deref())
    }

    /// Overwrites the vision signal forwarded to the observer on the next step.
    pub fn set_vision_context(&mut self, context: impl Into<String>) {
        self.vision_context = context.into();
    }

    pub(crate) fn set_last_user_input(&mut self, input: String) {
        self.last_user_input = input;
    }

    /// Merges the observer's fields and reports whether it opened a turn.
    pub(crate) fn apply_observer(&mut self, update: ObserverUpdate) -> TurnSlot {
        self.observer_instruction = update.observer_instruction;
        self.all_observer_thoughts.push(update.thought);
        if let Some(difficulty) = update.current_difficulty {
            self.current_difficulty = clamp_difficulty(difficulty, 0);
        }
        if update.conversation_active == Some(false) {
            self.conversation_active = false;
        }
        match update.opened_turn {
            Some(turn) => {
                self.turns.push(turn);
                TurnSlot::Pending {
                    index: self.turns.len() - 1,
                }
            }
            None => TurnSlot::Closed,
        }
    }

    /// Merges the interviewer's fields.
    pub(crate) fn apply_interviewer(&mut self, update: InterviewerUpdate) {
        match update.turn {
            TurnWrite::Attach { index, message } => match self.turns.get_mut(index) {
                Some(turn) => turn.agent_visible_message = Some(message),
                None => {
                    let turn_id = self.turns.len() + 1;
                    self.turns.push(Turn {
                        turn_id,
                        user_message: self.last_user_input.clone(),
                        internal_thoughts: String::new(),
                        agent_visible_message: Some(message),
                    });
                }
            },
            TurnWrite::Open(turn) => self.turns.push(turn),
        }
        self.history.extend(update.history);
        self.current_question_number = update
            .current_question_number
            .max(self.current_question_number)
            .min(self.total_questions);
        if !update.conversation_active {
            self.conversation_active = false;
        }
    }

    /// Ends the conversation ahead of the final report.
    pub(crate) fn close(&mut self) {
        self.conversation_active = false;
    }

    /// Stores the final report. Only the first report is kept.
    pub(crate) fn apply_feedback(&mut self, report: String) {
        self.conversation_active = false;
        if self.final_feedback.is_empty() {
            self.final_feedback = report;
        }
    }
}
