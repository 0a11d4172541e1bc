//! Observer decision parsing.
//!
//! The observer asks the model for a JSON object but the model answers in free
//! text, frequently wrapped in a Markdown code fence. Parsing never fails: the
//! caller always gets either a decision or the raw text back.

use serde::Deserialize;

/// The structured verdict the observer expects from the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ObserverDecision {
    #[serde(default)]
    pub thought_process: Option<String>,
    #[serde(default)]
    pub next_instruction_to_interviewer: Option<String>,
    /// Conventionally -1, 0 or +1. Any integer is accepted and clamped later.
    #[serde(default)]
    pub difficulty_adjustment: Option<i64>,
    /// `"continue"` or `"finish"`.
    #[serde(default)]
    pub status: Option<String>,
}

impl ObserverDecision {
    /// True when the model asked to end the interview. Only the exact
    /// string `"finish"` counts; any other value keeps the session going.
    pub fn wants_finish(&self) -> bool {
        self.status.as_deref() == Some("finish")
    }

    pub fn adjustment(&self) -> i64 {
        self.difficulty_adjustment.unwrap_or(0)
    }

    pub fn thought(&self) -> &str {
        self.thought_process.as_deref().unwrap_or_default()
    }

    /// The instruction for the interviewer, if the model gave a usable one.
    pub fn instruction(&self) -> Option<&str> {
        self.next_instruction_to_interviewer
            .as_deref()
            .map(str::trim)
            .filter(|instruction| !instruction.is_empty())
    }
}

/// Result of reading the observer's reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObserverOutcome {
    Parsed(ObserverDecision),
    Malformed(String),
}

/// Removes Markdown code-fence markers and surrounding whitespace.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

pub fn parse_observer_response(raw: &str) -> ObserverOutcome {
    let cleaned = strip_code_fences(raw);
    match serde_json::from_str::<serde_json::Value>(&cleaned) {
        Ok(value @ serde_json::Value::Object(_)) => match serde_json::from_value(value) {
            Ok(decision) => ObserverOutcome::Parsed(decision),
            Err(_) => ObserverOutcome::Malformed(raw.to_string()),
        },
        _ => ObserverOutcome::Malformed(raw.to_string()),
    }
}
