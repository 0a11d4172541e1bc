//! Decides what follows the interviewer within one step.

use crate::session::SessionState;

pub const DEFAULT_STOP_KEYWORD: &str = "stop";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Write the final report now.
    Feedback,
    /// Hand control back to the caller and wait for the next answer.
    End,
}

/// Routes to feedback once the conversation is over or the candidate said the
/// stop keyword (case-insensitive, anywhere in the input). A blank keyword
/// disables the keyword check.
pub fn route(state: &SessionState, stop_keyword: &str) -> Route {
    if !state.is_active() || contains_stop_keyword(state.last_user_input(), stop_keyword) {
        Route::Feedback
    } else {
        Route::End
    }
}

fn contains_stop_keyword(input: &str, stop_keyword: &str) -> bool {
    let keyword = stop_keyword.trim();
    !keyword.is_empty() && input.to_lowercase().contains(&keyword.to_lowercase())
}
