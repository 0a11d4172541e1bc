//! Feedback node: turns the observer's notes into the final report.

use crate::{
    llm_client::LLMClient,
    prompts::{PromptContext, PromptRole},
    session::SessionState,
};
use tracing::{info, warn};

/// Writes the final Markdown report for the session.
///
/// The model's text is returned verbatim. If the call fails or comes back
/// blank, a diagnostic report listing the raw observer notes is returned
/// instead so the session can still conclude.
pub async fn summarize(client: &dyn LLMClient, state: &SessionState) -> String {
    let context = PromptContext::from([
        ("position".to_string(), state.position().to_string()),
        (
            "all_observer_thoughts".to_string(),
            state.all_observer_thoughts().join("\n"),
        ),
    ]);

    match client.call(PromptRole::Feedback, &context).await {
        Ok(report) if !report.trim().is_empty() => {
            info!(report_len = report.len(), "Final report generated");
            report
        }
        Ok(_) => {
            warn!("Feedback model returned an empty report");
            fallback_report(state, "the model returned an empty report")
        }
        Err(e) => {
            warn!(error = ?e, "Feedback call failed");
            fallback_report(state, &e.to_string())
        }
    }
}

fn fallback_report(state: &SessionState, reason: &str) -> String {
    let notes: String = state
        .all_observer_thoughts()
        .iter()
        .map(|thought| format!("* {thought}\n"))
        .collect();
    format!(
        "# Result\nThe final report for the {} interview could not be generated ({reason}).\n\n# Observer notes\n{notes}",
        state.position()
    )
}
