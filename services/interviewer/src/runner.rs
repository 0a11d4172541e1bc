//! Drives one interview over a line-based reader and writer.

use anyhow::Result;
use interview_core::{
    Command,
    orchestrator::Orchestrator,
    session::{SKIPPED_ANSWER, SessionState},
    transcript::SessionLog,
};
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

/// Runs the session until it has a final report or the input closes.
///
/// Each answer gets `answer_timeout`; when it runs out the skip sentinel is
/// submitted instead. Blank lines are ignored, since an empty input would
/// restart the greeting.
pub async fn run_interview<R, W>(
    orchestrator: &Orchestrator,
    mut state: SessionState,
    input: R,
    output: &mut W,
    answer_timeout: Duration,
) -> Result<SessionState>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    state = orchestrator.advance(state, "").await;
    emit(0, &state, output).await?;

    while !state.is_terminal() {
        output.write_all(b"> ").await?;
        output.flush().await?;

        let answer = match tokio::time::timeout(answer_timeout, lines.next_line()).await {
            Ok(Ok(Some(line))) if line.trim().is_empty() => continue,
            Ok(Ok(Some(line))) => line.trim().to_string(),
            Ok(Ok(None)) => {
                info!("Input closed before the interview finished");
                output.write_all(b"\nInput closed, ending without a report.\n").await?;
                break;
            }
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => {
                warn!(timeout_secs = answer_timeout.as_secs(), "Answer timed out");
                output
                    .write_all(format!("\n(no answer, submitting {SKIPPED_ANSWER})\n").as_bytes())
                    .await?;
                SKIPPED_ANSWER.to_string()
            }
        };

        let prior_history_len = state.history().len();
        state = orchestrator.advance(state, answer).await;
        emit(prior_history_len, &state, output).await?;
    }

    output.flush().await?;
    Ok(state)
}

async fn emit<W: AsyncWrite + Unpin>(
    prior_history_len: usize,
    state: &SessionState,
    output: &mut W,
) -> Result<()> {
    for command in Command::for_step(prior_history_len, state) {
        let text = match command {
            Command::SpeakText(text) => format!("\nInterviewer: {text}\n"),
            Command::SessionComplete(report) => format!("\n{report}\n"),
        };
        output.write_all(text.as_bytes()).await?;
    }
    Ok(())
}

/// Writes the session log as pretty JSON.
pub async fn save_log(path: &Path, state: &SessionState) -> Result<()> {
    let json = SessionLog::from(state).to_pretty_json()?;
    tokio::fs::write(path, json).await?;
    info!(path = %path.display(), "Session log saved");
    Ok(())
}
