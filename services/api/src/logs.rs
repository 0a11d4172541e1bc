//! Session log persistence.
//!
//! Finished sessions are written as pretty JSON to `<log_dir>/<session id>.json`.

use anyhow::Context;
use interview_core::{session::SessionState, transcript::SessionLog};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use uuid::Uuid;

pub fn log_path(log_dir: &Path, id: Uuid) -> PathBuf {
    log_dir.join(format!("{id}.json"))
}

/// Writes the session log, creating `log_dir` if needed.
pub async fn write_session_log(
    log_dir: &Path,
    id: Uuid,
    state: &SessionState,
) -> anyhow::Result<PathBuf> {
    tokio::fs::create_dir_all(log_dir)
        .await
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let path = log_path(log_dir, id);
    let json = SessionLog::from(state).to_pretty_json()?;
    tokio::fs::write(&path, json)
        .await
        .with_context(|| format!("Failed to write session log {}", path.display()))?;

    info!(session_id = %id, path = %path.display(), "Session log saved");
    Ok(path)
}

/// Like `write_session_log`, but a failure is only logged. The interview
/// result is already in memory, so a full disk must not fail the request.
pub async fn persist_session_log(log_dir: &Path, id: Uuid, state: &SessionState) {
    if let Err(e) = write_session_log(log_dir, id, state).await {
        error!(session_id = %id, error = ?e, "Could not save session log");
    }
}
