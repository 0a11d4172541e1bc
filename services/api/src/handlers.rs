//! Axum Handlers for the REST API
//!
//! This module contains the logic for handling HTTP requests for interview
//! sessions. It uses `utoipa` doc comments to generate OpenAPI documentation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use interview_core::{
    session::{CandidateProfile, SessionState},
    transcript::SessionLog,
    vision::describe_detections,
};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    logs::persist_session_log,
    models::{
        AnswerPayload, CreateSessionPayload, ErrorResponse, SessionLogView, SessionView,
        StepResponse, VisionPayload,
    },
    state::AppState,
    store::SessionHandle,
};

pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    InternalServerError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { message })).into_response()
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse { message })).into_response()
            }
            ApiError::InternalServerError(err) => {
                error!("Internal Server Error: {:?}", err);
                let message = "An internal server error occurred.".to_string();
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse { message }),
                )
                    .into_response()
            }
        }
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::InternalServerError(err.into())
    }
}

async fn find_session(state: &AppState, id: Uuid) -> Result<SessionHandle, ApiError> {
    state
        .store
        .get(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Session with id '{}' not found", id)))
}

fn require_non_blank(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Create a new interview session and get the opening question.
#[utoipa::path(
    post,
    path = "/sessions",
    request_body = CreateSessionPayload,
    responses(
        (status = 201, description = "Session created, greeting generated", body = StepResponse),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateSessionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    require_non_blank("participant_name", &payload.participant_name)?;
    require_non_blank("position", &payload.position)?;
    require_non_blank("grade", &payload.grade)?;

    let total_questions = payload
        .total_questions
        .unwrap_or(state.config.default_total_questions);
    let profile = CandidateProfile::new(payload.participant_name, payload.position, payload.grade);
    let mut session = SessionState::new(profile, total_questions)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    if let Some(difficulty) = payload.starting_difficulty {
        session = session.with_starting_difficulty(difficulty);
    }
    if let Some(context) = payload.vision_context {
        session.set_vision_context(context);
    }

    let handle = state.store.insert(session).await;
    let mut record = handle.lock().await;
    info!(session_id = %record.id, "Session created, generating greeting");

    let next = state.orchestrator.advance(record.state.clone(), "").await;
    handle.commit(&mut record, next);

    // A one-question session ends inside its first step.
    if record.state.is_terminal() {
        info!(session_id = %record.id, "Session ended");
        persist_session_log(&state.config.log_dir, record.id, &record.state).await;
    }

    Ok((StatusCode::CREATED, Json(StepResponse::new(&record, 0))))
}

/// List all sessions.
#[utoipa::path(
    get,
    path = "/sessions",
    responses(
        (status = 200, description = "List of sessions", body = [SessionView]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SessionView>>, ApiError> {
    let sessions = state
        .store
        .list()
        .await
        .iter()
        .map(SessionView::from)
        .collect();
    Ok(Json(sessions))
}

/// Get a specific session by its ID.
#[utoipa::path(
    get,
    path = "/sessions/{id}",
    responses(
        (status = 200, description = "Session details", body = SessionView),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let handle = find_session(&state, id).await?;
    Ok((StatusCode::OK, Json(SessionView::from(&handle.snapshot()))))
}

/// Submit the candidate's answer and run one interview step.
///
/// Answering an ended session changes nothing and returns the final report again.
#[utoipa::path(
    post,
    path = "/sessions/{id}/answers",
    request_body = AnswerPayload,
    responses(
        (status = 200, description = "Step completed", body = StepResponse),
        (status = 400, description = "Empty answer", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AnswerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    // An empty input means "not started yet" to the observer.
    require_non_blank("text", &payload.text)?;

    let handle = find_session(&state, id).await?;
    let mut record = handle.lock().await;

    let prior_history_len = record.state.history().len();
    if record.state.is_terminal() {
        info!(session_id = %id, "Answer for an ended session ignored");
        return Ok(Json(StepResponse::new(&record, prior_history_len)));
    }

    let mut session = record.state.clone();
    if let Some(context) = payload.vision_context {
        session.set_vision_context(context);
    }
    let next = state.orchestrator.advance(session, payload.text).await;
    handle.commit(&mut record, next);

    if record.state.is_terminal() {
        info!(session_id = %id, "Session ended");
        persist_session_log(&state.config.log_dir, id, &record.state).await;
    }

    Ok(Json(StepResponse::new(&record, prior_history_len)))
}

/// Replace the vision signal used by the next step.
#[utoipa::path(
    put,
    path = "/sessions/{id}/vision",
    request_body = VisionPayload,
    responses(
        (status = 200, description = "Vision context updated", body = SessionView),
        (status = 400, description = "Neither context nor detections given", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn update_vision(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VisionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let context = match (payload.context, payload.detections) {
        (Some(context), _) => context,
        (None, Some(labels)) => describe_detections(Some(labels.as_slice())),
        (None, None) => {
            return Err(ApiError::BadRequest(
                "either context or detections is required".to_string(),
            ));
        }
    };

    let handle = find_session(&state, id).await?;
    let mut record = handle.lock().await;
    let mut session = record.state.clone();
    session.set_vision_context(context);
    handle.commit(&mut record, session);

    Ok(Json(SessionView::from(&*record)))
}

/// Get the transcript of a session, including the observer's notes.
#[utoipa::path(
    get,
    path = "/sessions/{id}/log",
    responses(
        (status = 200, description = "Session log", body = SessionLogView),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    params(
        ("id" = Uuid, Path, description = "Session ID")
    )
)]
pub async fn get_session_log(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionLogView>, ApiError> {
    let handle = find_session(&state, id).await?;
    let record = handle.snapshot();
    Ok(Json(SessionLogView::from(SessionLog::from(&record.state))))
}
