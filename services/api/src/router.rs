//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the REST API and OpenAPI documentation.

use crate::{
    handlers,
    models::{
        AnswerPayload, CommandView, CreateSessionPayload, ErrorResponse, SessionLogView,
        SessionStatus, SessionView, StepResponse, TurnView, VisionPayload,
    },
    state::AppState,
};

use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::create_session,
        handlers::list_sessions,
        handlers::get_session,
        handlers::submit_answer,
        handlers::update_vision,
        handlers::get_session_log,
    ),
    components(
        schemas(SessionView, StepResponse, CommandView, TurnView, SessionLogView, CreateSessionPayload, AnswerPayload, VisionPayload, ErrorResponse, SessionStatus)
    ),
    tags(
        (name = "Interview API", description = "Turn-by-turn AI technical interviews")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route(
            "/sessions",
            get(handlers::list_sessions).post(handlers::create_session),
        )
        .route("/sessions/{id}", get(handlers::get_session))
        .route("/sessions/{id}/answers", post(handlers::submit_answer))
        .route("/sessions/{id}/vision", put(handlers::update_vision))
        .route("/sessions/{id}/log", get(handlers::get_session_log))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, logs::log_path, store::SessionStore};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use interview_core::{
        llm_client::{LLMClient, OfflineLLMClient, Provider, ScriptedLLMClient},
        orchestrator::{InterviewSettings, Orchestrator},
        prompts::PromptRole,
        transcript::SessionLog,
    };
    use serde_json::{Value, json};
    use std::path::Path;
    use tempfile::TempDir;
    use tower::ServiceExt;
    use tracing::Level;

    fn test_config(log_dir: &Path) -> Config {
        Config {
            bind_address: "127.0.0.1:0".parse().unwrap(),
            provider: Provider::OpenAI,
            api_key: "test-key".to_string(),
            chat_model: "gpt-4o".to_string(),
            log_level: Level::INFO,
            prompts_path: None,
            log_dir: log_dir.to_path_buf(),
            stop_keyword: "stop".to_string(),
            default_total_questions: 2,
        }
    }

    fn app_with(client: Arc<dyn LLMClient>) -> (Router, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let orchestrator = Orchestrator::new(client).with_settings(InterviewSettings {
            stop_keyword: config.stop_keyword.clone(),
        });
        let state = Arc::new(AppState {
            store: Arc::new(SessionStore::new()),
            orchestrator: Arc::new(orchestrator),
            config: Arc::new(config),
        });
        (create_router(state), dir)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn new_session_body() -> Value {
        json!({
            "participant_name": "Alex",
            "position": "Python Backend",
            "grade": "Junior"
        })
    }

    #[tokio::test]
    async fn test_create_session_returns_greeting() {
        let (app, _dir) = app_with(Arc::new(OfflineLLMClient));

        let (status, body) = send(&app, "POST", "/sessions", Some(new_session_body())).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["session"]["status"], "Active");
        assert_eq!(body["session"]["current_question_number"], 1);
        assert_eq!(body["session"]["total_questions"], 2);
        let commands = body["commands"].as_array().unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0]["type"], "SpeakText");
        assert!(commands[0]["text"].as_str().unwrap().starts_with("1/2 "));
    }

    #[tokio::test]
    async fn test_single_question_session_ends_at_creation() {
        let (app, dir) = app_with(Arc::new(OfflineLLMClient));
        let mut body = new_session_body();
        body["total_questions"] = json!(1);

        let (status, body) = send(&app, "POST", "/sessions", Some(body)).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["session"]["status"], "Ended");
        let commands = body["commands"].as_array().unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0]["type"], "SpeakText");
        assert!(commands[0]["text"].as_str().unwrap().starts_with("1/1 "));
        assert_eq!(commands[1]["type"], "SessionComplete");

        let id: uuid::Uuid = body["session"]["id"].as_str().unwrap().parse().unwrap();
        let saved = std::fs::read_to_string(log_path(dir.path(), id)).unwrap();
        let log = SessionLog::from_json(&saved).unwrap();
        assert!(log.final_feedback.starts_with("# Result"));
    }

    #[tokio::test]
    async fn test_create_session_rejects_bad_quota() {
        let (app, _dir) = app_with(Arc::new(OfflineLLMClient));
        let mut body = new_session_body();
        body["total_questions"] = json!(0);

        let (status, body) = send(&app, "POST", "/sessions", Some(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("total_questions"));
    }

    #[tokio::test]
    async fn test_create_session_rejects_blank_name() {
        let (app, _dir) = app_with(Arc::new(OfflineLLMClient));
        let mut body = new_session_body();
        body["participant_name"] = json!("  ");

        let (status, _) = send(&app, "POST", "/sessions", Some(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_full_interview_over_http() {
        let (app, dir) = app_with(Arc::new(OfflineLLMClient));
        let (_, created) = send(&app, "POST", "/sessions", Some(new_session_body())).await;
        let id = created["session"]["id"].as_str().unwrap().to_string();

        let (status, step) = send(
            &app,
            "POST",
            &format!("/sessions/{id}/answers"),
            Some(json!({"text": "Lists are mutable"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(step["session"]["status"], "Ended");
        let commands = step["commands"].as_array().unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0]["type"], "SpeakText");
        assert!(commands[0]["text"].as_str().unwrap().starts_with("2/2 "));
        assert_eq!(commands[1]["type"], "SessionComplete");
        assert!(
            commands[1]["report"]
                .as_str()
                .unwrap()
                .starts_with("# Result")
        );

        let uuid: uuid::Uuid = id.parse().unwrap();
        let saved = std::fs::read_to_string(log_path(dir.path(), uuid)).unwrap();
        let log = SessionLog::from_json(&saved).unwrap();
        assert_eq!(log.participant_name, "Alex");
        assert_eq!(log.turns.len(), 2);
        assert!(log.final_feedback.starts_with("# Result"));

        let (status, log) = send(&app, "GET", &format!("/sessions/{id}/log"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(log["turns"][0]["internal_thoughts"], "Intro");
        assert_eq!(log["turns"][1]["user_message"], "Lists are mutable");
    }

    #[tokio::test]
    async fn test_answer_after_end_is_a_no_op() {
        let client = Arc::new(
            ScriptedLLMClient::new()
                .respond(PromptRole::Interviewer, "Hello Alex")
                .respond(PromptRole::Observer, "{}")
                .respond(PromptRole::Interviewer, "Thanks")
                .respond(PromptRole::Feedback, "# Result\nHire"),
        );
        let (app, _dir) = app_with(client.clone());
        let (_, created) = send(&app, "POST", "/sessions", Some(new_session_body())).await;
        let id = created["session"]["id"].as_str().unwrap().to_string();
        let uri = format!("/sessions/{id}/answers");

        send(&app, "POST", &uri, Some(json!({"text": "please stop"}))).await;
        let calls_after_end = client.calls().len();
        let (status, again) = send(&app, "POST", &uri, Some(json!({"text": "hello?"}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(again["session"]["status"], "Ended");
        assert_eq!(again["session"]["final_feedback"], "# Result\nHire");
        assert_eq!(
            again["commands"],
            json!([{"type": "SessionComplete", "report": "# Result\nHire"}])
        );
        assert_eq!(client.calls().len(), calls_after_end);
    }

    #[tokio::test]
    async fn test_empty_answer_is_rejected() {
        let (app, _dir) = app_with(Arc::new(OfflineLLMClient));
        let (_, created) = send(&app, "POST", "/sessions", Some(new_session_body())).await;
        let id = created["session"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            "POST",
            &format!("/sessions/{id}/answers"),
            Some(json!({"text": "   "})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "text must not be empty");
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let (app, _dir) = app_with(Arc::new(OfflineLLMClient));
        let id = uuid::Uuid::new_v4();

        let (status, _) = send(&app, "GET", &format!("/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            "POST",
            &format!("/sessions/{id}/answers"),
            Some(json!({"text": "hi"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_vision_update_from_detections() {
        let (app, _dir) = app_with(Arc::new(OfflineLLMClient));
        let (_, created) = send(&app, "POST", "/sessions", Some(new_session_body())).await;
        let id = created["session"]["id"].as_str().unwrap().to_string();
        let uri = format!("/sessions/{id}/vision");

        let (status, view) = send(
            &app,
            "PUT",
            &uri,
            Some(json!({"detections": ["person", "cell phone"]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(view["vision_context"].as_str().unwrap().contains("phone"));

        let (status, view) = send(&app, "PUT", &uri, Some(json!({"context": "Camera active"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["vision_context"], "Camera active");

        let (status, _) = send(&app, "PUT", &uri, Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_vision_reaches_the_observer() {
        let client = Arc::new(
            ScriptedLLMClient::new()
                .respond(PromptRole::Interviewer, "Hi")
                .respond(PromptRole::Observer, "{}")
                .respond(PromptRole::Interviewer, "Next"),
        );
        let (app, _dir) = app_with(client.clone());
        let mut body = new_session_body();
        body["total_questions"] = json!(5);
        let (_, created) = send(&app, "POST", "/sessions", Some(body)).await;
        let id = created["session"]["id"].as_str().unwrap().to_string();

        send(
            &app,
            "POST",
            &format!("/sessions/{id}/answers"),
            Some(json!({"text": "my answer", "vision_context": "Candidate looks away"})),
        )
        .await;

        let observer_call = client
            .calls()
            .into_iter()
            .find(|(role, _)| *role == PromptRole::Observer)
            .unwrap();
        assert_eq!(observer_call.1["vision_data"], "Candidate looks away");
    }

    #[tokio::test]
    async fn test_list_sessions() {
        let (app, _dir) = app_with(Arc::new(OfflineLLMClient));
        send(&app, "POST", "/sessions", Some(new_session_body())).await;
        send(&app, "POST", "/sessions", Some(new_session_body())).await;

        let (status, list) = send(&app, "GET", "/sessions", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_openapi_lists_all_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/sessions",
            "/sessions/{id}",
            "/sessions/{id}/answers",
            "/sessions/{id}/vision",
            "/sessions/{id}/log",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
