//! Main Entrypoint for the Interview API Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Loading prompt templates and building the language-model client.
//! 3. Constructing the Axum router and applying middleware.
//! 4. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use interview_api::{
    config::Config, router::create_router, shutdown::wait_for_shutdown, state::AppState,
    store::SessionStore,
};
use interview_core::{
    llm_client::OpenAICompatibleClient,
    orchestrator::{InterviewSettings, Orchestrator},
    prompts::PromptTemplates,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing application state...");

    // --- 3. Initialize Shared Services ---
    let templates = match &config.prompts_path {
        Some(path) => PromptTemplates::from_dir(path)
            .with_context(|| format!("Failed to load prompts from {}", path.display()))?,
        None => PromptTemplates::builtin(),
    };

    info!(provider = ?config.provider, "Using OpenAI-compatible provider.");
    let llm_client = Arc::new(OpenAICompatibleClient::for_provider(
        config.provider,
        &config.api_key,
        config.chat_model.clone(),
        templates,
    ));
    let orchestrator = Orchestrator::new(llm_client).with_settings(InterviewSettings {
        stop_keyword: config.stop_keyword.clone(),
    });

    let app_state = Arc::new(AppState {
        store: Arc::new(SessionStore::new()),
        orchestrator: Arc::new(orchestrator),
        config: Arc::new(config.clone()),
    });

    // --- 4. Create Router and Apply Middleware ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(app_state).layer(cors);

    // --- 5. Start Server ---
    info!(
        provider = ?config.provider,
        model = %config.chat_model,
        bind_address = %config.bind_address,
        log_dir = %config.log_dir.display(),
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(wait_for_shutdown(tokio::signal::ctrl_c()))
    .await?;

    info!("Server has shut down.");
    Ok(())
}
