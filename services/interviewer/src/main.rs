//! Terminal Interviewer
//!
//! Runs a single technical interview on stdin/stdout and writes the session
//! log when it ends. Every option can also come from the environment.

use anyhow::{Context, Result};
use clap::Parser;
use interview_core::{
    llm_client::{LLMClient, OfflineLLMClient, OpenAICompatibleClient, Provider},
    orchestrator::{InterviewSettings, Orchestrator},
    prompts::PromptTemplates,
    router::DEFAULT_STOP_KEYWORD,
    session::{
        CandidateProfile, DEFAULT_DIFFICULTY, DEFAULT_TOTAL_QUESTIONS, DEFAULT_VISION_CONTEXT,
        MAX_TOTAL_QUESTIONS, SessionState,
    },
};
use std::{path::PathBuf, sync::Arc, time::Duration};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod runner;

#[derive(Parser, Debug)]
#[command(name = "interviewer", version, about = "AI technical interview in the terminal")]
struct Args {
    /// Candidate name
    #[arg(long, env = "CANDIDATE_NAME", default_value = "Candidate")]
    name: String,

    /// Position the candidate applies for
    #[arg(long, env = "CANDIDATE_POSITION", default_value = "Python Backend Developer")]
    position: String,

    /// Target grade (Junior, Middle, Senior, ...)
    #[arg(long, env = "CANDIDATE_GRADE", default_value = "Junior")]
    grade: String,

    /// Number of questions before the final report
    #[arg(
        long,
        env = "DEFAULT_TOTAL_QUESTIONS",
        default_value_t = DEFAULT_TOTAL_QUESTIONS,
        value_parser = clap::value_parser!(u32).range(1..=MAX_TOTAL_QUESTIONS as i64)
    )]
    questions: u32,

    /// Starting difficulty, 1 to 10
    #[arg(long, default_value_t = DEFAULT_DIFFICULTY)]
    difficulty: u8,

    /// openai, gemini or mistral
    #[arg(long, env = "LLM_PROVIDER", default_value = "openai")]
    provider: String,

    /// Chat model; defaults to the provider's model
    #[arg(long, env = "CHAT_MODEL")]
    model: Option<String>,

    /// API key; defaults to the provider's key variable (e.g. OPENAI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Directory with observer.md / interviewer.md / feedback.md overrides
    #[arg(long, env = "PROMPTS_PATH")]
    prompts_path: Option<PathBuf>,

    /// Saying this word ends the interview early
    #[arg(long, env = "STOP_KEYWORD", default_value = DEFAULT_STOP_KEYWORD)]
    stop_keyword: String,

    /// Initial vision signal passed to the observer
    #[arg(long, default_value = DEFAULT_VISION_CONTEXT)]
    vision_context: String,

    /// Use canned model responses instead of a real provider
    #[arg(long)]
    offline: bool,

    /// Seconds to wait for an answer before it counts as skipped
    #[arg(long, env = "ANSWER_TIMEOUT_SECS", default_value_t = 120)]
    answer_timeout_secs: u64,

    /// Where to write the session log
    #[arg(long, env = "LOG_PATH", default_value = "interview_log.json")]
    log_path: PathBuf,
}

fn build_client(args: &Args) -> Result<Arc<dyn LLMClient>> {
    if args.offline {
        info!("Running offline with canned responses");
        return Ok(Arc::new(OfflineLLMClient));
    }

    let provider = Provider::from_name(&args.provider);
    let api_key = match &args.api_key {
        Some(key) => key.clone(),
        None => std::env::var(provider.api_key_var()).with_context(|| {
            format!(
                "{} must be set for '{}' provider (or pass --api-key / --offline)",
                provider.api_key_var(),
                args.provider.to_lowercase()
            )
        })?,
    };
    let templates = match &args.prompts_path {
        Some(path) => PromptTemplates::from_dir(path)
            .with_context(|| format!("Failed to load prompts from {}", path.display()))?,
        None => PromptTemplates::builtin(),
    };
    let model = args
        .model
        .clone()
        .unwrap_or_else(|| provider.default_model().to_string());

    info!(?provider, %model, "Using OpenAI-compatible provider");
    Ok(Arc::new(OpenAICompatibleClient::for_provider(
        provider, &api_key, model, templates,
    )))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays the conversation.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let orchestrator = Orchestrator::new(build_client(&args)?).with_settings(InterviewSettings {
        stop_keyword: args.stop_keyword.clone(),
    });

    let profile = CandidateProfile::new(&args.name, &args.position, &args.grade);
    let mut state = SessionState::new(profile, args.questions)?
        .with_starting_difficulty(args.difficulty);
    state.set_vision_context(args.vision_context.clone());

    println!(
        "Interview for {} ({} {}), {} questions. Type '{}' to finish early.",
        args.name, args.grade, args.position, args.questions, args.stop_keyword
    );

    let mut stdout = tokio::io::stdout();
    let state = runner::run_interview(
        &orchestrator,
        state,
        BufReader::new(tokio::io::stdin()),
        &mut stdout,
        Duration::from_secs(args.answer_timeout_secs),
    )
    .await?;

    runner::save_log(&args.log_path, &state)
        .await
        .with_context(|| format!("Failed to write {}", args.log_path.display()))?;
    println!("Log saved to {}", args.log_path.display());

    Ok(())
}
