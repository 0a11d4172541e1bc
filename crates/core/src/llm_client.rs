//! Language-model gateway.
//!
//! Every node reaches the model through `LLMClient::call`: a prompt role plus
//! named context fields in, free text out. Nothing about the returned text is
//! trusted; the nodes decide how to read it.

use crate::prompts::{PromptContext, PromptRole, PromptTemplates};
use anyhow::{Context, Result, anyhow};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

pub const DEFAULT_TEMPERATURE: f32 = 0.6;

/// A generic client for the language model behind the interview.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Renders the prompt for `role` with `context` and returns the model's text.
    async fn call(&self, role: PromptRole, context: &PromptContext) -> Result<String>;
}

/// Supported OpenAI-compatible backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provider {
    OpenAI,
    Gemini,
    Mistral,
}

impl Provider {
    /// Parses a provider name, falling back to OpenAI for anything unknown.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "gemini" => Provider::Gemini,
            "mistral" => Provider::Mistral,
            _ => Provider::OpenAI,
        }
    }

    pub fn api_base(&self) -> &'static str {
        match self {
            Provider::OpenAI => "https://api.openai.com/v1/",
            Provider::Gemini => "https://generativelanguage.googleapis.com/v1beta/openai",
            Provider::Mistral => "https://api.mistral.ai/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAI => "gpt-4o",
            Provider::Gemini => "gemini-2.0-flash",
            Provider::Mistral => "mistral-large-latest",
        }
    }

    /// The environment variable holding this provider's API key.
    pub fn api_key_var(&self) -> &'static str {
        match self {
            Provider::OpenAI => "OPENAI_API_KEY",
            Provider::Gemini => "GEMINI_API_KEY",
            Provider::Mistral => "MISTRAL_API_KEY",
        }
    }
}

/// An implementation of `LLMClient` for any OpenAI-compatible API.
pub struct OpenAICompatibleClient {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    templates: PromptTemplates,
}

impl OpenAICompatibleClient {
    /// Creates a new client for an OpenAI-compatible service.
    ///
    /// # Arguments
    ///
    /// * `config` - The configuration for the OpenAI client, including API key and base URL.
    /// * `model` - The model identifier to use for chat completions.
    /// * `templates` - The prompt template for each node.
    pub fn new(config: OpenAIConfig, model: String, templates: PromptTemplates) -> Self {
        Self {
            client: Client::with_config(config),
            model,
            temperature: DEFAULT_TEMPERATURE,
            templates,
        }
    }

    /// Creates a client pointed at the base URL of `provider`.
    pub fn for_provider(
        provider: Provider,
        api_key: &str,
        model: String,
        templates: PromptTemplates,
    ) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(provider.api_base());
        Self::new(config, model, templates)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LLMClient for OpenAICompatibleClient {
    async fn call(&self, role: PromptRole, context: &PromptContext) -> Result<String> {
        let prompt = self.templates.render(role, context);
        debug!(%role, prompt_len = prompt.len(), model = %self.model, "Calling language model");

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .temperature(self.temperature)
            .messages(vec![
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()?
                    .into(),
            ])
            .build()?;

        let response = self.client.chat().create(request).await?;

        let answer = response
            .choices
            .first()
            .context("No response choice from LLM")?
            .message
            .content
            .clone()
            .context("No content in LLM response")?;

        Ok(answer)
    }
}

/// A canned `LLMClient` for offline runs and demos.
///
/// The observer always asks to continue at the same difficulty, the
/// interviewer asks a generic question and the report is a fixed template.
pub struct OfflineLLMClient;

#[async_trait]
impl LLMClient for OfflineLLMClient {
    async fn call(&self, role: PromptRole, context: &PromptContext) -> Result<String> {
        let field = |key: &str| context.get(key).map(String::as_str).unwrap_or_default();
        let text = match role {
            PromptRole::Observer => serde_json::json!({
                "thought_process": format!("Offline review of: {}", field("last_user_input")),
                "next_instruction_to_interviewer": format!(
                    "Ask the next {} question.",
                    field("position")
                ),
                "difficulty_adjustment": 0,
                "status": "continue",
            })
            .to_string(),
            PromptRole::Interviewer => format!(
                "{}, could you walk me through a recent {} problem you solved?",
                field("candidate_name"),
                field("position")
            ),
            PromptRole::Feedback => format!(
                "# Result\n**Grade:** n/a\n**Decision:** n/a\n\n# Analysis\nOffline report for {}.\n\n{}",
                field("position"),
                field("all_observer_thoughts")
            ),
        };
        Ok(text)
    }
}

/// A queue-per-role `LLMClient` for tests.
///
/// Responses are handed out in the order they were pushed. A role whose queue
/// is empty answers with an error, which is how tests reach the fallbacks.
/// Every call is recorded.
#[derive(Default)]
pub struct ScriptedLLMClient {
    responses: Mutex<HashMap<PromptRole, VecDeque<Result<String, String>>>>,
    calls: Mutex<Vec<(PromptRole, PromptContext)>>,
}

impl ScriptedLLMClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, role: PromptRole, text: impl Into<String>) -> Self {
        self.push(role, Ok(text.into()))
    }

    pub fn fail(self, role: PromptRole, message: impl Into<String>) -> Self {
        self.push(role, Err(message.into()))
    }

    fn push(mut self, role: PromptRole, response: Result<String, String>) -> Self {
        self.responses
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(role)
            .or_default()
            .push_back(response);
        self
    }

    /// All calls made so far, oldest first.
    pub fn calls(&self) -> Vec<(PromptRole, PromptContext)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self, role: PromptRole) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(called, _)| *called == role)
            .count()
    }
}

#[async_trait]
impl LLMClient for ScriptedLLMClient {
    async fn call(&self, role: PromptRole, context: &PromptContext) -> Result<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((role, context.clone()));

        let next = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&role)
            .and_then(VecDeque::pop_front);

        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("No scripted response left for role '{role}'")),
        }
    }
}
