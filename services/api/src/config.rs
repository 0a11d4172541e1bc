use interview_core::{
    llm_client::Provider,
    router::DEFAULT_STOP_KEYWORD,
    session::{DEFAULT_TOTAL_QUESTIONS, MAX_TOTAL_QUESTIONS},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub provider: Provider,
    pub api_key: String,
    pub chat_model: String,
    pub log_level: Level,
    /// Directory of prompt overrides; the built-in prompts are used when unset.
    pub prompts_path: Option<PathBuf>,
    /// Where finished session logs are written.
    pub log_dir: PathBuf,
    pub stop_keyword: String,
    pub default_total_questions: u32,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let provider_str = std::env::var("LLM_PROVIDER").unwrap_or_else(|_| "openai".to_string());
        let provider = Provider::from_name(&provider_str);

        let api_key = std::env::var(provider.api_key_var()).map_err(|_| {
            ConfigError::MissingVar(format!(
                "{} must be set for '{}' provider",
                provider.api_key_var(),
                provider_str.to_lowercase()
            ))
        })?;

        let chat_model = std::env::var("CHAT_MODEL")
            .unwrap_or_else(|_| provider.default_model().to_string());

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let prompts_path = std::env::var("PROMPTS_PATH").ok().map(PathBuf::from);

        let log_dir = std::env::var("LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./logs"));

        let stop_keyword =
            std::env::var("STOP_KEYWORD").unwrap_or_else(|_| DEFAULT_STOP_KEYWORD.to_string());

        let default_total_questions = match std::env::var("DEFAULT_TOTAL_QUESTIONS") {
            Ok(value) => value
                .parse::<u32>()
                .ok()
                .filter(|n| (1..=MAX_TOTAL_QUESTIONS).contains(n))
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "DEFAULT_TOTAL_QUESTIONS".to_string(),
                        format!("'{}' is not a number between 1 and {}", value, MAX_TOTAL_QUESTIONS),
                    )
                })?,
            Err(_) => DEFAULT_TOTAL_QUESTIONS,
        };

        Ok(Self {
            bind_address,
            provider,
            api_key,
            chat_model,
            log_level,
            prompts_path,
            log_dir,
            stop_keyword,
            default_total_questions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tracing::Level;

    fn clear_env_vars() {
        unsafe {
            env::remove_var("BIND_ADDRESS");
            env::remove_var("LLM_PROVIDER");
            env::remove_var("OPENAI_API_KEY");
            env::remove_var("GEMINI_API_KEY");
            env::remove_var("MISTRAL_API_KEY");
            env::remove_var("CHAT_MODEL");
            env::remove_var("RUST_LOG");
            env::remove_var("PROMPTS_PATH");
            env::remove_var("LOG_DIR");
            env::remove_var("STOP_KEYWORD");
            env::remove_var("DEFAULT_TOTAL_QUESTIONS");
        }
    }

    fn set_minimal_env_openai() {
        unsafe {
            env::set_var("LLM_PROVIDER", "openai");
            env::set_var("OPENAI_API_KEY", "test-openai-key");
        }
    }

    #[test]
    fn test_config_error_display() {
        let missing_var = ConfigError::MissingVar("TEST_VAR".to_string());
        assert_eq!(
            format!("{}", missing_var),
            "Missing environment variable: TEST_VAR"
        );

        let invalid_value =
            ConfigError::InvalidValue("TEST_VAR".to_string(), "bad_value".to_string());
        assert_eq!(
            format!("{}", invalid_value),
            "Invalid value for environment variable TEST_VAR: bad_value"
        );
    }

    #[test]
    #[serial]
    fn test_config_from_env_minimal_openai() {
        clear_env_vars();
        set_minimal_env_openai();

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "0.0.0.0:3000");
        assert_eq!(config.provider, Provider::OpenAI);
        assert_eq!(config.api_key, "test-openai-key");
        assert_eq!(config.chat_model, "gpt-4o");
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.prompts_path, None);
        assert_eq!(config.log_dir, PathBuf::from("./logs"));
        assert_eq!(config.stop_keyword, "stop");
        assert_eq!(config.default_total_questions, 10);
    }

    #[test]
    #[serial]
    fn test_config_from_env_mistral_provider() {
        clear_env_vars();
        unsafe {
            env::set_var("LLM_PROVIDER", "Mistral");
            env::set_var("MISTRAL_API_KEY", "test-mistral-key");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.provider, Provider::Mistral);
        assert_eq!(config.api_key, "test-mistral-key");
        assert_eq!(config.chat_model, "mistral-large-latest");
    }

    #[test]
    #[serial]
    fn test_config_from_env_custom_values() {
        clear_env_vars();
        unsafe {
            env::set_var("BIND_ADDRESS", "127.0.0.1:8080");
            env::set_var("LLM_PROVIDER", "gemini");
            env::set_var("GEMINI_API_KEY", "custom-gemini-key");
            env::set_var("CHAT_MODEL", "gemini-1.5-pro");
            env::set_var("RUST_LOG", "debug");
            env::set_var("PROMPTS_PATH", "/custom/prompts");
            env::set_var("LOG_DIR", "/var/log/interviews");
            env::set_var("STOP_KEYWORD", "стоп");
            env::set_var("DEFAULT_TOTAL_QUESTIONS", "5");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "127.0.0.1:8080");
        assert_eq!(config.provider, Provider::Gemini);
        assert_eq!(config.api_key, "custom-gemini-key");
        assert_eq!(config.chat_model, "gemini-1.5-pro");
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.prompts_path, Some(PathBuf::from("/custom/prompts")));
        assert_eq!(config.log_dir, PathBuf::from("/var/log/interviews"));
        assert_eq!(config.stop_keyword, "стоп");
        assert_eq!(config.default_total_questions, 5);
    }

    #[test]
    #[serial]
    fn test_config_invalid_bind_address() {
        clear_env_vars();
        set_minimal_env_openai();
        unsafe {
            env::set_var("BIND_ADDRESS", "not-a-valid-address");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "BIND_ADDRESS"),
            _ => panic!("Expected InvalidValue for BIND_ADDRESS"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_log_level() {
        clear_env_vars();
        set_minimal_env_openai();
        unsafe {
            env::set_var("RUST_LOG", "not-a-level");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "RUST_LOG"),
            _ => panic!("Expected InvalidValue for RUST_LOG"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_total_questions() {
        for value in ["0", "51", "ten"] {
            clear_env_vars();
            set_minimal_env_openai();
            unsafe {
                env::set_var("DEFAULT_TOTAL_QUESTIONS", value);
            }

            let err = Config::from_env().unwrap_err();
            match err {
                ConfigError::InvalidValue(var, _) => assert_eq!(var, "DEFAULT_TOTAL_QUESTIONS"),
                _ => panic!("Expected InvalidValue for DEFAULT_TOTAL_QUESTIONS"),
            }
        }
    }

    #[test]
    #[serial]
    fn test_config_missing_provider_key() {
        clear_env_vars();
        unsafe {
            env::set_var("LLM_PROVIDER", "gemini");
            env::set_var("OPENAI_API_KEY", "wrong-provider-key");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::MissingVar(msg) => {
                assert!(msg.contains("GEMINI_API_KEY"));
                assert!(msg.contains("'gemini'"));
            }
            _ => panic!("Expected MissingVar for GEMINI_API_KEY"),
        }
    }
}
