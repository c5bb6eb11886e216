use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Defines the supported backend providers for lesson generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Provider {
    OpenAI,
    Gemini,
}

/// Connection settings for the Firestore curriculum store.
///
/// Loaded separately from the full agent configuration so the seeder
/// can run with only the store credentials present.
#[derive(Clone, Debug)]
pub struct FirestoreConfig {
    pub project_id: String,
    /// OAuth2 bearer token minted outside this process
    /// (e.g., `gcloud auth print-access-token`).
    pub access_token: String,
    pub collection: String,
}

impl FirestoreConfig {
    /// Loads the Firestore settings from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            project_id: required_var("FIRESTORE_PROJECT_ID")?,
            access_token: required_var("FIRESTORE_ACCESS_TOKEN")?,
            collection: std::env::var("FIRESTORE_COLLECTION")
                .unwrap_or_else(|_| "lessons".to_string()),
        })
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub provider: Provider,
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub chat_model: String,
    pub telegram_bot_token: String,
    pub telegram_chat_id: String,
    pub firestore: FirestoreConfig,
    pub log_level: Level,
}

/// Reads a required variable, trimming whitespace and surrounding
/// quotes (secrets pasted into CI configs often carry both).
fn required_var(name: &str) -> Result<String, ConfigError> {
    let value = std::env::var(name).map_err(|_| ConfigError::MissingVar(name.to_string()))?;
    let value = value.trim().trim_matches('"').to_string();
    if value.is_empty() {
        return Err(ConfigError::MissingVar(name.to_string()));
    }
    Ok(value)
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let provider_str = std::env::var("LLM_PROVIDER").unwrap_or_else(|_| "openai".to_string());
        let provider = match provider_str.to_lowercase().as_str() {
            "gemini" => Provider::Gemini,
            _ => Provider::OpenAI,
        };

        let openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        let gemini_api_key = std::env::var("GEMINI_API_KEY").ok();

        let chat_model = std::env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());

        let telegram_bot_token = required_var("TELEGRAM_BOT_TOKEN")?;
        let telegram_chat_id = required_var("TELEGRAM_CHAT_ID")?;

        let firestore = FirestoreConfig::from_env()?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        match provider {
            Provider::OpenAI => {
                if openai_api_key.is_none() {
                    return Err(ConfigError::MissingVar(
                        "OPENAI_API_KEY must be set for 'openai' provider".to_string(),
                    ));
                }
            }
            Provider::Gemini => {
                if gemini_api_key.is_none() {
                    return Err(ConfigError::MissingVar(
                        "GEMINI_API_KEY must be set for 'gemini' provider".to_string(),
                    ));
                }
            }
        }

        Ok(Self {
            provider,
            openai_api_key,
            gemini_api_key,
            chat_model,
            telegram_bot_token,
            telegram_chat_id,
            firestore,
            log_level,
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
            env::remove_var("LLM_PROVIDER");
            env::remove_var("OPENAI_API_KEY");
            env::remove_var("GEMINI_API_KEY");
            env::remove_var("CHAT_MODEL");
            env::remove_var("TELEGRAM_BOT_TOKEN");
            env::remove_var("TELEGRAM_CHAT_ID");
            env::remove_var("FIRESTORE_PROJECT_ID");
            env::remove_var("FIRESTORE_ACCESS_TOKEN");
            env::remove_var("FIRESTORE_COLLECTION");
            env::remove_var("RUST_LOG");
        }
    }

    fn set_minimal_env_openai() {
        unsafe {
            env::set_var("LLM_PROVIDER", "openai");
            env::set_var("OPENAI_API_KEY", "test-openai-key");
            env::set_var("TELEGRAM_BOT_TOKEN", "12345:test-token");
            env::set_var("TELEGRAM_CHAT_ID", "67890");
            env::set_var("FIRESTORE_PROJECT_ID", "test-project");
            env::set_var("FIRESTORE_ACCESS_TOKEN", "test-access-token");
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

        assert_eq!(config.provider, Provider::OpenAI);
        assert_eq!(config.openai_api_key, Some("test-openai-key".to_string()));
        assert_eq!(config.gemini_api_key, None);
        assert_eq!(config.chat_model, "gpt-4o");
        assert_eq!(config.telegram_bot_token, "12345:test-token");
        assert_eq!(config.telegram_chat_id, "67890");
        assert_eq!(config.firestore.project_id, "test-project");
        assert_eq!(config.firestore.collection, "lessons");
        assert_eq!(config.log_level, Level::INFO);
    }

    #[test]
    #[serial]
    fn test_config_from_env_gemini_provider() {
        clear_env_vars();
        set_minimal_env_openai();
        unsafe {
            env::set_var("LLM_PROVIDER", "gemini");
            env::remove_var("OPENAI_API_KEY");
            env::set_var("GEMINI_API_KEY", "test-gemini-key");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.provider, Provider::Gemini);
        assert_eq!(config.gemini_api_key, Some("test-gemini-key".to_string()));
        assert_eq!(config.openai_api_key, None);
    }

    #[test]
    #[serial]
    fn test_config_missing_provider_key() {
        clear_env_vars();
        set_minimal_env_openai();
        unsafe {
            env::set_var("LLM_PROVIDER", "gemini");
            env::remove_var("GEMINI_API_KEY");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::MissingVar(var) => assert!(var.contains("GEMINI_API_KEY")),
            _ => panic!("Expected MissingVar for GEMINI_API_KEY"),
        }
    }

    #[test]
    #[serial]
    fn test_config_missing_telegram_token() {
        clear_env_vars();
        set_minimal_env_openai();
        unsafe {
            env::remove_var("TELEGRAM_BOT_TOKEN");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::MissingVar(var) => assert_eq!(var, "TELEGRAM_BOT_TOKEN"),
            _ => panic!("Expected MissingVar for TELEGRAM_BOT_TOKEN"),
        }
    }

    #[test]
    #[serial]
    fn test_secrets_are_trimmed_and_unquoted() {
        clear_env_vars();
        set_minimal_env_openai();
        unsafe {
            env::set_var("TELEGRAM_BOT_TOKEN", " \"12345:quoted-token\" ");
        }

        let config = Config::from_env().expect("Config should load successfully");
        assert_eq!(config.telegram_bot_token, "12345:quoted-token");
    }

    #[test]
    #[serial]
    fn test_blank_required_var_is_missing() {
        clear_env_vars();
        set_minimal_env_openai();
        unsafe {
            env::set_var("TELEGRAM_CHAT_ID", "   ");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::MissingVar(var) => assert_eq!(var, "TELEGRAM_CHAT_ID"),
            _ => panic!("Expected MissingVar for TELEGRAM_CHAT_ID"),
        }
    }

    #[test]
    #[serial]
    fn test_config_custom_values() {
        clear_env_vars();
        set_minimal_env_openai();
        unsafe {
            env::set_var("CHAT_MODEL", "gpt-4o-mini");
            env::set_var("FIRESTORE_COLLECTION", "lessons_staging");
            env::set_var("RUST_LOG", "debug");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.chat_model, "gpt-4o-mini");
        assert_eq!(config.firestore.collection, "lessons_staging");
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    #[serial]
    fn test_config_invalid_log_level() {
        clear_env_vars();
        set_minimal_env_openai();
        unsafe {
            env::set_var("RUST_LOG", "verbose");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "RUST_LOG"),
            _ => panic!("Expected InvalidValue for RUST_LOG"),
        }
    }

    #[test]
    #[serial]
    fn test_firestore_config_standalone() {
        clear_env_vars();
        unsafe {
            env::set_var("FIRESTORE_PROJECT_ID", "seed-project");
            env::set_var("FIRESTORE_ACCESS_TOKEN", "seed-token");
        }

        let config = FirestoreConfig::from_env().expect("FirestoreConfig should load");
        assert_eq!(config.project_id, "seed-project");
        assert_eq!(config.access_token, "seed-token");
        assert_eq!(config.collection, "lessons");
    }
}
