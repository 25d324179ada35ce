//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `providers`: language model, transcription and synthesis providers
//! - `resilience`: per-gateway timeouts, audio storage

mod providers;
mod resilience;
mod server;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

pub use providers::{InferenceAppConfig, MurfAppConfig, SpeechAppConfig, WhisperAppConfig};
pub use resilience::{StorageConfig, TimeoutsConfig};
pub use server::{LogFormat, ServerConfig};

/// Prefix for structured environment overrides (`MINDSPACE__SERVER__PORT`)
pub const ENV_PREFIX: &str = "MINDSPACE";

/// Language-model credential variable
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";

/// Speech-synthesis credential variable
pub const MURF_API_KEY: &str = "MURF_API_KEY";

/// Transcription credential variable
pub const STT_API_KEY: &str = "STT_API_KEY";

/// Application environment (development or production)
///
/// Controls whether error details reach HTTP clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment - error details are exposed
    Development,
    /// Production environment - generic error messages only
    #[default]
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development' or 'production'"
            )),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development or production)
    #[serde(default)]
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Language-model provider configuration
    #[serde(default)]
    pub inference: InferenceAppConfig,

    /// Speech provider configuration
    #[serde(default)]
    pub speech: SpeechAppConfig,

    /// Audio storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Per-gateway call limits
    #[serde(default)]
    pub timeouts: TimeoutsConfig,
}

impl AppConfig {
    /// Load configuration from `.env`, an optional `config.toml` and the
    /// environment
    ///
    /// Bare provider credentials (`GEMINI_API_KEY`, `MURF_API_KEY`,
    /// `STT_API_KEY`) override whatever the file configured.
    pub fn load() -> Result<Self, config::ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "Loaded .env file");
        }

        let builder = config::Config::builder()
            // Start with defaults
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5001)?
            .set_default("storage.audio_dir", "audios")?
            // Load from file if exists
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables (e.g., MINDSPACE__SERVER__PORT)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.apply_credentials(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Defaults plus bare credentials from the environment
    ///
    /// Used when `load` fails so that a broken config file does not take the
    /// providers down with it.
    pub fn fallback() -> Self {
        let mut config = Self::default();
        config.apply_credentials(|name| std::env::var(name).ok());
        config
    }

    /// Apply bare credential variables through `lookup`
    ///
    /// Blank values are ignored.
    pub fn apply_credentials<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(SecretString::from)
        };

        if let Some(key) = secret(GEMINI_API_KEY) {
            self.inference.api_key = Some(key);
        }
        if let Some(key) = secret(MURF_API_KEY) {
            self.speech.murf.api_key = Some(key);
        }
        if let Some(key) = secret(STT_API_KEY) {
            self.speech.whisper.api_key = Some(key);
        }
    }

    /// Whether error details may be shown to clients
    pub const fn is_development(&self) -> bool {
        matches!(self.environment, Environment::Development)
    }
}
