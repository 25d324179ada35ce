//! Configuration for speech providers

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::VoiceSettings;

/// Configuration for a Whisper-compatible transcription API
#[derive(Clone, Serialize, Deserialize)]
pub struct WhisperConfig {
    /// Bearer token
    #[serde(default, skip_serializing)]
    pub api_key: String,

    /// API base URL (the `/audio/transcriptions` path is appended)
    #[serde(default = "default_whisper_base_url")]
    pub base_url: String,

    /// Speech-to-text model
    #[serde(default = "default_stt_model")]
    pub model: String,

    /// Optional ISO 639-1 language hint
    #[serde(default)]
    pub language: Option<String>,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Configuration for the Murf text-to-speech API
#[derive(Clone, Serialize, Deserialize)]
pub struct MurfConfig {
    /// Value of the `api-key` header
    #[serde(default, skip_serializing)]
    pub api_key: String,

    /// API base URL
    #[serde(default = "default_murf_base_url")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Voice used when a request supplies none
    #[serde(default)]
    pub voice: VoiceSettings,
}

fn default_whisper_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_murf_base_url() -> String {
    "https://api.murf.ai".to_string()
}

fn default_stt_model() -> String {
    "whisper-1".to_string()
}

const fn default_timeout_ms() -> u64 {
    30000 // 30 seconds
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_whisper_base_url(),
            model: default_stt_model(),
            language: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for MurfConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_murf_base_url(),
            timeout_ms: default_timeout_ms(),
            voice: VoiceSettings::default(),
        }
    }
}

fn validate_common(api_key: &str, base_url: &str, timeout_ms: u64) -> Result<(), String> {
    if api_key.trim().is_empty() {
        return Err("API key is required".to_string());
    }
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(format!("Invalid base URL: {base_url}"));
    }
    if timeout_ms == 0 {
        return Err("Timeout must be greater than zero".to_string());
    }
    Ok(())
}

impl WhisperConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        validate_common(&self.api_key, &self.base_url, self.timeout_ms)?;
        if self.model.trim().is_empty() {
            return Err("Model is required".to_string());
        }
        Ok(())
    }
}

impl MurfConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        validate_common(&self.api_key, &self.base_url, self.timeout_ms)?;
        if self.voice.voice_id.trim().is_empty() {
            return Err("Voice ID is required".to_string());
        }
        Ok(())
    }
}

impl fmt::Debug for WhisperConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WhisperConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("language", &self.language)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl fmt::Debug for MurfConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MurfConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("voice", &self.voice)
            .finish()
    }
}
