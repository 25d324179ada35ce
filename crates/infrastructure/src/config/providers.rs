//! Provider configuration: language model, transcription and synthesis.
//!
//! Credentials are held as `SecretString` here and only exposed when the
//! provider client config is built.

use ai_core::InferenceConfig;
use ai_speech::{MurfConfig, VoiceSettings, WhisperConfig};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

fn redacted(secret: Option<&SecretString>) -> Option<&'static str> {
    secret.map(|_| "[REDACTED]")
}

fn exposed(secret: Option<&SecretString>) -> Option<String> {
    secret
        .map(|s| s.expose_secret().trim().to_string())
        .filter(|s| !s.is_empty())
}

// ==============================
// Inference (Gemini)
// ==============================

/// Language-model provider configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct InferenceAppConfig {
    /// API key (sensitive - uses `SecretString`)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// API base URL
    #[serde(default = "default_inference_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_inference_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens in the reply
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Nucleus sampling threshold
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Top-k sampling
    #[serde(default = "default_top_k")]
    pub top_k: u32,

    /// HTTP request timeout in milliseconds
    #[serde(default = "default_inference_timeout_ms")]
    pub timeout_ms: u64,

    /// System prompt override
    #[serde(default)]
    pub system_prompt: Option<String>,
}

fn default_inference_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_inference_model() -> String {
    "gemini-2.0-flash".to_string()
}

const fn default_temperature() -> f32 {
    0.7
}

const fn default_max_output_tokens() -> u32 {
    2048
}

const fn default_top_p() -> f32 {
    0.95
}

const fn default_top_k() -> u32 {
    40
}

const fn default_inference_timeout_ms() -> u64 {
    60_000
}

impl Default for InferenceAppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_inference_base_url(),
            model: default_inference_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            top_p: default_top_p(),
            top_k: default_top_k(),
            timeout_ms: default_inference_timeout_ms(),
            system_prompt: None,
        }
    }
}

impl std::fmt::Debug for InferenceAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceAppConfig")
            .field("api_key", &redacted(self.api_key.as_ref()))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("top_p", &self.top_p)
            .field("top_k", &self.top_k)
            .field("timeout_ms", &self.timeout_ms)
            .field("system_prompt", &self.system_prompt.is_some())
            .finish()
    }
}

impl InferenceAppConfig {
    /// Convert to `ai_core`'s `InferenceConfig`
    ///
    /// Returns `None` when no API key is configured.
    #[must_use]
    pub fn to_inference_config(&self) -> Option<InferenceConfig> {
        let api_key = exposed(self.api_key.as_ref())?;
        Some(InferenceConfig {
            base_url: self.base_url.clone(),
            api_key,
            default_model: self.model.clone(),
            timeout_ms: self.timeout_ms,
            max_tokens: self.max_output_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
            system_prompt: self.system_prompt.clone(),
        })
    }
}

// ==============================
// Speech (Whisper + Murf)
// ==============================

/// Speech provider configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeechAppConfig {
    /// Speech-to-text provider
    #[serde(default)]
    pub whisper: WhisperAppConfig,

    /// Text-to-speech provider
    #[serde(default)]
    pub murf: MurfAppConfig,
}

/// Whisper-compatible transcription configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct WhisperAppConfig {
    /// API key (sensitive - uses `SecretString`)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// API base URL
    #[serde(default = "default_whisper_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_whisper_model")]
    pub model: String,

    /// Language hint (ISO 639-1)
    #[serde(default)]
    pub language: Option<String>,

    /// HTTP request timeout in milliseconds
    #[serde(default = "default_speech_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_whisper_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_whisper_model() -> String {
    "whisper-1".to_string()
}

const fn default_speech_timeout_ms() -> u64 {
    30_000
}

impl Default for WhisperAppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_whisper_base_url(),
            model: default_whisper_model(),
            language: None,
            timeout_ms: default_speech_timeout_ms(),
        }
    }
}

impl std::fmt::Debug for WhisperAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperAppConfig")
            .field("api_key", &redacted(self.api_key.as_ref()))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("language", &self.language)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl WhisperAppConfig {
    /// Convert to `ai_speech`'s `WhisperConfig`
    ///
    /// Returns `None` when no API key is configured.
    #[must_use]
    pub fn to_whisper_config(&self) -> Option<WhisperConfig> {
        let api_key = exposed(self.api_key.as_ref())?;
        Some(WhisperConfig {
            api_key,
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            language: self.language.clone(),
            timeout_ms: self.timeout_ms,
        })
    }
}

/// Murf text-to-speech configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct MurfAppConfig {
    /// API key (sensitive - uses `SecretString`)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// API base URL
    #[serde(default = "default_murf_base_url")]
    pub base_url: String,

    /// HTTP request timeout in milliseconds
    #[serde(default = "default_speech_timeout_ms")]
    pub timeout_ms: u64,

    /// Voice used for replies
    #[serde(default)]
    pub voice: VoiceSettings,
}

fn default_murf_base_url() -> String {
    "https://api.murf.ai".to_string()
}

impl Default for MurfAppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_murf_base_url(),
            timeout_ms: default_speech_timeout_ms(),
            voice: VoiceSettings::default(),
        }
    }
}

impl std::fmt::Debug for MurfAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MurfAppConfig")
            .field("api_key", &redacted(self.api_key.as_ref()))
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("voice", &self.voice)
            .finish()
    }
}

impl MurfAppConfig {
    /// Convert to `ai_speech`'s `MurfConfig`
    ///
    /// Returns `None` when no API key is configured.
    #[must_use]
    pub fn to_murf_config(&self) -> Option<MurfConfig> {
        let api_key = exposed(self.api_key.as_ref())?;
        Some(MurfConfig {
            api_key,
            base_url: self.base_url.clone(),
            timeout_ms: self.timeout_ms,
            voice: self.voice.clone(),
        })
    }
}
