//! Whisper-compatible transcription provider
//!
//! Works against any API exposing the OpenAI `/audio/transcriptions`
//! multipart contract (OpenAI, Groq, self-hosted faster-whisper servers).
//!
//! # Supported Audio Formats
//! - mp3, m4a, wav, webm, flac, ogg
//! - raw Opus is rejected locally

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::WhisperConfig;
use crate::error::SpeechError;
use crate::ports::SpeechToText;
use crate::types::{AudioData, Transcription, is_whisper_supported};

/// Speech-to-text provider for Whisper-compatible APIs
#[derive(Debug, Clone)]
pub struct WhisperSpeechProvider {
    client: Client,
    config: WhisperConfig,
}

impl WhisperSpeechProvider {
    /// Create a new Whisper provider
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: WhisperConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    /// Build the STT endpoint URL
    fn stt_url(&self) -> String {
        format!(
            "{}/audio/transcriptions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

/// Whisper transcription response
#[derive(Debug, Deserialize)]
struct WhisperResponse {
    text: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
}

/// OpenAI-style API error response
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

#[async_trait]
impl SpeechToText for WhisperSpeechProvider {
    #[instrument(skip(self, audio), fields(audio_size = audio.size_bytes(), format = ?audio.format()))]
    async fn transcribe(&self, audio: AudioData) -> Result<Transcription, SpeechError> {
        debug!("Transcribing audio with Whisper");

        if audio.is_empty() {
            return Err(SpeechError::InvalidAudio("Audio data is empty".to_string()));
        }

        if !is_whisper_supported(audio.format()) {
            return Err(SpeechError::InvalidAudio(format!(
                "Audio format {} is not supported for transcription",
                audio.format()
            )));
        }

        let filename = audio.filename("audio");
        let mime_type = audio.mime_type();
        let data = audio.into_data();

        let file_part = Part::bytes(data)
            .file_name(filename)
            .mime_str(mime_type)
            .map_err(|e| SpeechError::InvalidAudio(format!("Invalid MIME type: {e}")))?;

        let mut form = Form::new()
            .part("file", file_part)
            .text("model", self.config.model.clone())
            .text("response_format", "json");

        if let Some(language) = &self.config.language {
            form = form.text("language", language.clone());
        }

        let response = self
            .client
            .post(self.stt_url())
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SpeechError::from_transport(&e, self.config.timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Transcription request failed");

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(SpeechError::RateLimited);
            }
            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(SpeechError::Unauthorized(error_body));
            }

            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_body) {
                return match api_error.error.code.as_deref() {
                    Some("rate_limit_exceeded") => Err(SpeechError::RateLimited),
                    Some("model_not_found") => {
                        Err(SpeechError::ModelNotAvailable(self.config.model.clone()))
                    },
                    _ => Err(SpeechError::TranscriptionFailed(api_error.error.message)),
                };
            }

            return Err(SpeechError::TranscriptionFailed(format!(
                "HTTP {status}: {error_body}"
            )));
        }

        let whisper_response: WhisperResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        debug!(
            text_len = whisper_response.text.len(),
            language = ?whisper_response.language,
            "Transcription complete"
        );

        let mut transcription = Transcription::new(whisper_response.text.trim());

        if let Some(lang) = whisper_response.language {
            transcription = transcription.with_language(lang);
        }

        if let Some(duration) = whisper_response.duration {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let duration_ms = (duration * 1000.0) as u64;
            transcription = transcription.with_duration(duration_ms);
        }

        Ok(transcription)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> WhisperConfig {
        WhisperConfig {
            api_key: "key".into(),
            base_url: "http://localhost:8000/v1/".into(),
            ..Default::default()
        }
    }

    #[test]
    fn unkeyed_config_is_rejected() {
        let result = WhisperSpeechProvider::new(WhisperConfig::default());
        assert!(matches!(result, Err(SpeechError::Configuration(_))));
    }

    #[test]
    fn stt_url_trims_trailing_slash() {
        let provider = WhisperSpeechProvider::new(config()).unwrap();
        assert_eq!(
            provider.stt_url(),
            "http://localhost:8000/v1/audio/transcriptions"
        );
        assert_eq!(provider.model_name(), "whisper-1");
    }
}
