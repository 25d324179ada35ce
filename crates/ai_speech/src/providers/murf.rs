//! Murf text-to-speech provider
//!
//! Calls `POST /v1/speech/generate`. The reply carries the audio either
//! inline (`encodedAudio`, base64) or as a short-lived download URL
//! (`audioFile`); inline audio wins when both are present.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::MurfConfig;
use crate::error::SpeechError;
use crate::ports::TextToSpeech;
use crate::types::{AudioData, AudioFormat, VoiceSettings};

/// Murf rejects longer inputs per request
const MAX_TEXT_CHARS: usize = 3000;

/// Text-to-speech provider backed by Murf
#[derive(Debug, Clone)]
pub struct MurfSpeechProvider {
    client: Client,
    config: MurfConfig,
}

impl MurfSpeechProvider {
    /// Create a new Murf provider
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: MurfConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    /// Build the TTS endpoint URL
    fn tts_url(&self) -> String {
        format!(
            "{}/v1/speech/generate",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn transport_error(&self, err: &reqwest::Error) -> SpeechError {
        SpeechError::from_transport(err, self.config.timeout_ms)
    }

    /// Fetch audio from the URL Murf returned
    async fn download(&self, url: &str, fallback: AudioFormat) -> Result<AudioData, SpeechError> {
        debug!("Downloading synthesized audio");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        if !response.status().is_success() {
            return Err(SpeechError::SynthesisFailed(format!(
                "Audio download failed with HTTP {}",
                response.status()
            )));
        }

        let format = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<mime::Mime>().ok())
            .and_then(|m| AudioFormat::from_mime_type(m.essence_str()))
            .unwrap_or(fallback);

        let bytes: Bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to read audio: {e}")))?;

        Ok(AudioData::new(bytes.to_vec(), format))
    }
}

/// Murf generate request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    text: &'a str,
    voice_id: &'a str,
    style: &'a str,
    format: &'a str,
    sample_rate: u32,
    channel_type: &'a str,
    rate: i32,
    pitch: i32,
    variation: u32,
    encode_as_base64: bool,
}

impl<'a> GenerateRequest<'a> {
    fn new(text: &'a str, voice: &'a VoiceSettings) -> Self {
        Self {
            text,
            voice_id: &voice.voice_id,
            style: &voice.style,
            format: &voice.format,
            sample_rate: voice.sample_rate,
            channel_type: &voice.channel_type,
            rate: voice.rate,
            pitch: voice.pitch,
            variation: voice.variation,
            encode_as_base64: voice.encode_as_base64,
        }
    }
}

/// Murf generate response body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    encoded_audio: Option<String>,
    #[serde(default)]
    audio_file: Option<String>,
    #[serde(default)]
    warning: Option<String>,
}

/// Murf error body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.error_message.or(e.message))
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl TextToSpeech for MurfSpeechProvider {
    #[instrument(skip(self, text, voice), fields(text_len = text.len(), voice = %voice.voice_id))]
    async fn synthesize(
        &self,
        text: &str,
        voice: &VoiceSettings,
    ) -> Result<AudioData, SpeechError> {
        debug!("Synthesizing speech with Murf");

        if text.trim().is_empty() {
            return Err(SpeechError::SynthesisFailed(
                "Text cannot be empty".to_string(),
            ));
        }

        if text.chars().count() > MAX_TEXT_CHARS {
            return Err(SpeechError::SynthesisFailed(format!(
                "Text too long: exceeds {MAX_TEXT_CHARS} characters"
            )));
        }

        let response = self
            .client
            .post(self.tts_url())
            .header("api-key", &self.config.api_key)
            .json(&GenerateRequest::new(text, voice))
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Murf synthesis request failed");

            return Err(match status {
                StatusCode::TOO_MANY_REQUESTS => SpeechError::RateLimited,
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    SpeechError::Unauthorized(error_message(&body))
                },
                _ => SpeechError::SynthesisFailed(format!(
                    "HTTP {status}: {}",
                    error_message(&body)
                )),
            });
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        if let Some(warning) = &generated.warning {
            warn!(warning = %warning, "Murf returned a warning");
        }

        let format = voice.audio_format();

        let audio = match (generated.encoded_audio, generated.audio_file) {
            (Some(encoded), _) if !encoded.is_empty() => {
                let data = STANDARD.decode(encoded.trim()).map_err(|e| {
                    SpeechError::InvalidResponse(format!("Invalid base64 audio: {e}"))
                })?;
                AudioData::new(data, format)
            },
            (_, Some(url)) if !url.is_empty() => self.download(&url, format).await?,
            _ => {
                return Err(SpeechError::SynthesisFailed(
                    "No audio returned".to_string(),
                ));
            },
        };

        if audio.is_empty() {
            return Err(SpeechError::SynthesisFailed(
                "No audio returned".to_string(),
            ));
        }

        debug!(audio_size = audio.size_bytes(), "Speech synthesis complete");
        Ok(audio)
    }

    fn default_voice(&self) -> &VoiceSettings {
        &self.config.voice
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_uses_murf_field_names() {
        let voice = VoiceSettings::default();
        let json = serde_json::to_value(GenerateRequest::new("Hello", &voice)).unwrap();
        assert_eq!(json["text"], "Hello");
        assert_eq!(json["voiceId"], "en-US-natalie");
        assert_eq!(json["style"], "empathetic");
        assert_eq!(json["format"], "MP3");
        assert_eq!(json["sampleRate"], 44100);
        assert_eq!(json["channelType"], "MONO");
        assert_eq!(json["rate"], -6);
        assert_eq!(json["pitch"], -5);
        assert_eq!(json["variation"], 4);
        assert_eq!(json["encodeAsBase64"], true);
    }

    #[test]
    fn error_message_prefers_structured_body() {
        assert_eq!(
            error_message(r#"{"errorMessage":"Invalid voice"}"#),
            "Invalid voice"
        );
        assert_eq!(error_message("plain"), "plain");
    }

    #[test]
    fn tts_url() {
        let provider = MurfSpeechProvider::new(MurfConfig {
            api_key: "k".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(provider.tts_url(), "https://api.murf.ai/v1/speech/generate");
        assert_eq!(provider.default_voice().voice_id, "en-US-natalie");
    }
}
