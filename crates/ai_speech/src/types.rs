//! Types for speech processing

use serde::{Deserialize, Serialize};

pub use domain::AudioFormat;

/// Whether a Whisper-compatible API accepts this format directly
#[must_use]
pub const fn is_whisper_supported(format: AudioFormat) -> bool {
    matches!(
        format,
        AudioFormat::Mp3
            | AudioFormat::Wav
            | AudioFormat::Flac
            | AudioFormat::Webm
            | AudioFormat::M4a
            | AudioFormat::Ogg
    )
}

/// Audio data with format information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioData {
    data: Vec<u8>,
    format: AudioFormat,
}

impl AudioData {
    /// Create new audio data
    #[must_use]
    pub const fn new(data: Vec<u8>, format: AudioFormat) -> Self {
        Self { data, format }
    }

    /// Get the raw audio bytes
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume and return the raw audio bytes
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Get the audio format
    #[must_use]
    pub const fn format(&self) -> AudioFormat {
        self.format
    }

    /// Get the size of the audio data in bytes
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Check if the audio data is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the MIME type for this audio
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Generate a filename with appropriate extension
    #[must_use]
    pub fn filename(&self, base: &str) -> String {
        format!("{}.{}", base, self.format.extension())
    }
}

/// Result of speech-to-text transcription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcription {
    /// Transcribed text
    pub text: String,
    /// Detected language (ISO 639-1 code)
    pub language: Option<String>,
    /// Duration of the audio in milliseconds
    pub duration_ms: Option<u64>,
}

impl Transcription {
    /// Create a simple transcription with just text
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: None,
            duration_ms: None,
        }
    }

    /// Set the detected language
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the duration
    #[must_use]
    pub const fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Check if transcription is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Voice parameters for a synthesis request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    /// Voice identifier
    #[serde(default = "default_voice_id")]
    pub voice_id: String,
    /// Speaking style
    #[serde(default = "default_style")]
    pub style: String,
    /// Output container (`MP3`, `WAV`, `FLAC`, `OGG`)
    #[serde(default = "default_format")]
    pub format: String,
    /// Output sample rate in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// `MONO` or `STEREO`
    #[serde(default = "default_channel_type")]
    pub channel_type: String,
    /// Speed adjustment (-50..=50)
    #[serde(default = "default_rate")]
    pub rate: i32,
    /// Pitch adjustment (-50..=50)
    #[serde(default = "default_pitch")]
    pub pitch: i32,
    /// Pause/pitch variation (0..=5)
    #[serde(default = "default_variation")]
    pub variation: u32,
    /// Ask the provider to inline the audio as base64
    #[serde(default = "default_encode_as_base64")]
    pub encode_as_base64: bool,
}

fn default_voice_id() -> String {
    "en-US-natalie".to_string()
}

fn default_style() -> String {
    "empathetic".to_string()
}

fn default_format() -> String {
    "MP3".to_string()
}

const fn default_sample_rate() -> u32 {
    44100
}

fn default_channel_type() -> String {
    "MONO".to_string()
}

const fn default_rate() -> i32 {
    -6
}

const fn default_pitch() -> i32 {
    -5
}

const fn default_variation() -> u32 {
    4
}

const fn default_encode_as_base64() -> bool {
    true
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            voice_id: default_voice_id(),
            style: default_style(),
            format: default_format(),
            sample_rate: default_sample_rate(),
            channel_type: default_channel_type(),
            rate: default_rate(),
            pitch: default_pitch(),
            variation: default_variation(),
            encode_as_base64: default_encode_as_base64(),
        }
    }
}

impl VoiceSettings {
    /// Audio format of the synthesized output
    #[must_use]
    pub fn audio_format(&self) -> AudioFormat {
        AudioFormat::from_extension(&self.format).unwrap_or(AudioFormat::Mp3)
    }
}
