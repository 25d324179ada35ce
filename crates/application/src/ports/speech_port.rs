//! Speech ports - Interfaces for speech-to-text and text-to-speech

use async_trait::async_trait;
use domain::AudioFormat;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Result of a transcription operation
#[derive(Debug, Clone)]
pub struct TranscriptionResult {
    /// Transcribed text
    pub text: String,
    /// Detected language code (e.g., "en", "de")
    pub detected_language: Option<String>,
    /// Duration of audio in milliseconds
    pub duration_ms: Option<u64>,
}

/// Result of a speech synthesis operation
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    /// Generated audio data
    pub audio_data: Vec<u8>,
    /// Format of the audio
    pub format: AudioFormat,
}

/// Output channel layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelLayout {
    /// Single channel
    #[default]
    Mono,
    /// Two channels
    Stereo,
}

/// Voice and encoding parameters for a synthesis request
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisOptions {
    /// Voice identifier
    pub voice: String,
    /// Speaking style
    pub style: String,
    /// Output format
    pub format: AudioFormat,
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Channel layout
    pub channels: ChannelLayout,
    /// Speed adjustment
    pub rate: i32,
    /// Pitch adjustment
    pub pitch: i32,
    /// Pause/pitch variation
    pub variation: u32,
    /// Ask the provider to inline the audio as base64
    pub encode_as_base64: bool,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            voice: "en-US-natalie".to_string(),
            style: "empathetic".to_string(),
            format: AudioFormat::Mp3,
            sample_rate: 44100,
            channels: ChannelLayout::Mono,
            rate: -6,
            pitch: -5,
            variation: 4,
            encode_as_base64: true,
        }
    }
}

/// Port for speech-to-text
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TranscriptionPort: Send + Sync {
    /// Transcribe audio bytes to text
    async fn transcribe(
        &self,
        audio_data: Vec<u8>,
        format: AudioFormat,
    ) -> Result<TranscriptionResult, ApplicationError>;
}

/// Port for text-to-speech
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SynthesisPort: Send + Sync {
    /// Synthesize speech for `text`
    async fn synthesize(
        &self,
        text: &str,
        options: &SynthesisOptions,
    ) -> Result<SynthesisResult, ApplicationError>;
}
