//! Port definitions for speech processing
//!
//! Defines the traits (ports) that speech processing adapters must implement.

use async_trait::async_trait;

use crate::error::SpeechError;
use crate::types::{AudioData, Transcription, VoiceSettings};

/// Port for Speech-to-Text (STT) implementations
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe audio to text
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if the audio is unusable or the provider fails.
    async fn transcribe(&self, audio: AudioData) -> Result<Transcription, SpeechError>;

    /// Name of the STT model
    fn model_name(&self) -> &str;
}

/// Port for Text-to-Speech (TTS) implementations
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Convert text to speech with the given voice
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::SynthesisFailed` if the provider reports failure
    /// or returns no audio.
    async fn synthesize(
        &self,
        text: &str,
        voice: &VoiceSettings,
    ) -> Result<AudioData, SpeechError>;

    /// Voice used when callers have no preference
    fn default_voice(&self) -> &VoiceSettings;
}
