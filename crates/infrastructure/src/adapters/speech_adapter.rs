//! Speech adapters - Implement the transcription and synthesis ports using
//! ai_speech

use std::sync::Arc;

use ai_speech::{
    AudioData, MurfConfig, MurfSpeechProvider, SpeechError, SpeechToText, TextToSpeech,
    VoiceSettings, WhisperConfig, WhisperSpeechProvider,
};
use application::error::ApplicationError;
use application::ports::{
    ChannelLayout, SynthesisOptions, SynthesisPort, SynthesisResult, TranscriptionPort,
    TranscriptionResult,
};
use async_trait::async_trait;
use domain::AudioFormat;
use tracing::{debug, instrument};

/// Convert Murf voice settings into synthesis options
pub fn synthesis_options(voice: &VoiceSettings) -> SynthesisOptions {
    SynthesisOptions {
        voice: voice.voice_id.clone(),
        style: voice.style.clone(),
        format: voice.audio_format(),
        sample_rate: voice.sample_rate,
        channels: if voice.channel_type.eq_ignore_ascii_case("stereo") {
            ChannelLayout::Stereo
        } else {
            ChannelLayout::Mono
        },
        rate: voice.rate,
        pitch: voice.pitch,
        variation: voice.variation,
        encode_as_base64: voice.encode_as_base64,
    }
}

/// Convert synthesis options into Murf voice settings
pub fn voice_settings(options: &SynthesisOptions) -> VoiceSettings {
    VoiceSettings {
        voice_id: options.voice.clone(),
        style: options.style.clone(),
        format: options.format.extension().to_ascii_uppercase(),
        sample_rate: options.sample_rate,
        channel_type: match options.channels {
            ChannelLayout::Mono => "MONO".to_string(),
            ChannelLayout::Stereo => "STEREO".to_string(),
        },
        rate: options.rate,
        pitch: options.pitch,
        variation: options.variation,
        encode_as_base64: options.encode_as_base64,
    }
}

/// Convert ai_speech error to application error
///
/// `service` names the gateway in timeout errors.
fn map_error(err: SpeechError, service: &'static str) -> ApplicationError {
    match err {
        SpeechError::Configuration(e) => {
            ApplicationError::Internal(format!("Speech configuration: {e}"))
        },
        SpeechError::Timeout(ms) => ApplicationError::Timeout {
            service,
            after_ms: ms,
        },
        SpeechError::SynthesisFailed(e) => ApplicationError::SynthesisFailed(e),
        SpeechError::RateLimited => {
            ApplicationError::Upstream(format!("{service} rate limit exceeded"))
        },
        SpeechError::ConnectionFailed(e) | SpeechError::RequestFailed(e) => {
            ApplicationError::Upstream(e)
        },
        other => ApplicationError::Upstream(other.to_string()),
    }
}

// ==============================
// Transcription (Whisper)
// ==============================

/// Transcription adapter backed by a Whisper-compatible API
pub struct WhisperTranscriptionAdapter {
    provider: Arc<dyn SpeechToText>,
}

impl std::fmt::Debug for WhisperTranscriptionAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperTranscriptionAdapter")
            .field("model", &self.provider.model_name())
            .finish()
    }
}

impl WhisperTranscriptionAdapter {
    const SERVICE: &'static str = "transcription";

    /// Create a new adapter
    pub fn new(config: WhisperConfig) -> Result<Self, ApplicationError> {
        let provider = WhisperSpeechProvider::new(config)
            .map_err(|e| map_error(e, Self::SERVICE))?;
        Ok(Self::with_provider(Arc::new(provider)))
    }

    /// Wrap an existing provider
    pub fn with_provider(provider: Arc<dyn SpeechToText>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl TranscriptionPort for WhisperTranscriptionAdapter {
    #[instrument(skip(self, audio_data), fields(audio_size = audio_data.len(), format = %format))]
    async fn transcribe(
        &self,
        audio_data: Vec<u8>,
        format: AudioFormat,
    ) -> Result<TranscriptionResult, ApplicationError> {
        let transcription = self
            .provider
            .transcribe(AudioData::new(audio_data, format))
            .await
            .map_err(|e| map_error(e, Self::SERVICE))?;

        debug!(
            text_len = transcription.text.len(),
            language = ?transcription.language,
            "Transcription completed"
        );

        Ok(TranscriptionResult {
            text: transcription.text,
            detected_language: transcription.language,
            duration_ms: transcription.duration_ms,
        })
    }
}

// ==============================
// Synthesis (Murf)
// ==============================

/// Synthesis adapter backed by Murf
pub struct MurfSynthesisAdapter {
    provider: Arc<dyn TextToSpeech>,
}

impl std::fmt::Debug for MurfSynthesisAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MurfSynthesisAdapter")
            .field("voice", &self.provider.default_voice().voice_id)
            .finish()
    }
}

impl MurfSynthesisAdapter {
    const SERVICE: &'static str = "speech synthesis";

    /// Create a new adapter
    pub fn new(config: MurfConfig) -> Result<Self, ApplicationError> {
        let provider =
            MurfSpeechProvider::new(config).map_err(|e| map_error(e, Self::SERVICE))?;
        Ok(Self::with_provider(Arc::new(provider)))
    }

    /// Wrap an existing provider
    pub fn with_provider(provider: Arc<dyn TextToSpeech>) -> Self {
        Self { provider }
    }

    /// Options matching the provider's configured voice
    pub fn default_options(&self) -> SynthesisOptions {
        synthesis_options(self.provider.default_voice())
    }
}

#[async_trait]
impl SynthesisPort for MurfSynthesisAdapter {
    #[instrument(skip(self, text, options), fields(text_len = text.len(), voice = %options.voice))]
    async fn synthesize(
        &self,
        text: &str,
        options: &SynthesisOptions,
    ) -> Result<SynthesisResult, ApplicationError> {
        let voice = voice_settings(options);
        let audio = self
            .provider
            .synthesize(text, &voice)
            .await
            .map_err(|e| map_error(e, Self::SERVICE))?;

        debug!(audio_size = audio.size_bytes(), "Synthesis completed");

        let format = audio.format();
        Ok(SynthesisResult {
            audio_data: audio.into_data(),
            format,
        })
    }
}
