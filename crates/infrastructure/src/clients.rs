//! Composition root
//!
//! Builds one client per provider from the loaded configuration. A provider
//! whose credentials are missing or whose client fails to build is left as
//! `None`; the matching gateway then reports `NotConfigured` instead of
//! taking the process down.

use std::sync::Arc;

use application::{
    ApplicationError, AudioService, ConversationOrchestrator, HealthService, RequestPipeline,
    SpeechSynthesisGateway, SynthesisOptions, TranscriptionGateway,
    ports::{AudioStorePort, InferencePort, SynthesisPort, TranscriptionPort},
};
use tracing::{info, warn};

use crate::adapters::{
    FsAudioStore, GeminiInferenceAdapter, MurfSynthesisAdapter, WhisperTranscriptionAdapter,
    synthesis_options,
};
use crate::config::AppConfig;

/// Provider clients and the audio store, created once at startup
#[derive(Clone)]
pub struct Clients {
    /// Language-model client
    pub inference: Option<Arc<dyn InferencePort>>,
    /// Speech-to-text client
    pub transcription: Option<Arc<dyn TranscriptionPort>>,
    /// Text-to-speech client
    pub synthesis: Option<Arc<dyn SynthesisPort>>,
    /// Default voice for replies
    pub voice: SynthesisOptions,
    /// Uploaded and synthesized audio
    pub audio_store: Arc<dyn AudioStorePort>,
}

impl std::fmt::Debug for Clients {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clients")
            .field("inference", &self.inference.is_some())
            .field("transcription", &self.transcription.is_some())
            .field("synthesis", &self.synthesis.is_some())
            .field("voice", &self.voice.voice)
            .finish_non_exhaustive()
    }
}

/// Log the outcome of building one provider client
fn report<T>(name: &str, built: Option<Result<T, ApplicationError>>) -> Option<T> {
    match built {
        Some(Ok(client)) => {
            info!(gateway = name, "Gateway initialized");
            Some(client)
        },
        Some(Err(e)) => {
            warn!(gateway = name, error = %e, "Gateway initialization failed");
            None
        },
        None => {
            warn!(gateway = name, "No credentials configured, gateway disabled");
            None
        },
    }
}

impl Clients {
    /// Build all clients from configuration
    pub fn init(config: &AppConfig) -> Self {
        let inference = report(
            "orchestrator",
            config
                .inference
                .to_inference_config()
                .map(GeminiInferenceAdapter::new),
        )
        .map(|a| Arc::new(a) as Arc<dyn InferencePort>);

        let transcription = report(
            "speech_to_text",
            config
                .speech
                .whisper
                .to_whisper_config()
                .map(WhisperTranscriptionAdapter::new),
        )
        .map(|a| Arc::new(a) as Arc<dyn TranscriptionPort>);

        let synthesis = report(
            "text_to_speech",
            config
                .speech
                .murf
                .to_murf_config()
                .map(MurfSynthesisAdapter::new),
        )
        .map(|a| Arc::new(a) as Arc<dyn SynthesisPort>);

        let audio_store = Arc::new(FsAudioStore::new(&config.storage.audio_dir));
        info!(dir = %config.storage.audio_dir, "Audio store ready");

        Self {
            inference,
            transcription,
            synthesis,
            voice: synthesis_options(&config.speech.murf.voice),
            audio_store,
        }
    }

    /// Request pipeline with the configured system prompt and timeouts
    pub fn pipeline(&self, config: &AppConfig) -> RequestPipeline {
        let mut orchestrator = ConversationOrchestrator::from_option(self.inference.clone())
            .with_timeout(config.timeouts.generation());
        if let Some(prompt) = &config.inference.system_prompt {
            orchestrator = orchestrator.with_system_prompt(prompt.clone());
        }

        let transcription =
            TranscriptionGateway::new(self.transcription.clone(), Arc::clone(&self.audio_store))
                .with_timeout(config.timeouts.transcription());

        let synthesis =
            SpeechSynthesisGateway::new(self.synthesis.clone(), Arc::clone(&self.audio_store))
                .with_options(self.voice.clone())
                .with_timeout(config.timeouts.synthesis());

        RequestPipeline::new(orchestrator, transcription, synthesis)
    }

    /// Upload and download service over the audio store
    pub fn audio_service(&self) -> AudioService {
        AudioService::new(Arc::clone(&self.audio_store))
    }

    /// Health service reflecting which clients were built
    pub fn health(&self) -> HealthService {
        HealthService::new(
            self.inference.is_some(),
            self.transcription.is_some(),
            self.synthesis.is_some(),
        )
    }
}

#[cfg(test)]
mod tests {
    use application::ServiceStatus;
    use secrecy::SecretString;

    use super::*;

    fn config_in(dir: &tempfile::TempDir) -> AppConfig {
        let mut config = AppConfig::default();
        config.storage.audio_dir = dir.path().join("audios").display().to_string();
        config
    }

    #[test]
    fn missing_credentials_leave_gateways_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let clients = Clients::init(&config_in(&dir));

        assert!(clients.inference.is_none());
        assert!(clients.transcription.is_none());
        assert!(clients.synthesis.is_none());

        let services = clients.health().services();
        assert_eq!(services.orchestrator, ServiceStatus::Unavailable);
        assert_eq!(services.text_to_speech, ServiceStatus::Unavailable);
    }

    #[test]
    fn credentials_enable_gateways() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(&dir);
        config.inference.api_key = Some(SecretString::from("gemini"));
        config.speech.murf.api_key = Some(SecretString::from("murf"));

        let clients = Clients::init(&config);
        assert!(clients.inference.is_some());
        assert!(clients.synthesis.is_some());
        assert!(clients.transcription.is_none());

        let pipeline = clients.pipeline(&config);
        assert!(pipeline.orchestrator().is_available());
        assert!(pipeline.synthesis().is_available());
        assert!(!pipeline.transcription().is_available());
        assert_eq!(
            HealthService::for_pipeline(&pipeline).services(),
            clients.health().services()
        );
    }

    #[test]
    fn voice_comes_from_murf_settings() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(&dir);
        config.speech.murf.voice.style = "calm".to_string();

        let clients = Clients::init(&config);
        assert_eq!(clients.voice.style, "calm");
        assert_eq!(clients.pipeline(&config).synthesis().options().style, "calm");
    }

    #[tokio::test]
    async fn unconfigured_pipeline_reports_generation_failure() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let pipeline = Clients::init(&config).pipeline(&config);

        let err = pipeline
            .handle(
                domain::ChatSubmission {
                    dtype: Some("message".to_string()),
                    user_message: Some("Hello".to_string()),
                    history: Vec::new(),
                },
                domain::RequestId::new(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "response generation failed");
    }
}
