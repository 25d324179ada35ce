//! Request pipeline - validates a chat request and sequences the gateway
//! calls that answer it
//!
//! - `message`: orchestrator only
//! - `audio`: transcription → orchestrator → synthesis
//!
//! A failing stage aborts the request; earlier results are discarded.

use std::time::Instant;

use domain::{ChatKind, ChatRequest, ChatResponse, ChatSubmission, RequestId, user_utterances};
use tracing::{info, instrument, warn};

use super::{ConversationOrchestrator, SpeechSynthesisGateway, TranscriptionGateway};
use crate::error::{ApplicationError, PipelineError, PipelineStage};

/// Per-request composition of the three gateways
///
/// Holds no state between requests; history arrives with every call.
#[derive(Debug, Clone)]
pub struct RequestPipeline {
    orchestrator: ConversationOrchestrator,
    transcription: TranscriptionGateway,
    synthesis: SpeechSynthesisGateway,
}

impl RequestPipeline {
    /// Create a new pipeline
    pub const fn new(
        orchestrator: ConversationOrchestrator,
        transcription: TranscriptionGateway,
        synthesis: SpeechSynthesisGateway,
    ) -> Self {
        Self {
            orchestrator,
            transcription,
            synthesis,
        }
    }

    /// Language-model gateway
    pub const fn orchestrator(&self) -> &ConversationOrchestrator {
        &self.orchestrator
    }

    /// Speech-to-text gateway
    pub const fn transcription(&self) -> &TranscriptionGateway {
        &self.transcription
    }

    /// Text-to-speech gateway
    pub const fn synthesis(&self) -> &SpeechSynthesisGateway {
        &self.synthesis
    }

    /// Validate and answer one chat submission
    ///
    /// Validation failures return before any gateway is called.
    #[instrument(skip(self, submission), fields(request_id = %request_id))]
    pub async fn handle(
        &self,
        submission: ChatSubmission,
        request_id: RequestId,
    ) -> Result<ChatResponse, PipelineError> {
        let request = ChatRequest::try_from(submission).map_err(|e| {
            info!(error = %e, "Rejected chat request");
            PipelineError::Validation(e)
        })?;

        let started = Instant::now();
        let response = match request.kind() {
            ChatKind::Message => self.answer_text(&request).await,
            ChatKind::Audio => self.answer_audio(&request, request_id).await,
        }?;

        info!(
            kind = %request.kind(),
            elapsed_ms = started.elapsed().as_millis(),
            "Chat request answered"
        );
        Ok(response)
    }

    async fn answer_text(&self, request: &ChatRequest) -> Result<ChatResponse, PipelineError> {
        let reply = self
            .generate(request.history(), request.user_message())
            .await?;
        Ok(ChatResponse::message(reply))
    }

    async fn answer_audio(
        &self,
        request: &ChatRequest,
        request_id: RequestId,
    ) -> Result<ChatResponse, PipelineError> {
        info!("Transcribing user audio");
        let transcribed = self
            .transcription
            .transcribe(request.user_message())
            .await
            .map_err(|e| match e {
                ApplicationError::NotFound(reference) => {
                    warn!(reference = %reference, "Referenced audio not found");
                    PipelineError::AudioNotFound(reference)
                },
                other => stage_failure(PipelineStage::Transcription, other),
            })?;

        let reply = self.generate(request.history(), &transcribed).await?;

        info!("Synthesizing reply audio");
        let audio_filepath = self
            .synthesis
            .synthesize(&reply, request_id)
            .await
            .map_err(|e| stage_failure(PipelineStage::Synthesis, e))?;

        Ok(ChatResponse::audio(reply, audio_filepath, transcribed))
    }

    async fn generate(
        &self,
        history: &[domain::ConversationTurn],
        current: &str,
    ) -> Result<String, PipelineError> {
        let turns = user_utterances(history, current);
        info!(turns = turns.len(), "Generating reply");
        self.orchestrator
            .reply(&turns)
            .await
            .map_err(|e| stage_failure(PipelineStage::Generation, e))
    }
}

fn stage_failure(stage: PipelineStage, source: ApplicationError) -> PipelineError {
    warn!(stage = stage.as_str(), error = %source, "Pipeline stage failed");
    PipelineError::stage(stage, source)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use domain::{AudioFormat, AudioKey, ConversationTurn, DomainError};

    use super::*;
    use crate::ports::{
        InferenceResult, MockInferencePort, MockSynthesisPort, MockTranscriptionPort,
        SynthesisResult, TranscriptionResult,
    };
    use crate::services::memory_store::InMemoryAudioStore;

    fn inference_result(content: &str) -> InferenceResult {
        InferenceResult {
            content: content.to_string(),
            model: "test-model".to_string(),
            tokens_used: None,
            latency_ms: 5,
        }
    }

    fn submission(dtype: Option<&str>, message: Option<&str>) -> ChatSubmission {
        ChatSubmission {
            dtype: dtype.map(ToString::to_string),
            user_message: message.map(ToString::to_string),
            history: Vec::new(),
        }
    }

    /// Mocks that fail the test if called
    fn untouched_pipeline() -> RequestPipeline {
        let mut inference = MockInferencePort::new();
        inference.expect_generate_with_context().times(0);
        inference.expect_current_model().times(0);
        let mut stt = MockTranscriptionPort::new();
        stt.expect_transcribe().times(0);
        let mut tts = MockSynthesisPort::new();
        tts.expect_synthesize().times(0);

        let store = Arc::new(InMemoryAudioStore::default());
        RequestPipeline::new(
            ConversationOrchestrator::new(Arc::new(inference)),
            TranscriptionGateway::new(Some(Arc::new(stt)), store.clone()),
            SpeechSynthesisGateway::new(Some(Arc::new(tts)), store),
        )
    }

    /// Inference mock that answers with the last user turn, upper-cased
    fn echo_inference() -> MockInferencePort {
        let mut inference = MockInferencePort::new();
        inference
            .expect_current_model()
            .returning(|| "test-model".to_string());
        inference.expect_generate_with_context().returning(|conv| {
            let last = conv
                .last_turn()
                .map(|t| t.content.to_uppercase())
                .unwrap_or_default();
            Ok(inference_result(&last))
        });
        inference
    }

    /// STT mock that "transcribes" by reading the bytes as UTF-8
    fn echo_stt() -> MockTranscriptionPort {
        let mut stt = MockTranscriptionPort::new();
        stt.expect_transcribe().returning(|data, _| {
            Ok(TranscriptionResult {
                text: String::from_utf8_lossy(&data).into_owned(),
                detected_language: None,
                duration_ms: None,
            })
        });
        stt
    }

    /// TTS mock that "speaks" by returning the text bytes
    fn echo_tts() -> MockSynthesisPort {
        let mut tts = MockSynthesisPort::new();
        tts.expect_synthesize().returning(|text, _| {
            Ok(SynthesisResult {
                audio_data: text.as_bytes().to_vec(),
                format: AudioFormat::Mp3,
            })
        });
        tts
    }

    fn echo_pipeline(store: Arc<InMemoryAudioStore>) -> RequestPipeline {
        RequestPipeline::new(
            ConversationOrchestrator::new(Arc::new(echo_inference())),
            TranscriptionGateway::new(Some(Arc::new(echo_stt())), store.clone()),
            SpeechSynthesisGateway::new(Some(Arc::new(echo_tts())), store),
        )
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn missing_dtype_makes_no_gateway_calls() {
        let err = untouched_pipeline()
            .handle(submission(None, Some("hi")), RequestId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Validation(DomainError::InvalidChatKind(None))));
    }

    #[tokio::test]
    async fn unknown_dtype_makes_no_gateway_calls() {
        let err = untouched_pipeline()
            .handle(submission(Some("video"), Some("hi")), RequestId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Validation(DomainError::InvalidChatKind(_))));
    }

    #[tokio::test]
    async fn blank_message_makes_no_gateway_calls() {
        for message in [None, Some(""), Some("   \t")] {
            let err = untouched_pipeline()
                .handle(submission(Some("audio"), message), RequestId::new())
                .await
                .unwrap_err();
            assert!(matches!(err, PipelineError::Validation(DomainError::MissingMessage)));
        }
    }

    // ------------------------------------------------------------------
    // Message mode
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn message_calls_orchestrator_once_with_single_turn() {
        let mut inference = MockInferencePort::new();
        inference
            .expect_current_model()
            .returning(|| "test-model".to_string());
        inference
            .expect_generate_with_context()
            .withf(|conv| conv.turns.len() == 1 && conv.turns[0].content == "Hello")
            .times(1)
            .returning(|_| Ok(inference_result("Hi, how are you feeling?")));
        let mut stt = MockTranscriptionPort::new();
        stt.expect_transcribe().times(0);
        let mut tts = MockSynthesisPort::new();
        tts.expect_synthesize().times(0);

        let store = Arc::new(InMemoryAudioStore::default());
        let pipeline = RequestPipeline::new(
            ConversationOrchestrator::new(Arc::new(inference)),
            TranscriptionGateway::new(Some(Arc::new(stt)), store.clone()),
            SpeechSynthesisGateway::new(Some(Arc::new(tts)), store),
        );

        let response = pipeline
            .handle(submission(Some("message"), Some("Hello")), RequestId::new())
            .await
            .unwrap();

        assert_eq!(response.kind, ChatKind::Message);
        assert_eq!(response.content, "Hi, how are you feeling?");
        assert!(response.audio_filepath.is_none());
        assert!(response.transcribed_text.is_none());
    }

    #[tokio::test]
    async fn history_assistant_turns_are_dropped() {
        let mut inference = MockInferencePort::new();
        inference
            .expect_current_model()
            .returning(|| "test-model".to_string());
        inference
            .expect_generate_with_context()
            .withf(|conv| {
                let contents: Vec<&str> = conv.turns.iter().map(|t| t.content.as_str()).collect();
                contents == ["A", "C"]
            })
            .times(1)
            .returning(|_| Ok(inference_result("ok")));

        let store = Arc::new(InMemoryAudioStore::default());
        let pipeline = RequestPipeline::new(
            ConversationOrchestrator::new(Arc::new(inference)),
            TranscriptionGateway::new(None, store.clone()),
            SpeechSynthesisGateway::new(None, store),
        );

        let mut sub = submission(Some("message"), Some("C"));
        sub.history = vec![ConversationTurn::user("A"), ConversationTurn::assistant("B")];
        assert!(pipeline.handle(sub, RequestId::new()).await.is_ok());
    }

    #[tokio::test]
    async fn orchestrator_failure_is_generation_stage() {
        let mut inference = MockInferencePort::new();
        inference
            .expect_current_model()
            .returning(|| "test-model".to_string());
        inference
            .expect_generate_with_context()
            .returning(|_| Err(ApplicationError::Upstream("503".into())));

        let store = Arc::new(InMemoryAudioStore::default());
        let pipeline = RequestPipeline::new(
            ConversationOrchestrator::new(Arc::new(inference)),
            TranscriptionGateway::new(None, store.clone()),
            SpeechSynthesisGateway::new(None, store),
        );

        let err = pipeline
            .handle(submission(Some("message"), Some("Hello")), RequestId::new())
            .await
            .unwrap_err();
        assert_eq!(err.failed_stage(), Some(PipelineStage::Generation));
        assert_eq!(err.to_string(), "response generation failed");
    }

    #[tokio::test]
    async fn unconfigured_orchestrator_is_generation_stage() {
        let store = Arc::new(InMemoryAudioStore::default());
        let pipeline = RequestPipeline::new(
            ConversationOrchestrator::unconfigured(),
            TranscriptionGateway::new(None, store.clone()),
            SpeechSynthesisGateway::new(None, store),
        );

        let err = pipeline
            .handle(submission(Some("message"), Some("Hello")), RequestId::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Stage {
                stage: PipelineStage::Generation,
                source: ApplicationError::NotConfigured(_)
            }
        ));
    }

    // ------------------------------------------------------------------
    // Audio mode
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn audio_runs_all_three_stages() {
        let store = Arc::new(InMemoryAudioStore::default());
        store.insert("upload-a.webm", b"i feel low").await;
        let pipeline = echo_pipeline(store.clone());
        let id = RequestId::new();

        let response = pipeline
            .handle(submission(Some("audio"), Some("audios/upload-a.webm")), id)
            .await
            .unwrap();

        assert_eq!(response.kind, ChatKind::Audio);
        assert_eq!(response.transcribed_text.as_deref(), Some("i feel low"));
        assert_eq!(response.content, "I FEEL LOW");
        let key = AudioKey::reply(id, AudioFormat::Mp3);
        assert_eq!(response.audio_filepath.as_deref(), Some(key.public_path().as_str()));
        assert_eq!(store.get(&key.file_name()).await.as_deref(), Some(&b"I FEEL LOW"[..]));
    }

    #[tokio::test]
    async fn missing_audio_stops_before_orchestrator() {
        let mut inference = MockInferencePort::new();
        inference.expect_generate_with_context().times(0);
        let mut stt = MockTranscriptionPort::new();
        stt.expect_transcribe().times(0);
        let mut tts = MockSynthesisPort::new();
        tts.expect_synthesize().times(0);

        let store = Arc::new(InMemoryAudioStore::default());
        let pipeline = RequestPipeline::new(
            ConversationOrchestrator::new(Arc::new(inference)),
            TranscriptionGateway::new(Some(Arc::new(stt)), store.clone()),
            SpeechSynthesisGateway::new(Some(Arc::new(tts)), store),
        );

        let err = pipeline
            .handle(
                submission(Some("audio"), Some("/path/not_exists.mp3")),
                RequestId::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::AudioNotFound(_)));
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn transcription_failure_skips_later_stages() {
        let mut inference = MockInferencePort::new();
        inference.expect_generate_with_context().times(0);
        let mut stt = MockTranscriptionPort::new();
        stt.expect_transcribe()
            .returning(|_, _| Err(ApplicationError::Upstream("stt down".into())));
        let mut tts = MockSynthesisPort::new();
        tts.expect_synthesize().times(0);

        let store = Arc::new(InMemoryAudioStore::default());
        store.insert("in.mp3", b"x").await;
        let pipeline = RequestPipeline::new(
            ConversationOrchestrator::new(Arc::new(inference)),
            TranscriptionGateway::new(Some(Arc::new(stt)), store.clone()),
            SpeechSynthesisGateway::new(Some(Arc::new(tts)), store),
        );

        let err = pipeline
            .handle(submission(Some("audio"), Some("in.mp3")), RequestId::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "transcription failed");
    }

    #[tokio::test]
    async fn synthesis_failure_discards_reply() {
        let mut tts = MockSynthesisPort::new();
        tts.expect_synthesize()
            .times(1)
            .returning(|_, _| Err(ApplicationError::SynthesisFailed("no audio".into())));

        let store = Arc::new(InMemoryAudioStore::default());
        store.insert("in.mp3", b"hello").await;
        let pipeline = RequestPipeline::new(
            ConversationOrchestrator::new(Arc::new(echo_inference())),
            TranscriptionGateway::new(Some(Arc::new(echo_stt())), store.clone()),
            SpeechSynthesisGateway::new(Some(Arc::new(tts)), store.clone()),
        );

        let err = pipeline
            .handle(submission(Some("audio"), Some("in.mp3")), RequestId::new())
            .await
            .unwrap_err();
        assert_eq!(err.failed_stage(), Some(PipelineStage::Synthesis));
        assert_eq!(err.to_string(), "synthesis failed");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn concurrent_audio_requests_get_their_own_audio() {
        let store = Arc::new(InMemoryAudioStore::default());
        store.insert("upload-one.mp3", b"first voice").await;
        store.insert("upload-two.mp3", b"second voice").await;
        let pipeline = echo_pipeline(store.clone());

        let (one, two) = tokio::join!(
            pipeline.handle(
                submission(Some("audio"), Some("audios/upload-one.mp3")),
                RequestId::new()
            ),
            pipeline.handle(
                submission(Some("audio"), Some("audios/upload-two.mp3")),
                RequestId::new()
            ),
        );
        let (one, two) = (one.unwrap(), two.unwrap());

        let path_one = one.audio_filepath.unwrap();
        let path_two = two.audio_filepath.unwrap();
        assert_ne!(path_one, path_two);

        let name_one = domain::reference_file_name(&path_one).unwrap();
        let name_two = domain::reference_file_name(&path_two).unwrap();
        assert_eq!(store.get(name_one).await.unwrap(), b"FIRST VOICE");
        assert_eq!(store.get(name_two).await.unwrap(), b"SECOND VOICE");
    }
}
