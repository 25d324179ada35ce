//! Integration tests for the infrastructure crate
//!
//! Wires real provider clients, built from configuration, against mocked
//! Gemini, Whisper and Murf HTTP APIs and a temporary audio directory.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use domain::{ChatSubmission, ConversationTurn, RequestId};
use infrastructure::{AppConfig, Clients};
use secrecy::SecretString;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/models/gemini-2.0-flash:generateContent";

fn gemini_reply(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {
            "promptTokenCount": 10,
            "candidatesTokenCount": 5,
            "totalTokenCount": 15
        }
    })
}

/// Configuration pointing every provider at `server`
fn config_for(server: &MockServer, dir: &TempDir) -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.audio_dir = dir.path().join("audios").display().to_string();

    config.inference.api_key = Some(SecretString::from("gemini-key"));
    config.inference.base_url = server.uri();
    config.inference.timeout_ms = 5000;

    config.speech.whisper.api_key = Some(SecretString::from("stt-key"));
    config.speech.whisper.base_url = server.uri();
    config.speech.whisper.timeout_ms = 5000;

    config.speech.murf.api_key = Some(SecretString::from("murf-key"));
    config.speech.murf.base_url = server.uri();
    config.speech.murf.timeout_ms = 5000;

    config
}

fn submission(dtype: &str, message: &str, history: Vec<ConversationTurn>) -> ChatSubmission {
    ChatSubmission {
        dtype: Some(dtype.to_string()),
        user_message: Some(message.to_string()),
        history,
    }
}

// ============================================================================
// Text chat
// ============================================================================

mod text_chat_tests {
    use super::*;

    #[tokio::test]
    async fn text_reply_from_gemini() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header("x-goog-api-key", "gemini-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("I hear you.")))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&server, &dir);
        let pipeline = Clients::init(&config).pipeline(&config);

        let response = pipeline
            .handle(submission("message", "Hello", Vec::new()), RequestId::new())
            .await
            .unwrap();

        assert_eq!(response.content, "I hear you.");
        assert!(response.audio_filepath.is_none());
    }

    #[tokio::test]
    async fn configured_system_prompt_is_sent() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(body_partial_json(serde_json::json!({
                "systemInstruction": {"parts": [{"text": "Be gentle"}]}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("ok")))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = config_for(&server, &dir);
        config.inference.system_prompt = Some("Be gentle".to_string());
        let pipeline = Clients::init(&config).pipeline(&config);

        let history = vec![
            ConversationTurn::user("A"),
            ConversationTurn::assistant("B"),
        ];
        let response = pipeline
            .handle(submission("message", "C", history), RequestId::new())
            .await;
        assert!(response.is_ok());
    }

    #[tokio::test]
    async fn provider_error_is_generation_failure() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let config = config_for(&server, &dir);
        let pipeline = Clients::init(&config).pipeline(&config);

        let err = pipeline
            .handle(submission("message", "Hello", Vec::new()), RequestId::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "response generation failed");
    }
}

// ============================================================================
// Audio chat
// ============================================================================

mod audio_chat_tests {
    use super::*;

    async fn mount_speech(server: &MockServer, reply_audio: &[u8]) {
        Mock::given(method("POST"))
            .and(path("/audio/transcriptions"))
            .and(header("Authorization", "Bearer stt-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "text": " I can't sleep. ",
                "language": "en"
            })))
            .expect(1)
            .mount(server)
            .await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("Let's breathe.")))
            .expect(1)
            .mount(server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/speech/generate"))
            .and(header("api-key", "murf-key"))
            .and(body_partial_json(serde_json::json!({"text": "Let's breathe."})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "encodedAudio": STANDARD.encode(reply_audio)
            })))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn upload_transcribe_reply_and_speak() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let reply_audio = [0xFF_u8, 0xFB, 0x90, 0x00];
        mount_speech(&server, &reply_audio).await;

        let config = config_for(&server, &dir);
        let clients = Clients::init(&config);
        let pipeline = clients.pipeline(&config);
        let audio = clients.audio_service();

        let upload_id = RequestId::new();
        let reference = audio
            .store_upload(b"user voice", domain::AudioFormat::Webm, upload_id)
            .await
            .unwrap();

        let request_id = RequestId::new();
        let response = pipeline
            .handle(submission("audio", &reference, Vec::new()), request_id)
            .await
            .unwrap();

        assert_eq!(response.transcribed_text.as_deref(), Some("I can't sleep."));
        assert_eq!(response.content, "Let's breathe.");

        let reply_path = response.audio_filepath.unwrap();
        assert_eq!(reply_path, format!("audios/reply-{request_id}.mp3"));

        let stored = audio.fetch(&reply_path).await.unwrap();
        assert_eq!(stored.data, reply_audio);
    }

    #[tokio::test]
    async fn missing_upload_makes_no_provider_calls() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let config = config_for(&server, &dir);
        let pipeline = Clients::init(&config).pipeline(&config);

        let err = pipeline
            .handle(
                submission("audio", "/path/not_exists.mp3", Vec::new()),
                RequestId::new(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Audio file not found");
    }

    #[tokio::test]
    async fn murf_failure_is_synthesis_failure() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("POST"))
            .and(path("/audio/transcriptions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": "hi"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("hello")))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/speech/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let config = config_for(&server, &dir);
        let clients = Clients::init(&config);
        let reference = clients
            .audio_service()
            .store_upload(b"voice", domain::AudioFormat::Mp3, RequestId::new())
            .await
            .unwrap();

        let err = clients
            .pipeline(&config)
            .handle(submission("audio", &reference, Vec::new()), RequestId::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "synthesis failed");
    }
}
