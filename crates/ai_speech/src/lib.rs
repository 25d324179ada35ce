//! AI Speech - Speech-to-Text and Text-to-Speech clients
//!
//! Provides traits and implementations for speech processing:
//! - `SpeechToText` - Transcribe audio to text (STT)
//! - `TextToSpeech` - Synthesize speech from text (TTS)
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` module defines the traits (ports)
//! - `providers` module contains concrete implementations (adapters)
//!
//! # Supported Providers
//!
//! - Whisper-compatible transcription APIs (`/audio/transcriptions`)
//! - Murf text-to-speech (`/v1/speech/generate`)
//!
//! # Example
//!
//! ```ignore
//! use ai_speech::{MurfSpeechProvider, TextToSpeech, VoiceSettings};
//!
//! let murf = MurfSpeechProvider::new(config)?;
//! let audio = murf.synthesize("I'm here for you.", &VoiceSettings::default()).await?;
//! ```

pub mod config;
pub mod error;
pub mod ports;
pub mod providers;
pub mod types;

pub use config::{MurfConfig, WhisperConfig};
pub use error::SpeechError;
pub use ports::{SpeechToText, TextToSpeech};
pub use providers::{murf::MurfSpeechProvider, whisper::WhisperSpeechProvider};
pub use types::{AudioData, AudioFormat, Transcription, VoiceSettings, is_whisper_supported};
