//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod fs_audio_store;
mod gemini_inference_adapter;
mod speech_adapter;

pub use fs_audio_store::FsAudioStore;
pub use gemini_inference_adapter::GeminiInferenceAdapter;
pub use speech_adapter::{
    MurfSynthesisAdapter, WhisperTranscriptionAdapter, synthesis_options, voice_settings,
};
