//! AI Core - Language-model client
//!
//! Provides the [`InferenceEngine`] abstraction and a Gemini
//! `generateContent` implementation used to produce therapist replies.

pub mod config;
pub mod error;
pub mod gemini;
pub mod ports;

pub use config::InferenceConfig;
pub use error::InferenceError;
pub use gemini::GeminiInferenceEngine;
pub use ports::{
    InferenceEngine, InferenceMessage, InferenceRequest, InferenceResponse, InferenceRole,
    TokenUsage,
};
