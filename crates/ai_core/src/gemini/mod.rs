//! Gemini `generateContent` client

mod client;
mod wire;

pub use client::GeminiInferenceEngine;
