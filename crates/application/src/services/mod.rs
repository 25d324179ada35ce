//! Application services - Use case implementations

mod audio_service;
mod conversation_orchestrator;
mod health_service;
#[cfg(test)]
mod memory_store;
mod request_pipeline;
mod speech_synthesis_gateway;
mod transcription_gateway;

pub use audio_service::AudioService;
pub use conversation_orchestrator::{
    ConversationOrchestrator, DEFAULT_GENERATION_TIMEOUT, DEFAULT_SYSTEM_PROMPT,
};
pub use health_service::{HealthReport, HealthService, ServiceStatus, ServicesHealth};
pub use request_pipeline::RequestPipeline;
pub use speech_synthesis_gateway::{DEFAULT_SYNTHESIS_TIMEOUT, SpeechSynthesisGateway};
pub use transcription_gateway::{DEFAULT_TRANSCRIPTION_TIMEOUT, TranscriptionGateway};
