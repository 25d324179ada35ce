//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the Gemini, Whisper
//! and Murf provider adapters and the filesystem audio store. Also owns
//! configuration loading, logging setup and the startup composition root.

pub mod adapters;
pub mod clients;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use clients::Clients;
pub use config::{
    AppConfig, Environment, InferenceAppConfig, LogFormat, MurfAppConfig, ServerConfig,
    SpeechAppConfig, StorageConfig, TimeoutsConfig, WhisperAppConfig,
};
pub use telemetry::{DEFAULT_LOG_FILTER, LoggingConfig, TelemetryError, init_logging};
