//! Application state shared across handlers

use std::sync::Arc;

use application::{AudioService, HealthService, RequestPipeline};
use infrastructure::{AppConfig, Clients};

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Chat request sequencing
    pub pipeline: Arc<RequestPipeline>,
    /// Upload and download of stored audio
    pub audio: Arc<AudioService>,
    /// Gateway availability
    pub health: HealthService,
    /// Largest accepted upload, in bytes
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Build the state from initialized clients
    pub fn from_clients(clients: &Clients, config: &AppConfig) -> Self {
        let pipeline = clients.pipeline(config);
        Self {
            health: HealthService::for_pipeline(&pipeline),
            pipeline: Arc::new(pipeline),
            audio: Arc::new(clients.audio_service()),
            max_upload_bytes: config.server.max_upload_bytes,
        }
    }

    /// Build the state from a pipeline and audio service
    pub fn new(pipeline: RequestPipeline, audio: AudioService, max_upload_bytes: usize) -> Self {
        Self {
            health: HealthService::for_pipeline(&pipeline),
            pipeline: Arc::new(pipeline),
            audio: Arc::new(audio),
            max_upload_bytes,
        }
    }
}
