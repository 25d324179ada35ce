//! Health aggregation service
//!
//! Reports which gateways have a client. No provider is contacted; a
//! gateway is `available` when its credentials produced a client at startup.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::RequestPipeline;

/// Timestamp layout used in health reports
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Availability of a single gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    /// The gateway has a client
    Available,
    /// The gateway is not configured
    Unavailable,
}

impl From<bool> for ServiceStatus {
    fn from(available: bool) -> Self {
        if available {
            Self::Available
        } else {
            Self::Unavailable
        }
    }
}

/// Per-gateway availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicesHealth {
    /// Language-model gateway
    pub orchestrator: ServiceStatus,
    /// Transcription gateway
    pub speech_to_text: ServiceStatus,
    /// Speech synthesis gateway
    pub text_to_speech: ServiceStatus,
}

impl ServicesHealth {
    /// Whether every gateway is available
    #[must_use]
    pub fn all_available(&self) -> bool {
        [self.orchestrator, self.speech_to_text, self.text_to_speech]
            .iter()
            .all(|s| *s == ServiceStatus::Available)
    }
}

/// Health report returned by `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    /// Always `healthy` while the process serves requests
    pub status: String,
    /// Current UTC time, `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,
    /// Gateway availability
    pub services: ServicesHealth,
}

/// Health check service
#[derive(Debug, Clone, Copy)]
pub struct HealthService {
    services: ServicesHealth,
}

impl HealthService {
    /// Create from explicit gateway availability
    pub const fn new(orchestrator: bool, speech_to_text: bool, text_to_speech: bool) -> Self {
        Self {
            services: ServicesHealth {
                orchestrator: if orchestrator {
                    ServiceStatus::Available
                } else {
                    ServiceStatus::Unavailable
                },
                speech_to_text: if speech_to_text {
                    ServiceStatus::Available
                } else {
                    ServiceStatus::Unavailable
                },
                text_to_speech: if text_to_speech {
                    ServiceStatus::Available
                } else {
                    ServiceStatus::Unavailable
                },
            },
        }
    }

    /// Derive availability from the pipeline's gateways
    pub fn for_pipeline(pipeline: &RequestPipeline) -> Self {
        Self {
            services: ServicesHealth {
                orchestrator: pipeline.orchestrator().is_available().into(),
                speech_to_text: pipeline.transcription().is_available().into(),
                text_to_speech: pipeline.synthesis().is_available().into(),
            },
        }
    }

    /// Gateway availability
    pub const fn services(&self) -> ServicesHealth {
        self.services
    }

    /// Build a health report
    pub fn check(&self) -> HealthReport {
        debug!(services = ?self.services, "Health check");
        HealthReport {
            status: "healthy".to_string(),
            timestamp: Utc::now().format(TIMESTAMP_FORMAT).to_string(),
            services: self.services,
        }
    }
}
