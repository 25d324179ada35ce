//! Resilience configuration: per-gateway time limits and audio storage.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ==============================
// Gateway Timeouts
// ==============================

/// Per-gateway call limits in seconds
///
/// These bound the provider call made by each gateway. Reading stored audio
/// happens before the limit starts, so a missing file is reported as such.
/// Provider HTTP clients carry their own request timeout on top.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    /// Speech-to-text limit (default: 30s)
    #[serde(default = "default_transcription_secs")]
    pub transcription_secs: u64,

    /// Language-model limit (default: 60s)
    #[serde(default = "default_generation_secs")]
    pub generation_secs: u64,

    /// Text-to-speech limit (default: 30s)
    #[serde(default = "default_synthesis_secs")]
    pub synthesis_secs: u64,
}

const fn default_transcription_secs() -> u64 {
    30
}

const fn default_generation_secs() -> u64 {
    60
}

const fn default_synthesis_secs() -> u64 {
    30
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            transcription_secs: default_transcription_secs(),
            generation_secs: default_generation_secs(),
            synthesis_secs: default_synthesis_secs(),
        }
    }
}

impl TimeoutsConfig {
    /// Transcription limit
    pub const fn transcription(&self) -> Duration {
        Duration::from_secs(self.transcription_secs)
    }

    /// Generation limit
    pub const fn generation(&self) -> Duration {
        Duration::from_secs(self.generation_secs)
    }

    /// Synthesis limit
    pub const fn synthesis(&self) -> Duration {
        Duration::from_secs(self.synthesis_secs)
    }
}

// ==============================
// Audio Storage
// ==============================

/// Audio storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding uploaded and synthesized audio (default: `audios`)
    #[serde(default = "default_audio_dir")]
    pub audio_dir: String,
}

fn default_audio_dir() -> String {
    "audios".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            audio_dir: default_audio_dir(),
        }
    }
}
