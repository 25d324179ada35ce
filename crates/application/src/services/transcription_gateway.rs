//! Transcription gateway - turns a stored audio reference into text

use std::{fmt, sync::Arc, time::Duration};

use domain::AudioFormat;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use super::conversation_orchestrator::duration_ms;
use crate::{
    error::ApplicationError,
    ports::{AudioStorePort, TranscriptionPort},
};

/// Default time limit for one transcription
pub const DEFAULT_TRANSCRIPTION_TIMEOUT: Duration = Duration::from_secs(30);

const SERVICE: &str = "transcription";

/// Resolves uploaded audio and sends it to the speech-to-text provider
#[derive(Clone)]
pub struct TranscriptionGateway {
    stt: Option<Arc<dyn TranscriptionPort>>,
    store: Arc<dyn AudioStorePort>,
    timeout: Duration,
}

impl fmt::Debug for TranscriptionGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranscriptionGateway")
            .field("configured", &self.is_available())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl TranscriptionGateway {
    /// Create a gateway; `stt = None` leaves it unconfigured
    pub fn new(stt: Option<Arc<dyn TranscriptionPort>>, store: Arc<dyn AudioStorePort>) -> Self {
        Self {
            stt,
            store,
            timeout: DEFAULT_TRANSCRIPTION_TIMEOUT,
        }
    }

    /// Set the time limit for one transcription
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether a speech-to-text client is available
    pub const fn is_available(&self) -> bool {
        self.stt.is_some()
    }

    /// Transcribe the audio file referenced by `reference`
    ///
    /// # Errors
    ///
    /// `NotConfigured` without a client, `NotFound` when the file does not
    /// exist, `Timeout` or `Upstream` when the provider fails.
    #[instrument(skip(self))]
    pub async fn transcribe(&self, reference: &str) -> Result<String, ApplicationError> {
        let stt = self
            .stt
            .as_ref()
            .ok_or(ApplicationError::NotConfigured("speech-to-text"))?;

        let audio = self.store.load(reference).await?;
        let format = audio.format.unwrap_or(AudioFormat::Mp3);
        debug!(file = %audio.file_name, bytes = audio.data.len(), %format, "Loaded audio");

        let result = timeout(self.timeout, stt.transcribe(audio.data, format))
            .await
            .map_err(|_| {
                warn!(after = ?self.timeout, "Transcription timed out");
                ApplicationError::Timeout {
                    service: SERVICE,
                    after_ms: duration_ms(self.timeout),
                }
            })?
            .map_err(|e| match e {
                ApplicationError::Upstream(_) | ApplicationError::Timeout { .. } => e,
                other => ApplicationError::Upstream(other.to_string()),
            })?;

        let text = result.text.trim();
        if text.is_empty() {
            return Err(ApplicationError::Upstream(
                "no speech recognized".to_string(),
            ));
        }

        info!(
            text_len = text.len(),
            language = ?result.detected_language,
            "Audio transcribed"
        );

        Ok(text.to_string())
    }
}
