//! Speech synthesis gateway - speaks a reply and stores it under a
//! per-request key

use std::{fmt, sync::Arc, time::Duration};

use domain::{AudioKey, RequestId};
use tokio::time::timeout;
use tracing::{info, instrument, warn};

use super::conversation_orchestrator::duration_ms;
use crate::{
    error::ApplicationError,
    ports::{AudioStorePort, SynthesisOptions, SynthesisPort},
};

/// Default time limit for one synthesis
pub const DEFAULT_SYNTHESIS_TIMEOUT: Duration = Duration::from_secs(30);

const SERVICE: &str = "speech synthesis";

/// Sends reply text to the text-to-speech provider and persists the audio
#[derive(Clone)]
pub struct SpeechSynthesisGateway {
    tts: Option<Arc<dyn SynthesisPort>>,
    store: Arc<dyn AudioStorePort>,
    options: SynthesisOptions,
    timeout: Duration,
}

impl fmt::Debug for SpeechSynthesisGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechSynthesisGateway")
            .field("configured", &self.is_available())
            .field("options", &self.options)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl SpeechSynthesisGateway {
    /// Create a gateway; `tts = None` leaves it unconfigured
    pub fn new(tts: Option<Arc<dyn SynthesisPort>>, store: Arc<dyn AudioStorePort>) -> Self {
        Self {
            tts,
            store,
            options: SynthesisOptions::default(),
            timeout: DEFAULT_SYNTHESIS_TIMEOUT,
        }
    }

    /// Replace the default voice options
    #[must_use]
    pub fn with_options(mut self, options: SynthesisOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the time limit for one synthesis
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether a text-to-speech client is available
    pub const fn is_available(&self) -> bool {
        self.tts.is_some()
    }

    /// Voice options used by [`Self::synthesize`]
    pub const fn options(&self) -> &SynthesisOptions {
        &self.options
    }

    /// Speak `text` with the default options, returning the public path
    pub async fn synthesize(&self, text: &str, id: RequestId) -> Result<String, ApplicationError> {
        self.synthesize_with(text, &self.options, id).await
    }

    /// Speak `text` with explicit options, returning the public path
    ///
    /// # Errors
    ///
    /// `NotConfigured` without a client, `SynthesisFailed` when the provider
    /// fails or returns no audio, `Timeout` when the limit is hit, `Storage`
    /// when the audio cannot be written.
    #[instrument(skip(self, text, options), fields(text_len = text.len(), request_id = %id))]
    pub async fn synthesize_with(
        &self,
        text: &str,
        options: &SynthesisOptions,
        id: RequestId,
    ) -> Result<String, ApplicationError> {
        let tts = self
            .tts
            .as_ref()
            .ok_or(ApplicationError::NotConfigured("text-to-speech"))?;

        let result = timeout(self.timeout, tts.synthesize(text, options))
            .await
            .map_err(|_| {
                warn!(after = ?self.timeout, "Speech synthesis timed out");
                ApplicationError::Timeout {
                    service: SERVICE,
                    after_ms: duration_ms(self.timeout),
                }
            })?
            .map_err(|e| match e {
                ApplicationError::SynthesisFailed(_) | ApplicationError::Timeout { .. } => e,
                other => ApplicationError::SynthesisFailed(other.to_string()),
            })?;

        if result.audio_data.is_empty() {
            return Err(ApplicationError::SynthesisFailed(
                "no audio returned".to_string(),
            ));
        }

        let key = AudioKey::reply(id, result.format);
        let path = self.store.save(&key, &result.audio_data).await?;

        info!(bytes = result.audio_data.len(), path = %path, "Reply audio stored");
        Ok(path)
    }
}
