//! Audio service - stores client uploads and serves stored audio

use std::{fmt, sync::Arc};

use domain::{AudioFormat, AudioKey, DomainError, RequestId};
use tracing::{debug, info, instrument};

use crate::{
    error::ApplicationError,
    ports::{AudioStorePort, StoredAudio},
};

/// Upload and retrieval of audio artifacts
#[derive(Clone)]
pub struct AudioService {
    store: Arc<dyn AudioStorePort>,
}

impl fmt::Debug for AudioService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioService").finish_non_exhaustive()
    }
}

impl AudioService {
    /// Create a new audio service
    pub fn new(store: Arc<dyn AudioStorePort>) -> Self {
        Self { store }
    }

    /// Store an uploaded recording under the request's key
    ///
    /// Returns the public path to hand back as `audio_filepath`.
    #[instrument(skip(self, data), fields(bytes = data.len(), request_id = %id))]
    pub async fn store_upload(
        &self,
        data: &[u8],
        format: AudioFormat,
        id: RequestId,
    ) -> Result<String, ApplicationError> {
        if data.is_empty() {
            return Err(DomainError::ValidationError("audio file is empty".to_string()).into());
        }

        let key = AudioKey::upload(id, format);
        let path = self.store.save(&key, data).await?;
        info!(path = %path, "Upload stored");
        Ok(path)
    }

    /// Fetch stored audio by file name
    pub async fn fetch(&self, file_name: &str) -> Result<StoredAudio, ApplicationError> {
        debug!(file = %file_name, "Fetching stored audio");
        self.store.load(file_name).await
    }
}
