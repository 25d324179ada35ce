//! Audio store port - Persistence for uploaded and synthesized audio

use async_trait::async_trait;
use domain::{AudioFormat, AudioKey};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Audio read back from the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAudio {
    /// File name inside the store
    pub file_name: String,
    /// Format derived from the file extension
    pub format: Option<AudioFormat>,
    /// Raw bytes
    pub data: Vec<u8>,
}

/// Port for audio persistence
///
/// Keys are per request, so concurrent writers never share a file.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AudioStorePort: Send + Sync {
    /// Persist `data` under `key`, returning the public path
    async fn save(&self, key: &AudioKey, data: &[u8]) -> Result<String, ApplicationError>;

    /// Load audio by client reference (public path, file path or bare name)
    ///
    /// Only the final file-name component is honoured. Missing files yield
    /// [`ApplicationError::NotFound`].
    async fn load(&self, reference: &str) -> Result<StoredAudio, ApplicationError>;
}
