//! Filesystem audio store - Implements AudioStorePort on a local directory
//!
//! Files are written to a hidden `.tmp` sidecar and renamed into place, so
//! a reader never sees a partially written file. References are resolved by
//! their final file-name component only.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use application::{
    error::ApplicationError,
    ports::{AudioStorePort, StoredAudio},
};
use async_trait::async_trait;
use domain::{AudioFormat, AudioKey, reference_file_name};
use tokio::fs;
use tracing::{debug, instrument, warn};

/// Audio store rooted at a single directory
#[derive(Debug, Clone)]
pub struct FsAudioStore {
    root: PathBuf,
}

impl FsAudioStore {
    /// Create a store rooted at `root`; the directory is created on first write
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the audio files
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn temp_path(&self, file_name: &str) -> PathBuf {
        self.root.join(format!(".{file_name}.tmp"))
    }
}

#[async_trait]
impl AudioStorePort for FsAudioStore {
    #[instrument(skip(self, data), fields(file = %key.file_name(), size = data.len()))]
    async fn save(&self, key: &AudioKey, data: &[u8]) -> Result<String, ApplicationError> {
        let file_name = key.file_name();
        let final_path = self.root.join(&file_name);
        let temp_path = self.temp_path(&file_name);

        fs::create_dir_all(&self.root).await.map_err(|e| {
            ApplicationError::Storage(format!(
                "Failed to create audio directory {}: {e}",
                self.root.display()
            ))
        })?;

        if let Err(e) = fs::write(&temp_path, data).await {
            return Err(ApplicationError::Storage(format!(
                "Failed to write {file_name}: {e}"
            )));
        }

        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            warn!(error = %e, "Rename into place failed, removing temp file");
            let _ = fs::remove_file(&temp_path).await;
            return Err(ApplicationError::Storage(format!(
                "Failed to store {file_name}: {e}"
            )));
        }

        debug!("Audio stored");
        Ok(key.public_path())
    }

    #[instrument(skip(self))]
    async fn load(&self, reference: &str) -> Result<StoredAudio, ApplicationError> {
        let not_found = || ApplicationError::NotFound(reference.to_string());

        let file_name = reference_file_name(reference)
            .filter(|name| !name.starts_with('.'))
            .ok_or_else(not_found)?;

        let path = self.root.join(file_name);
        match fs::read(&path).await {
            Ok(data) => Ok(StoredAudio {
                file_name: file_name.to_string(),
                format: AudioFormat::from_file_name(file_name),
                data,
            }),
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::IsADirectory) => {
                Err(not_found())
            },
            Err(e) => Err(ApplicationError::Storage(format!(
                "Failed to read {file_name}: {e}"
            ))),
        }
    }
}
