//! In-memory audio store for service tests

use std::collections::HashMap;

use async_trait::async_trait;
use domain::{AudioFormat, AudioKey, reference_file_name};
use tokio::sync::Mutex;

use crate::{
    error::ApplicationError,
    ports::{AudioStorePort, StoredAudio},
};

#[derive(Debug, Default)]
pub struct InMemoryAudioStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryAudioStore {
    pub async fn insert(&self, file_name: &str, data: &[u8]) {
        self.files
            .lock()
            .await
            .insert(file_name.to_string(), data.to_vec());
    }

    pub async fn get(&self, file_name: &str) -> Option<Vec<u8>> {
        self.files.lock().await.get(file_name).cloned()
    }

    pub async fn len(&self) -> usize {
        self.files.lock().await.len()
    }
}

#[async_trait]
impl AudioStorePort for InMemoryAudioStore {
    async fn save(&self, key: &AudioKey, data: &[u8]) -> Result<String, ApplicationError> {
        self.insert(&key.file_name(), data).await;
        Ok(key.public_path())
    }

    async fn load(&self, reference: &str) -> Result<StoredAudio, ApplicationError> {
        let name = reference_file_name(reference)
            .ok_or_else(|| ApplicationError::NotFound(reference.to_string()))?;
        let data = self
            .get(name)
            .await
            .ok_or_else(|| ApplicationError::NotFound(reference.to_string()))?;
        Ok(StoredAudio {
            file_name: name.to_string(),
            format: AudioFormat::from_file_name(name),
            data,
        })
    }
}
