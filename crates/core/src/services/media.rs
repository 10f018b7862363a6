//! Uploaded media handed to the object-storage backend.

use vidshare_common::{AppResult, StorageService, UploadedFile, generate_storage_key};

/// A file received from a client, before it is stored.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl FileUpload {
    /// An upload with no bytes counts as absent.
    #[must_use]
    pub fn non_empty(self) -> Option<Self> {
        (!self.data.is_empty()).then_some(self)
    }
}

/// Thin wrapper over the storage backend used by the services.
#[derive(Clone)]
pub struct MediaStore {
    storage: StorageService,
}

impl MediaStore {
    #[must_use]
    pub const fn new(storage: StorageService) -> Self {
        Self { storage }
    }

    /// Store an upload under a fresh key owned by `owner_id`.
    pub async fn store(&self, owner_id: &str, upload: &FileUpload) -> AppResult<UploadedFile> {
        let key = generate_storage_key(owner_id, &upload.file_name);
        let stored = self
            .storage
            .upload(&key, &upload.data, &upload.content_type)
            .await?;

        tracing::debug!(key = %stored.key, size = stored.size, md5 = %stored.md5, "Stored upload");
        Ok(stored)
    }

    /// Delete a stored object. Failures are logged, never returned.
    pub async fn discard(&self, key: &str) {
        if let Err(e) = self.storage.delete(key).await {
            tracing::warn!(key = %key, error = %e, "Failed to delete stored object");
        }
    }
}
