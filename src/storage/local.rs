use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{AppError, Result};
use crate::storage::{FileStore, object_key};

/// Filesystem-backed store rooted at a configurable directory.
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn absolute(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

#[async_trait]
impl FileStore for LocalStore {
    async fn store(&self, namespace: &str, content_type: &str, bytes: Bytes) -> Result<String> {
        let key = object_key(namespace, content_type);
        let target = self.absolute(&key);

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("create {}: {}", parent.display(), e)))?;
        }

        tokio::fs::write(&target, &bytes)
            .await
            .map_err(|e| AppError::Storage(format!("write {}: {}", target.display(), e)))?;

        Ok(key)
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let target = self.absolute(path);
        tokio::fs::try_exists(&target)
            .await
            .map_err(|e| AppError::Storage(format!("stat {}: {}", target.display(), e)))
    }

    async fn remove(&self, path: &str) -> Result<()> {
        let target = self.absolute(path);
        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!(
                "remove {}: {}",
                target.display(),
                e
            ))),
        }
    }
}
