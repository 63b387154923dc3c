use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;
use crate::storage::{FileStore, object_key};

/// In-memory fake backend for tests; keeps stored objects in a map so tests
/// can assert which paths exist without touching the filesystem.
#[derive(Default)]
pub struct MemoryStore {
    objects: RwLock<HashMap<String, Bytes>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object_count(&self) -> usize {
        self.objects.read().unwrap().len()
    }
}

#[async_trait]
impl FileStore for MemoryStore {
    async fn store(&self, namespace: &str, content_type: &str, bytes: Bytes) -> Result<String> {
        let key = object_key(namespace, content_type);
        self.objects.write().unwrap().insert(key.clone(), bytes);
        Ok(key)
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.objects.read().unwrap().contains_key(path))
    }

    async fn remove(&self, path: &str) -> Result<()> {
        self.objects.write().unwrap().remove(path);
        Ok(())
    }
}
