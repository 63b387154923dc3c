mod local;
mod memory;
mod s3;

pub use local::LocalStore;
pub use memory::MemoryStore;
pub use s3::S3Store;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// Namespace prefix for product picture objects.
pub const PICTURE_NAMESPACE: &str = "product-pictures";

/// Binary file storage used for uploaded pictures. Paths returned by `store`
/// are storage-relative and recorded on Picture rows.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn store(&self, namespace: &str, content_type: &str, bytes: Bytes) -> Result<String>;

    async fn exists(&self, path: &str) -> Result<bool>;

    async fn remove(&self, path: &str) -> Result<()>;
}

pub(crate) fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        _ => "jpg",
    }
}

pub(crate) fn object_key(namespace: &str, content_type: &str) -> String {
    format!(
        "{}/{}.{}",
        namespace,
        uuid::Uuid::new_v4(),
        extension_for(content_type)
    )
}
