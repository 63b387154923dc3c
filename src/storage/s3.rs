use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::{Client as S3Client, config::Credentials, primitives::ByteStream};
use bytes::Bytes;

use crate::error::{AppError, Result};
use crate::storage::{FileStore, object_key};

/// S3-backed store; used in deployed environments where pictures live in an
/// object storage bucket.
pub struct S3Store {
    client: S3Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: S3Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    pub async fn from_env(bucket: String) -> Result<Self> {
        let aws_access_key = std::env::var("AWS_ACCESS_KEY_ID")
            .map_err(|_| AppError::ConfigError("AWS_ACCESS_KEY_ID not set".to_string()))?;

        let aws_secret_key = std::env::var("AWS_SECRET_ACCESS_KEY")
            .map_err(|_| AppError::ConfigError("AWS_SECRET_ACCESS_KEY not set".to_string()))?;

        let aws_region = std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());

        let credentials = Credentials::new(
            aws_access_key,
            aws_secret_key,
            None,
            None,
            "env-credentials",
        );

        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(aws_region))
            .credentials_provider(credentials)
            .load()
            .await;

        let client = S3Client::new(&config);

        tracing::info!("AWS S3 client initialized");

        Ok(Self::new(client, bucket))
    }
}

#[async_trait]
impl FileStore for S3Store {
    async fn store(&self, namespace: &str, content_type: &str, bytes: Bytes) -> Result<String> {
        let key = object_key(namespace, content_type);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(bytes.to_vec()))
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("put {}: {}", key, e)))?;

        Ok(key)
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().is_some_and(|se| se.is_not_found()) => Ok(false),
            Err(e) => Err(AppError::Storage(format!("head {}: {}", path, e))),
        }
    }

    async fn remove(&self, path: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("delete {}: {}", path, e)))?;

        Ok(())
    }
}
