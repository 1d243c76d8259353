// Object storage: review dumps, face photos and CV/resume PDFs live in one bucket.

pub mod archive;
pub mod documents;
pub mod handlers;
pub mod roster;

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("S3 request failed for '{key}': {message}")]
    S3 { key: String, message: String },

    #[error("Failed to read body of '{key}': {message}")]
    Body { key: String, message: String },

    #[error("'{key}' is not in the expected format: {message}")]
    Malformed { key: String, message: String },
}

/// Read-only view of a bucket.
///
/// Carried in `AppState` as `Arc<dyn ObjectStore>`.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Object bytes, or `None` if the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<Bytes>, StorageError>;

    async fn exists(&self, key: &str) -> Result<bool, StorageError>;
}

pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, StorageError> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) if e.as_service_error().is_some_and(|se| se.is_no_such_key()) => {
                debug!("s3://{}/{} not found", self.bucket, key);
                return Ok(None);
            }
            Err(e) => {
                return Err(StorageError::S3 {
                    key: key.to_string(),
                    message: DisplayErrorContext(&e).to_string(),
                })
            }
        };

        let data = output.body.collect().await.map_err(|e| StorageError::Body {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(data.into_bytes()))
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().is_some_and(|se| se.is_not_found()) => Ok(false),
            Err(e) => Err(StorageError::S3 {
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            }),
        }
    }
}

#[cfg(test)]
pub mod testing {
    use std::collections::HashMap;

    use super::*;

    /// In-memory bucket.
    #[derive(Default)]
    pub struct MemoryStore {
        objects: HashMap<String, Bytes>,
        fail: bool,
    }

    impl MemoryStore {
        pub fn with(mut self, key: &str, data: impl Into<Bytes>) -> Self {
            self.objects.insert(key.to_string(), data.into());
            self
        }

        /// Every call fails as if the bucket were unreachable.
        pub fn failing() -> Self {
            Self {
                objects: HashMap::new(),
                fail: true,
            }
        }

        fn check(&self, key: &str) -> Result<(), StorageError> {
            if self.fail {
                return Err(StorageError::S3 {
                    key: key.to_string(),
                    message: "connection refused".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ObjectStore for MemoryStore {
        async fn get(&self, key: &str) -> Result<Option<Bytes>, StorageError> {
            self.check(key)?;
            Ok(self.objects.get(key).cloned())
        }

        async fn exists(&self, key: &str) -> Result<bool, StorageError> {
            self.check(key)?;
            Ok(self.objects.contains_key(key))
        }
    }
}
