use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use aws_sdk_s3::Client;
use papyrus_core::keys;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::objects;

/// Fetch/store capability the worker depends on.
///
/// Keys are relative to whatever bucket or namespace the implementation
/// was built for.
pub trait ObjectStore: Send + Sync + 'static {
    /// Download an object. A zero-length object counts as missing.
    fn fetch(&self, key: &str) -> impl Future<Output = Result<Vec<u8>, StorageError>> + Send;

    /// Upload an object, replacing any existing one.
    fn store(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// URL a caller can use to retrieve the object.
    fn url(&self, key: &str) -> impl Future<Output = Result<String, StorageError>> + Send;
}

/// How [`S3Store::url`] hands out links.
#[derive(Debug, Clone)]
pub enum UrlStyle {
    /// `https://{bucket}.s3.{region}.amazonaws.com/{key}`
    Public { region: String },
    /// Presigned GET valid for the given duration.
    Presigned { expires_in: Duration },
}

/// [`ObjectStore`] backed by a single S3 bucket.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
    url_style: UrlStyle,
}

impl S3Store {
    pub fn new(client: Client, bucket: impl Into<String>, url_style: UrlStyle) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            url_style,
        }
    }
}

impl ObjectStore for S3Store {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        objects::download(&self.client, &self.bucket, key).await
    }

    async fn store(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        objects::upload(&self.client, &self.bucket, key, body, content_type).await
    }

    async fn url(&self, key: &str) -> Result<String, StorageError> {
        match &self.url_style {
            UrlStyle::Public { region } => Ok(keys::object_url(&self.bucket, region, key)),
            UrlStyle::Presigned { expires_in } => {
                objects::presigned_url(&self.client, &self.bucket, key, *expires_in).await
            }
        }
    }
}

/// In-memory [`ObjectStore`], for tests and local runs.
#[derive(Clone, Default)]
pub struct MemoryStore {
    objects: Arc<RwLock<HashMap<String, (Vec<u8>, String)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, key: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.objects.write().await.insert(
            key.into(),
            (body.into(), "application/octet-stream".to_string()),
        );
    }

    /// Body and content type of a stored object.
    pub async fn get(&self, key: &str) -> Option<(Vec<u8>, String)> {
        self.objects.read().await.get(key).cloned()
    }
}

impl ObjectStore for MemoryStore {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        match self.objects.read().await.get(key) {
            None => Err(StorageError::NotFound {
                key: key.to_string(),
            }),
            Some((body, _)) if body.is_empty() => Err(StorageError::Empty {
                key: key.to_string(),
            }),
            Some((body, _)) => Ok(body.clone()),
        }
    }

    async fn store(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        self.objects
            .write()
            .await
            .insert(key.to_string(), (body, content_type.to_string()));
        Ok(())
    }

    async fn url(&self, key: &str) -> Result<String, StorageError> {
        Ok(format!("memory://{key}"))
    }
}
