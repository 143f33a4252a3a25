use std::time::Duration;

use aws_sdk_s3::Client;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_smithy_types::byte_stream::ByteStream;
use tracing::{error, info};

use crate::error::StorageError;

/// Download an object's body. A zero-length body counts as missing.
pub async fn download(client: &Client, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
    let resp = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| {
            let err = e.into_service_error();
            if err.is_no_such_key() {
                StorageError::NotFound {
                    key: key.to_string(),
                }
            } else {
                error!(bucket, key, error = %err, "download failed");
                StorageError::GetObject(err.to_string())
            }
        })?;

    let body = resp
        .body
        .collect()
        .await
        .map_err(|e| StorageError::GetObject(e.to_string()))?
        .into_bytes()
        .to_vec();

    if body.is_empty() {
        return Err(StorageError::Empty {
            key: key.to_string(),
        });
    }

    info!(bucket, key, size = body.len(), "object downloaded");
    Ok(body)
}

/// Upload `body` under `key`, replacing any existing object.
pub async fn upload(
    client: &Client,
    bucket: &str,
    key: &str,
    body: Vec<u8>,
    content_type: &str,
) -> Result<(), StorageError> {
    let size = body.len();
    client
        .put_object()
        .bucket(bucket)
        .key(key)
        .content_type(content_type)
        .body(ByteStream::from(body))
        .send()
        .await
        .map_err(|e| {
            let err = e.into_service_error();
            error!(bucket, key, error = %err, "upload failed");
            StorageError::PutObject(err.to_string())
        })?;

    info!(bucket, key, size, content_type, "object uploaded");
    Ok(())
}

/// Presigned GET URL for an object, valid for `expires_in`.
pub async fn presigned_url(
    client: &Client,
    bucket: &str,
    key: &str,
    expires_in: Duration,
) -> Result<String, StorageError> {
    let config = PresigningConfig::expires_in(expires_in)
        .map_err(|e| StorageError::Presign(e.to_string()))?;

    let presigned = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .presigned(config)
        .await
        .map_err(|e| StorageError::Presign(e.to_string()))?;

    Ok(presigned.uri().to_string())
}
