use crate::core::Storage;
use crate::utils::error::{EtlError, Result};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;

#[derive(Debug, Clone)]
pub struct S3Storage {
    client: S3Client,
}

impl S3Storage {
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }
}

impl Storage for S3Storage {
    async fn head_bucket(&self, bucket: &str) -> Result<()> {
        self.client
            .head_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| EtlError::ConnectivityError {
                bucket: bucket.to_string(),
                message: format!("{}", aws_sdk_s3::error::DisplayErrorContext(&e)),
            })?;
        Ok(())
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let resp = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .send()
            .await
            .map_err(|e| EtlError::StorageError {
                bucket: bucket.to_string(),
                key: prefix.to_string(),
                message: format!("{}", aws_sdk_s3::error::DisplayErrorContext(&e)),
            })?;

        let keys = resp
            .contents()
            .iter()
            .filter_map(|obj| obj.key())
            .filter(|key| key.ends_with(".json") && *key != prefix)
            .map(|key| key.to_string())
            .collect();

        Ok(keys)
    }

    async fn read_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| EtlError::StorageError {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: format!("{}", aws_sdk_s3::error::DisplayErrorContext(&e)),
            })?;

        let data = resp.body.collect().await.map_err(|e| EtlError::StorageError {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message: format!("Failed to collect S3 data: {}", e),
        })?;

        Ok(data.into_bytes().to_vec())
    }

    async fn write_object(
        &self,
        bucket: &str,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data.to_vec()))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| EtlError::StorageError {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: format!("{}", aws_sdk_s3::error::DisplayErrorContext(&e)),
            })?;

        Ok(())
    }
}
