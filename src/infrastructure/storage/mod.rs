use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::entities::upload::StoredObjectInfo;
use crate::settings::{AppConfig, StorageBackend};

pub mod local;
pub mod s3;

pub use local::LocalStorage;
pub use s3::S3Storage;

/// Backend for uploaded files. Keys are flat names, never paths.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Stores `body` under `key` and returns the public URL.
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<String>;

    async fn get(&self, key: &str) -> anyhow::Result<Option<Bytes>>;

    async fn stat(&self, key: &str) -> anyhow::Result<Option<StoredObjectInfo>>;

    fn public_url(&self, key: &str) -> String;
}

pub async fn build_storage(config: &AppConfig) -> anyhow::Result<Arc<dyn FileStorage>> {
    match config.storage_backend {
        StorageBackend::Local => {
            let storage = LocalStorage::new(&config.upload_dir);
            storage.ensure_root().await?;
            tracing::info!("Using local upload storage at {}", config.upload_dir);
            Ok(Arc::new(storage))
        }
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("s3_bucket is not configured"))?;
            let storage = S3Storage::new(
                bucket,
                &config.s3_region,
                config.s3_endpoint.as_deref(),
                config.s3_public_base_url.as_deref(),
            )
            .await?;
            tracing::info!("Using S3 upload storage in bucket {}", bucket);
            Ok(Arc::new(storage))
        }
    }
}
