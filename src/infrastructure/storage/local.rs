use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::entities::upload::StoredObjectInfo;
use crate::infrastructure::storage::FileStorage;

pub const PUBLIC_PREFIX: &str = "/uploads";

#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalStorage { root: root.into() }
    }

    pub async fn ensure_root(&self) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("create upload dir {}", self.root.display()))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

#[async_trait]
impl FileStorage for LocalStorage {
    async fn put(&self, key: &str, body: Bytes, _content_type: &str) -> anyhow::Result<String> {
        self.ensure_root().await?;
        tokio::fs::write(self.path_for(key), &body)
            .await
            .with_context(|| format!("write upload {key}"))?;
        Ok(self.public_url(key))
    }

    async fn get(&self, key: &str) -> anyhow::Result<Option<Bytes>> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read upload {key}")),
        }
    }

    async fn stat(&self, key: &str) -> anyhow::Result<Option<StoredObjectInfo>> {
        match tokio::fs::metadata(self.path_for(key)).await {
            Ok(meta) => Ok(Some(StoredObjectInfo {
                size: meta.len(),
                last_modified: meta.modified().ok().map(DateTime::<Utc>::from),
            })),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("stat upload {key}")),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{PUBLIC_PREFIX}/{key}")
    }
}
