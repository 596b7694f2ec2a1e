use anyhow::Context;
use async_trait::async_trait;
use aws_config::{defaults, BehaviorVersion};
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Region},
    primitives::ByteStream,
    types::ObjectCannedAcl,
    Client,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::entities::upload::StoredObjectInfo;
use crate::infrastructure::storage::FileStorage;

#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    public_base: String,
}

impl S3Storage {
    pub async fn new(
        bucket: &str,
        region: &str,
        endpoint: Option<&str>,
        public_base_url: Option<&str>,
    ) -> anyhow::Result<Self> {
        let mut loader = defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()));
        if let Some(endpoint) = endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let shared = loader.load().await;

        let mut conf = S3ConfigBuilder::from(&shared);
        if let Some(endpoint) = endpoint {
            conf = conf.endpoint_url(endpoint).force_path_style(true);
        }

        let public_base = match (public_base_url, endpoint) {
            (Some(base), _) => base.trim_end_matches('/').to_string(),
            (None, Some(endpoint)) => format!("{}/{}", endpoint.trim_end_matches('/'), bucket),
            (None, None) => format!("https://{bucket}.s3.{region}.amazonaws.com"),
        };

        Ok(Self {
            client: Client::from_conf(conf.build()),
            bucket: bucket.to_string(),
            public_base,
        })
    }
}

#[async_trait]
impl FileStorage for S3Storage {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .context("s3 put_object")?;
        Ok(self.public_url(key))
    }

    async fn get(&self, key: &str) -> anyhow::Result<Option<Bytes>> {
        let output = match self.client.get_object().bucket(&self.bucket).key(key).send().await {
            Ok(output) => output,
            Err(err) if err.as_service_error().is_some_and(|e| e.is_no_such_key()) => {
                return Ok(None);
            }
            Err(err) => return Err(err).context("s3 get_object"),
        };

        let data = output.body.collect().await.context("s3 read body")?;
        Ok(Some(data.into_bytes()))
    }

    async fn stat(&self, key: &str) -> anyhow::Result<Option<StoredObjectInfo>> {
        let output = match self.client.head_object().bucket(&self.bucket).key(key).send().await {
            Ok(output) => output,
            Err(err) if err.as_service_error().is_some_and(|e| e.is_not_found()) => {
                return Ok(None);
            }
            Err(err) => return Err(err).context("s3 head_object"),
        };

        let last_modified = output
            .last_modified()
            .and_then(|t| DateTime::<Utc>::from_timestamp(t.secs(), t.subsec_nanos()));

        Ok(Some(StoredObjectInfo {
            size: output.content_length().unwrap_or(0).max(0) as u64,
            last_modified,
        }))
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base, key)
    }
}
