use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, instrument};

use crate::store::{ContentStore, StoreDescription};
use crate::{
    resolve_range, ByteRange, LocalStore, ObjectMetadata, S3CompatibleStore, StoreConfig,
    StreamConfig, StreamError, StreamResult, StreamedContent,
};

/// The capability set servers program against
#[async_trait]
pub trait ContentStreamAdapter: Send + Sync {
    /// Resolve `range` against the object and open a stream over the chunk
    async fn load_content(
        &self,
        key: &str,
        range: Option<ByteRange>,
    ) -> StreamResult<StreamedContent>;

    /// Size of the object in bytes
    async fn content_size(&self, key: &str) -> StreamResult<u64> {
        Ok(self.content_metadata(key).await?.size)
    }

    async fn content_metadata(&self, key: &str) -> StreamResult<ObjectMetadata>;

    async fn list_all_content_metadata(&self) -> StreamResult<Vec<ObjectMetadata>>;
}

/// Composes a backing store with range resolution
///
/// Holds no per-request state; every call fetches fresh metadata and owns
/// its own stream.
#[derive(Clone)]
pub struct StreamingAdapter {
    store: Arc<dyn ContentStore>,
    config: StreamConfig,
}

impl StreamingAdapter {
    /// Create a new streaming adapter
    pub fn new<S: ContentStore + 'static>(store: S, config: StreamConfig) -> Self {
        Self {
            store: Arc::new(store),
            config,
        }
    }

    /// Build the store named by `store` once, at startup
    pub async fn from_config(store: StoreConfig, config: StreamConfig) -> StreamResult<Self> {
        config.validate()?;

        let adapter = match store {
            StoreConfig::Local(local) => Self::new(
                LocalStore::from_config(local).with_read_buffer_size(config.read_buffer_size),
                config,
            ),
            StoreConfig::S3(s3) => Self::new(S3CompatibleStore::new(s3).await?, config),
        };
        Ok(adapter)
    }

    /// Get configuration
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn describe(&self) -> StoreDescription {
        self.store.describe()
    }
}

fn log_failure(operation: &str, key: &str, err: StreamError) -> StreamError {
    if let StreamError::Backend { .. } = &err {
        error!("Failed to {} for key {}: {}", operation, key, err);
    }
    err
}

#[async_trait]
impl ContentStreamAdapter for StreamingAdapter {
    #[instrument(skip(self))]
    async fn load_content(
        &self,
        key: &str,
        range: Option<ByteRange>,
    ) -> StreamResult<StreamedContent> {
        let metadata = self
            .store
            .head(key)
            .await
            .map_err(|e| log_failure("load content", key, e))?;

        let resolved = resolve_range(range.as_ref(), metadata.size, self.config.max_chunk_size)?;
        debug!(
            "Resolved {:?} to bytes {}-{} of {}",
            range,
            resolved.start(),
            resolved.end(),
            metadata.size
        );

        let body = self
            .store
            .open(key, resolved)
            .await
            .map_err(|e| log_failure("open content stream", key, e))?;

        Ok(StreamedContent::new(metadata, resolved, body))
    }

    #[instrument(skip(self))]
    async fn content_metadata(&self, key: &str) -> StreamResult<ObjectMetadata> {
        self.store
            .head(key)
            .await
            .map_err(|e| log_failure("get content metadata", key, e))
    }

    #[instrument(skip(self))]
    async fn list_all_content_metadata(&self) -> StreamResult<Vec<ObjectMetadata>> {
        self.store.list().await.map_err(|e| {
            error!("Failed to list content in {}: {}", self.store.describe(), e);
            e
        })
    }
}
