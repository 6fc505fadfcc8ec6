use async_stream::try_stream;
use async_trait::async_trait;
use bytes::Bytes;
use futures_core::Stream;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::{debug, warn};

use crate::config::DEFAULT_READ_BUFFER_SIZE;
use crate::content_type::infer_content_type;
use crate::store::{ContentStore, ContentStreamer, MetadataProvider, StoreDescription};
use crate::stream::short_read;
use crate::{ByteStream, ObjectMetadata, ResolvedRange, StreamError, StreamResult};

/// Local directory configuration
#[derive(Debug, Clone)]
pub struct LocalStoreConfig {
    pub root: PathBuf,
}

impl LocalStoreConfig {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Reads `REEL_LOCAL_ROOT`, defaulting to `videos`
    pub fn from_env() -> Self {
        let root = std::env::var("REEL_LOCAL_ROOT").unwrap_or_else(|_| "videos".to_string());
        Self::new(root)
    }
}

/// Content store over the regular files directly inside one directory
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
    read_buffer_size: usize,
}

impl LocalStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }

    pub fn from_config(config: LocalStoreConfig) -> Self {
        Self::new(config.root)
    }

    /// Set the size of each read while streaming
    pub fn with_read_buffer_size(mut self, bytes: usize) -> Self {
        self.read_buffer_size = bytes.max(1);
        self
    }

    /// Map a key to a path under the root. Keys are single path components.
    fn resolve_path(&self, key: &str) -> StreamResult<PathBuf> {
        let unsafe_key = key.is_empty()
            || key == "."
            || key == ".."
            || key.contains('/')
            || key.contains('\\')
            || key.contains('\0');

        if unsafe_key {
            return Err(StreamError::not_found(key));
        }
        Ok(self.root.join(key))
    }

    async fn file_size(&self, key: &str, path: &Path) -> StreamResult<u64> {
        match fs::metadata(path).await {
            Ok(meta) if meta.is_file() => Ok(meta.len()),
            Ok(_) => Err(StreamError::not_found(key)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(StreamError::not_found(key))
            }
            Err(err) => Err(StreamError::backend(err)),
        }
    }
}

#[async_trait]
impl MetadataProvider for LocalStore {
    async fn head(&self, key: &str) -> StreamResult<ObjectMetadata> {
        let path = self.resolve_path(key)?;
        let size = self.file_size(key, &path).await?;

        Ok(ObjectMetadata::new(key, infer_content_type(key), size))
    }

    async fn list(&self) -> StreamResult<Vec<ObjectMetadata>> {
        let mut entries = fs::read_dir(&self.root).await?;
        let mut listing = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    warn!("Skipping entry with non UTF-8 name: {:?}", raw);
                    continue;
                }
            };

            match self.head(&name).await {
                Ok(metadata) => listing.push(metadata),
                // Directories and entries removed mid-listing
                Err(StreamError::NotFound { .. }) => continue,
                Err(err) => return Err(err),
            }
        }

        listing.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(listing)
    }
}

#[async_trait]
impl ContentStreamer for LocalStore {
    async fn open(&self, key: &str, range: ResolvedRange) -> StreamResult<ByteStream> {
        let path = self.resolve_path(key)?;
        debug!(
            "Streaming local file {} bytes {}-{}",
            path.display(),
            range.start(),
            range.end()
        );

        Ok(Box::pin(read_file_range(
            key.to_string(),
            path,
            range,
            self.read_buffer_size,
        )))
    }
}

impl ContentStore for LocalStore {
    fn describe(&self) -> StoreDescription {
        StoreDescription::new("local", self.root.display().to_string())
    }
}

/// Read `range` out of the file at `path`, one buffer at a time.
///
/// The file is opened on first poll and closed when the stream finishes,
/// fails, or is dropped.
fn read_file_range(
    key: String,
    path: PathBuf,
    range: ResolvedRange,
    buffer_size: usize,
) -> impl Stream<Item = StreamResult<Bytes>> + Send {
    try_stream! {
        let expected = range.content_length();
        let mut file = File::open(&path).await.map_err(StreamError::from)?;

        let available = file.metadata().await.map_err(StreamError::from)?.len();
        if available < range.start() {
            Err::<(), StreamError>(short_read(&key, range.start(), available))?;
        }
        file.seek(SeekFrom::Start(range.start())).await.map_err(StreamError::from)?;

        let mut buffer = vec![0u8; buffer_size.max(1)];
        let mut remaining = expected;

        while remaining > 0 {
            let want = remaining.min(buffer.len() as u64) as usize;
            let read = file.read(&mut buffer[..want]).await.map_err(StreamError::from)?;
            if read == 0 {
                Err::<(), StreamError>(short_read(&key, expected, expected - remaining))?;
            }
            remaining -= read as u64;
            yield Bytes::copy_from_slice(&buffer[..read]);
        }
    }
}
