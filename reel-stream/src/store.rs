use async_trait::async_trait;

use crate::{ByteStream, ObjectMetadata, ResolvedRange, StreamResult};

/// Metadata operations - must be implemented by all backing stores
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Resolve a key to its content type and size; `NotFound` if it does not exist
    async fn head(&self, key: &str) -> StreamResult<ObjectMetadata>;

    /// Enumerate every object visible in the configured scope.
    ///
    /// Entries whose name cannot be resolved are skipped, not reported.
    async fn list(&self) -> StreamResult<Vec<ObjectMetadata>>;
}

/// Byte streaming - must be implemented by all backing stores
#[async_trait]
pub trait ContentStreamer: Send + Sync {
    /// Open a stream over exactly `range.content_length()` bytes of `key`.
    ///
    /// The returned stream is lazy: nothing is read from the backing store
    /// until it is first polled, and dropping it releases the underlying
    /// handle. Failures while reading surface as `Err` items that end the
    /// stream.
    async fn open(&self, key: &str, range: ResolvedRange) -> StreamResult<ByteStream>;
}

/// A complete backing store
pub trait ContentStore: MetadataProvider + ContentStreamer {
    /// Backend name and scope, for logs
    fn describe(&self) -> StoreDescription;
}

/// What a store is and where it looks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreDescription {
    pub backend: &'static str,
    pub scope: String,
}

impl StoreDescription {
    pub fn new<S: Into<String>>(backend: &'static str, scope: S) -> Self {
        Self {
            backend,
            scope: scope.into(),
        }
    }
}

impl std::fmt::Display for StoreDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.backend, self.scope)
    }
}
