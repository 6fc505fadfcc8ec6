//! # reel-stream: Range-aware chunked content streaming
//!
//! `reel-stream` lets a client progressively fetch large binary objects (video,
//! mostly) from a local directory or an S3-compatible bucket. Every request is
//! answered with one bounded chunk, so memory and latency stay flat no matter
//! how large the object is.
//!
//! ## Key Features
//!
//! - **Range resolution**: absent, open-ended and oversized ranges are clamped
//!   to the object size and a configurable chunk ceiling (1 MiB by default)
//! - **Lazy streaming**: bodies are pull-based streams; nothing is read until
//!   the consumer polls, and dropping the stream releases the file or socket
//! - **Storage agnostic**: local files and S3-compatible stores behind one
//!   capability trait, chosen once at startup
//! - **Server agnostic**: [`response::ContentResponse`] describes status and
//!   headers without tying you to an HTTP library
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use reel_stream::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> StreamResult<()> {
//! let adapter = StreamingAdapter::new(LocalStore::new("videos"), StreamConfig::default());
//!
//! // First chunk of the object, at most 1 MiB
//! let content = adapter.load_content("park.mp4", None).await?;
//! let response = content.into_response();
//! assert!(response.status == 200 || response.status == 206);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │   Your Server        │  ← routing, header parsing
//! ├──────────────────────┤
//! │   StreamingAdapter   │  ← metadata → range → stream
//! ├──────────────────────┤
//! │   ContentStore       │  ← head / open / list
//! └──────────────────────┘
//! ```

pub mod adapter;
mod config;
mod content;
mod content_type;
mod error;
mod local_store;
mod range;
pub mod response;
mod s3_store;
pub mod store;
mod stream;
mod types;

// Re-export main types for clean API
pub use adapter::{ContentStreamAdapter, StreamingAdapter};
pub use config::{StoreConfig, StreamConfig, DEFAULT_READ_BUFFER_SIZE};
pub use content::StreamedContent;
pub use content_type::{infer_content_type, DEFAULT_CONTENT_TYPE};
pub use error::{StreamError, StreamResult};
pub use local_store::{LocalStore, LocalStoreConfig};
pub use range::{resolve_range, ResolvedRange, MAX_CHUNK_SIZE};
pub use response::ContentResponse;
pub use s3_store::{S3CompatibleStore, S3Config};
pub use store::{ContentStore, ContentStreamer, MetadataProvider, StoreDescription};
pub use types::{ByteRange, ByteStream, ObjectMetadata};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        ByteRange, ByteStream, ContentStreamAdapter, LocalStore, ObjectMetadata, S3CompatibleStore,
        StreamConfig, StreamError, StreamResult, StreamedContent, StreamingAdapter,
    };
}
