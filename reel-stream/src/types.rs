use bytes::Bytes;
use futures_core::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

use crate::StreamError;

/// Lazy, finite, non-restartable sequence of content bytes
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StreamError>> + Send>>;

/// Byte range as requested by a client (inclusive offsets)
///
/// Either bound may be absent, meaning the server decides. No validation
/// happens here; see [`crate::resolve_range`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ByteRange {
    pub start: Option<u64>,
    pub end: Option<u64>,
}

impl ByteRange {
    pub fn new(start: Option<u64>, end: Option<u64>) -> Self {
        Self { start, end }
    }

    /// `start-end`, both bounds given
    pub fn bounded(start: u64, end: u64) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// `start-`, open ended
    pub fn from_start(start: u64) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }
}

/// Description of a backing-store object at the instant it was fetched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    pub key: String,
    pub content_type: String,
    #[serde(rename = "fileSize")]
    pub size: u64,
}

impl ObjectMetadata {
    pub fn new<K: Into<String>, C: Into<String>>(key: K, content_type: C, size: u64) -> Self {
        Self {
            key: key.into(),
            content_type: content_type.into(),
            size,
        }
    }
}
