use crate::{ByteStream, ObjectMetadata, ResolvedRange};

/// One chunk of an object, ready to be sent
///
/// `content_length` always equals `range.content_length()`. The body stream
/// belongs to whoever holds this value; dropping it releases the file or
/// connection behind it.
pub struct StreamedContent {
    key: String,
    metadata: ObjectMetadata,
    range: ResolvedRange,
    content_length: u64,
    body: ByteStream,
}

impl StreamedContent {
    pub fn new(metadata: ObjectMetadata, range: ResolvedRange, body: ByteStream) -> Self {
        Self {
            key: metadata.key.clone(),
            content_length: range.content_length(),
            metadata,
            range,
            body,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn metadata(&self) -> &ObjectMetadata {
        &self.metadata
    }

    pub fn range(&self) -> ResolvedRange {
        self.range
    }

    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    /// Check if this covers less than the whole object
    pub fn is_partial(&self) -> bool {
        !self.range.is_full_content(self.metadata.size)
    }

    /// Give up the descriptor and keep only the body
    pub fn into_body(self) -> ByteStream {
        self.body
    }

    pub fn into_parts(self) -> (ObjectMetadata, ResolvedRange, ByteStream) {
        (self.metadata, self.range, self.body)
    }
}

impl std::fmt::Debug for StreamedContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamedContent")
            .field("key", &self.key)
            .field("metadata", &self.metadata)
            .field("range", &self.range)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}
