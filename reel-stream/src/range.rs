use crate::{ByteRange, StreamError, StreamResult};

/// Default ceiling for a single served chunk (1 MiB)
pub const MAX_CHUNK_SIZE: u64 = 1024 * 1024;

/// Server-computed byte interval that is actually served
///
/// Always `start <= end < object size` and never longer than the chunk
/// ceiling it was resolved against. Only [`resolve_range`] produces one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRange {
    start: u64,
    end: u64,
}

impl ResolvedRange {
    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn content_length(&self) -> u64 {
        self.end - self.start + 1
    }

    /// True when the range spans the whole object
    pub fn is_full_content(&self, total_size: u64) -> bool {
        self.start == 0 && self.end + 1 == total_size
    }

    /// `bytes=<start>-<end>`, the request form of this range
    pub fn to_request_header(&self) -> String {
        format!("bytes={}-{}", self.start, self.end)
    }

    /// `bytes <start>-<end>/<size>`, the response form of this range
    pub fn to_content_range(&self, total_size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, total_size)
    }
}

/// Clamp a client-requested range to the object size and chunk ceiling.
///
/// A missing start means 0. A missing end, or one that would make the chunk
/// longer than `max_chunk_size`, is replaced by the furthest offset the
/// ceiling allows. A start at or past the end of the object cannot be served.
pub fn resolve_range(
    requested: Option<&ByteRange>,
    object_size: u64,
    max_chunk_size: u64,
) -> StreamResult<ResolvedRange> {
    let max_chunk_size = max_chunk_size.max(1);
    let start = requested.and_then(|r| r.start).unwrap_or(0);

    if start >= object_size {
        return Err(StreamError::range_not_satisfiable(start, object_size));
    }

    let last = object_size - 1;
    let ceiling = start.saturating_add(max_chunk_size - 1).min(last);

    // An end before start is as good as no end at all.
    let end = match requested.and_then(|r| r.end) {
        Some(end) if end >= start && end - start < max_chunk_size => end.min(last),
        _ => ceiling,
    };

    Ok(ResolvedRange { start, end })
}
