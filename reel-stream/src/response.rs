//! Transport-level description of a chunk response.
//!
//! Nothing here depends on an HTTP library; the server crate turns a
//! [`ContentResponse`] into its own response type.

use crate::{ByteStream, StreamedContent};

pub const STATUS_OK: u16 = 200;
pub const STATUS_PARTIAL_CONTENT: u16 = 206;
pub const STATUS_RANGE_NOT_SATISFIABLE: u16 = 416;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const ACCEPT_RANGES: &str = "Accept-Ranges";
pub const CONTENT_LENGTH: &str = "Content-Length";
pub const CONTENT_RANGE: &str = "Content-Range";

/// Status, headers and the still unconsumed body of a chunk response
pub struct ContentResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: ByteStream,
}

impl ContentResponse {
    /// First value of a header, matched case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl StreamedContent {
    /// `200` when the chunk is the whole object, `206` otherwise
    pub fn status(&self) -> u16 {
        if self.is_partial() {
            STATUS_PARTIAL_CONTENT
        } else {
            STATUS_OK
        }
    }

    /// Render status and headers, handing the body over untouched
    pub fn into_response(self) -> ContentResponse {
        let status = self.status();
        let content_length = self.content_length();
        let (metadata, range, body) = self.into_parts();

        let headers = vec![
            (CONTENT_TYPE, metadata.content_type),
            (ACCEPT_RANGES, "bytes".to_string()),
            (CONTENT_LENGTH, content_length.to_string()),
            (CONTENT_RANGE, range.to_content_range(metadata.size)),
        ];

        ContentResponse {
            status,
            headers,
            body,
        }
    }
}

/// `Content-Range` value for a `416` response
pub fn unsatisfied_content_range(total_size: u64) -> String {
    format!("bytes */{}", total_size)
}
