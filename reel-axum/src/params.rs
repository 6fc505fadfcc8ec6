use axum::http::header::RANGE;
use axum::http::HeaderMap;
use reel_stream::ByteRange;

/// Requested range of a content request, taken from the `Range` header
pub fn range_from_headers(headers: &HeaderMap) -> ByteRange {
    parse_range_header(headers.get(RANGE).and_then(|v| v.to_str().ok()))
}

/// Parse `bytes=<start>-<end>` leniently.
///
/// Never fails: a missing header or one without `=` means no range, a blank
/// or non-numeric start becomes 0, and a blank, non-numeric or missing end
/// is left open.
pub fn parse_range_header(header: Option<&str>) -> ByteRange {
    let Some((_, ranges)) = header.and_then(|h| h.split_once('=')) else {
        return ByteRange::from_start(0);
    };

    let (start, end) = match ranges.split_once('-') {
        Some((start, end)) => (start, Some(end)),
        None => (ranges, None),
    };

    ByteRange::new(
        Some(parse_offset(start).unwrap_or(0)),
        end.and_then(parse_offset),
    )
}

fn parse_offset(value: &str) -> Option<u64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.parse().ok()
}
