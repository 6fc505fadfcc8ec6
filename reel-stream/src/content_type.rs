/// Fallback for names without an extension
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Infer a content type from a file name.
///
/// Anything with an extension is reported as `video/<extension>`; no sniffing
/// of the actual bytes takes place.
pub fn infer_content_type(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((_, extension)) => format!("video/{}", extension),
        None => DEFAULT_CONTENT_TYPE.to_string(),
    }
}
