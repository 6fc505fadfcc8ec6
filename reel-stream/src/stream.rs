use async_stream::try_stream;
use bytes::Bytes;
use futures_core::Stream;
use futures_util::StreamExt;
use std::io;

use crate::{ByteStream, StreamError, StreamResult};

/// Error for a source that ran out before producing the expected bytes
pub(crate) fn short_read(key: &str, expected: u64, produced: u64) -> StreamError {
    StreamError::backend(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!(
            "content '{}' ended after {} of {} bytes",
            key, produced, expected
        ),
    ))
}

/// Bound `inner` to exactly `expected` bytes.
///
/// Surplus bytes are cut off; a source that ends early yields an error
/// rather than a silently truncated body.
pub(crate) fn exact_length(key: String, inner: ByteStream, expected: u64) -> ByteStream {
    Box::pin(exact_length_stream(key, inner, expected))
}

fn exact_length_stream(
    key: String,
    mut inner: ByteStream,
    expected: u64,
) -> impl Stream<Item = StreamResult<Bytes>> + Send {
    try_stream! {
        let mut remaining = expected;
        while remaining > 0 {
            let mut chunk = match inner.next().await {
                Some(chunk) => chunk?,
                None => Err::<Bytes, StreamError>(short_read(&key, expected, expected - remaining))?,
            };
            if chunk.is_empty() {
                continue;
            }
            if chunk.len() as u64 > remaining {
                chunk.truncate(remaining as usize);
            }
            remaining -= chunk.len() as u64;
            yield chunk;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::{stream, TryStreamExt};

    fn chunks(parts: &[&'static [u8]]) -> ByteStream {
        let items: Vec<StreamResult<Bytes>> = parts
            .iter()
            .map(|p| Ok(Bytes::from_static(p)))
            .collect();
        Box::pin(stream::iter(items))
    }

    #[tokio::test]
    async fn passes_exact_content_through() {
        let out: Vec<Bytes> = exact_length("k".into(), chunks(&[b"abc", b"def"]), 6)
            .try_collect()
            .await
            .unwrap();
        assert_eq!(out.concat(), b"abcdef");
    }

    #[tokio::test]
    async fn truncates_surplus_bytes() {
        let out: Vec<Bytes> = exact_length("k".into(), chunks(&[b"abc", b"def"]), 4)
            .try_collect()
            .await
            .unwrap();
        assert_eq!(out.concat(), b"abcd");
    }

    #[tokio::test]
    async fn early_end_is_an_error() {
        let result: StreamResult<Vec<Bytes>> =
            exact_length("k".into(), chunks(&[b"abc"]), 10).try_collect().await;
        assert!(matches!(result, Err(StreamError::Backend { .. })));
    }

    #[tokio::test]
    async fn upstream_error_ends_the_stream() {
        let items: Vec<StreamResult<Bytes>> = vec![
            Ok(Bytes::from_static(b"ab")),
            Err(StreamError::backend(io::Error::other("reset"))),
            Ok(Bytes::from_static(b"cd")),
        ];
        let mut bounded = exact_length("k".into(), Box::pin(stream::iter(items)), 4);

        assert_eq!(bounded.next().await.unwrap().unwrap(), Bytes::from_static(b"ab"));
        assert!(bounded.next().await.unwrap().is_err());
        assert!(bounded.next().await.is_none());
    }
}
