use async_stream::try_stream;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::Client;
use bytes::Bytes;
use futures_core::Stream;
use std::env;
use tracing::{debug, error, warn};

use crate::content_type::infer_content_type;
use crate::store::{ContentStore, ContentStreamer, MetadataProvider, StoreDescription};
use crate::stream::exact_length;
use crate::{ByteStream, ObjectMetadata, ResolvedRange, StreamError, StreamResult};

/// S3-compatible storage configuration
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible servers (MinIO, RustFS, ...)
    pub endpoint_url: Option<String>,
    /// Static credentials; the default provider chain is used when absent
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Limits the store to keys under this prefix
    pub prefix: Option<String>,
    pub force_path_style: bool,
}

impl S3Config {
    pub fn new<S: Into<String>>(bucket: S) -> Self {
        Self {
            bucket: bucket.into(),
            region: "us-east-1".to_string(),
            endpoint_url: None,
            access_key_id: None,
            secret_access_key: None,
            prefix: None,
            force_path_style: false,
        }
    }

    /// Load from `REEL_S3_*` environment variables. Only the bucket is required.
    pub fn from_env() -> StreamResult<Self> {
        fn optional(key: &str) -> Option<String> {
            env::var(key).ok().filter(|v| !v.trim().is_empty())
        }

        let bucket = optional("REEL_S3_BUCKET")
            .ok_or_else(|| StreamError::invalid("REEL_S3_BUCKET environment variable required"))?;

        let endpoint_url = optional("REEL_S3_ENDPOINT_URL");
        let force_path_style = optional("REEL_S3_FORCE_PATH_STYLE")
            .and_then(|v| v.parse().ok())
            .unwrap_or(endpoint_url.is_some());

        Ok(Self {
            bucket,
            region: optional("REEL_S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            endpoint_url,
            access_key_id: optional("REEL_S3_ACCESS_KEY_ID"),
            secret_access_key: optional("REEL_S3_SECRET_ACCESS_KEY"),
            prefix: optional("REEL_S3_PREFIX"),
            force_path_style,
        })
    }

    pub fn with_region<S: Into<String>>(mut self, region: S) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_endpoint<S: Into<String>>(mut self, endpoint_url: S) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self.force_path_style = true;
        self
    }

    pub fn with_credentials<A: Into<String>, S: Into<String>>(mut self, access_key_id: A, secret_access_key: S) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self.secret_access_key = Some(secret_access_key.into());
        self
    }

    pub fn with_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.prefix = Some(prefix.into());
        self
    }
}

/// Content store over one bucket of an S3-compatible object store
#[derive(Clone)]
pub struct S3CompatibleStore {
    client: Client,
    bucket: String,
    prefix: String,
}

impl S3CompatibleStore {
    pub async fn new(config: S3Config) -> StreamResult<Self> {
        if config.bucket.trim().is_empty() {
            return Err(StreamError::invalid("S3 bucket name must not be empty"));
        }

        let bucket = config.bucket.clone();
        let prefix = config.prefix.clone();
        let client = Self::create_client(config).await;
        Ok(Self::from_client(client, bucket).with_prefix(prefix.unwrap_or_default()))
    }

    /// Wrap an already configured client
    pub fn from_client<S: Into<String>>(client: Client, bucket: S) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: String::new(),
        }
    }

    pub fn with_prefix<S: AsRef<str>>(mut self, prefix: S) -> Self {
        self.prefix = normalize_prefix(prefix.as_ref());
        self
    }

    async fn create_client(config: S3Config) -> Client {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region));

        if let (Some(access_key_id), Some(secret_access_key)) =
            (config.access_key_id, config.secret_access_key)
        {
            let credentials = Credentials::new(access_key_id, secret_access_key, None, None, "reel");
            loader = loader.credentials_provider(credentials);
        }

        if let Some(endpoint_url) = config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }

        let aws_config = loader.load().await;

        Client::from_conf(
            aws_sdk_s3::config::Builder::from(&aws_config)
                .force_path_style(config.force_path_style)
                .build(),
        )
    }

    fn object_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

#[async_trait]
impl MetadataProvider for S3CompatibleStore {
    async fn head(&self, key: &str) -> StreamResult<ObjectMetadata> {
        let result = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(self.object_key(key))
            .send()
            .await
            .map_err(|err| {
                let not_found = err.as_service_error().is_some_and(|e| e.is_not_found())
                    || is_not_found_status(&err);
                if not_found {
                    StreamError::not_found(key)
                } else {
                    error!("Failed to get S3 content metadata for key {}: {}", key, err);
                    StreamError::backend(err)
                }
            })?;

        let content_type = result
            .content_type
            .filter(|ct| !ct.is_empty())
            .unwrap_or_else(|| infer_content_type(key));

        let size = result
            .content_length
            .filter(|len| *len >= 0)
            .ok_or_else(|| {
                error!("S3 metadata for key {} carries no content length", key);
                protocol_error(format!("no content length for '{}'", key))
            })?;

        Ok(ObjectMetadata::new(key, content_type, size as u64))
    }

    async fn list(&self) -> StreamResult<Vec<ObjectMetadata>> {
        let mut request = self.client.list_objects_v2().bucket(&self.bucket);
        if !self.prefix.is_empty() {
            request = request.prefix(&self.prefix);
        }

        let mut pages = request.into_paginator().send();
        let mut listing = Vec::new();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|err| {
                error!("Failed to list S3 content in bucket {}: {}", self.bucket, err);
                StreamError::backend(err)
            })?;

            for object in page.contents() {
                let Some(object_key) = object.key() else {
                    warn!("Skipping S3 listing entry without a key");
                    continue;
                };
                if let Some(metadata) =
                    listing_entry(&self.prefix, object_key, object.size().unwrap_or(0))
                {
                    listing.push(metadata);
                }
            }
        }

        Ok(listing)
    }
}

#[async_trait]
impl ContentStreamer for S3CompatibleStore {
    async fn open(&self, key: &str, range: ResolvedRange) -> StreamResult<ByteStream> {
        let body = object_body(
            self.client.clone(),
            self.bucket.clone(),
            self.object_key(key),
            key.to_string(),
            range,
        );
        Ok(exact_length(key.to_string(), Box::pin(body), range.content_length()))
    }
}

impl ContentStore for S3CompatibleStore {
    fn describe(&self) -> StoreDescription {
        StoreDescription::new("s3", format!("s3://{}/{}", self.bucket, self.prefix))
    }
}

/// Ranged GET, issued on first poll
fn object_body(
    client: Client,
    bucket: String,
    object_key: String,
    key: String,
    range: ResolvedRange,
) -> impl Stream<Item = StreamResult<Bytes>> + Send {
    try_stream! {
        let range_header = range.to_request_header();
        debug!("Streaming S3 object {}/{}. {}", bucket, object_key, range_header);

        let output = client
            .get_object()
            .bucket(&bucket)
            .key(&object_key)
            .range(&range_header)
            .send()
            .await
            .map_err(|err| {
                if err.as_service_error().is_some_and(|e| e.is_no_such_key()) {
                    StreamError::not_found(key.as_str())
                } else {
                    error!("Error streaming S3 object {}/{}. {}: {}", bucket, object_key, range_header, err);
                    StreamError::backend(err)
                }
            })?;

        check_served_range(&key, range, output.content_range())?;

        let mut body = output.body;
        while let Some(chunk) = body.try_next().await.map_err(|err| {
            error!("Error reading S3 object {}/{}. {}: {}", bucket, object_key, range_header, err);
            StreamError::backend(err)
        })? {
            yield chunk;
        }
    }
}

/// The body must start where the chunk starts. A server that ignores
/// `Range` and answers with the whole object is only correct at offset 0.
fn check_served_range(key: &str, range: ResolvedRange, content_range: Option<&str>) -> StreamResult<()> {
    let served_start = match content_range {
        Some(value) => content_range_start(value),
        None => Some(0),
    };

    if served_start == Some(range.start()) {
        return Ok(());
    }

    error!(
        "S3 answered {:?} for key {} when {} was requested",
        content_range,
        key,
        range.to_request_header()
    );
    Err(protocol_error(format!(
        "content '{}' served from {:?} instead of byte {}",
        key,
        content_range,
        range.start()
    )))
}

/// Start offset of a `bytes <start>-<end>/<size>` value
fn content_range_start(value: &str) -> Option<u64> {
    let (unit, rest) = value.trim().split_once(' ')?;
    if !unit.eq_ignore_ascii_case("bytes") {
        return None;
    }
    let (start, _) = rest.split_once('-')?;
    start.trim().parse().ok()
}

fn protocol_error(message: String) -> StreamError {
    StreamError::backend(std::io::Error::new(std::io::ErrorKind::InvalidData, message))
}

fn is_not_found_status<E>(err: &SdkError<E, HttpResponse>) -> bool {
    err.raw_response()
        .is_some_and(|raw| raw.status().as_u16() == 404)
}

/// Listing entries carry no content type, so it is inferred from the key.
/// Returns `None` for the prefix itself and other unnamed entries.
fn listing_entry(prefix: &str, object_key: &str, size: i64) -> Option<ObjectMetadata> {
    let key = object_key.strip_prefix(prefix).unwrap_or(object_key);
    if key.is_empty() || key.ends_with('/') {
        return None;
    }
    Some(ObjectMetadata::new(key, infer_content_type(key), size.max(0) as u64))
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}/", trimmed)
    }
}
