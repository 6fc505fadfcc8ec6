use crate::{LocalStoreConfig, S3Config, StreamError, StreamResult, MAX_CHUNK_SIZE};

/// Default size of a single read from a local file (8 KiB)
pub const DEFAULT_READ_BUFFER_SIZE: usize = 8 * 1024;

/// Configuration for content streaming
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Upper bound on the bytes served by one `load_content` call
    pub max_chunk_size: u64,

    /// Size of the reads a store issues while producing a chunk
    pub read_buffer_size: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: MAX_CHUNK_SIZE,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }
}

impl StreamConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chunk ceiling
    pub fn with_max_chunk_size(mut self, bytes: u64) -> Self {
        self.max_chunk_size = bytes;
        self
    }

    /// Set the read buffer size
    pub fn with_read_buffer_size(mut self, bytes: usize) -> Self {
        self.read_buffer_size = bytes;
        self
    }

    /// Reject settings that could never produce a byte
    pub fn validate(&self) -> StreamResult<()> {
        if self.max_chunk_size == 0 {
            return Err(StreamError::invalid("max_chunk_size must be greater than zero"));
        }
        if self.read_buffer_size == 0 {
            return Err(StreamError::invalid("read_buffer_size must be greater than zero"));
        }
        Ok(())
    }
}

/// Which backing store to serve from, chosen once at startup
#[derive(Debug, Clone)]
pub enum StoreConfig {
    Local(LocalStoreConfig),
    S3(S3Config),
}

impl StoreConfig {
    /// Select a store from `REEL_STORE` (`local`, the default, or `s3`)
    pub fn from_env() -> StreamResult<Self> {
        let kind = std::env::var("REEL_STORE").unwrap_or_else(|_| "local".to_string());
        match kind.trim().to_ascii_lowercase().as_str() {
            "local" | "fs" => Ok(Self::Local(LocalStoreConfig::from_env())),
            "s3" => Ok(Self::S3(S3Config::from_env()?)),
            other => Err(StreamError::invalid(format!(
                "unknown REEL_STORE '{}', expected 'local' or 's3'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_one_mebibyte_and_eight_kibibytes() {
        let config = StreamConfig::default();
        assert_eq!(config.max_chunk_size, 1024 * 1024);
        assert_eq!(config.read_buffer_size, 8192);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_sizes_are_rejected() {
        assert!(StreamConfig::new().with_max_chunk_size(0).validate().is_err());
        assert!(StreamConfig::new().with_read_buffer_size(0).validate().is_err());
    }
}
