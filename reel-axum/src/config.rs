use reel_stream::{StoreConfig, StreamConfig, DEFAULT_READ_BUFFER_SIZE, MAX_CHUNK_SIZE};

/// Server defaults, overridable through `REEL_*` environment variables
struct ServerDefaults;

impl ServerDefaults {
    const HOST: &'static str = "127.0.0.1";
    const PORT: u16 = 3030;
    const BASE_PATH: &'static str = "/api/v1/videos";
}

/// Everything the server needs, resolved once at startup
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Prefix the content routes are mounted under; `/` mounts them at the root
    pub base_path: String,
    pub store: StoreConfig,
    pub stream: StreamConfig,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let stream = StreamConfig::new()
            .with_max_chunk_size(env_var_or("REEL_MAX_CHUNK_SIZE", MAX_CHUNK_SIZE))
            .with_read_buffer_size(env_var_or("REEL_READ_BUFFER_SIZE", DEFAULT_READ_BUFFER_SIZE));
        stream.validate()?;

        Ok(Self {
            host: env_var_or("REEL_HTTP_HOST", ServerDefaults::HOST.to_string()),
            port: env_var_or("REEL_HTTP_PORT", ServerDefaults::PORT),
            base_path: env_var_or("REEL_BASE_PATH", ServerDefaults::BASE_PATH.to_string()),
            store: StoreConfig::from_env()?,
            stream,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse an environment variable, falling back to `default` when it is unset or unparsable
pub fn env_var_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
    T::Err: std::fmt::Debug,
{
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or(default)
}
