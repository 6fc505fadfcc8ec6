use std::sync::Arc;

use axum::Router;
use reel_stream::{ContentStreamAdapter, StreamingAdapter};
use tokio::net::{TcpListener, ToSocketAddrs};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{rest, ReelState, ServerConfig};

#[derive(Clone)]
pub struct ReelApp {
    pub router: Router<()>,
}

impl ReelApp {
    /// Mount the content routes under `base_path` with request tracing and ids
    pub fn new(adapter: Arc<dyn ContentStreamAdapter>, base_path: &str) -> Self {
        let content = rest::content_router(ReelState::from_arc(adapter));

        let router = match mount_path(base_path) {
            Some(path) => Router::new().nest(&path, content),
            None => content,
        };

        let router = router
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

        Self { router }
    }

    /// Build the configured store and the app around it
    pub async fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let adapter =
            StreamingAdapter::from_config(config.store.clone(), config.stream.clone()).await?;

        info!("Serving content from {}", adapter.describe());
        info!(
            "Max chunk size: {} bytes, read buffer: {} bytes",
            adapter.config().max_chunk_size,
            adapter.config().read_buffer_size
        );

        Ok(Self::new(Arc::new(adapter), &config.base_path))
    }

    pub async fn listen<A>(self, addr: A) -> anyhow::Result<()>
    where
        A: ToSocketAddrs,
    {
        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

/// `/videos/` and `videos` both mount at `/videos`; `None` means the root
fn mount_path(base_path: &str) -> Option<String> {
    let trimmed = base_path.trim().trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("/{}", trimmed))
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown requested");
    }
}
