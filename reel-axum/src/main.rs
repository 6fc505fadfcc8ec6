use anyhow::Result;
use reel_axum::{ReelApp, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ServerConfig::from_env()?;
    let app = ReelApp::from_config(&config).await?;

    let addr = config.addr();
    tracing::info!("[reel] listening on http://{addr}{}", config.base_path);

    app.listen(addr).await?;

    Ok(())
}
