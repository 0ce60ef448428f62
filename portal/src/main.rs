use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use college_portal::backend::config::PortalConfig;
use college_portal::backend::{create_router, initialize_backend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = PortalConfig::load().context("Failed to load configuration")?;
    info!(
        "Starting {} with uploads under {:?}",
        config.college.name, config.storage.upload_root
    );

    let state = initialize_backend(&config)?;
    let app = create_router(state, &config);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
