use tracing::info;
use tracing_subscriber::EnvFilter;

use era_directory::config::AppConfig;
use era_directory::{create_router, initialize_backend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Setting up backend");
    let app_state = initialize_backend(&config)?;
    let app = create_router(app_state, config.allowed_origin.as_deref())?;

    info!("Starting server on {}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
