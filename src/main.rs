use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use buyback_dashboard::app;
use buyback_dashboard::config::AppConfig;
use buyback_dashboard::external::HttpBuybackFeed;
use buyback_dashboard::logging::{init_logging, LoggingConfig};
use buyback_dashboard::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let config = AppConfig::from_env().context("invalid configuration")?;
    let feed = HttpBuybackFeed::from_config(&config).context("failed to build feed client")?;
    tracing::info!(
        "Buyback feed: {} (timeout: {:?}), display zone: {}",
        feed.url(),
        config.feed_timeout,
        config.timezone
    );

    let state = AppState {
        feed: Arc::new(feed),
        timezone: config.timezone,
    };
    let app = app::create_app(state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("Buyback dashboard running at http://{}/", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
