mod config;
mod css;
mod error;
mod extractor;
mod fonts;
mod server;
mod stylesheets;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::ServerConfig;
use extractor::PageExtractor;

// ============================================
// Process bootstrap
// ============================================

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested, draining connections"),
        Err(e) => {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = ServerConfig::from_env();
    let extractor = PageExtractor::new(config.scraper.clone())?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("Server running on port {}", config.port);

    axum::serve(listener, server::router(extractor))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
