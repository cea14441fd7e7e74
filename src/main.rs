// MCP server binary: scraping tools over stateless streamable HTTP.
//
// Configuration comes from the environment (optionally via .env):
// SCRAPER_EXE_PATH, MCP_PORT, SCRAPER_MAX_CONCURRENT.

use anyhow::Result;
use scraper_bridge::config::ServerConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!(
        exe = %config.exe_path().display(),
        cwd = %config.exe_dir().display(),
        port = config.port(),
        "starting scraper-bridge"
    );

    scraper_bridge::server::serve_http(config).await
}
