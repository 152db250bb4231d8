//! ccrpress server binary.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use ccrpress_core::AppConfig;
use ccrpress_publish::{OjsClient, PublicationService};
use ccrpress_server::{AppState, serve};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = Arc::new(AppConfig::load()?);
    let token = config
        .api_token()
        .with_context(|| format!("no API token: set {}", config.upstream.token_env))?;
    let client = OjsClient::new(&config.upstream, token)?;

    let addr = std::env::var("CCRPRESS_ADDR")
        .unwrap_or_else(|_| format!("{}:{}", config.server.host, config.server.port));
    let state = Arc::new(AppState::new(PublicationService::new(client, config)));

    serve(&addr, state).await?;
    Ok(())
}
