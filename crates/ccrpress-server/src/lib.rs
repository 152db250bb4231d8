//! ccrpress server: HTTP front-end for record derivation and packaging.

pub mod http;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use ccrpress_publish::{EditorialBackend, PublicationService};

/// Largest manuscript accepted by the archive endpoint.
pub const MAX_MANUSCRIPT_BYTES: usize = 64 * 1024 * 1024;

/// Shared application state. Holds nothing mutable: every request fetches
/// fresh upstream data through the service.
pub struct AppState<B> {
    pub service: PublicationService<B>,
}

impl<B: EditorialBackend> AppState<B> {
    pub fn new(service: PublicationService<B>) -> Self {
        Self { service }
    }
}

/// Create the API router
pub fn create_router<B: EditorialBackend + 'static>(state: Arc<AppState<B>>) -> Router {
    Router::new()
        .route("/health", get(http::health))
        .route("/submissions/{id}/record", get(http::get_record::<B>))
        .route("/submissions/{id}/jats", get(http::get_jats::<B>))
        .route(
            "/submissions/{id}/archive",
            post(http::post_archive::<B>).layer(DefaultBodyLimit::max(MAX_MANUSCRIPT_BYTES)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn serve<B: EditorialBackend + 'static>(
    addr: &str,
    state: Arc<AppState<B>>,
) -> std::io::Result<()> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("ccrpress server listening on {}", addr);
    axum::serve(listener, app).await
}
