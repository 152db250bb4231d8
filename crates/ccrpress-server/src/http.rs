//! Route handlers.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use ccrpress_core::PublicationRecord;
use ccrpress_publish::{EditorialBackend, ManuscriptHints, PublishError};

use crate::AppState;

/// A failed request. Data problems are the client's to fix (422), upstream
/// problems are reported as a bad gateway (502), the rest is ours (500).
#[derive(Debug)]
pub struct ApiError(pub PublishError);

impl From<PublishError> for ApiError {
    fn from(err: PublishError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            PublishError::MissingLocalization { .. }
            | PublishError::MissingDoiInfo(_)
            | PublishError::UnparseableDoi(_)
            | PublishError::IssueNotAssigned(_)
            | PublishError::NoAuthors(_)
            | PublishError::EmptyAuthorCode(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PublishError::UpstreamUnavailable(_)
            | PublishError::Api(..)
            | PublishError::Payload(_) => StatusCode::BAD_GATEWAY,
            PublishError::Render(_) | PublishError::Packaging(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::warn!(error = %self.0, "request rejected");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

pub async fn get_record<B: EditorialBackend>(
    State(state): State<Arc<AppState<B>>>,
    Path(id): Path<u64>,
    Query(hints): Query<ManuscriptHints>,
) -> Result<Json<PublicationRecord>, ApiError> {
    Ok(Json(state.service.derive(id, &hints).await?))
}

pub async fn get_jats<B: EditorialBackend>(
    State(state): State<Arc<AppState<B>>>,
    Path(id): Path<u64>,
    Query(hints): Query<ManuscriptHints>,
) -> Result<Response, ApiError> {
    let (_, document) = state.service.citation(id, &hints).await?;
    Ok(([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], document).into_response())
}

/// The request body is the manuscript PDF; an empty body packs the citation
/// document alone.
pub async fn post_archive<B: EditorialBackend>(
    State(state): State<Arc<AppState<B>>>,
    Path(id): Path<u64>,
    Query(hints): Query<ManuscriptHints>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let manuscript = (!body.is_empty()).then_some(body.as_ref());
    let archive = state.service.package(id, &hints, manuscript).await?;

    let disposition = format!("attachment; filename=\"{}\"", archive.file_name());
    Ok((
        [
            (header::CONTENT_TYPE, archive.media_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        archive.bytes,
    )
        .into_response())
}
