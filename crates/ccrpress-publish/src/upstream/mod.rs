//! Access to the editorial backend.

use async_trait::async_trait;
use ccrpress_core::models::{Issue, SubmissionMetadata};

use crate::error::Result;

pub mod client;
pub mod payload;

pub use client::OjsClient;
pub use payload::{DoiLocation, normalize_issue, normalize_submission};

/// Read-only view of the editorial backend. Implementations must fetch fresh
/// data on every call.
#[async_trait]
pub trait EditorialBackend: Send + Sync {
    /// Metadata of the submission's current publication.
    async fn submission(&self, id: u64) -> Result<SubmissionMetadata>;

    async fn issue(&self, id: u64) -> Result<Issue>;
}
