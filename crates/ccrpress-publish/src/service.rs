//! Per-request orchestration: fetch, derive, render, pack.

use std::sync::Arc;

use ccrpress_core::AppConfig;
use ccrpress_core::models::PublicationRecord;
use tracing::info;

use crate::archive::{self, Archive};
use crate::assemble::RecordAssembler;
use crate::error::Result;
use crate::formats::{CitationRenderer, JatsRenderer};
use crate::hints::ManuscriptHints;
use crate::upstream::EditorialBackend;

pub struct PublicationService<B> {
    backend: B,
    config: Arc<AppConfig>,
    renderer: Box<dyn CitationRenderer>,
}

impl<B: EditorialBackend> PublicationService<B> {
    /// Service rendering JATS with the configured journal metadata.
    pub fn new(backend: B, config: Arc<AppConfig>) -> Self {
        let renderer = JatsRenderer::new(config.journal.clone());
        Self::with_renderer(backend, config, Box::new(renderer))
    }

    pub fn with_renderer(
        backend: B,
        config: Arc<AppConfig>,
        renderer: Box<dyn CitationRenderer>,
    ) -> Self {
        Self { backend, config, renderer }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Fetches the submission and its issue fresh and derives the record.
    pub async fn derive(&self, submission_id: u64, hints: &ManuscriptHints) -> Result<PublicationRecord> {
        let submission = self.backend.submission(submission_id).await?;
        let issue = match submission.issue_id {
            Some(issue_id) => Some(self.backend.issue(issue_id).await?),
            None => None,
        };
        info!(
            submission = submission_id,
            issue = ?submission.issue_id,
            "fetched submission"
        );

        RecordAssembler::new(&self.config).assemble(&submission, issue.as_ref(), hints)
    }

    pub fn render(&self, record: &PublicationRecord) -> Result<Vec<u8>> {
        self.renderer.render(record)
    }

    /// The derived record together with its rendered citation document.
    pub async fn citation(
        &self,
        submission_id: u64,
        hints: &ManuscriptHints,
    ) -> Result<(PublicationRecord, Vec<u8>)> {
        let record = self.derive(submission_id, hints).await?;
        let document = self.render(&record)?;
        Ok((record, document))
    }

    pub async fn package(
        &self,
        submission_id: u64,
        hints: &ManuscriptHints,
        manuscript: Option<&[u8]>,
    ) -> Result<Archive> {
        let (record, document) = self.citation(submission_id, hints).await?;
        let local_id = record.local_id().to_string();
        let bytes = archive::pack(&local_id, &document, manuscript)?;
        Ok(Archive { local_id, bytes })
    }
}
