pub mod jats;

use ccrpress_core::models::PublicationRecord;

use crate::error::Result;

pub use jats::JatsRenderer;

/// Serializes a derived record into a citation-metadata document.
///
/// The packager stores the output as `{local_id}.xml` without looking inside.
pub trait CitationRenderer: Send + Sync {
    fn render(&self, record: &PublicationRecord) -> Result<Vec<u8>>;
}
