//! ccrpress publishing engine: DOI and page derivation, JATS rendering,
//! archive packaging and the editorial-backend client.

pub mod archive;
pub mod assemble;
pub mod error;
pub mod formats;
pub mod hints;
pub mod identifiers;
pub mod pages;
pub mod sequence;
pub mod service;
pub mod text;
pub mod upstream;

pub use archive::{ARCHIVE_MEDIA_TYPE, Archive};
pub use assemble::RecordAssembler;
pub use error::{PublishError, Result};
pub use formats::{CitationRenderer, JatsRenderer};
pub use hints::ManuscriptHints;
pub use identifiers::CanonicalDoi;
pub use service::PublicationService;
pub use upstream::{EditorialBackend, OjsClient};
