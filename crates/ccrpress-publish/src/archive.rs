use std::io::{Cursor, Seek, Write};

use tracing::info;
use zip::CompressionMethod;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;

use crate::error::Result;

/// Media type announced for downloaded archives.
pub const ARCHIVE_MEDIA_TYPE: &str = "application/x-zip-compressed";

/// A packed submission, ready to hand to the hosting platform.
#[derive(Debug, Clone)]
pub struct Archive {
    pub local_id: String,
    pub bytes: Vec<u8>,
}

impl Archive {
    /// Suggested download name, `{local_id}.zip`.
    pub fn file_name(&self) -> String {
        format!("{}.zip", self.local_id)
    }

    pub fn media_type(&self) -> &'static str {
        ARCHIVE_MEDIA_TYPE
    }
}

/// Bundles the citation document and, when present, the manuscript PDF into
/// a fresh deflate-compressed zip named after `local_id`.
pub fn pack(local_id: &str, document: &[u8], manuscript: Option<&[u8]>) -> Result<Vec<u8>> {
    let bytes = pack_into(Cursor::new(Vec::new()), local_id, document, manuscript)?.into_inner();
    info!(
        local_id,
        with_manuscript = manuscript.is_some(),
        size = bytes.len(),
        "packed archive"
    );
    Ok(bytes)
}

/// Writes the archive to `sink`. Every fault, including a failed write of
/// entry data, surfaces as
/// [`PublishError::Packaging`](crate::error::PublishError::Packaging).
pub fn pack_into<W: Write + Seek>(
    sink: W,
    local_id: &str,
    document: &[u8],
    manuscript: Option<&[u8]>,
) -> Result<W> {
    let mut zip = zip::ZipWriter::new(sink);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    if let Some(pdf) = manuscript {
        zip.start_file(format!("{local_id}.pdf"), options)?;
        zip.write_all(pdf).map_err(ZipError::Io)?;
    }
    zip.start_file(format!("{local_id}.xml"), options)?;
    zip.write_all(document).map_err(ZipError::Io)?;

    Ok(zip.finish()?)
}
