use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use super::ArchiveError;
use super::resolve::ResolvedEntry;

/// Write resolved entries into an in-memory zip.
///
/// Every entry gets the same timestamp (the DOS epoch, 1980-01-01) and the
/// same permissions, so identical entries always produce identical bytes.
pub fn write_zip(entries: &[ResolvedEntry]) -> Result<Vec<u8>, ArchiveError> {
  let options = SimpleFileOptions::default()
    .compression_method(CompressionMethod::Deflated)
    .last_modified_time(DateTime::default())
    .unix_permissions(0o644);

  let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
  for entry in entries {
    zip.start_file(entry.path.as_str(), options)?;
    zip.write_all(&entry.data)?;
  }
  Ok(zip.finish()?.into_inner())
}
