//! Archive entries and serialization.
//!
//! An [`EntrySet`] maps archive paths to where their bytes come from. Paths
//! are kept sorted, so resolving and writing the set always visits entries in
//! the same order. Inserting an existing path replaces the earlier source,
//! which is how later layers (modules, computed files) override earlier ones.
//!
//! - [`entry`] - entry sources and the entry set
//! - [`resolve`] - turning sources into bytes
//! - [`writer`] - the deterministic zip writer

mod entry;
mod resolve;
mod writer;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::codec::CodecError;

pub use entry::{BaseContent, ComputedContent, EntrySet, EntrySource};
pub use resolve::{ResolvedEntry, resolve_entries};
pub use writer::write_zip;

#[derive(Debug, Error)]
pub enum ArchiveError {
  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse {path}: {source}")]
  Parse {
    path: String,
    #[source]
    source: CodecError,
  },

  #[error("failed to render {path}: {source}")]
  Render {
    path: String,
    #[source]
    source: CodecError,
  },

  #[error("failed to write archive: {0}")]
  Zip(#[from] zip::result::ZipError),

  #[error("failed to write archive: {0}")]
  Io(#[from] io::Error),

  #[error("entry resolution task failed: {0}")]
  Task(#[from] tokio::task::JoinError),
}
