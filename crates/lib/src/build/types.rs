//! Error and result types for pack builds.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::archive::ArchiveError;
use crate::codec::CodecError;
use crate::options::OptionsError;
use crate::patch::PatchError;
use crate::util::hash::ContentHash;

/// Errors that abort a build.
#[derive(Debug, Error)]
pub enum BuildError {
  /// The options were rejected before any I/O.
  #[error(transparent)]
  Options(#[from] OptionsError),

  #[error(transparent)]
  Patch(#[from] PatchError),

  #[error(transparent)]
  Archive(#[from] ArchiveError),

  /// The base resource directory could not be walked.
  #[error("failed to list base resources in {path}: {source}")]
  ListBase {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },

  /// A mod file has an extension other than `.json` or `.lang`.
  #[error("unsupported mod file {path}: expected .json or .lang")]
  UnsupportedMod { path: PathBuf },

  #[error("failed to read mod file {path}: {source}")]
  ReadMod {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse mod file {path}: {source}")]
  ParseMod {
    path: PathBuf,
    #[source]
    source: CodecError,
  },

  #[error("failed to read legacy key mapping {path}: {source}")]
  ReadMapping {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse legacy key mapping {path}: {source}")]
  ParseMapping {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("build task failed: {0}")]
  Task(#[from] tokio::task::JoinError),
}

/// A finished pack.
///
/// `content` is the zip archive. The same modules and options always give
/// the same bytes, and therefore the same `hash`.
#[derive(Debug, Clone)]
pub struct BuildResult {
  pub content: Vec<u8>,
  pub hash: ContentHash,
  /// Selected module names, in patch application order.
  pub modules: Vec<String>,
  /// Non-fatal problems found along the way.
  pub warnings: Vec<String>,
}
