//! External mod translation overlays.
//!
//! Mod files carry translations for content outside the base game. They are
//! merged, in the order given, into one layer that is applied to the primary
//! translation file after every module patch.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::types::BuildError;
use crate::codec::{Content, ContentFormat, Dialect};

/// Load and merge mod files. Later files override earlier ones key-for-key.
pub async fn load_mods(paths: &[PathBuf]) -> Result<Content, BuildError> {
  let mut overlay = Content::new();
  for path in paths {
    let content = load_mod(path).await?;
    debug!(path = %path.display(), keys = content.len(), "loaded mod file");
    overlay.extend(content);
  }
  Ok(overlay)
}

async fn load_mod(path: &Path) -> Result<Content, BuildError> {
  let format = match path.extension().and_then(|e| e.to_str()) {
    Some("json") => ContentFormat::Json,
    Some("lang") => ContentFormat::Lang(Dialect::Standard),
    _ => return Err(BuildError::UnsupportedMod { path: path.to_path_buf() }),
  };
  let text = tokio::fs::read_to_string(path).await.map_err(|source| BuildError::ReadMod {
    path: path.to_path_buf(),
    source,
  })?;
  format.parse(&text).map_err(|source| BuildError::ParseMod {
    path: path.to_path_buf(),
    source,
  })
}
