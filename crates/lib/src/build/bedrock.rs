//! Bedrock texture index merging.
//!
//! `textures/item_texture.json` and `textures/terrain_texture.json` are
//! indexes: every module adds its own `texture_data` entries to the one the
//! base pack ships. A plain file copy would keep only the last module's
//! index, so these files are merged instead.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::task::JoinSet;
use tracing::warn;

use super::types::BuildError;
use crate::codec::Content;
use crate::module::Module;

const TEXTURE_DATA: &str = "texture_data";

/// A merged texture index, plus warnings for sources that were skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextureIndex {
  /// `None` when neither the base nor any module has this index.
  pub content: Option<Content>,
  pub warnings: Vec<String>,
}

/// Merge the texture index at `path` across the base and `modules`.
///
/// The base index is the starting point; each module's `texture_data` is
/// overlaid in priority order. Files are read concurrently and merged in
/// order once all reads finish. Unreadable or malformed files are skipped.
pub async fn merge_texture_index(
  path: &str,
  base_root: Option<&Path>,
  modules: &[Module],
) -> Result<TextureIndex, BuildError> {
  let mut sources: Vec<PathBuf> = Vec::new();
  if let Some(root) = base_root {
    sources.push(root.join(path));
  }
  sources.extend(
    modules
      .iter()
      .filter(|m| m.files.iter().any(|f| f == path))
      .map(|m| m.root.join(path)),
  );

  let mut join_set = JoinSet::new();
  for (idx, file) in sources.into_iter().enumerate() {
    join_set.spawn(async move {
      let loaded = read_index(&file).await;
      (idx, file, loaded)
    });
  }

  let mut loaded = Vec::new();
  while let Some(joined) = join_set.join_next().await {
    loaded.push(joined?);
  }
  loaded.sort_by_key(|(idx, _, _)| *idx);

  let mut index = TextureIndex::default();
  for (idx, file, result) in loaded {
    let content = match result {
      Ok(Some(content)) => content,
      Ok(None) => continue,
      Err(reason) => {
        warn!(path = %file.display(), %reason, "skipping texture index");
        index.warnings.push(format!("skipped {}: {}", file.display(), reason));
        continue;
      }
    };

    let merged = index.content.get_or_insert_with(Content::new);
    if idx == 0 && base_root.is_some() {
      *merged = content;
      continue;
    }
    overlay_texture_data(merged, content);
  }

  Ok(index)
}

fn overlay_texture_data(target: &mut Content, source: Content) {
  let Some(Value::Object(incoming)) = source.get(TEXTURE_DATA).cloned() else {
    return;
  };
  let slot = target
    .entry(TEXTURE_DATA.to_string())
    .or_insert_with(|| Value::Object(Content::new()));
  if !slot.is_object() {
    *slot = Value::Object(Content::new());
  }
  if let Value::Object(data) = slot {
    data.extend(incoming);
  }
}

async fn read_index(file: &Path) -> Result<Option<Content>, String> {
  let text = match tokio::fs::read_to_string(file).await {
    Ok(text) => text,
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
    Err(e) => return Err(e.to_string()),
  };
  let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
  serde_json::from_str(text).map(Some).map_err(|e| e.to_string())
}
