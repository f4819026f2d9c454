//! Legacy translation key mapping.
//!
//! Older clients use different translation keys for some entries. The
//! mapping table stores `legacy key -> modern key` pairs, either in one JSON
//! object or split across fragments named by an index:
//!
//! ```json
//! ["blocks", "items", "entities"]
//! ```
//!
//! Each fragment name resolves to `<name>.json` next to the index.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::types::BuildError;
use crate::codec::Content;

/// Renames modern translation keys to their legacy equivalents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyMapping {
  modern_to_legacy: HashMap<String, String>,
}

impl KeyMapping {
  /// Build a mapping from `legacy -> modern` pairs.
  ///
  /// When several legacy keys name the same modern key, the first pair wins.
  /// Pairs mapping a key to itself are ignored.
  pub fn from_pairs<I, K, V>(pairs: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    let mut modern_to_legacy: HashMap<String, String> = HashMap::new();
    for (legacy, modern) in pairs {
      let legacy: String = legacy.into();
      let modern: String = modern.into();
      if legacy != modern {
        modern_to_legacy.entry(modern).or_insert(legacy);
      }
    }
    Self { modern_to_legacy }
  }

  pub fn len(&self) -> usize {
    self.modern_to_legacy.len()
  }

  pub fn is_empty(&self) -> bool {
    self.modern_to_legacy.is_empty()
  }

  /// Rename every mapped key in place. Unmapped keys pass through.
  ///
  /// A legacy key already present in `content` is dropped when a modern key
  /// is renamed onto it, so the modern value always wins.
  pub fn apply(&self, content: Content) -> Content {
    let shadowed: HashSet<&str> = content
      .keys()
      .filter_map(|key| self.modern_to_legacy.get(key))
      .map(String::as_str)
      .collect();

    let mut renamed = Content::new();
    for (key, value) in content {
      match self.modern_to_legacy.get(&key) {
        Some(legacy) => {
          renamed.insert(legacy.clone(), value);
        }
        None if shadowed.contains(key.as_str()) => {}
        None => {
          renamed.insert(key, value);
        }
      }
    }
    renamed
  }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MappingFile {
  Table(Content),
  Index(Vec<String>),
}

/// Load a key mapping from a table file or a fragment index.
pub async fn load_key_mapping(path: &Path) -> Result<KeyMapping, BuildError> {
  let mut pairs: Vec<(String, String)> = Vec::new();

  match read_mapping_file::<MappingFile>(path).await? {
    MappingFile::Table(table) => pairs.extend(table_pairs(path, table)?),
    MappingFile::Index(fragments) => {
      let dir = path.parent().unwrap_or(Path::new("."));
      for name in fragments {
        let fragment_path = dir.join(format!("{}.json", name));
        let table = read_mapping_file::<Content>(&fragment_path).await?;
        pairs.extend(table_pairs(&fragment_path, table)?);
      }
    }
  }

  let mapping = KeyMapping::from_pairs(pairs);
  debug!(path = %path.display(), keys = mapping.len(), "loaded legacy key mapping");
  Ok(mapping)
}

/// Pairs in file order. Every value must be a string.
fn table_pairs(path: &Path, table: Content) -> Result<Vec<(String, String)>, BuildError> {
  table
    .into_iter()
    .map(|(legacy, modern)| {
      let modern = serde_json::from_value::<String>(modern).map_err(|source| BuildError::ParseMapping {
        path: path.to_path_buf(),
        source,
      })?;
      Ok((legacy, modern))
    })
    .collect()
}

async fn read_mapping_file<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, BuildError> {
  let text = tokio::fs::read_to_string(path)
    .await
    .map_err(|source| BuildError::ReadMapping {
      path: path.to_path_buf(),
      source,
    })?;
  serde_json::from_str(&text).map_err(|source| BuildError::ParseMapping {
    path: path.to_path_buf(),
    source,
  })
}
