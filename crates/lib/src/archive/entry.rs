use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::build::legacy::KeyMapping;
use crate::codec::{Content, ContentFormat};
use crate::patch::ContentPatch;

/// Starting content of a computed entry.
#[derive(Debug, Clone, PartialEq)]
pub enum BaseContent {
  Empty,
  Inline(Content),
  /// Parsed at resolve time. A missing file counts as empty.
  File { path: PathBuf, format: ContentFormat },
  /// Raw bytes parsed at resolve time.
  Bytes { data: Vec<u8>, format: ContentFormat },
}

/// A content object produced by patching, renaming keys and re-rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedContent {
  pub base: BaseContent,
  pub patch: ContentPatch,
  /// Applied after the patch.
  pub key_map: Option<Arc<KeyMapping>>,
  pub output: ContentFormat,
}

impl ComputedContent {
  pub fn new(base: BaseContent, output: ContentFormat) -> Self {
    Self {
      base,
      patch: ContentPatch::default(),
      key_map: None,
      output,
    }
  }

  pub fn with_patch(mut self, patch: ContentPatch) -> Self {
    self.patch = patch;
    self
  }
}

/// Where an entry's bytes come from.
#[derive(Debug, Clone, PartialEq)]
pub enum EntrySource {
  Bytes(Vec<u8>),
  /// Copied verbatim from disk.
  File(PathBuf),
  Computed(ComputedContent),
}

/// Archive entries keyed by forward-slash path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntrySet {
  entries: BTreeMap<String, EntrySource>,
}

impl EntrySet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert or replace the entry at `path`, returning the replaced source.
  pub fn insert(&mut self, path: impl Into<String>, source: EntrySource) -> Option<EntrySource> {
    self.entries.insert(path.into(), source)
  }

  pub fn remove(&mut self, path: &str) -> Option<EntrySource> {
    self.entries.remove(path)
  }

  pub fn get(&self, path: &str) -> Option<&EntrySource> {
    self.entries.get(path)
  }

  pub fn paths(&self) -> impl Iterator<Item = &str> {
    self.entries.keys().map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &EntrySource)> {
    self.entries.iter().map(|(path, source)| (path.as_str(), source))
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Replace `token` with `replacement` in every path containing it.
  ///
  /// A renamed entry replaces any entry already at its new path.
  pub fn rename_matching(&mut self, token: &str, replacement: &str) {
    let (renamed, kept): (BTreeMap<_, _>, BTreeMap<_, _>) = std::mem::take(&mut self.entries)
      .into_iter()
      .partition(|(path, _)| path.contains(token));
    self.entries = kept;
    for (path, source) in renamed {
      self.entries.insert(path.replace(token, replacement), source);
    }
  }

  /// The content a computed entry at `path` should start from.
  ///
  /// An entry already in the set wins, then the file under `base_root`,
  /// otherwise the entry starts empty.
  pub fn base_for(&self, path: &str, base_root: Option<&Path>, format: ContentFormat) -> BaseContent {
    match self.entries.get(path) {
      Some(EntrySource::File(file)) => BaseContent::File {
        path: file.clone(),
        format,
      },
      Some(EntrySource::Bytes(data)) => BaseContent::Bytes {
        data: data.clone(),
        format,
      },
      Some(EntrySource::Computed(computed)) => computed.base.clone(),
      None => match base_root {
        Some(root) => BaseContent::File {
          path: root.join(path),
          format,
        },
        None => BaseContent::Empty,
      },
    }
  }

  pub(crate) fn into_inner(self) -> BTreeMap<String, EntrySource> {
    self.entries
  }
}
