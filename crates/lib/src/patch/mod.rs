//! Key-level patch algebra.
//!
//! A [`ContentPatch`] is pure data: applying it to a [`Content`] object is a
//! deterministic function of the content and the patch. Two granularities
//! exist:
//!
//! - [`FlatKeyPatch`] addresses top-level keys, `"item.bundle"` is one key
//! - [`NestedKeyPatch`] addresses dot-separated paths, `"pack.pack_format"`
//!   walks into the `pack` object
//!
//! Within one [`ContentPatch`] the flat part is always applied before the
//! nested part. Within one granularity additions are applied before
//! deletions. Deleting something that is not there is a no-op at every level.
//!
//! [`aggregate_patches`] builds a [`PatchSet`] (one [`FilePatch`] per target
//! file) from the patch definitions of the selected modules.

mod aggregate;

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::codec::Content;
use crate::consts::PROTO_SENTINEL;

pub use aggregate::{PatchError, aggregate_patches};

/// Additions and deletions addressed by top-level key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatKeyPatch {
  pub addition: Content,
  pub deletion: BTreeSet<String>,
}

/// Additions and deletions addressed by dot-separated path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NestedKeyPatch {
  pub addition: Content,
  pub deletion: BTreeSet<String>,
}

/// A patch against one content object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentPatch {
  pub flat_key: Option<FlatKeyPatch>,
  pub nested_key: Option<NestedKeyPatch>,
}

impl FlatKeyPatch {
  /// Layer `other` on top of this patch.
  ///
  /// Additions overwrite key-for-key, deletions accumulate.
  pub fn merge(&mut self, other: FlatKeyPatch) {
    self.addition.extend(other.addition);
    self.deletion.extend(other.deletion);
  }

  pub fn is_empty(&self) -> bool {
    self.addition.is_empty() && self.deletion.is_empty()
  }
}

impl NestedKeyPatch {
  pub fn is_empty(&self) -> bool {
    self.addition.is_empty() && self.deletion.is_empty()
  }
}

impl ContentPatch {
  pub fn flat(patch: FlatKeyPatch) -> Self {
    Self {
      flat_key: Some(patch),
      nested_key: None,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.flat_key.as_ref().is_none_or(FlatKeyPatch::is_empty)
      && self.nested_key.as_ref().is_none_or(NestedKeyPatch::is_empty)
  }
}

/// The aggregated patch for one target file.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePatch {
  /// Archive path of the patched file.
  pub target: String,
  pub patch: FlatKeyPatch,
}

/// Aggregated patches for every targeted file, keyed by normalised path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchSet {
  files: BTreeMap<String, FlatKeyPatch>,
}

impl PatchSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Merge `patch` into the aggregate for `target`.
  pub fn merge(&mut self, target: impl Into<String>, patch: FlatKeyPatch) {
    self.files.entry(target.into()).or_default().merge(patch);
  }

  pub fn get(&self, target: &str) -> Option<&FlatKeyPatch> {
    self.files.get(target)
  }

  /// Remove and return the aggregate for `target`.
  pub fn take(&mut self, target: &str) -> Option<FlatKeyPatch> {
    self.files.remove(target)
  }

  pub fn len(&self) -> usize {
    self.files.len()
  }

  pub fn is_empty(&self) -> bool {
    self.files.is_empty()
  }

  /// Consume the set, yielding one [`FilePatch`] per target in path order.
  pub fn into_files(self) -> impl Iterator<Item = FilePatch> {
    self.files.into_iter().map(|(target, patch)| FilePatch { target, patch })
  }
}

/// Apply a flat-key patch: set every addition, then drop every deleted key.
pub fn apply_flat_key(mut content: Content, patch: &FlatKeyPatch) -> Content {
  for (key, value) in &patch.addition {
    content.insert(key.clone(), value.clone());
  }
  for key in &patch.deletion {
    content.shift_remove(key);
  }
  content
}

/// Apply a nested-key patch.
///
/// Additions create missing intermediate objects (replacing any non-object
/// value in the way). Deletions stop silently at the first missing or
/// non-object intermediate.
pub fn apply_nested_key(mut content: Content, patch: &NestedKeyPatch) -> Content {
  for (path, value) in &patch.addition {
    set_path(&mut content, &segments(path), value.clone());
  }
  for path in &patch.deletion {
    remove_path(&mut content, &segments(path));
  }
  content
}

/// Apply a content patch, flat part first.
pub fn apply_content_patch(mut content: Content, patch: &ContentPatch) -> Content {
  if let Some(flat) = &patch.flat_key {
    content = apply_flat_key(content, flat);
  }
  if let Some(nested) = &patch.nested_key {
    content = apply_nested_key(content, nested);
  }
  content
}

fn segments(path: &str) -> Vec<&str> {
  path.split('.').filter(|s| *s != PROTO_SENTINEL).collect()
}

fn set_path(content: &mut Content, segments: &[&str], value: Value) {
  let Some((last, parents)) = segments.split_last() else {
    return;
  };
  let mut node = content;
  for segment in parents {
    let slot = node
      .entry(segment.to_string())
      .or_insert_with(|| Value::Object(Content::new()));
    if !slot.is_object() {
      *slot = Value::Object(Content::new());
    }
    let Value::Object(next) = slot else {
      return;
    };
    node = next;
  }
  node.insert(last.to_string(), value);
}

fn remove_path(content: &mut Content, segments: &[&str]) {
  let Some((last, parents)) = segments.split_last() else {
    return;
  };
  let mut node = content;
  for segment in parents {
    match node.get_mut(*segment) {
      Some(Value::Object(next)) => node = next,
      _ => return,
    }
  }
  node.shift_remove(*last);
}
