//! Module manifest types.
//!
//! A module directory holds a `module_manifest.json` describing it. Two kinds
//! exist:
//!
//! - **resource** modules contribute files and translation patches
//! - **collection** modules name a group of resource modules via `contains`
//!
//! # Example
//!
//! ```json
//! {
//!   "name": "bagify",
//!   "type": "resource",
//!   "description": "Renames every bundle to bag",
//!   "authors": ["Alice"],
//!   "languageModification": [
//!     { "file": "assets/minecraft/lang/zh_meme.json", "add": "add.json", "remove": ["item.bundle"] }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::codec::Content;

/// A parsed module manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleManifest {
  pub name: String,
  #[serde(default)]
  pub description: String,
  #[serde(default, alias = "author")]
  pub authors: Vec<String>,
  /// Names of modules that should not be selected together with this one.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub incompatible_with: Vec<String>,
  #[serde(flatten)]
  pub kind: ModuleKind,
}

/// The `type`-tagged part of a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ModuleKind {
  Resource {
    #[serde(default, rename = "languageModification", alias = "patches")]
    patches: Vec<PatchDefinition>,
  },
  Collection {
    #[serde(default)]
    contains: Vec<String>,
  },
}

/// One manifest-declared patch against a target file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchDefinition {
  /// Archive path of the file being patched.
  pub file: String,
  /// Keys to add or overwrite.
  #[serde(default, skip_serializing_if = "PatchSource::is_absent")]
  pub add: PatchSource<Content>,
  /// Keys to delete.
  #[serde(default, skip_serializing_if = "PatchSource::is_absent")]
  pub remove: PatchSource<Vec<String>>,
}

/// Where a patch definition's data comes from.
///
/// A manifest may inline the data, point at a sibling file, or leave the
/// field out. The variant is resolved into concrete data once, at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatchSource<T> {
  Absent,
  FileRef(PathBuf),
  Inline(T),
}

impl<T> Default for PatchSource<T> {
  fn default() -> Self {
    PatchSource::Absent
  }
}

impl<T> PatchSource<T> {
  pub fn is_absent(&self) -> bool {
    matches!(self, PatchSource::Absent)
  }

  /// The referenced file, if this source points at one.
  pub fn file_ref(&self) -> Option<&Path> {
    match self {
      PatchSource::FileRef(path) => Some(path),
      _ => None,
    }
  }
}

/// A discovered module.
///
/// `files` holds forward-slash paths relative to `root`. It is empty for
/// collection modules, and for resource modules excludes the manifest and any
/// file referenced as a patch source.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
  pub root: PathBuf,
  pub manifest: ModuleManifest,
  pub files: Vec<String>,
}

impl Module {
  pub fn name(&self) -> &str {
    &self.manifest.name
  }

  pub fn is_resource(&self) -> bool {
    matches!(self.manifest.kind, ModuleKind::Resource { .. })
  }

  pub fn is_collection(&self) -> bool {
    matches!(self.manifest.kind, ModuleKind::Collection { .. })
  }

  /// Patch definitions of a resource module, empty for collections.
  pub fn patches(&self) -> &[PatchDefinition] {
    match &self.manifest.kind {
      ModuleKind::Resource { patches } => patches,
      ModuleKind::Collection { .. } => &[],
    }
  }

  /// Resource names bundled by a collection module, empty for resources.
  pub fn contains(&self) -> &[String] {
    match &self.manifest.kind {
      ModuleKind::Collection { contains } => contains,
      ModuleKind::Resource { .. } => &[],
    }
  }
}
