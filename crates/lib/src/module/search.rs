//! Module discovery.
//!
//! Every immediate subdirectory of a search path is a module candidate. A
//! candidate whose manifest is missing or malformed is skipped and reported,
//! discovery of the remaining modules continues.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::types::{Module, ModuleKind, ModuleManifest};
use crate::consts::MODULE_MANIFEST_FILENAME;

/// Errors that abort module discovery.
#[derive(Debug, Error)]
pub enum ResolveError {
  /// A search path could not be listed.
  #[error("failed to read module directory {path}: {source}")]
  ReadRoot {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// A resource module's files could not be walked.
  #[error("failed to list files of module {path}: {source}")]
  ListFiles {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },
}

/// A candidate directory that was not loaded as a module.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedModule {
  pub path: PathBuf,
  pub reason: String,
}

/// Outcome of a module search.
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
  /// Loaded modules, in search-path order then directory-name order.
  pub modules: Vec<Module>,
  /// Candidates that were skipped, with the reason.
  pub skipped: Vec<SkippedModule>,
}

impl SearchResult {
  pub fn resources(&self) -> impl Iterator<Item = &Module> {
    self.modules.iter().filter(|m| m.is_resource())
  }

  pub fn collections(&self) -> impl Iterator<Item = &Module> {
    self.modules.iter().filter(|m| m.is_collection())
  }
}

/// Discovers modules under a set of search paths.
#[derive(Debug, Clone, Default)]
pub struct ModuleSearch {
  search_paths: Vec<PathBuf>,
}

impl ModuleSearch {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add_search_path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
    self.search_paths.push(path.into());
    self
  }

  pub fn search_paths(&self) -> &[PathBuf] {
    &self.search_paths
  }

  /// Load every module found under the configured search paths.
  ///
  /// # Errors
  ///
  /// Returns [`ResolveError`] if a search path cannot be listed or a resource
  /// module's directory cannot be walked. Bad manifests are not errors.
  pub fn search(&self) -> Result<SearchResult, ResolveError> {
    let mut result = SearchResult::default();

    for search_path in &self.search_paths {
      for dir in candidate_dirs(search_path)? {
        match load_module(&dir)? {
          Ok(module) => {
            debug!(name = module.name(), path = %dir.display(), files = module.files.len(), "loaded module");
            result.modules.push(module);
          }
          Err(reason) => {
            warn!(path = %dir.display(), %reason, "skipping module");
            result.skipped.push(SkippedModule { path: dir, reason });
          }
        }
      }
    }

    info!(
      modules = result.modules.len(),
      skipped = result.skipped.len(),
      "module search complete"
    );
    Ok(result)
  }
}

fn candidate_dirs(search_path: &Path) -> Result<Vec<PathBuf>, ResolveError> {
  let read_root = |source| ResolveError::ReadRoot {
    path: search_path.to_path_buf(),
    source,
  };

  let mut dirs = Vec::new();
  for entry in fs::read_dir(search_path).map_err(read_root)? {
    let entry = entry.map_err(read_root)?;
    if entry.file_type().map_err(read_root)?.is_dir() {
      dirs.push(entry.path());
    }
  }
  dirs.sort();
  Ok(dirs)
}

/// Load one module directory.
///
/// The outer result carries fatal errors, the inner one the reason a
/// candidate is skipped.
fn load_module(dir: &Path) -> Result<Result<Module, String>, ResolveError> {
  let manifest = match read_manifest(dir) {
    Ok(manifest) => manifest,
    Err(reason) => return Ok(Err(reason)),
  };

  let root = dunce::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
  let files = match &manifest.kind {
    ModuleKind::Resource { .. } => list_files(&root, &manifest)?,
    ModuleKind::Collection { .. } => Vec::new(),
  };

  Ok(Ok(Module { root, manifest, files }))
}

fn read_manifest(dir: &Path) -> Result<ModuleManifest, String> {
  let path = dir.join(MODULE_MANIFEST_FILENAME);
  let content = match fs::read_to_string(&path) {
    Ok(content) => content,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(format!("missing {}", MODULE_MANIFEST_FILENAME)),
    Err(e) => return Err(format!("failed to read {}: {}", MODULE_MANIFEST_FILENAME, e)),
  };
  serde_json::from_str(&content).map_err(|e| format!("invalid {}: {}", MODULE_MANIFEST_FILENAME, e))
}

/// List a resource module's content files.
///
/// Excludes the manifest and every file referenced as a patch source.
fn list_files(root: &Path, manifest: &ModuleManifest) -> Result<Vec<String>, ResolveError> {
  let mut excluded: HashSet<String> = HashSet::new();
  excluded.insert(MODULE_MANIFEST_FILENAME.to_string());
  if let ModuleKind::Resource { patches } = &manifest.kind {
    for def in patches {
      excluded.extend(def.add.file_ref().map(normalize_relative));
      excluded.extend(def.remove.file_ref().map(normalize_relative));
    }
  }

  let mut files = Vec::new();
  for entry in WalkDir::new(root).sort_by_file_name() {
    let entry = entry.map_err(|e| ResolveError::ListFiles {
      path: root.to_path_buf(),
      source: e,
    })?;
    if !entry.file_type().is_file() {
      continue;
    }
    let rel = normalize_relative(entry.path().strip_prefix(root).unwrap_or(entry.path()));
    if !excluded.contains(&rel) {
      files.push(rel);
    }
  }
  Ok(files)
}

/// Render a relative path with forward slashes, dropping `.` components.
pub fn normalize_relative(path: &Path) -> String {
  path
    .components()
    .filter_map(|c| match c {
      Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
      Component::ParentDir => Some("..".to_string()),
      _ => None,
    })
    .collect::<Vec<_>>()
    .join("/")
}
