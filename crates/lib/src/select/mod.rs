//! Module selection and priority ordering.
//!
//! A build names the resource and collection modules it wants. Selection
//! expands collections into their resources, drops names that match nothing,
//! removes duplicates, then orders the result by an external priority list.
//!
//! # Priority Order
//!
//! The returned order is the patch application order for the whole build: for
//! any key touched by two modules, the later module wins. Modules named in the
//! priority list come first, in list order. Modules missing from the list
//! follow in the order they were selected.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::module::Module;

/// Errors raised while loading the priority list.
#[derive(Debug, Error)]
pub enum SelectError {
  #[error("failed to read priority file {path}: {source}")]
  ReadPriority {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Module names requested for one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRequest {
  #[serde(default)]
  pub resource: Vec<String>,
  #[serde(default)]
  pub collection: Vec<String>,
}

/// Two selected modules that declare each other incompatible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
  pub module: String,
  pub incompatible_with: String,
}

impl std::fmt::Display for Conflict {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "module '{}' is incompatible with '{}'", self.module, self.incompatible_with)
  }
}

/// The resource modules chosen for a build, in patch application order.
#[derive(Debug, Clone, Default)]
pub struct Selection {
  pub modules: Vec<Module>,
  /// Requested or contained names that matched no known module.
  pub unknown: Vec<String>,
  /// Incompatible pairs found among the selected modules.
  pub conflicts: Vec<Conflict>,
}

impl Selection {
  pub fn names(&self) -> Vec<String> {
    self.modules.iter().map(|m| m.name().to_string()).collect()
  }
}

/// Parse priority file text into an ordered list of module names.
///
/// Anything after `#` is a comment; blank lines are ignored.
pub fn parse_priority(text: &str) -> Vec<String> {
  text
    .lines()
    .map(|line| line.split('#').next().unwrap_or("").trim())
    .filter(|line| !line.is_empty())
    .map(str::to_string)
    .collect()
}

/// Read and parse a priority file.
pub fn read_priority_file(path: &Path) -> Result<Vec<String>, SelectError> {
  let text = fs::read_to_string(path).map_err(|source| SelectError::ReadPriority {
    path: path.to_path_buf(),
    source,
  })?;
  Ok(parse_priority(&text))
}

/// Choose and order the resource modules for a build.
///
/// Unknown names are dropped and reported in [`Selection::unknown`], never
/// treated as errors.
pub fn select_modules(modules: &[Module], request: &ModuleRequest, priority: &[String]) -> Selection {
  let resources: Vec<&Module> = modules.iter().filter(|m| m.is_resource()).collect();
  let collections: Vec<&Module> = modules.iter().filter(|m| m.is_collection()).collect();
  let resource_names: HashSet<&str> = resources.iter().map(|m| m.name()).collect();
  let collection_names: HashSet<&str> = collections.iter().map(|m| m.name()).collect();

  let mut unknown = Vec::new();
  for name in &request.resource {
    if !resource_names.contains(name.as_str()) {
      unknown.push(name.clone());
    }
  }
  for name in &request.collection {
    if !collection_names.contains(name.as_str()) {
      unknown.push(name.clone());
    }
  }

  let mut picked: Vec<&Module> = resources
    .iter()
    .copied()
    .filter(|m| request.resource.iter().any(|n| n == m.name()))
    .collect();

  for collection in collections
    .iter()
    .filter(|c| request.collection.iter().any(|n| n == c.name()))
  {
    for name in collection.contains() {
      if !resource_names.contains(name.as_str()) {
        unknown.push(name.clone());
      }
    }
    picked.extend(
      resources
        .iter()
        .copied()
        .filter(|m| collection.contains().iter().any(|n| n == m.name())),
    );
  }

  let mut seen = HashSet::new();
  picked.retain(|m| seen.insert(m.name()));

  let mut seen_unknown = HashSet::new();
  unknown.retain(|n| seen_unknown.insert(n.clone()));
  for name in &unknown {
    warn!(name, "requested module does not exist, skipping");
  }

  let ordered = sort_by_priority(picked.into_iter().cloned().collect(), priority);
  let conflicts = find_conflicts(&ordered);
  for conflict in &conflicts {
    warn!(module = %conflict.module, other = %conflict.incompatible_with, "incompatible modules selected");
  }

  debug!(
    modules = ?ordered.iter().map(|m| m.name()).collect::<Vec<_>>(),
    "selected modules"
  );

  Selection {
    modules: ordered,
    unknown,
    conflicts,
  }
}

/// Stable-sort modules by their index in `priority`; unlisted modules go last.
pub fn sort_by_priority(mut modules: Vec<Module>, priority: &[String]) -> Vec<Module> {
  let mut rank: HashMap<&str, usize> = HashMap::new();
  for (idx, name) in priority.iter().enumerate() {
    rank.entry(name.as_str()).or_insert(idx);
  }
  modules.sort_by_key(|m| rank.get(m.name()).copied().unwrap_or(usize::MAX));
  modules
}

fn find_conflicts(modules: &[Module]) -> Vec<Conflict> {
  let names: HashSet<&str> = modules.iter().map(|m| m.name()).collect();
  let mut conflicts = Vec::new();
  for module in modules {
    for other in &module.manifest.incompatible_with {
      if other != module.name() && names.contains(other.as_str()) {
        conflicts.push(Conflict {
          module: module.name().to_string(),
          incompatible_with: other.clone(),
        });
      }
    }
  }
  conflicts
}
