mod build;
mod modules;

use std::path::PathBuf;

use anyhow::{Context, Result};
use packsmith_lib::module::{ModuleSearch, SearchResult};

pub use build::{BuildArgs, cmd_build};
pub use modules::{ModulesArgs, cmd_modules};

/// Discover modules under every directory in `dirs`, in order.
fn discover(dirs: &[PathBuf]) -> Result<SearchResult> {
  let mut search = ModuleSearch::new();
  for dir in dirs {
    search.add_search_path(dir);
  }
  search.search().context("Failed to discover modules")
}
