//! Shared fixtures for library tests.

use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use packsmith_lib::build::PackBuilder;
use packsmith_lib::module::ModuleSearch;
use tempfile::TempDir;

/// A throwaway workspace with a `modules/` tree and a `base/` resource root.
pub struct Workspace {
  pub temp: TempDir,
}

impl Workspace {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("modules")).unwrap();
    std::fs::create_dir_all(temp.path().join("base")).unwrap();
    Self { temp }
  }

  pub fn path(&self) -> &Path {
    self.temp.path()
  }

  pub fn modules_dir(&self) -> PathBuf {
    self.path().join("modules")
  }

  pub fn base_dir(&self) -> PathBuf {
    self.path().join("base")
  }

  /// Write a file relative to the workspace root.
  pub fn write(&self, rel: &str, content: &str) {
    let path = self.path().join(rel);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
  }

  /// Write a resource module manifest; `extra` is spliced into the JSON object.
  pub fn resource(&self, name: &str, extra: &str) {
    let extra = if extra.is_empty() {
      String::new()
    } else {
      format!(", {}", extra)
    };
    self.write(
      &format!("modules/{name}/module_manifest.json"),
      &format!(r#"{{"name": "{name}", "type": "resource", "description": "", "authors": []{extra}}}"#),
    );
  }

  pub fn collection(&self, name: &str, contains: &[&str]) {
    let contains: Vec<String> = contains.iter().map(|c| format!("\"{}\"", c)).collect();
    self.write(
      &format!("modules/{name}/module_manifest.json"),
      &format!(
        r#"{{"name": "{name}", "type": "collection", "contains": [{}]}}"#,
        contains.join(", ")
      ),
    );
  }

  /// Discover modules and wrap them in a builder with the base root set.
  pub fn builder(&self) -> PackBuilder {
    let result = ModuleSearch::new().add_search_path(self.modules_dir()).search().unwrap();
    PackBuilder::new(result.modules).with_base(self.base_dir())
  }
}

pub fn read_entry(zip: &[u8], name: &str) -> Option<String> {
  let mut archive = zip::ZipArchive::new(Cursor::new(zip)).unwrap();
  let mut file = archive.by_name(name).ok()?;
  let mut text = String::new();
  file.read_to_string(&mut text).unwrap();
  Some(text)
}

pub fn read_json(zip: &[u8], name: &str) -> serde_json::Value {
  let text = read_entry(zip, name).unwrap_or_else(|| panic!("missing entry {}", name));
  serde_json::from_str(&text).unwrap()
}

pub fn entry_names(zip: &[u8]) -> Vec<String> {
  let archive = zip::ZipArchive::new(Cursor::new(zip)).unwrap();
  archive.file_names().map(str::to_string).collect()
}
