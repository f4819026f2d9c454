//! User configuration.
//!
//! Read from `config.json` in the application config directory. Every field
//! is optional; a missing file means all defaults.

pub mod paths;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts::{CONFIG_FILENAME, JAVA_LATEST_FORMAT_VERSION};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse config {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

/// Defaults applied by front ends when a build does not specify them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuilderConfig {
  /// Output file stem, the platform and extension are appended.
  pub default_file_name: String,
  pub output_dir: PathBuf,
  /// `pack_format` used for java normal builds without an explicit format.
  pub latest_java_format: u32,
}

impl Default for BuilderConfig {
  fn default() -> Self {
    Self {
      default_file_name: "meme-resourcepack".to_string(),
      output_dir: PathBuf::from("builds"),
      latest_java_format: JAVA_LATEST_FORMAT_VERSION,
    }
  }
}

impl BuilderConfig {
  /// Path of the user config file, if a config directory can be resolved.
  pub fn default_path() -> Option<PathBuf> {
    paths::config_dir().map(|dir| dir.join(CONFIG_FILENAME))
  }

  /// Load the user config, falling back to defaults when there is none.
  pub fn load() -> Result<Self, ConfigError> {
    match Self::default_path() {
      Some(path) => Self::load_from(&path),
      None => Ok(Self::default()),
    }
  }

  /// Load config from `path`. A missing file yields the defaults.
  pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
    let text = match fs::read_to_string(path) {
      Ok(text) => text,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Self::default());
      }
      Err(source) => {
        return Err(ConfigError::Read {
          path: path.to_path_buf(),
          source,
        });
      }
    };
    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }
}
