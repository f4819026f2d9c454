//! Build options and their validation.
//!
//! Options are checked before any file is touched. A build with an invalid
//! combination never starts.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::consts::JAVA_LEGACY_FORMAT_VERSION;
use crate::platform::Platform;

pub use crate::select::ModuleRequest;

#[derive(Debug, Error)]
pub enum OptionsError {
  #[error("invalid build options: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("java builds require a pack format")]
  MissingFormat,

  #[error("build type {build_type} does not match pack format {format}")]
  FormatMismatch { build_type: BuildType, format: u32 },

  #[error("legacy builds require a legacy key mapping")]
  MissingLegacyMapping,

  #[error("{platform} does not support {build_type} builds")]
  UnsupportedType { platform: Platform, build_type: BuildType },
}

/// Output mode of a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildType {
  #[default]
  Normal,
  /// Java only: translation written as a pre-JSON `.lang` file.
  Legacy,
}

impl std::fmt::Display for BuildType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      BuildType::Normal => f.write_str("normal"),
      BuildType::Legacy => f.write_str("legacy"),
    }
  }
}

/// Everything a single build needs besides the module tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOptions {
  pub platform: Platform,
  #[serde(default, rename = "type")]
  pub build_type: BuildType,
  /// Replace the stock language instead of adding a new one.
  #[serde(default)]
  pub compatible: bool,
  /// Java `pack_format`.
  #[serde(default)]
  pub format: Option<u32>,
  #[serde(default)]
  pub modules: ModuleRequest,
  /// External translation files merged over the primary translation file.
  #[serde(default, alias = "mod")]
  pub mods: Vec<PathBuf>,
  #[serde(default)]
  pub legacy_mapping: Option<PathBuf>,
}

impl BuildOptions {
  pub fn new(platform: Platform) -> Self {
    Self {
      platform,
      build_type: BuildType::Normal,
      compatible: false,
      format: None,
      modules: ModuleRequest::default(),
      mods: Vec::new(),
      legacy_mapping: None,
    }
  }

  pub fn from_json_str(text: &str) -> Result<Self, OptionsError> {
    Ok(serde_json::from_str(text)?)
  }

  pub fn is_legacy(&self) -> bool {
    self.build_type == BuildType::Legacy
  }

  /// Check the option combination.
  ///
  /// # Errors
  ///
  /// Java: a format is required, legacy builds must use format 3 and name a
  /// key mapping, normal builds must use a format above 3. Bedrock: legacy
  /// builds are rejected.
  pub fn validate(&self) -> Result<(), OptionsError> {
    match self.platform {
      Platform::Java => {
        let format = self.format.ok_or(OptionsError::MissingFormat)?;
        let consistent = match self.build_type {
          BuildType::Legacy => format == JAVA_LEGACY_FORMAT_VERSION,
          BuildType::Normal => format > JAVA_LEGACY_FORMAT_VERSION,
        };
        if !consistent {
          return Err(OptionsError::FormatMismatch {
            build_type: self.build_type,
            format,
          });
        }
        if self.is_legacy() && self.legacy_mapping.is_none() {
          return Err(OptionsError::MissingLegacyMapping);
        }
      }
      Platform::Bedrock => {
        if self.is_legacy() {
          return Err(OptionsError::UnsupportedType {
            platform: self.platform,
            build_type: self.build_type,
          });
        }
        if let Some(format) = self.format {
          warn!(format, "pack format is ignored for bedrock builds");
        }
      }
    }
    Ok(())
  }
}
