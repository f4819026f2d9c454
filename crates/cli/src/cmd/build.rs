//! Implementation of the `packsmith build` command.
//!
//! Turns command-line flags (optionally layered over a JSON options file)
//! into [`BuildOptions`], runs the build and writes the archive.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tracing::{debug, info};

use packsmith_lib::build::{BuildResult, PackBuilder};
use packsmith_lib::config::BuilderConfig;
use packsmith_lib::consts::{JAVA_LEGACY_FORMAT_VERSION, PRIORITY_FILENAME};
use packsmith_lib::options::{BuildOptions, BuildType};
use packsmith_lib::platform::Platform;
use packsmith_lib::select::read_priority_file;

use crate::output::{OutputFormat, Tone, archive_size, detail, elapsed, print_json, status};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TypeArg {
  Normal,
  Legacy,
}

impl From<TypeArg> for BuildType {
  fn from(arg: TypeArg) -> Self {
    match arg {
      TypeArg::Normal => BuildType::Normal,
      TypeArg::Legacy => BuildType::Legacy,
    }
  }
}

#[derive(Args, Debug)]
pub struct BuildArgs {
  /// Target edition: java or bedrock (default: java)
  #[arg(short, long)]
  pub platform: Option<Platform>,

  /// JSON build options file; flags given here override or extend it
  #[arg(long)]
  pub options: Option<PathBuf>,

  /// Directories containing module folders
  #[arg(short, long = "modules", required = true, num_args = 1..)]
  pub modules: Vec<PathBuf>,

  /// Base pack directory the modules are layered on
  #[arg(long)]
  pub base: Option<PathBuf>,

  /// Priority file, lowest priority first (default: priority.txt in a module directory)
  #[arg(long)]
  pub priority: Option<PathBuf>,

  /// Build type
  #[arg(long = "type", value_enum)]
  pub build_type: Option<TypeArg>,

  /// Replace the stock language instead of adding a new one
  #[arg(long)]
  pub compatible: bool,

  /// Java pack_format (default: from config)
  #[arg(long)]
  pub format: Option<u32>,

  /// Resource module to include
  #[arg(short, long = "resource")]
  pub resources: Vec<String>,

  /// Collection module to include
  #[arg(short, long = "collection")]
  pub collections: Vec<String>,

  /// Extra translation file overriding every module
  #[arg(long = "mod")]
  pub mods: Vec<PathBuf>,

  /// Key mapping used by legacy builds
  #[arg(long)]
  pub legacy_mapping: Option<PathBuf>,

  /// Archive path (default: <output_dir>/<default_file_name>-<platform>.zip)
  #[arg(long)]
  pub output: Option<PathBuf>,

  /// Insert the short content hash into the archive name
  #[arg(long)]
  pub hash: bool,

  /// Output format
  #[arg(long, value_enum, default_value = "text")]
  pub output_format: OutputFormat,
}

impl BuildArgs {
  /// Resolve the final build options against the user config.
  fn to_options(&self, config: &BuilderConfig) -> Result<BuildOptions> {
    let mut options = match &self.options {
      Some(path) => {
        let text = std::fs::read_to_string(path)
          .with_context(|| format!("Failed to read options file {}", path.display()))?;
        BuildOptions::from_json_str(&text).with_context(|| format!("Invalid options file {}", path.display()))?
      }
      None => BuildOptions::new(self.platform.unwrap_or(Platform::Java)),
    };

    if let Some(platform) = self.platform {
      options.platform = platform;
    }
    if let Some(build_type) = self.build_type {
      options.build_type = build_type.into();
    }
    options.compatible |= self.compatible;
    if self.format.is_some() {
      options.format = self.format;
    }
    options.modules.resource.extend(self.resources.iter().cloned());
    options.modules.collection.extend(self.collections.iter().cloned());
    options.mods.extend(self.mods.iter().cloned());
    if self.legacy_mapping.is_some() {
      options.legacy_mapping = self.legacy_mapping.clone();
    }

    if options.platform == Platform::Java && options.format.is_none() {
      options.format = Some(match options.build_type {
        BuildType::Legacy => JAVA_LEGACY_FORMAT_VERSION,
        BuildType::Normal => config.latest_java_format,
      });
    }

    Ok(options)
  }

  /// The explicit priority file, or the first conventional one found.
  fn load_priority(&self) -> Result<Vec<String>> {
    let path = match &self.priority {
      Some(path) => Some(path.clone()),
      None => self
        .modules
        .iter()
        .map(|dir| dir.join(PRIORITY_FILENAME))
        .find(|path| path.is_file()),
    };

    match path {
      Some(path) => {
        debug!(path = %path.display(), "using priority file");
        read_priority_file(&path).context("Failed to load priority file")
      }
      None => Ok(Vec::new()),
    }
  }
}

/// Execute the build command.
///
/// Discovers modules, builds the archive on a tokio runtime and writes it to
/// the output path. Selection warnings are printed but do not fail the build.
pub fn cmd_build(args: BuildArgs) -> Result<()> {
  let start = Instant::now();

  let config = BuilderConfig::load().context("Failed to load config")?;
  let options = args.to_options(&config)?;
  let found = super::discover(&args.modules)?;
  let priority = args.load_priority()?;

  let mut builder = PackBuilder::new(found.modules).with_priority(priority);
  if let Some(base) = &args.base {
    builder = builder.with_base(base);
  }

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let result = rt.block_on(builder.build(&options)).context("Build failed")?;

  let base_path = match &args.output {
    Some(path) => path.clone(),
    None => default_output_path(&config, &options),
  };
  let path = if args.hash {
    with_hash_suffix(&base_path, result.hash.short())
  } else {
    base_path
  };
  write_archive(&path, &result.content)?;
  info!(path = %path.display(), hash = %result.hash, "archive written");

  report(&path, &result, start, args.output_format)
}

fn default_output_path(config: &BuilderConfig, options: &BuildOptions) -> PathBuf {
  let mut name = format!("{}-{}", config.default_file_name, options.platform);
  if options.is_legacy() {
    name.push_str("-legacy");
  }
  config.output_dir.join(format!("{}.zip", name))
}

/// `dir/pack.zip` becomes `dir/pack.<hash>.zip`.
fn with_hash_suffix(path: &Path, hash: &str) -> PathBuf {
  let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
  let name = match path.extension() {
    Some(ext) => format!("{}.{}.{}", stem, hash, ext.to_string_lossy()),
    None => format!("{}.{}", stem, hash),
  };
  path.with_file_name(name)
}

fn write_archive(path: &Path, content: &[u8]) -> Result<()> {
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }
  std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

fn report(path: &Path, result: &BuildResult, start: Instant, format: OutputFormat) -> Result<()> {
  if format.is_json() {
    return print_json(&serde_json::json!({
      "path": path,
      "hash": result.hash.0,
      "size": result.content.len(),
      "modules": result.modules,
      "warnings": result.warnings,
    }));
  }

  for warning in &result.warnings {
    status(Tone::Warn, warning);
  }
  if result.modules.is_empty() {
    status(Tone::Note, "No modules selected");
  } else {
    status(Tone::Note, &format!("Modules: {}", result.modules.join(", ")));
  }
  status(Tone::Done, &format!("Built {}", path.display()));
  detail("Size", &archive_size(result.content.len()));
  detail("Hash", &result.hash.0);
  detail("Duration", &elapsed(start.elapsed()));
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_goes_before_extension() {
    assert_eq!(
      with_hash_suffix(Path::new("builds/meme.zip"), "abc1234"),
      PathBuf::from("builds/meme.abc1234.zip")
    );
    assert_eq!(with_hash_suffix(Path::new("meme"), "abc1234"), PathBuf::from("meme.abc1234"));
  }

  #[test]
  fn default_path_names_platform_and_legacy() {
    let config = BuilderConfig::default();
    let mut options = BuildOptions::new(Platform::Bedrock);
    assert_eq!(
      default_output_path(&config, &options),
      PathBuf::from("builds/meme-resourcepack-bedrock.zip")
    );

    options.platform = Platform::Java;
    options.build_type = BuildType::Legacy;
    assert_eq!(
      default_output_path(&config, &options),
      PathBuf::from("builds/meme-resourcepack-java-legacy.zip")
    );
  }
}
