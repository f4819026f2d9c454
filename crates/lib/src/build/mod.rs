//! Pack building.
//!
//! [`PackBuilder`] runs the whole pipeline for one set of options:
//!
//! 1. validate the options
//! 2. select and order modules
//! 3. aggregate the selected modules' patches
//! 4. assemble entries: base files, module files, then computed files
//! 5. apply the platform's legacy and compatibility transforms
//! 6. resolve every entry and write the zip
//!
//! Later layers in step 4 replace earlier ones at the same path, so a module
//! file overrides a base file and a computed file overrides both.
//!
//! # Submodules
//!
//! - [`java`] - `pack.mcmeta` generation
//! - [`bedrock`] - texture index merging
//! - [`legacy`] - legacy key mapping
//! - [`mods`] - external mod overlays

pub mod bedrock;
pub mod java;
pub mod legacy;
pub mod mods;
mod types;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::archive::{BaseContent, ComputedContent, EntrySet, EntrySource, resolve_entries, write_zip};
use crate::codec::{Content, ContentFormat};
use crate::consts::MODULE_MANIFEST_FILENAME;
use crate::module::{Module, search::normalize_relative};
use crate::options::BuildOptions;
use crate::patch::{ContentPatch, FlatKeyPatch, PatchSet, aggregate_patches};
use crate::platform::{BEDROCK_TEXTURE_FILES, JAVA_MCMETA, Platform, PlatformProfile};
use crate::select::select_modules;
use crate::util::hash::hash_bytes;

use legacy::{KeyMapping, load_key_mapping};

pub use types::*;

/// Builds packs from a fixed set of discovered modules.
#[derive(Debug, Clone, Default)]
pub struct PackBuilder {
  modules: Vec<Module>,
  base_root: Option<PathBuf>,
  priority: Vec<String>,
}

impl PackBuilder {
  /// Create a builder over `modules` (resources and collections alike).
  pub fn new(modules: Vec<Module>) -> Self {
    Self {
      modules,
      base_root: None,
      priority: Vec::new(),
    }
  }

  /// Use the files under `root` as the bottom layer of every pack.
  pub fn with_base(mut self, root: impl Into<PathBuf>) -> Self {
    self.base_root = Some(root.into());
    self
  }

  /// Order selected modules by this list of names.
  pub fn with_priority(mut self, priority: Vec<String>) -> Self {
    self.priority = priority;
    self
  }

  pub fn modules(&self) -> &[Module] {
    &self.modules
  }

  /// Build one pack.
  ///
  /// # Errors
  ///
  /// Returns [`BuildError::Options`] before touching any file if the options
  /// are invalid. Unknown module names, incompatible modules and unreadable
  /// texture indexes are reported in [`BuildResult::warnings`] instead.
  pub async fn build(&self, options: &BuildOptions) -> Result<BuildResult, BuildError> {
    let start = Instant::now();
    options.validate()?;

    let profile = options.platform.profile();
    let mut warnings = Vec::new();

    let selection = select_modules(&self.modules, &options.modules, &self.priority);
    warnings.extend(selection.unknown.iter().map(|name| format!("module '{}' not found", name)));
    warnings.extend(selection.conflicts.iter().map(ToString::to_string));
    if let (Platform::Bedrock, Some(format)) = (options.platform, options.format) {
      warnings.push(format!("pack format {} ignored for bedrock", format));
    }
    info!(platform = %options.platform, modules = selection.modules.len(), "building pack");

    let key_map = match (&options.legacy_mapping, options.is_legacy()) {
      (Some(path), true) => Some(Arc::new(load_key_mapping(path).await?)),
      _ => None,
    };
    let overlay = mods::load_mods(&options.mods).await?;
    let patches = aggregate_patches(&selection.modules).await?;

    let mut entries = EntrySet::new();
    if let Some(root) = &self.base_root {
      add_base_files(&mut entries, root, profile)?;
    }
    for module in &selection.modules {
      add_module_files(&mut entries, module, profile);
    }

    let base_root = self.base_root.as_deref();
    self.add_patched_files(&mut entries, patches, overlay, profile).await;
    match options.platform {
      Platform::Java => {
        let base = entries.base_for(JAVA_MCMETA, base_root, profile.format_for(JAVA_MCMETA));
        let computed = ComputedContent::new(base, profile.format_for(JAVA_MCMETA)).with_patch(java::mcmeta_patch(options));
        entries.insert(JAVA_MCMETA, EntrySource::Computed(computed));
      }
      Platform::Bedrock => {
        for path in BEDROCK_TEXTURE_FILES {
          let index = bedrock::merge_texture_index(path, base_root, &selection.modules).await?;
          warnings.extend(index.warnings);
          if let Some(content) = index.content {
            let computed = ComputedContent::new(BaseContent::Inline(content), profile.format_for(path));
            entries.insert(path, EntrySource::Computed(computed));
          }
        }
      }
    }

    if options.is_legacy() {
      apply_legacy(&mut entries, profile, key_map);
    }
    if options.compatible {
      apply_compat(&mut entries, profile);
    }

    debug!(entries = entries.len(), "assembled archive entries");
    let resolved = resolve_entries(entries).await?;
    let content = write_zip(&resolved)?;
    let hash = hash_bytes(&content);

    info!(
      hash = %hash.short(),
      bytes = content.len(),
      elapsed = ?start.elapsed(),
      "pack built"
    );

    Ok(BuildResult {
      content,
      hash,
      modules: selection.names(),
      warnings,
    })
  }

  /// Add a computed entry for every patched file and for the primary
  /// translation file.
  async fn add_patched_files(&self, entries: &mut EntrySet, mut patches: PatchSet, overlay: Content, profile: &PlatformProfile) {
    let base_root = self.base_root.as_deref();

    let mut primary = patches.take(profile.primary_lang).unwrap_or_default();
    for key in overlay.keys() {
      primary.deletion.remove(key);
    }
    primary.merge(FlatKeyPatch {
      addition: overlay,
      deletion: Default::default(),
    });

    for file_patch in patches.into_files() {
      let format = profile.format_for(&file_patch.target);
      let base = entries.base_for(&file_patch.target, base_root, format);
      let computed = ComputedContent::new(base, format).with_patch(ContentPatch::flat(file_patch.patch));
      entries.insert(file_patch.target, EntrySource::Computed(computed));
    }

    let format = profile.format_for(profile.primary_lang);
    let base = entries.base_for(profile.primary_lang, base_root, format);
    if primary.is_empty() && !base_exists(&base).await {
      debug!(path = profile.primary_lang, "no primary translation source, skipping");
      return;
    }
    let computed = ComputedContent::new(base, format).with_patch(ContentPatch::flat(primary));
    entries.insert(profile.primary_lang, EntrySource::Computed(computed));
  }
}

fn add_base_files(entries: &mut EntrySet, root: &Path, profile: &PlatformProfile) -> Result<(), BuildError> {
  for entry in WalkDir::new(root).sort_by_file_name() {
    let entry = entry.map_err(|source| BuildError::ListBase {
      path: root.to_path_buf(),
      source,
    })?;
    if !entry.file_type().is_file() {
      continue;
    }
    let rel = normalize_relative(entry.path().strip_prefix(root).unwrap_or(entry.path()));
    if rel == MODULE_MANIFEST_FILENAME || profile.is_computed(&rel) {
      continue;
    }
    entries.insert(rel, EntrySource::File(entry.path().to_path_buf()));
  }
  Ok(())
}

fn add_module_files(entries: &mut EntrySet, module: &Module, profile: &PlatformProfile) {
  for file in &module.files {
    if profile.is_computed(file) {
      continue;
    }
    if let Some(EntrySource::File(previous)) = entries.insert(file.clone(), EntrySource::File(module.root.join(file))) {
      debug!(path = %file, replaced = %previous.display(), module = module.name(), "file overridden");
    }
  }
}

/// Rewrite computed translation JSON as legacy `.lang` files.
///
/// Copied translation JSON that legacy clients cannot read is dropped.
fn apply_legacy(entries: &mut EntrySet, profile: &PlatformProfile, key_map: Option<Arc<KeyMapping>>) {
  let Some(rule) = profile.legacy else {
    return;
  };
  let matched: Vec<String> = entries
    .iter()
    .filter(|(path, source)| match source {
      EntrySource::Computed(_) => rule.target_for(path).is_some(),
      _ => path.ends_with(rule.drop_suffix),
    })
    .map(|(path, _)| path.to_string())
    .collect();

  for path in matched {
    match (entries.remove(&path), rule.target_for(&path)) {
      (Some(EntrySource::Computed(mut computed)), Some(target)) => {
        debug!(from = %path, to = %target, "converting to legacy lang");
        computed.key_map = key_map.clone();
        computed.output = ContentFormat::Lang(rule.dialect);
        entries.insert(target, EntrySource::Computed(computed));
      }
      _ => debug!(path = %path, "dropping translation json from legacy pack"),
    }
  }
}

fn apply_compat(entries: &mut EntrySet, profile: &PlatformProfile) {
  for path in profile.compat.drop {
    entries.remove(path);
  }
  entries.rename_matching(profile.compat.from, profile.compat.to);
}

async fn base_exists(base: &BaseContent) -> bool {
  match base {
    BaseContent::Empty => false,
    BaseContent::Inline(_) | BaseContent::Bytes { .. } => true,
    BaseContent::File { path, .. } => tokio::fs::try_exists(path).await.unwrap_or(false),
  }
}
