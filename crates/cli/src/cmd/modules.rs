//! Implementation of the `packsmith modules` command.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use packsmith_lib::module::{Module, SearchResult};

use crate::output::{ITEM_MARKER, MEMBER_MARKER, OutputFormat, Tone, print_json, status};

#[derive(Args, Debug)]
pub struct ModulesArgs {
  /// Directories containing module folders
  #[arg(short, long = "modules", required = true, num_args = 1..)]
  pub modules: Vec<PathBuf>,

  /// Output format
  #[arg(long, value_enum, default_value = "text")]
  pub output_format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct ModuleEntry<'a> {
  name: &'a str,
  description: &'a str,
  authors: &'a [String],
  path: &'a std::path::Path,
  contains: &'a [String],
}

#[derive(Debug, Serialize)]
struct Listing<'a> {
  resources: Vec<ModuleEntry<'a>>,
  collections: Vec<ModuleEntry<'a>>,
  skipped: Vec<SkippedEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct SkippedEntry<'a> {
  path: &'a std::path::Path,
  reason: &'a str,
}

impl<'a> From<&'a Module> for ModuleEntry<'a> {
  fn from(module: &'a Module) -> Self {
    Self {
      name: module.name(),
      description: &module.manifest.description,
      authors: &module.manifest.authors,
      path: &module.root,
      contains: module.contains(),
    }
  }
}

fn listing(found: &SearchResult) -> Listing<'_> {
  Listing {
    resources: found.resources().map(ModuleEntry::from).collect(),
    collections: found.collections().map(ModuleEntry::from).collect(),
    skipped: found
      .skipped
      .iter()
      .map(|s| SkippedEntry {
        path: &s.path,
        reason: &s.reason,
      })
      .collect(),
  }
}

pub fn cmd_modules(args: ModulesArgs) -> Result<()> {
  let found = super::discover(&args.modules)?;
  let listing = listing(&found);

  if args.output_format.is_json() {
    return print_json(&listing);
  }

  if listing.resources.is_empty() && listing.collections.is_empty() {
    status(Tone::Note, "No modules found");
  }
  print_section("Resources", &listing.resources);
  print_section("Collections", &listing.collections);
  for skipped in &listing.skipped {
    status(Tone::Warn, &format!("Skipped {}: {}", skipped.path.display(), skipped.reason));
  }

  Ok(())
}

fn print_section(title: &str, entries: &[ModuleEntry<'_>]) {
  if entries.is_empty() {
    return;
  }
  println!("{}:", title);
  for entry in entries {
    let name = entry.name.if_supports_color(Stream::Stdout, |s| s.cyan());
    if entry.description.is_empty() {
      println!("  {} {}", ITEM_MARKER, name);
    } else {
      println!(
        "  {} {} {}",
        ITEM_MARKER,
        name,
        entry.description.if_supports_color(Stream::Stdout, |s| s.dimmed())
      );
    }
    if !entry.contains.is_empty() {
      println!("      {} {}", MEMBER_MARKER, entry.contains.join(", "));
    }
  }
  println!();
}
