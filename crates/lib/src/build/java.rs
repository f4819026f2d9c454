//! Java `pack.mcmeta` generation.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::codec::Content;
use crate::options::BuildOptions;
use crate::patch::{ContentPatch, FlatKeyPatch, NestedKeyPatch};

/// The patch turning the base `pack.mcmeta` into the built one.
///
/// Compatible packs replace the stock language, so the custom `language`
/// block is dropped. The requested format is written to `pack.pack_format`.
pub fn mcmeta_patch(options: &BuildOptions) -> ContentPatch {
  let flat_key = options.compatible.then(|| FlatKeyPatch {
    addition: Content::new(),
    deletion: BTreeSet::from(["language".to_string()]),
  });

  let nested_key = options.format.map(|format| {
    let mut addition = Content::new();
    addition.insert("pack.pack_format".to_string(), Value::from(format));
    NestedKeyPatch {
      addition,
      deletion: BTreeSet::new(),
    }
  });

  ContentPatch { flat_key, nested_key }
}
