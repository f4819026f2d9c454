//! Building a [`PatchSet`] from module patch definitions.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::task::JoinSet;
use tracing::debug;

use super::{FlatKeyPatch, PatchSet};
use crate::codec::Content;
use crate::module::{Module, PatchDefinition, PatchSource, search::normalize_relative};

/// Errors raised while loading patch sources.
#[derive(Debug, Error)]
pub enum PatchError {
  #[error("failed to read patch source {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse patch source {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("patch loading task failed: {0}")]
  Task(#[from] tokio::task::JoinError),
}

/// Aggregate the patch definitions of `modules` into one [`PatchSet`].
///
/// `modules` must already be in priority order. Sources are loaded
/// concurrently, but every result is gathered and put back into
/// (module, definition) order before anything is merged, so a later module's
/// addition always overwrites an earlier one.
pub async fn aggregate_patches(modules: &[Module]) -> Result<PatchSet, PatchError> {
  let mut join_set = JoinSet::new();
  let mut index = 0usize;

  for module in modules {
    for def in module.patches() {
      let root = module.root.clone();
      let def = def.clone();
      let idx = index;
      index += 1;
      join_set.spawn(async move {
        let patch = load_definition(&root, &def).await?;
        Ok::<_, PatchError>((idx, normalize_relative(Path::new(&def.file)), patch))
      });
    }
  }

  let mut loaded = Vec::with_capacity(index);
  while let Some(joined) = join_set.join_next().await {
    loaded.push(joined??);
  }
  loaded.sort_by_key(|(idx, _, _)| *idx);

  let mut set = PatchSet::new();
  for (_, target, patch) in loaded {
    set.merge(target, patch);
  }
  debug!(definitions = index, targets = set.len(), "aggregated patches");
  Ok(set)
}

async fn load_definition(root: &Path, def: &PatchDefinition) -> Result<FlatKeyPatch, PatchError> {
  let addition = match &def.add {
    PatchSource::Absent => Content::new(),
    PatchSource::Inline(content) => content.clone(),
    PatchSource::FileRef(rel) => read_json_source(&root.join(rel)).await?.unwrap_or_default(),
  };
  let deletion = match &def.remove {
    PatchSource::Absent => Vec::new(),
    PatchSource::Inline(keys) => keys.clone(),
    PatchSource::FileRef(rel) => read_json_source(&root.join(rel)).await?.unwrap_or_default(),
  };
  Ok(FlatKeyPatch {
    addition,
    deletion: deletion.into_iter().collect(),
  })
}

/// Read a JSON patch source; `None` if the file does not exist.
async fn read_json_source<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, PatchError> {
  let text = match tokio::fs::read_to_string(path).await {
    Ok(text) => text,
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      debug!(path = %path.display(), "patch source missing, treating as empty");
      return Ok(None);
    }
    Err(source) => {
      return Err(PatchError::Read {
        path: path.to_path_buf(),
        source,
      });
    }
  };
  let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
  serde_json::from_str(text).map(Some).map_err(|source| PatchError::Parse {
    path: path.to_path_buf(),
    source,
  })
}
