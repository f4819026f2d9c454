use std::io;
use std::path::Path;

use tokio::task::JoinSet;
use tracing::debug;

use super::ArchiveError;
use super::entry::{BaseContent, ComputedContent, EntrySet, EntrySource};
use crate::codec::{Content, ContentFormat};
use crate::patch::apply_content_patch;

/// An entry with its final bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
  pub path: String,
  pub data: Vec<u8>,
}

/// Produce the bytes of every entry.
///
/// Entries resolve concurrently. The result is in path order regardless of
/// which task finishes first.
pub async fn resolve_entries(set: EntrySet) -> Result<Vec<ResolvedEntry>, ArchiveError> {
  let mut join_set = JoinSet::new();
  let total = set.len();

  for (idx, (path, source)) in set.into_inner().into_iter().enumerate() {
    join_set.spawn(async move {
      let data = resolve_source(&path, source).await?;
      Ok::<_, ArchiveError>((idx, ResolvedEntry { path, data }))
    });
  }

  let mut resolved = Vec::with_capacity(total);
  while let Some(joined) = join_set.join_next().await {
    resolved.push(joined??);
  }
  resolved.sort_by_key(|(idx, _)| *idx);

  debug!(entries = total, "resolved archive entries");
  Ok(resolved.into_iter().map(|(_, entry)| entry).collect())
}

async fn resolve_source(path: &str, source: EntrySource) -> Result<Vec<u8>, ArchiveError> {
  match source {
    EntrySource::Bytes(data) => Ok(data),
    EntrySource::File(file) => tokio::fs::read(&file).await.map_err(|source| ArchiveError::Read { path: file, source }),
    EntrySource::Computed(computed) => resolve_computed(path, computed).await,
  }
}

async fn resolve_computed(path: &str, computed: ComputedContent) -> Result<Vec<u8>, ArchiveError> {
  let mut content = load_base(path, computed.base).await?;
  content = apply_content_patch(content, &computed.patch);
  if let Some(key_map) = &computed.key_map {
    content = key_map.apply(content);
  }
  let text = computed.output.render(&content).map_err(|source| ArchiveError::Render {
    path: path.to_string(),
    source,
  })?;
  Ok(text.into_bytes())
}

async fn load_base(path: &str, base: BaseContent) -> Result<Content, ArchiveError> {
  match base {
    BaseContent::Empty => Ok(Content::new()),
    BaseContent::Inline(content) => Ok(content),
    BaseContent::File { path: file, format } => match read_optional(&file).await? {
      Some(data) => parse(path, &data, format),
      None => {
        debug!(path, file = %file.display(), "base file missing, starting empty");
        Ok(Content::new())
      }
    },
    BaseContent::Bytes { data, format } => parse(path, &data, format),
  }
}

async fn read_optional(file: &Path) -> Result<Option<Vec<u8>>, ArchiveError> {
  match tokio::fs::read(file).await {
    Ok(data) => Ok(Some(data)),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
    Err(source) => Err(ArchiveError::Read {
      path: file.to_path_buf(),
      source,
    }),
  }
}

fn parse(path: &str, data: &[u8], format: ContentFormat) -> Result<Content, ArchiveError> {
  format
    .parse(&String::from_utf8_lossy(data))
    .map_err(|source| ArchiveError::Parse {
      path: path.to_string(),
      source,
    })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::codec::Dialect;
  use crate::patch::{ContentPatch, FlatKeyPatch};
  use serde_json::json;
  use std::path::PathBuf;
  use tempfile::TempDir;

  fn addition(key: &str, value: &str) -> ContentPatch {
    let mut patch = FlatKeyPatch::default();
    patch.addition.insert(key.to_string(), json!(value));
    ContentPatch::flat(patch)
  }

  #[tokio::test]
  async fn resolves_in_path_order() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("a.txt"), "from disk").unwrap();

    let mut set = EntrySet::new();
    set.insert("z.bin", EntrySource::Bytes(vec![1, 2, 3]));
    set.insert("a.txt", EntrySource::File(temp.path().join("a.txt")));

    let resolved = resolve_entries(set).await.unwrap();
    assert_eq!(resolved[0].path, "a.txt");
    assert_eq!(resolved[0].data, b"from disk");
    assert_eq!(resolved[1].data, vec![1, 2, 3]);
  }

  #[tokio::test]
  async fn computed_entry_patches_missing_base_as_empty() {
    let mut set = EntrySet::new();
    let computed = ComputedContent::new(
      BaseContent::File {
        path: PathBuf::from("/definitely/not/here.json"),
        format: ContentFormat::Json,
      },
      ContentFormat::Lang(Dialect::Tagged),
    )
    .with_patch(addition("k", "v"));
    set.insert("texts/zh_ME.lang", EntrySource::Computed(computed));

    let resolved = resolve_entries(set).await.unwrap();
    assert_eq!(resolved[0].data, b"k=v\t#");
  }

  #[tokio::test]
  async fn computed_entry_overlays_base_file() {
    let temp = TempDir::new().unwrap();
    let base = temp.path().join("x.json");
    std::fs::write(&base, r#"{"k": "base", "other": "kept"}"#).unwrap();

    let mut set = EntrySet::new();
    let computed = ComputedContent::new(
      BaseContent::File {
        path: base,
        format: ContentFormat::Json,
      },
      ContentFormat::Json,
    )
    .with_patch(addition("k", "patched"));
    set.insert("x.json", EntrySource::Computed(computed));

    let resolved = resolve_entries(set).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&resolved[0].data).unwrap();
    assert_eq!(parsed, json!({ "k": "patched", "other": "kept" }));
  }

  #[tokio::test]
  async fn unparseable_base_is_an_error() {
    let mut set = EntrySet::new();
    let computed = ComputedContent::new(
      BaseContent::Bytes {
        data: b"{ nope".to_vec(),
        format: ContentFormat::Json,
      },
      ContentFormat::Json,
    );
    set.insert("x.json", EntrySource::Computed(computed));

    assert!(matches!(resolve_entries(set).await, Err(ArchiveError::Parse { .. })));
  }

  #[tokio::test]
  async fn missing_plain_file_is_an_error() {
    let mut set = EntrySet::new();
    set.insert("a.png", EntrySource::File(PathBuf::from("/definitely/not/here.png")));
    assert!(matches!(resolve_entries(set).await, Err(ArchiveError::Read { .. })));
  }
}
