//! Content codecs.
//!
//! Every translation or config file handled by a build is loaded into a
//! [`Content`] object (an ordered JSON object) and rendered back out through
//! one of these codecs:
//!
//! - [`lang`] - the two line-oriented `key=value` dialects
//! - [`json`] - pretty JSON and the ASCII-escaping JSON variant
//!
//! [`ContentFormat`] ties the two together so callers can parse and render by
//! format instead of branching on file extensions at every use site.

pub mod json;
pub mod lang;

use std::string::FromUtf8Error;

use serde_json::{Map, Value};
use thiserror::Error;

pub use json::{to_ascii_json, to_pretty_json};
pub use lang::{Dialect, dump_lang, parse_lang};

/// A structured key-value content object.
///
/// Key order follows insertion order, so files round-trip in their source order.
pub type Content = Map<String, Value>;

/// Errors raised while parsing or rendering content.
#[derive(Debug, Error)]
pub enum CodecError {
  /// JSON input was malformed or not an object.
  #[error("invalid json: {0}")]
  Json(#[from] serde_json::Error),

  /// Rendered output was not valid UTF-8.
  #[error("invalid utf-8 output: {0}")]
  Utf8(#[from] FromUtf8Error),
}

/// On-disk representation of a content object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
  /// Pretty-printed JSON.
  Json,
  /// Pretty-printed JSON with every code unit above Latin-1 escaped.
  AsciiJson,
  /// A line-oriented `key=value` file.
  Lang(Dialect),
}

impl ContentFormat {
  /// Pick the format for a path: `.lang` files use `dialect`, everything else is JSON.
  pub fn for_path(path: &str, dialect: Dialect) -> Self {
    if path.ends_with(".lang") {
      ContentFormat::Lang(dialect)
    } else {
      ContentFormat::Json
    }
  }

  /// Parse raw file text into a content object.
  pub fn parse(self, raw: &str) -> Result<Content, CodecError> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    match self {
      ContentFormat::Json | ContentFormat::AsciiJson => Ok(serde_json::from_str(raw)?),
      ContentFormat::Lang(dialect) => Ok(parse_lang(dialect, raw)),
    }
  }

  /// Render a content object into file text.
  pub fn render(self, content: &Content) -> Result<String, CodecError> {
    match self {
      ContentFormat::Json => to_pretty_json(content),
      ContentFormat::AsciiJson => to_ascii_json(content),
      ContentFormat::Lang(dialect) => Ok(dump_lang(dialect, content)),
    }
  }
}
