//! Line-oriented `key=value` translation files.
//!
//! Both dialects hold one entry per line and split on the first `=` only, so
//! values may themselves contain `=`. They differ in how comments are marked:
//!
//! - [`Dialect::Standard`]: everything from the first unescaped `#` is a comment.
//! - [`Dialect::Tagged`]: a comment starts at a tab followed by `#`, or at `##`.
//!   Serialized lines carry a trailing `\t#` marker.

use std::borrow::Cow;

use serde_json::Value;

use super::Content;

/// Which comment convention a `.lang` file follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
  Standard,
  Tagged,
}

/// Parse a `.lang` file into a content object.
///
/// Blank lines (after comment stripping) and lines without `=` are skipped.
/// A key that appears twice keeps its last value.
pub fn parse_lang(dialect: Dialect, raw: &str) -> Content {
  let normalized = raw.replace("\r\n", "\n");
  let mut content = Content::new();

  for line in normalized.split('\n') {
    let line = strip_comment(dialect, line).trim_start();
    if line.is_empty() {
      continue;
    }
    let Some((key, value)) = line.split_once('=') else {
      continue;
    };
    content.insert(key.to_string(), Value::String(value.to_string()));
  }

  content
}

/// Serialize a content object as a `.lang` file.
///
/// Lines are joined with `\n` and there is no trailing newline.
pub fn dump_lang(dialect: Dialect, content: &Content) -> String {
  content
    .iter()
    .map(|(key, value)| match dialect {
      Dialect::Standard => format!("{}={}", key, value_text(value)),
      Dialect::Tagged => format!("{}={}\t#", key, value_text(value)),
    })
    .collect::<Vec<_>>()
    .join("\n")
}

fn strip_comment(dialect: Dialect, line: &str) -> &str {
  match dialect {
    Dialect::Standard => {
      let mut previous = None;
      for (idx, c) in line.char_indices() {
        if c == '#' && previous != Some('\\') {
          return &line[..idx];
        }
        previous = Some(c);
      }
      line
    }
    Dialect::Tagged => {
      let cut = [line.find("\t#"), line.find("##")].into_iter().flatten().min();
      match cut {
        Some(idx) => &line[..idx],
        None => line,
      }
    }
  }
}

fn value_text(value: &Value) -> Cow<'_, str> {
  match value {
    Value::String(s) => Cow::Borrowed(s.as_str()),
    other => Cow::Owned(other.to_string()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn content(pairs: &[(&str, &str)]) -> Content {
    pairs
      .iter()
      .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
      .collect()
  }

  #[test]
  fn tagged_parse_strips_tab_comment() {
    let parsed = parse_lang(Dialect::Tagged, "a=b\t#comment\n");
    assert_eq!(parsed, content(&[("a", "b")]));
  }

  #[test]
  fn tagged_dump_appends_marker() {
    assert_eq!(dump_lang(Dialect::Tagged, &content(&[("a", "b")])), "a=b\t#");
  }

  #[test]
  fn tagged_parse_strips_double_hash() {
    let parsed = parse_lang(Dialect::Tagged, "## header\nkey=value ## note\nother=#1");
    assert_eq!(parsed, content(&[("key", "value "), ("other", "#1")]));
  }

  #[test]
  fn standard_parse_strips_hash_comment() {
    let parsed = parse_lang(Dialect::Standard, "# header\nitem.apple=Apple # red\n\n   \nno_equals_here");
    assert_eq!(parsed, content(&[("item.apple", "Apple ")]));
  }

  #[test]
  fn standard_parse_keeps_escaped_hash() {
    let parsed = parse_lang(Dialect::Standard, r"color=\#ff0000 # comment");
    assert_eq!(parsed, content(&[("color", r"\#ff0000 ")]));
  }

  #[test]
  fn parse_splits_on_first_equals_only() {
    let parsed = parse_lang(Dialect::Standard, "formula=a=b+c");
    assert_eq!(parsed, content(&[("formula", "a=b+c")]));
  }

  #[test]
  fn parse_handles_crlf_and_leading_whitespace() {
    let parsed = parse_lang(Dialect::Standard, "  a=1\r\n\tb=2\r\n");
    assert_eq!(parsed, content(&[("a", "1"), ("b", "2")]));
  }

  #[test]
  fn duplicate_keys_keep_last_value() {
    let parsed = parse_lang(Dialect::Standard, "a=1\nb=2\na=3");
    assert_eq!(parsed, content(&[("a", "3"), ("b", "2")]));
    assert_eq!(parsed.keys().collect::<Vec<_>>(), vec!["a", "b"]);
  }

  #[test]
  fn dump_has_no_trailing_newline() {
    let dumped = dump_lang(Dialect::Standard, &content(&[("a", "1"), ("b", "2")]));
    assert_eq!(dumped, "a=1\nb=2");
  }

  #[test]
  fn dump_writes_non_string_values_as_json() {
    let mut c = Content::new();
    c.insert("n".to_string(), json!(9));
    assert_eq!(dump_lang(Dialect::Standard, &c), "n=9");
  }

  #[test]
  fn round_trip_both_dialects() {
    let original = content(&[
      ("menu.singleplayer", "Singleplayer"),
      ("key.with.dots", "value with spaces"),
      ("unicode", "梗体中文"),
    ]);
    for dialect in [Dialect::Standard, Dialect::Tagged] {
      assert_eq!(parse_lang(dialect, &dump_lang(dialect, &original)), original);
    }
  }
}
