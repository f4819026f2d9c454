//! JSON rendering.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use super::{CodecError, Content};

/// Code units at or above this value are written as `\uXXXX` escapes.
const LATIN1_BOUNDARY: u32 = 0x00FF;

/// Render a value as JSON indented with four spaces.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CodecError> {
  let mut buf = Vec::new();
  let formatter = PrettyFormatter::with_indent(b"    ");
  let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
  value.serialize(&mut serializer)?;
  Ok(String::from_utf8(buf)?)
}

/// Render a content object as JSON whose text only contains code units below
/// the Latin-1 boundary.
///
/// Characters outside the Basic Multilingual Plane are written as an escaped
/// UTF-16 surrogate pair. This exists for translation files consumed by
/// clients with a narrow text decoder, it is not a general escaper.
pub fn to_ascii_json(content: &Content) -> Result<String, CodecError> {
  Ok(escape_above_latin1(&to_pretty_json(content)?))
}

fn escape_above_latin1(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  let mut units = [0u16; 2];
  for c in text.chars() {
    if (c as u32) < LATIN1_BOUNDARY {
      out.push(c);
    } else {
      for unit in c.encode_utf16(&mut units) {
        out.push_str(&format!("\\u{:04x}", unit));
      }
    }
  }
  out
}
