//! Terminal output for packsmith.
//!
//! Status lines go through [`status`], which picks the stream, marker and
//! color from a [`Tone`]. Problems (warnings, errors) go to stderr so a
//! `--output-format json` report on stdout stays parseable.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

/// Marker before a module's collection members.
pub const MEMBER_MARKER: &str = "→";

/// Marker before a listed module.
pub const ITEM_MARKER: &str = "•";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
  Done,
  Note,
  Warn,
  Fail,
}

impl Tone {
  fn marker(self) -> &'static str {
    match self {
      Tone::Done => "✓",
      Tone::Note => ITEM_MARKER,
      Tone::Warn => "⚠",
      Tone::Fail => "✗",
    }
  }

  fn stream(self) -> Stream {
    match self {
      Tone::Done | Tone::Note => Stream::Stdout,
      Tone::Warn | Tone::Fail => Stream::Stderr,
    }
  }
}

/// Print one status line; problem tones color the whole message.
pub fn status(tone: Tone, message: &str) {
  let stream = tone.stream();
  let marker = tone.marker();
  let line = match tone {
    Tone::Done => format!("{} {}", marker.if_supports_color(stream, |s| s.green()), message),
    Tone::Note => format!("{} {}", marker.if_supports_color(stream, |s| s.blue()), message),
    Tone::Warn => format!(
      "{} {}",
      marker.if_supports_color(stream, |s| s.yellow()),
      message.if_supports_color(stream, |s| s.yellow())
    ),
    Tone::Fail => format!(
      "{} {}",
      marker.if_supports_color(stream, |s| s.red()),
      message.if_supports_color(stream, |s| s.red())
    ),
  };
  match stream {
    Stream::Stderr => eprintln!("{}", line),
    _ => println!("{}", line),
  }
}

/// An indented `label: value` line under a status line.
pub fn detail(label: &str, value: &str) {
  println!("  {}: {}", label.if_supports_color(Stream::Stdout, |s| s.dimmed()), value);
}

/// Archive sizes are small; anything past megabytes is not expected.
pub fn archive_size(bytes: usize) -> String {
  const KIB: usize = 1024;
  const MIB: usize = KIB * 1024;

  match bytes {
    b if b >= MIB => format!("{:.1} MB", b as f64 / MIB as f64),
    b if b >= KIB => format!("{:.1} KB", b as f64 / KIB as f64),
    b => format!("{} B", b),
  }
}

/// Millisecond precision; build timings below that are noise.
pub fn elapsed(duration: Duration) -> String {
  let millis = Duration::from_millis(duration.as_millis() as u64);
  if millis.is_zero() {
    return "0ms".to_string();
  }
  humantime::format_duration(millis).to_string()
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize report")?;
  println!("{}", json);
  Ok(())
}
