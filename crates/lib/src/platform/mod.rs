//! Target platforms.
//!
//! Both platforms share the whole composition and patching engine. What
//! differs is plain data, kept in a [`PlatformProfile`]: which files are
//! computed rather than copied, where the primary translation file lives and
//! in which dialect, and how the compatibility and legacy transforms rename
//! entries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codec::{ContentFormat, Dialect};

/// The game edition a pack is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
  Java,
  Bedrock,
}

impl Platform {
  pub fn profile(self) -> &'static PlatformProfile {
    match self {
      Platform::Java => &JAVA,
      Platform::Bedrock => &BEDROCK,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Platform::Java => "java",
      Platform::Bedrock => "bedrock",
    }
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Platform {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "java" | "je" => Ok(Platform::Java),
      "bedrock" | "be" => Ok(Platform::Bedrock),
      other => Err(format!("unknown platform '{}'", other)),
    }
  }
}

/// Renames applied when a pack must replace the stock language instead of
/// adding its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompatRule {
  /// Substring replaced in every entry path.
  pub from: &'static str,
  pub to: &'static str,
  /// Entries removed before renaming.
  pub drop: &'static [&'static str],
}

/// Rewrites translation JSON into the pre-JSON text format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyRule {
  /// Path suffixes of computed entries that get converted.
  pub sources: &'static [&'static str],
  /// Suffix the matched source suffix is replaced with.
  pub target: &'static str,
  /// Copied files ending with this are dropped from legacy packs.
  pub drop_suffix: &'static str,
  pub dialect: Dialect,
}

impl LegacyRule {
  /// The converted path for `path`, if it ends with one of the sources.
  pub fn target_for(&self, path: &str) -> Option<String> {
    self
      .sources
      .iter()
      .find_map(|source| path.strip_suffix(source))
      .map(|stem| format!("{}{}", stem, self.target))
  }
}

/// Per-platform layout data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformProfile {
  pub platform: Platform,
  /// Archive path of the primary translation file.
  pub primary_lang: &'static str,
  /// Dialect used for `.lang` entries.
  pub dialect: Dialect,
  /// Paths produced by the builder, never copied from base or module files.
  pub computed: &'static [&'static str],
  pub compat: CompatRule,
  pub legacy: Option<LegacyRule>,
}

pub const JAVA_MCMETA: &str = "pack.mcmeta";
pub const BEDROCK_TEXTURE_FILES: [&str; 2] = ["textures/item_texture.json", "textures/terrain_texture.json"];

static JAVA: PlatformProfile = PlatformProfile {
  platform: Platform::Java,
  primary_lang: "assets/minecraft/lang/zh_meme.json",
  dialect: Dialect::Standard,
  computed: &[JAVA_MCMETA, "assets/minecraft/lang/zh_meme.json"],
  compat: CompatRule {
    from: "zh_meme.json",
    to: "zh_cn.json",
    drop: &[],
  },
  legacy: Some(LegacyRule {
    sources: &["zh_meme.json", "zh_cn.json"],
    target: "zh_cn.lang",
    drop_suffix: "zh_meme.json",
    dialect: Dialect::Standard,
  }),
};

static BEDROCK: PlatformProfile = PlatformProfile {
  platform: Platform::Bedrock,
  primary_lang: "texts/zh_ME.lang",
  dialect: Dialect::Tagged,
  computed: &[
    "texts/zh_ME.lang",
    BEDROCK_TEXTURE_FILES[0],
    BEDROCK_TEXTURE_FILES[1],
  ],
  compat: CompatRule {
    from: "zh_ME",
    to: "zh_CN",
    drop: &["texts/languages.json", "texts/language_names.json"],
  },
  legacy: None,
};

impl PlatformProfile {
  pub fn is_computed(&self, path: &str) -> bool {
    self.computed.contains(&path)
  }

  /// Format of a computed entry at `path`.
  ///
  /// Java translation JSON is escaped to ASCII, other JSON is pretty-printed,
  /// `.lang` files use the platform dialect.
  pub fn format_for(&self, path: &str) -> ContentFormat {
    if path.ends_with(".lang") {
      ContentFormat::Lang(self.dialect)
    } else if self.platform == Platform::Java && path.contains("/lang/") && path.ends_with(".json") {
      ContentFormat::AsciiJson
    } else {
      ContentFormat::Json
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn profiles_match_platform() {
    assert_eq!(Platform::Java.profile().platform, Platform::Java);
    assert_eq!(Platform::Bedrock.profile().platform, Platform::Bedrock);
  }

  #[test]
  fn only_java_has_legacy_output() {
    assert!(Platform::Java.profile().legacy.is_some());
    assert!(Platform::Bedrock.profile().legacy.is_none());
  }

  #[test]
  fn legacy_rule_renames_translation_json() {
    let Some(rule) = Platform::Java.profile().legacy else {
      panic!("java has a legacy rule");
    };
    assert_eq!(
      rule.target_for("assets/minecraft/lang/zh_meme.json").as_deref(),
      Some("assets/minecraft/lang/zh_cn.lang")
    );
    assert_eq!(
      rule.target_for("assets/realms/lang/zh_cn.json").as_deref(),
      Some("assets/realms/lang/zh_cn.lang")
    );
    assert_eq!(rule.target_for("assets/minecraft/lang/en_us.json"), None);
  }

  #[test]
  fn primary_lang_is_computed() {
    for platform in [Platform::Java, Platform::Bedrock] {
      let profile = platform.profile();
      assert!(profile.is_computed(profile.primary_lang));
    }
  }

  #[test]
  fn java_translations_render_as_ascii_json() {
    let java = Platform::Java.profile();
    assert_eq!(java.format_for("assets/minecraft/lang/zh_meme.json"), ContentFormat::AsciiJson);
    assert_eq!(java.format_for("pack.mcmeta"), ContentFormat::Json);
    assert_eq!(java.format_for("assets/minecraft/lang/zh_cn.lang"), ContentFormat::Lang(Dialect::Standard));

    let bedrock = Platform::Bedrock.profile();
    assert_eq!(bedrock.format_for("texts/zh_ME.lang"), ContentFormat::Lang(Dialect::Tagged));
    assert_eq!(bedrock.format_for("textures/item_texture.json"), ContentFormat::Json);
  }

  #[test]
  fn parses_platform_names() {
    assert_eq!("java".parse::<Platform>().unwrap(), Platform::Java);
    assert_eq!("BE".parse::<Platform>().unwrap(), Platform::Bedrock);
    assert!("pocket".parse::<Platform>().is_err());
  }

  #[test]
  fn serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Platform::Bedrock).unwrap(), "\"bedrock\"");
  }
}
