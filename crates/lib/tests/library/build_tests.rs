//! Full builds from modules on disk.

use packsmith_lib::build::BuildError;
use packsmith_lib::options::{BuildOptions, BuildType};
use packsmith_lib::platform::Platform;
use packsmith_lib::select::parse_priority;
use serde_json::json;

use super::common::{Workspace, entry_names, read_entry, read_json};

const JAVA_LANG: &str = "assets/minecraft/lang/zh_meme.json";

fn java(resources: &[&str], collections: &[&str]) -> BuildOptions {
  let mut options = BuildOptions::new(Platform::Java);
  options.format = Some(9);
  options.modules.resource = resources.iter().map(|s| s.to_string()).collect();
  options.modules.collection = collections.iter().map(|s| s.to_string()).collect();
  options
}

fn java_workspace() -> Workspace {
  let ws = Workspace::new();
  ws.write(
    "base/pack.mcmeta",
    r#"{"pack": {"pack_format": 6, "description": "meme"}, "language": {"zh_meme": {"name": "Meme"}}}"#,
  );
  ws.write("base/pack.png", "png");
  ws.write(&format!("base/{JAVA_LANG}"), r#"{"menu.quit": "退出", "item.bundle": "收纳袋"}"#);
  ws
}

#[tokio::test]
async fn java_build_patches_primary_file_and_mcmeta() {
  let ws = java_workspace();
  ws.resource(
    "bagify",
    &format!(r#""languageModification": [{{"file": "{JAVA_LANG}", "add": "add.json", "remove": ["menu.quit"]}}]"#),
  );
  ws.write("modules/bagify/add.json", r#"{"item.bundle": "袋子"}"#);
  ws.write("modules/bagify/assets/minecraft/textures/item/bundle.png", "bag");

  let result = ws.builder().build(&java(&["bagify"], &[])).await.unwrap();

  let mut names = entry_names(&result.content);
  names.sort();
  assert_eq!(
    names,
    vec![
      "assets/minecraft/lang/zh_meme.json",
      "assets/minecraft/textures/item/bundle.png",
      "pack.mcmeta",
      "pack.png",
    ]
  );

  let lang = read_entry(&result.content, JAVA_LANG).unwrap();
  assert!(lang.is_ascii(), "translation json must be ascii-escaped");
  assert_eq!(serde_json::from_str::<serde_json::Value>(&lang).unwrap(), json!({ "item.bundle": "袋子" }));

  let mcmeta = read_json(&result.content, "pack.mcmeta");
  assert_eq!(mcmeta["pack"]["pack_format"], 9);
  assert_eq!(mcmeta["language"]["zh_meme"]["name"], "Meme");
  assert_eq!(result.hash.0.len(), 64);
}

#[tokio::test]
async fn builds_are_byte_identical() {
  let ws = java_workspace();
  for name in ["a", "b", "c"] {
    ws.resource(name, "");
    ws.write(&format!("modules/{name}/assets/{name}.txt"), name);
  }
  let builder = ws.builder();
  let options = java(&["c", "a", "b"], &[]);

  let first = builder.build(&options).await.unwrap();
  let second = builder.build(&options).await.unwrap();

  assert_eq!(first.content, second.content);
  assert_eq!(first.hash, second.hash);
}

#[tokio::test]
async fn later_priority_wins_on_shared_target() {
  let ws = Workspace::new();
  ws.write("base/pack.mcmeta", r#"{"pack": {}}"#);
  ws.resource("A", r#""languageModification": [{"file": "x.json", "add": {"k": "a"}}]"#);
  ws.resource("B", r#""languageModification": [{"file": "x.json", "add": {"k": "b"}}]"#);
  let options = java(&["A", "B"], &[]);

  let a_last = ws.builder().with_priority(parse_priority("B\nA\n")).build(&options).await.unwrap();
  assert_eq!(read_json(&a_last.content, "x.json"), json!({ "k": "a" }));
  assert_eq!(a_last.modules, vec!["B", "A"]);

  let b_last = ws.builder().with_priority(parse_priority("A\nB\n")).build(&options).await.unwrap();
  assert_eq!(read_json(&b_last.content, "x.json"), json!({ "k": "b" }));
}

#[tokio::test]
async fn collection_members_are_selected_once() {
  let ws = Workspace::new();
  ws.resource("r1", "");
  ws.resource("r2", "");
  ws.collection("C", &["r1", "r2"]);

  let result = ws.builder().build(&java(&["r2"], &["C"])).await.unwrap();
  assert_eq!(result.modules, vec!["r2", "r1"]);
}

#[tokio::test]
async fn compatible_java_build_targets_stock_language() {
  let ws = java_workspace();
  ws.resource("m", "");
  ws.write("modules/m/assets/realms/lang/zh_meme.json", r#"{"realms.title": "领域"}"#);

  let mut options = java(&["m"], &[]);
  options.compatible = true;
  let result = ws.builder().build(&options).await.unwrap();

  let names = entry_names(&result.content);
  assert!(names.contains(&"assets/minecraft/lang/zh_cn.json".to_string()));
  assert!(names.contains(&"assets/realms/lang/zh_cn.json".to_string()));
  assert!(!names.iter().any(|n| n.contains("zh_meme")));
  assert!(read_json(&result.content, "pack.mcmeta").get("language").is_none());
}

#[tokio::test]
async fn legacy_java_build_uses_fragment_mapping() {
  let ws = java_workspace();
  ws.write("mappings/index.json", r#"["items"]"#);
  ws.write("mappings/items.json", r#"{"item.bundle.name": "item.bundle"}"#);

  let mut options = java(&[], &[]);
  options.build_type = BuildType::Legacy;
  options.format = Some(3);
  options.legacy_mapping = Some(ws.path().join("mappings/index.json"));

  let result = ws.builder().build(&options).await.unwrap();
  let lang = read_entry(&result.content, "assets/minecraft/lang/zh_cn.lang").unwrap();
  assert_eq!(lang, "menu.quit=退出\nitem.bundle.name=收纳袋");
  assert_eq!(read_json(&result.content, "pack.mcmeta")["pack"]["pack_format"], 3);
}

fn legacy(ws: &Workspace, mapping: &str) -> BuildOptions {
  ws.write("mappings/table.json", mapping);
  let mut options = java(&[], &[]);
  options.build_type = BuildType::Legacy;
  options.format = Some(3);
  options.legacy_mapping = Some(ws.path().join("mappings/table.json"));
  options
}

#[tokio::test]
async fn legacy_build_converts_every_translation_json() {
  let ws = java_workspace();
  ws.resource(
    "realms",
    r#""languageModification": [{"file": "assets/realms/lang/zh_meme.json", "add": {"realms.title": "领域"}}]"#,
  );
  ws.write("modules/realms/assets/other/lang/zh_meme.json", r#"{"other.key": "x"}"#);
  let mut options = legacy(&ws, "{}");
  options.modules.resource = vec!["realms".to_string()];

  let result = ws.builder().build(&options).await.unwrap();

  let mut names = entry_names(&result.content);
  names.sort();
  assert_eq!(
    names,
    vec![
      "assets/minecraft/lang/zh_cn.lang",
      "assets/realms/lang/zh_cn.lang",
      "pack.mcmeta",
      "pack.png",
    ]
  );
  assert_eq!(
    read_entry(&result.content, "assets/realms/lang/zh_cn.lang").unwrap(),
    "realms.title=领域"
  );
}

#[tokio::test]
async fn legacy_compatible_build_has_no_meme_language() {
  let ws = java_workspace();
  let mut options = legacy(&ws, r#"{"item.bundle.name": "item.bundle"}"#);
  options.compatible = true;

  let result = ws.builder().build(&options).await.unwrap();

  let names = entry_names(&result.content);
  assert!(!names.iter().any(|n| n.contains("zh_meme")));
  assert_eq!(
    read_entry(&result.content, "assets/minecraft/lang/zh_cn.lang").unwrap(),
    "menu.quit=退出\nitem.bundle.name=收纳袋"
  );
  let mcmeta = read_json(&result.content, "pack.mcmeta");
  assert!(mcmeta.get("language").is_none());
  assert_eq!(mcmeta["pack"]["pack_format"], 3);
}

#[tokio::test]
async fn legacy_mapping_keeps_modern_value_on_key_collision() {
  let ws = java_workspace();
  ws.write(
    &format!("base/{JAVA_LANG}"),
    r#"{"block.minecraft.stone": "MODERN", "tile.stone.name": "STALE"}"#,
  );
  let options = legacy(&ws, r#"{"tile.stone.name": "block.minecraft.stone"}"#);

  let result = ws.builder().build(&options).await.unwrap();
  assert_eq!(
    read_entry(&result.content, "assets/minecraft/lang/zh_cn.lang").unwrap(),
    "tile.stone.name=MODERN"
  );
}

#[tokio::test]
async fn invalid_format_is_rejected() {
  let ws = java_workspace();
  let mut options = java(&[], &[]);
  options.build_type = BuildType::Legacy;
  options.format = Some(9);

  let result = ws.builder().build(&options).await;
  assert!(matches!(result, Err(BuildError::Options(_))));
}

#[tokio::test]
async fn bedrock_build_merges_textures_and_lang() {
  let ws = Workspace::new();
  ws.write("base/manifest.json", "{}");
  ws.write("base/texts/zh_ME.lang", "## header\nmenu.quit=退出\t#\n");
  ws.write(
    "base/textures/item_texture.json",
    r#"{"resource_pack_name": "vanilla", "texture_data": {"apple": {"textures": "base"}}}"#,
  );
  ws.resource(
    "m",
    r#""languageModification": [{"file": "texts/zh_ME.lang", "add": {"item.bag": "袋子"}}]"#,
  );
  ws.write("modules/m/textures/item_texture.json", r#"{"texture_data": {"bag": {"textures": "m"}}}"#);

  let mut options = BuildOptions::new(Platform::Bedrock);
  options.modules.resource = vec!["m".to_string()];
  let result = ws.builder().build(&options).await.unwrap();

  let lang = read_entry(&result.content, "texts/zh_ME.lang").unwrap();
  assert_eq!(lang, "menu.quit=退出\t#\nitem.bag=袋子\t#");

  let textures = read_json(&result.content, "textures/item_texture.json");
  assert_eq!(textures["resource_pack_name"], "vanilla");
  assert_eq!(
    textures["texture_data"],
    json!({ "apple": { "textures": "base" }, "bag": { "textures": "m" } })
  );
  assert!(read_entry(&result.content, "textures/terrain_texture.json").is_none());
}
