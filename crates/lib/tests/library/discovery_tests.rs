//! Module discovery feeding selection.

use packsmith_lib::module::ModuleSearch;
use packsmith_lib::select::{ModuleRequest, read_priority_file, select_modules};

use super::common::Workspace;

#[test]
fn discovery_and_priority_file_drive_selection() {
  let ws = Workspace::new();
  ws.resource("alpha", r#""incompatibleWith": ["gamma"]"#);
  ws.resource("beta", "");
  ws.resource("gamma", "");
  ws.collection("everything", &["alpha", "beta", "gamma", "missing"]);
  ws.write("modules/broken/module_manifest.json", "{");
  ws.write("modules/priority.txt", "# lowest first\ngamma\nbeta # middle\nalpha\n");

  let result = ModuleSearch::new().add_search_path(ws.modules_dir()).search().unwrap();
  assert_eq!(result.resources().count(), 3);
  assert_eq!(result.collections().count(), 1);
  assert_eq!(result.skipped.len(), 1);

  let priority = read_priority_file(&ws.modules_dir().join("priority.txt")).unwrap();
  let request = ModuleRequest {
    resource: vec![],
    collection: vec!["everything".to_string()],
  };
  let selection = select_modules(&result.modules, &request, &priority);

  assert_eq!(selection.names(), vec!["gamma", "beta", "alpha"]);
  assert_eq!(selection.unknown, vec!["missing"]);
  assert_eq!(selection.conflicts.len(), 1);
  assert_eq!(selection.conflicts[0].module, "alpha");
}

#[test]
fn patch_source_files_are_not_packed() {
  let ws = Workspace::new();
  ws.resource(
    "m",
    r#""languageModification": [{"file": "x.json", "add": "patches/add.json", "remove": "patches/remove.json"}]"#,
  );
  ws.write("modules/m/patches/add.json", "{}");
  ws.write("modules/m/patches/remove.json", "[]");
  ws.write("modules/m/patches/readme.txt", "kept");

  let result = ModuleSearch::new().add_search_path(ws.modules_dir()).search().unwrap();
  assert_eq!(result.modules[0].files, vec!["patches/readme.txt"]);
}
