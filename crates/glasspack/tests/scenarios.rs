use std::path::PathBuf;

use glasspack::{BundleOutput, Bundler, BundlerOptions};
use glasspack_fs::MemoryFileSystem;

fn build(files: &[(&str, &str)], entry: &str) -> BundleOutput {
  try_build(files, entry).unwrap_or_else(|errors| panic!("build failed: {:?}", *errors))
}

fn try_build(
  files: &[(&str, &str)],
  entry: &str,
) -> Result<BundleOutput, glasspack::BuildError> {
  let fs = MemoryFileSystem::new(files);
  let mut bundler = Bundler::with_file_system(
    BundlerOptions {
      entry: Some(entry.to_string()),
      out_dir: Some("dist".to_string()),
      cwd: Some(PathBuf::from("/proj")),
      public_path: None,
    },
    fs,
  );
  bundler.build(false)
}

fn asset<'a>(output: &'a BundleOutput, filename: &str) -> &'a str {
  &output
    .assets
    .iter()
    .find(|asset| asset.filename == filename)
    .unwrap_or_else(|| {
      let names: Vec<_> = output.assets.iter().map(|a| a.filename.as_str()).collect();
      panic!("no asset {filename}, have {names:?}")
    })
    .content
}

/// How many of the emitted files register a factory for `module_id`.
fn factory_count(output: &BundleOutput, module_id: &str) -> usize {
  let needle = format!("\"{module_id}\": (module, exports, loadModule) => {{");
  output.assets.iter().map(|asset| asset.content.matches(&needle).count()).sum()
}

#[test]
fn static_only_build_emits_a_single_entry_bundle() {
  let output = build(
    &[
      (
        "/proj/index.js",
        "import greet, { farewell } from './greet.js';\nimport { add, PI } from './math.js';\n\nconsole.log('PI is: ' + PI);\nconsole.log('2 + 3 = ' + add(2, 3));\nconsole.log(greet('World'));\nconsole.log(farewell('World'));\n",
      ),
      (
        "/proj/math.js",
        "export const PI = 3.14159;\nexport function add(a, b) {\n  return a + b;\n}\n",
      ),
      (
        "/proj/greet.js",
        "export default function greet(name) {\n  return 'Hello, ' + name + '!';\n}\nexport function farewell(name) {\n  return 'Goodbye, ' + name + '!';\n}\n",
      ),
    ],
    "index.js",
  );

  assert_eq!(output.assets.len(), 1);
  let main = asset(&output, "main.js");

  assert!(main.starts_with("/*"));
  assert!(main.contains("\"use strict\";"));
  assert_eq!(factory_count(&output, "./index.js"), 1);
  assert_eq!(factory_count(&output, "./math.js"), 1);
  assert_eq!(factory_count(&output, "./greet.js"), 1);

  // No dynamic imports anywhere: the lazy-load runtime is omitted.
  assert!(!main.contains("installedChunks"));
  assert!(!main.contains("chunkGroupMap"));

  // Import/export syntax must not survive in any factory body.
  assert!(!main.contains("from './math.js'"));
  assert!(!main.contains("export const"));
  assert!(!main.contains("export function"));
  assert!(!main.contains("export default"));

  // Free calls of imported functions run without a receiver.
  assert!(main.contains("(0, _math_.add)(2, 3)"));
  assert!(main.contains("(0, _greet_[\"default\"])('World')"));

  assert!(main.contains("loadModule(\"./index.js\");"));
}

#[test]
fn two_independent_lazy_imports_get_their_own_chunks() {
  let output = build(
    &[
      (
        "/proj/index.js",
        "import('./a.js').then((m) => m.run());\nimport('./b.js').then((m) => m.run());\n",
      ),
      ("/proj/a.js", "export function run() {\n  return 'a';\n}\n"),
      ("/proj/b.js", "export function run() {\n  return 'b';\n}\n"),
    ],
    "index.js",
  );

  let filenames: Vec<_> = output.assets.iter().map(|a| a.filename.as_str()).collect();
  assert_eq!(filenames, ["main.js", "a_js.js", "b_js.js"]);

  let main = asset(&output, "main.js");
  assert!(main.contains("\"a_js\": [\"a_js\"]"));
  assert!(main.contains("\"b_js\": [\"b_js\"]"));
  assert!(main.contains("loadChunk(\"a_js\").then(loadModule.bind(loadModule, \"./a.js\"))"));

  let chunk_a = asset(&output, "a_js.js");
  assert!(chunk_a.starts_with("/*"));
  assert!(chunk_a.contains(
    "(self[\"bundlerChunkCallbacks\"] = self[\"bundlerChunkCallbacks\"] || []).push([\n  [\"a_js\"],"
  ));
  assert_eq!(factory_count(&output, "./a.js"), 1);
  assert_eq!(factory_count(&output, "./b.js"), 1);
}

#[test]
fn module_shared_by_two_lazy_features_is_emitted_exactly_once() {
  let output = build(
    &[
      (
        "/proj/index.js",
        "import('./feature-a.js');\nimport('./feature-b.js');\n",
      ),
      (
        "/proj/feature-a.js",
        "import { helper } from './shared-utils.js';\nexport const a = helper('a');\n",
      ),
      (
        "/proj/feature-b.js",
        "import { helper } from './shared-utils.js';\nexport const b = helper('b');\n",
      ),
      ("/proj/shared-utils.js", "export function helper(tag) {\n  return 'shared:' + tag;\n}\n"),
    ],
    "index.js",
  );

  let filenames: Vec<_> = output.assets.iter().map(|a| a.filename.as_str()).collect();
  assert_eq!(
    filenames,
    ["main.js", "feature-a_js.js", "feature-b_js.js", "shared_shared-utils_js.js"]
  );

  // The shared module lives in exactly one emitted file, and it is the
  // shared chunk.
  assert_eq!(factory_count(&output, "./shared-utils.js"), 1);
  assert!(asset(&output, "shared_shared-utils_js.js").contains("\"./shared-utils.js\""));

  let main = asset(&output, "main.js");
  assert!(main.contains("\"feature-a_js\": [\"shared_shared-utils_js\", \"feature-a_js\"]"));
  assert!(main.contains("\"feature-b_js\": [\"shared_shared-utils_js\", \"feature-b_js\"]"));
}

#[test]
fn every_reached_module_has_exactly_one_factory_across_all_files() {
  let output = build(
    &[
      ("/proj/index.js", "import { a } from './a.js';\nimport('./lazy.js');\nconsole.log(a);\n"),
      ("/proj/a.js", "import { b } from './b.js';\nexport const a = b + 1;\n"),
      ("/proj/b.js", "export const b = 1;\n"),
      ("/proj/lazy.js", "import { b } from './b.js';\nexport const lazy = b + 2;\n"),
    ],
    "index.js",
  );

  for module_id in ["./index.js", "./a.js", "./b.js", "./lazy.js"] {
    assert_eq!(factory_count(&output, module_id), 1, "{module_id}");
  }

  // `b` sits in the main chunk, so the lazy chunk must not duplicate it.
  assert!(!asset(&output, "lazy_js.js").contains("\"./b.js\""));
}

#[test]
fn dynamic_target_already_in_main_gets_an_empty_chunk_group() {
  let output = build(
    &[
      (
        "/proj/index.js",
        "import { helper } from './util.js';\nconsole.log(helper());\nimport('./util.js');\n",
      ),
      ("/proj/util.js", "export function helper() {\n  return 1;\n}\n"),
    ],
    "index.js",
  );

  assert_eq!(output.assets.len(), 1);
  let main = asset(&output, "main.js");
  assert!(main.contains("\"util_js\": []"));
  assert!(main.contains("loadChunk(\"util_js\").then(loadModule.bind(loadModule, \"./util.js\"))"));
}

#[test]
fn cyclic_static_imports_bundle_without_looping() {
  let output = build(
    &[
      (
        "/proj/index.js",
        "import { even } from './even.js';\nconsole.log(even(10));\n",
      ),
      (
        "/proj/even.js",
        "import { odd } from './odd.js';\nexport function even(n) {\n  return n === 0 ? true : odd(n - 1);\n}\n",
      ),
      (
        "/proj/odd.js",
        "import { even } from './even.js';\nexport function odd(n) {\n  return n === 0 ? false : even(n - 1);\n}\n",
      ),
    ],
    "index.js",
  );

  assert_eq!(output.assets.len(), 1);
  assert_eq!(factory_count(&output, "./even.js"), 1);
  assert_eq!(factory_count(&output, "./odd.js"), 1);
}

#[test]
fn live_bindings_are_read_through_getters() {
  let output = build(
    &[
      (
        "/proj/index.js",
        "import { count, increment } from './counter.js';\nconsole.log(count);\nincrement();\nconsole.log(count);\n",
      ),
      (
        "/proj/counter.js",
        "export let count = 0;\nexport function increment() {\n  count += 1;\n}\n",
      ),
    ],
    "index.js",
  );

  let main = asset(&output, "main.js");
  // The counter module's exports are getters over the live locals.
  assert!(main.contains("count: () => count,"));
  // The importer reads through the namespace variable each time.
  assert!(main.contains("console.log(_counter_.count);"));
  assert!(main.contains("(0, _counter_.increment)();"));
}

#[test]
fn builds_are_deterministic() {
  let files: &[(&str, &str)] = &[
    ("/proj/index.js", "import('./feature-a.js');\nimport('./feature-b.js');\n"),
    ("/proj/feature-a.js", "import { h } from './shared.js';\nexport const a = h;\n"),
    ("/proj/feature-b.js", "import { h } from './shared.js';\nexport const b = h;\n"),
    ("/proj/shared.js", "export const h = 1;\n"),
  ];

  let first = build(files, "index.js");
  let second = build(files, "index.js");

  assert_eq!(first.assets.len(), second.assets.len());
  for (a, b) in first.assets.iter().zip(second.assets.iter()) {
    assert_eq!(a.filename, b.filename);
    assert_eq!(a.content, b.content);
  }
}

#[test]
fn json_modules_resolve_and_bundle() {
  let output = build(
    &[
      ("/proj/index.js", "import config from './config';\nconsole.log(config.name);\n"),
      ("/proj/config.json", "{ \"name\": \"glasspack\" }\n"),
    ],
    "index.js",
  );

  let main = asset(&output, "main.js");
  assert!(main.contains("\"./config.json\""));
  assert!(main.contains("var __default_export__ = { \"name\": \"glasspack\" };"));
}

#[test]
fn missing_entry_is_a_build_error() {
  let errors = try_build(&[], "index.js").unwrap_err();
  assert!(errors[0].to_string().contains("Entry file does not exist"));
}

#[test]
fn unresolved_imports_name_the_candidates_and_importer() {
  let errors = try_build(
    &[("/proj/index.js", "import { x } from './missing.js';\n")],
    "index.js",
  )
  .unwrap_err();

  let message = errors[0].to_string();
  assert!(message.contains("Cannot resolve \"./missing.js\""));
  assert!(message.contains("/proj/missing.js"));
  assert!(message.contains("imported by ./index.js"));
}

#[test]
fn bare_specifiers_are_rejected() {
  let errors =
    try_build(&[("/proj/index.js", "import _ from 'lodash';\n")], "index.js").unwrap_err();
  assert!(errors[0].to_string().contains("Bare specifier \"lodash\""));
}

#[test]
fn parse_errors_name_the_offending_file() {
  let errors = try_build(
    &[
      ("/proj/index.js", "import { a } from './broken.js';\n"),
      ("/proj/broken.js", "import {\n"),
    ],
    "index.js",
  )
  .unwrap_err();

  assert!(errors[0].to_string().contains("broken.js"));
}

#[test]
fn non_literal_dynamic_imports_warn_and_pass_through() {
  let output = build(
    &[("/proj/index.js", "const name = './x.js';\nconst p = import(name);\nexport { p };\n")],
    "index.js",
  );

  assert_eq!(output.warnings.len(), 1);
  assert!(asset(&output, "main.js").contains("const p = import(name);"));
}
