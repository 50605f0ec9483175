use glasspack_common::{ModuleIdx, ModuleTable, NormalizedBundlerOptions, SourceJoiner};
use glasspack_utils::{concat_string, ecmascript::js_string_literal};
use itertools::Itertools;
use oxc_index::IndexVec;

use crate::graph::ChunkGraph;

use super::render_module_factories;

/// The entry bundle: one strict-mode IIFE holding the module registry, the
/// cache, the loader with its helpers, the lazy-load runtime (only when the
/// build planned dynamic imports), and the entry kick-off. The section
/// comments are part of the output contract: the bundle is meant to be read.
pub fn render_entry_chunk(
  options: &NormalizedBundlerOptions,
  chunk_graph: &ChunkGraph,
  module_table: &ModuleTable,
  factories: &IndexVec<ModuleIdx, String>,
) -> String {
  let entry_chunk = chunk_graph.entry_chunk();
  let entry_module = entry_chunk
    .entry_module_idx()
    .map(|idx| module_table.get(idx))
    .expect("the entry chunk always has an entry module");

  let mut joiner = SourceJoiner::default();

  joiner.append_source(
    r#"/*
 * main.js - generated by glasspack
 *
 * The whole bundle is plain JavaScript meant to be read top to bottom: a
 * module registry, a cache, a tiny synchronous loader, and (when the build
 * has lazy chunks) a script-tag chunk loader. Each section names the
 * webpack runtime piece it mirrors.
 */
(() => {
"use strict";
"#,
  );

  joiner.append_source(concat_string!(
    r#"// --- Module registry (webpack: __webpack_modules__) ---
// Module id -> factory. A factory runs at most once and fills `exports`.
var moduleRegistry = {

"#,
    render_module_factories(&entry_chunk.modules, module_table, factories),
    "\n\n};\n"
  ));

  joiner.append_source(
    r#"// --- Module cache (webpack: __webpack_module_cache__) ---
var moduleCache = {};

// --- Module loader (webpack: __webpack_require__) ---
// The fresh cache entry is inserted *before* the factory runs, so a cyclic
// import observes a partially filled exports object instead of recursing.
function loadModule(moduleId) {
  var cached = moduleCache[moduleId];
  if (cached !== undefined) {
    return cached.exports;
  }
  var module = (moduleCache[moduleId] = { exports: {} });
  moduleRegistry[moduleId](module, module.exports, loadModule);
  return module.exports;
}

// --- Helper: mark an exports object as an ES module (webpack: __webpack_require__.r) ---
loadModule.markEsModule = (exports) => {
  if (typeof Symbol !== "undefined" && Symbol.toStringTag) {
    Object.defineProperty(exports, Symbol.toStringTag, { value: "Module" });
  }
  Object.defineProperty(exports, "__esModule", { value: true });
};

// --- Helper: define exports as getters (webpack: __webpack_require__.d) ---
// Getters keep bindings live: importers read the current value at access
// time, not a snapshot taken at export time.
loadModule.defineExports = (exports, definition) => {
  for (var key in definition) {
    if (loadModule.hasOwn(definition, key) && !loadModule.hasOwn(exports, key)) {
      Object.defineProperty(exports, key, { enumerable: true, get: definition[key] });
    }
  }
};

// --- Helper: own-property check (webpack: __webpack_require__.o) ---
loadModule.hasOwn = (obj, prop) => Object.prototype.hasOwnProperty.call(obj, prop);
"#,
  );

  if !chunk_graph.chunk_group_map.is_empty() {
    joiner.append_source(render_lazy_load_runtime(options, chunk_graph));
  }

  joiner.append_source(concat_string!(
    "// --- Entry kick-off ---\nloadModule(",
    js_string_literal(&entry_module.id),
    ");\n\n})();\n"
  ));

  joiner.join()
}

fn render_lazy_load_runtime(
  options: &NormalizedBundlerOptions,
  chunk_graph: &ChunkGraph,
) -> String {
  let mut joiner = SourceJoiner::default();

  joiner.append_source(
    r#"// --- Chunk status (webpack: installedChunks) ---
// Per chunk id: undefined = never requested, [resolve, reject, promise] =
// in flight, 0 = installed. Transitions are monotonic.
var installedChunks = {};

// --- Chunk filename (webpack: __webpack_require__.u) ---
var chunkFilename = (chunkId) => chunkId + ".js";
"#,
  );

  joiner.append_source(concat_string!(
    "// --- Public path (webpack: __webpack_require__.p) ---\nvar publicPath = ",
    js_string_literal(&options.public_path),
    ";\n"
  ));

  joiner.append_source(concat_string!(
    r#"// --- Chunk group map ---
// Every chunk listed here must be installed before the dynamic import that
// names the key may run; the key's own chunk is always listed last.
var chunkGroupMap = "#,
    render_chunk_group_map(chunk_graph),
    ";\n"
  ));

  joiner.append_source(
    r#"// --- Chunk loader (webpack: __webpack_require__.e) ---
// Requests for an in-flight chunk coalesce onto the stored promise.
function loadChunk(chunkId) {
  var group = chunkGroupMap[chunkId] || [chunkId];
  var promises = [];
  group.forEach((id) => {
    var status = installedChunks[id];
    if (status === 0) {
      return;
    }
    if (status !== undefined) {
      promises.push(status[2]);
      return;
    }
    var promise = new Promise((resolve, reject) => {
      status = installedChunks[id] = [resolve, reject];
    });
    status[2] = promise;
    promises.push(promise);
    loadChunkScript(publicPath + chunkFilename(id));
  });
  return Promise.all(promises);
}

// --- Script injection (webpack: __webpack_require__.l) ---
// A failed load only logs; the chunk's promise stays pending on purpose.
function loadChunkScript(url) {
  var script = document.createElement("script");
  script.src = url;
  script.onerror = () => {
    console.error("glasspack: failed to load chunk " + url);
  };
  document.head.appendChild(script);
}

// --- Chunk installer (webpack: webpackJsonpCallback) ---
function installChunk(data) {
  var chunkIds = data[0];
  var factories = data[1];
  for (var moduleId in factories) {
    if (!loadModule.hasOwn(moduleRegistry, moduleId)) {
      moduleRegistry[moduleId] = factories[moduleId];
    }
  }
  chunkIds.forEach((chunkId) => {
    var status = installedChunks[chunkId];
    if (status !== undefined && status !== 0) {
      status[0]();
    }
    installedChunks[chunkId] = 0;
  });
}

// --- JSONP handshake ---
// Chunk files call bundlerChunkCallbacks.push(...). Entries that arrived
// before this runtime ran are drained here, then push is rebound so later
// arrivals install immediately.
var chunkCallbacks = (self["bundlerChunkCallbacks"] = self["bundlerChunkCallbacks"] || []);
chunkCallbacks.forEach(installChunk);
chunkCallbacks.push = installChunk;
"#,
  );

  joiner.join()
}

fn render_chunk_group_map(chunk_graph: &ChunkGraph) -> String {
  let entries = chunk_graph
    .chunk_group_map
    .iter()
    .map(|(chunk_id, group)| {
      concat_string!(
        "  ",
        js_string_literal(chunk_id),
        ": [",
        group.iter().map(|id| js_string_literal(id)).join(", "),
        "]"
      )
    })
    .join(",\n");

  concat_string!("{\n", entries, "\n}")
}
