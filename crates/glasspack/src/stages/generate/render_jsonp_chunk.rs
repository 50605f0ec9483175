use glasspack_common::{Chunk, ChunkKind, ModuleIdx, ModuleTable};
use glasspack_utils::{concat_string, ecmascript::js_string_literal};
use oxc_index::IndexVec;

use super::render_module_factories;

/// A non-entry bundle: one expression statement in the JSONP envelope. Any
/// file of this shape is installable by the runtime in the entry bundle,
/// which is the whole wire contract between the two.
pub fn render_jsonp_chunk(
  chunk: &Chunk,
  module_table: &ModuleTable,
  factories: &IndexVec<ModuleIdx, String>,
) -> String {
  let purpose = match chunk.kind {
    ChunkKind::Lazy { module } => {
      concat_string!(" * Lazy chunk for ", module_table.get(module).id.inner(), ".\n")
    }
    ChunkKind::Shared => String::from(" * Shared chunk: modules needed by more than one lazy chunk.\n"),
    ChunkKind::Entry { .. } => unreachable!("the entry chunk is not emitted as JSONP"),
  };

  concat_string!(
    "/*\n * ",
    chunk.filename(),
    " - generated by glasspack\n *\n",
    purpose,
    " * Hands its module factories to the runtime installed by main.js\n",
    " * (webpack: self[\"webpackChunk\"].push).\n */\n",
    "(self[\"bundlerChunkCallbacks\"] = self[\"bundlerChunkCallbacks\"] || []).push([\n",
    "  [",
    js_string_literal(&chunk.id),
    "],\n  {\n\n",
    render_module_factories(&chunk.modules, module_table, factories),
    "\n\n  }\n]);\n"
  )
}
