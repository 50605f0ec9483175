mod module_finalizer;
mod render_entry_chunk;
mod render_jsonp_chunk;

use glasspack_common::{ModuleIdx, ModuleTable, NormalizedBundlerOptions, OutputAsset};
use glasspack_error::BuildResult;
use glasspack_utils::{concat_string, ecmascript::js_string_literal};
use itertools::Itertools;
use oxc_index::IndexVec;

use crate::{graph::ChunkGraph, types::bundle_output::BundleOutput};

use module_finalizer::{FinalizerContext, ModuleFinalizer};
use render_entry_chunk::render_entry_chunk;
use render_jsonp_chunk::render_jsonp_chunk;

/// Turns the planned chunk graph into output files: every module is
/// finalized exactly once, then each chunk serializes the factories of its
/// members. The entry bundle is listed first.
pub struct GenerateStage<'a> {
  options: &'a NormalizedBundlerOptions,
  module_table: &'a ModuleTable,
  chunk_graph: &'a ChunkGraph,
}

impl<'a> GenerateStage<'a> {
  pub fn new(
    options: &'a NormalizedBundlerOptions,
    module_table: &'a ModuleTable,
    chunk_graph: &'a ChunkGraph,
  ) -> Self {
    Self { options, module_table, chunk_graph }
  }

  pub fn generate(&self) -> BuildResult<BundleOutput> {
    let factories: IndexVec<ModuleIdx, String> = self
      .module_table
      .iter()
      .map(|module| {
        ModuleFinalizer::new(FinalizerContext { module, module_table: self.module_table })
          .finalize(module.ecma_ast.program())
      })
      .collect::<BuildResult<_>>()?;

    let mut assets = Vec::with_capacity(self.chunk_graph.chunk_table.len());

    let entry_chunk = self.chunk_graph.entry_chunk();
    assets.push(OutputAsset {
      filename: entry_chunk.filename().into(),
      content: render_entry_chunk(self.options, self.chunk_graph, self.module_table, &factories),
    });

    for chunk in self.chunk_graph.non_entry_chunks() {
      assets.push(OutputAsset {
        filename: chunk.filename().into(),
        content: render_jsonp_chunk(chunk, self.module_table, &factories),
      });
    }

    Ok(BundleOutput { assets, warnings: Vec::new() })
  }
}

/// `"<module id>": (module, exports, loadModule) => { <factory body> }`,
/// one per member, in the chunk's stable member order.
fn render_module_factories(
  members: &[ModuleIdx],
  module_table: &ModuleTable,
  factories: &IndexVec<ModuleIdx, String>,
) -> String {
  members
    .iter()
    .map(|&module_idx| {
      concat_string!(
        js_string_literal(&module_table.get(module_idx).id),
        ": (module, exports, loadModule) => {\n",
        factories[module_idx],
        "\n}"
      )
    })
    .join(",\n\n")
}
