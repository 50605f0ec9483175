use arcstr::ArcStr;
use glasspack_common::{Chunk, ChunkIdx, ModuleIdx, ModuleTable};
use glasspack_utils::indexmap::FxIndexMap;
use oxc_index::{IndexVec, index_vec};

/// The plan stage's output: the chunk partition plus the chunk-group map
/// the emitted runtime consults before running a dynamic-import target.
///
/// The group map has one entry per dynamic-import target. A target whose
/// module landed in the main chunk maps to an empty group (nothing to
/// fetch); every other entry lists the chunks to install, the target's own
/// chunk last.
#[derive(Debug)]
pub struct ChunkGraph {
  pub chunk_table: IndexVec<ChunkIdx, Chunk>,
  pub module_to_chunk: IndexVec<ModuleIdx, Option<ChunkIdx>>,
  pub chunk_group_map: FxIndexMap<ArcStr, Vec<ArcStr>>,
}

impl ChunkGraph {
  pub fn new(module_table: &ModuleTable) -> Self {
    Self {
      chunk_table: IndexVec::default(),
      module_to_chunk: index_vec![None; module_table.len()],
      chunk_group_map: FxIndexMap::default(),
    }
  }

  pub fn add_chunk(&mut self, chunk: Chunk) -> ChunkIdx {
    self.chunk_table.push(chunk)
  }

  pub fn add_module_to_chunk(&mut self, module_idx: ModuleIdx, chunk_idx: ChunkIdx) {
    self.chunk_table[chunk_idx].modules.push(module_idx);
    self.module_to_chunk[module_idx] = Some(chunk_idx);
  }

  pub fn entry_chunk(&self) -> &Chunk {
    self
      .chunk_table
      .iter()
      .find(|chunk| chunk.kind.is_entry())
      .expect("plan stage always creates the entry chunk")
  }

  pub fn non_entry_chunks(&self) -> impl Iterator<Item = &Chunk> {
    self.chunk_table.iter().filter(|chunk| !chunk.kind.is_entry())
  }
}
