use arcstr::ArcStr;
use glasspack_utils::concat_string;

use crate::types::raw_idx::ModuleIdx;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
  /// Carries the runtime and every module statically reachable from the
  /// user entry.
  Entry { module: ModuleIdx },
  /// Planned for one dynamic-import target; delivered via the JSONP
  /// envelope.
  Lazy { module: ModuleIdx },
  /// Modules pulled out of two or more lazy chunks.
  Shared,
}

impl ChunkKind {
  pub fn is_entry(self) -> bool {
    matches!(self, ChunkKind::Entry { .. })
  }
}

/// A unit of network delivery. `modules` keeps BFS discovery order, which is
/// the order factories are written into the output file.
#[derive(Debug)]
pub struct Chunk {
  pub id: ArcStr,
  pub kind: ChunkKind,
  pub modules: Vec<ModuleIdx>,
}

impl Chunk {
  pub fn new(id: ArcStr, kind: ChunkKind, modules: Vec<ModuleIdx>) -> Self {
    Self { id, kind, modules }
  }

  /// Filename-to-id mapping is `id + ".js"`, no hashing.
  pub fn filename(&self) -> String {
    concat_string!(self.id, ".js")
  }

  pub fn entry_module_idx(&self) -> Option<ModuleIdx> {
    match self.kind {
      ChunkKind::Entry { module } | ChunkKind::Lazy { module } => Some(module),
      ChunkKind::Shared => None,
    }
  }
}
