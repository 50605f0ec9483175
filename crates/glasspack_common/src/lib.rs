mod bundler_options;
mod chunk;
mod module;
mod types;

pub use bundler_options::{BundlerOptions, NormalizedBundlerOptions};

// Internal file layout should not leak into downstream imports, so every
// item is re-exported from the root.
pub use crate::{
  chunk::{Chunk, ChunkKind},
  module::{ModuleTable, NormalModule},
  types::{
    exports::{DefaultExport, DefaultExportKind, NamedExport},
    import_record::{
      ImportKind, ImportRecord, ImportRecordMeta, ImportSpecifierRecord, ImportedBinding,
      ImportedName,
    },
    module_id::ModuleId,
    output_asset::OutputAsset,
    patch_buffer::PatchBuffer,
    raw_idx::{ChunkIdx, ImportRecordIdx, ModuleIdx},
    source_joiner::SourceJoiner,
  },
};
