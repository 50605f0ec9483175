use arcstr::ArcStr;
use glasspack_ecmascript::EcmaAst;
use oxc_index::IndexVec;
use rustc_hash::FxHashMap;

use crate::{
  DefaultExport, ImportKind, ImportRecord, ImportedBinding, ModuleId, NamedExport,
  types::raw_idx::{ImportRecordIdx, ModuleIdx},
};

/// One source file reached from the entry. Created during the scan stage's
/// BFS and immutable once resolution has filled `resolved_deps`; the plan
/// and generate stages only read it.
#[derive(Debug)]
pub struct NormalModule {
  pub idx: ModuleIdx,
  /// Canonical OS path; the primary key during graph traversal.
  pub absolute_path: ArcStr,
  pub id: ModuleId,
  pub source: ArcStr,
  pub ecma_ast: EcmaAst,
  pub import_records: IndexVec<ImportRecordIdx, ImportRecord>,
  /// Parallel to `import_records`; filled by the graph builder.
  pub resolved_deps: IndexVec<ImportRecordIdx, ModuleIdx>,
  pub named_exports: Vec<NamedExport>,
  pub default_export: Option<DefaultExport>,
  /// Local identifier name -> origin of the binding; the authoritative
  /// table for identifier rewriting.
  pub imported_bindings: FxHashMap<String, ImportedBinding>,
}

impl NormalModule {
  pub fn static_dependencies(&self) -> impl Iterator<Item = ModuleIdx> + '_ {
    self
      .import_records
      .iter_enumerated()
      .filter(|(_, record)| record.kind.is_static())
      .map(|(record_idx, _)| self.resolved_deps[record_idx])
  }

  pub fn dynamic_dependencies(&self) -> impl Iterator<Item = (ImportRecordIdx, ModuleIdx)> + '_ {
    self
      .import_records
      .iter_enumerated()
      .filter(|(_, record)| !record.kind.is_static())
      .map(|(record_idx, _)| (record_idx, self.resolved_deps[record_idx]))
  }
}

#[derive(Debug, Default)]
pub struct ModuleTable {
  pub modules: IndexVec<ModuleIdx, NormalModule>,
}

impl ModuleTable {
  pub fn get(&self, idx: ModuleIdx) -> &NormalModule {
    &self.modules[idx]
  }

  pub fn iter(&self) -> impl Iterator<Item = &NormalModule> {
    self.modules.iter()
  }

  pub fn len(&self) -> usize {
    self.modules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.modules.is_empty()
  }
}
