use arcstr::ArcStr;
use oxc::span::Span;

use crate::types::raw_idx::ImportRecordIdx;

bitflags::bitflags! {
  #[derive(Debug, Clone, Copy, PartialEq, Eq)]
  pub struct ImportRecordMeta: u8 {
    /// `export { x } from '...'`. Entered as an import record so graph
    /// traversal reaches the source module, but it binds no local names.
    const IS_REEXPORT = 1;
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
  /// `import ... from '...'` (re-export sources included).
  Static,
  /// A literal `import('...')` call expression.
  Dynamic,
}

impl ImportKind {
  pub fn is_static(self) -> bool {
    matches!(self, ImportKind::Static)
  }
}

/// What one local binding pulls out of the source module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportedName {
  Named(String),
  Default,
  Namespace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpecifierRecord {
  pub local_name: String,
  pub imported: ImportedName,
}

/// One import site: a whole `import` statement, a re-export's `from` clause,
/// or a literal dynamic `import(...)` expression. `span` covers the full
/// statement or call expression so the transformer can patch it in one edit.
#[derive(Debug)]
pub struct ImportRecord {
  pub span: Span,
  /// `./lib.js` in `import { foo } from './lib.js';`
  pub specifier: ArcStr,
  pub kind: ImportKind,
  pub meta: ImportRecordMeta,
  pub specifiers: Vec<ImportSpecifierRecord>,
}

impl ImportRecord {
  pub fn new(span: Span, specifier: ArcStr, kind: ImportKind) -> Self {
    Self { span, specifier, kind, meta: ImportRecordMeta::empty(), specifiers: Vec::new() }
  }

  pub fn with_meta(mut self, meta: ImportRecordMeta) -> Self {
    self.meta = meta;
    self
  }

  pub fn is_reexport(&self) -> bool {
    self.meta.contains(ImportRecordMeta::IS_REEXPORT)
  }
}

/// Entry in the per-module rewrite table: which import record a local name
/// came from, and under which imported name.
#[derive(Debug, Clone)]
pub struct ImportedBinding {
  pub record_idx: ImportRecordIdx,
  pub imported: ImportedName,
}
