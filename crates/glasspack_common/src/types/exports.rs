use oxc::span::Span;

use crate::types::raw_idx::ImportRecordIdx;

/// One named export of a module. Inline-declaration exports (`export const
/// a = 1`) carry `declaration_span` so the transformer can strip just the
/// `export ` keyword; specifier-form exports (`export { a as b }`) and
/// re-exports are deleted whole via `statement_span`.
#[derive(Debug, Clone)]
pub struct NamedExport {
  /// The local binding read by the getter; for a re-export, the name on the
  /// source module's side.
  pub local_name: String,
  pub exported_name: String,
  pub declaration_span: Option<Span>,
  pub statement_span: Span,
  pub reexport: Option<ImportRecordIdx>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultExportKind {
  /// `export default function foo() {}` / `export default class Foo {}`.
  Declaration,
  /// Anything else, anonymous functions and classes included.
  Expression,
}

#[derive(Debug, Clone)]
pub struct DefaultExport {
  pub kind: DefaultExportKind,
  /// The `export default ` prefix, up to the start of the inner
  /// declaration or expression.
  pub prefix_span: Span,
  /// The declared identifier when the default is a named function/class.
  pub inner_name: Option<String>,
}
