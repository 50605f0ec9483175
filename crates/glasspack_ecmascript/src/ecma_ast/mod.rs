pub mod program_cell;

use std::fmt::Debug;

use arcstr::ArcStr;
use oxc::{ast::ast::Program, span::SourceType};

use self::program_cell::ProgramCell;

/// An owned parse result. The cell keeps the source text, the arena the AST
/// is allocated in, and the `Program` borrowing both, so a module record can
/// carry its AST around without lifetime plumbing.
pub struct EcmaAst {
  pub program: ProgramCell,
  pub source_type: SourceType,
}

impl EcmaAst {
  pub fn source(&self) -> &ArcStr {
    &self.program.borrow_owner().source
  }

  pub fn program(&self) -> &Program {
    &self.program.borrow_dependent().program
  }
}

impl Debug for EcmaAst {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("EcmaAst").field("source", &self.source()).finish_non_exhaustive()
  }
}

impl Default for EcmaAst {
  fn default() -> Self {
    crate::EcmaCompiler::parse("", SourceType::default().with_module(true))
      .expect("empty module always parses")
  }
}

unsafe impl Send for EcmaAst {}
unsafe impl Sync for EcmaAst {}
