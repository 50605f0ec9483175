use arcstr::ArcStr;
use glasspack_error::BuildResult;
use oxc::{
  parser::{ParseOptions, Parser},
  span::SourceType,
};

use crate::ecma_ast::{
  EcmaAst,
  program_cell::{ProgramCell, ProgramCellDependent, ProgramCellOwner},
};

pub struct EcmaCompiler;

impl EcmaCompiler {
  pub fn parse(source: impl Into<ArcStr>, source_type: SourceType) -> BuildResult<EcmaAst> {
    let source: ArcStr = source.into();
    let allocator = oxc::allocator::Allocator::default();
    let program = ProgramCell::try_new(ProgramCellOwner { source, allocator }, |owner| {
      let parser =
        Parser::new(&owner.allocator, &owner.source, source_type).with_options(ParseOptions {
          allow_return_outside_function: true,
          ..ParseOptions::default()
        });
      let ret = parser.parse();
      if ret.panicked || !ret.errors.is_empty() {
        let messages =
          ret.errors.iter().map(|error| error.to_string()).collect::<Vec<_>>().join("; ");
        Err(anyhow::anyhow!("{messages}"))
      } else {
        Ok(ProgramCellDependent { program: ret.program })
      }
    })?;

    Ok(EcmaAst { program, source_type })
  }
}

#[test]
fn parses_a_module() {
  let source_type = SourceType::default().with_module(true);
  let ast = EcmaCompiler::parse("import { a } from './a.js'; export const b = a;", source_type)
    .expect("should parse");
  assert_eq!(ast.program().body.len(), 2);
}

#[test]
fn rejects_broken_syntax() {
  let source_type = SourceType::default().with_module(true);
  assert!(EcmaCompiler::parse("import { from './a.js'", source_type).is_err());
}
