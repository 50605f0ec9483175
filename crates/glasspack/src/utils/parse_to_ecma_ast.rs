use std::path::Path;

use glasspack_ecmascript::{EcmaAst, EcmaCompiler};
use glasspack_error::BuildResult;
use glasspack_utils::concat_string;
use oxc::span::SourceType;

/// Parses one file as an ES module. `.json` sources are wrapped as a
/// default export first, which is how they become importable at all.
pub fn parse_to_ecma_ast(source: String, source_path: &Path) -> BuildResult<EcmaAst> {
  let is_json = source_path.extension().is_some_and(|ext| ext == "json");
  let source =
    if is_json { concat_string!("export default ", source.trim_end(), ";\n") } else { source };

  let source_type = SourceType::default().with_module(true);

  EcmaCompiler::parse(source, source_type).map_err(|errors| {
    errors
      .into_iter()
      .map(|error| anyhow::anyhow!("Parse error in {}: {error}", source_path.display()))
      .collect::<Vec<_>>()
      .into()
  })
}
