use std::path::Path;

use arcstr::ArcStr;
use glasspack_common::{ModuleId, ModuleIdx, NormalModule};
use glasspack_error::BuildResult;
use glasspack_fs::FileSystem;
use glasspack_resolver::Resolver;
use oxc_index::IndexVec;

use crate::{types::SharedOptions, utils::parse_to_ecma_ast::parse_to_ecma_ast};

use super::ast_scanner::AstScanner;

/// Loads, parses, scans, and resolves one module. Interning the resolved
/// paths into module indices is the loader's job; the task only reports
/// them back.
pub struct ModuleTask<'a, F: FileSystem> {
  fs: &'a F,
  options: &'a SharedOptions,
  resolver: &'a Resolver<F>,
  idx: ModuleIdx,
  absolute_path: ArcStr,
  importer_id: Option<ModuleId>,
}

pub struct ModuleTaskResult {
  /// `resolved_deps` is still empty here; the loader fills it.
  pub module: NormalModule,
  pub resolved_paths: Vec<ArcStr>,
  pub warnings: Vec<anyhow::Error>,
}

impl<'a, F: FileSystem> ModuleTask<'a, F> {
  pub fn new(
    fs: &'a F,
    options: &'a SharedOptions,
    resolver: &'a Resolver<F>,
    idx: ModuleIdx,
    absolute_path: ArcStr,
    importer_id: Option<ModuleId>,
  ) -> Self {
    Self { fs, options, resolver, idx, absolute_path, importer_id }
  }

  pub fn run(self) -> BuildResult<ModuleTaskResult> {
    let path = Path::new(self.absolute_path.as_str());

    let source = self.fs.read_to_string(path).map_err(|err| {
      anyhow::anyhow!(
        "Could not load {}{} - {err}.",
        self.absolute_path,
        self
          .importer_id
          .as_ref()
          .map(|importer| format!(" (imported by {importer})"))
          .unwrap_or_default(),
      )
    })?;

    let ast = parse_to_ecma_ast(source, path)?;

    let id = ModuleId::from_absolute_path(path, &self.options.cwd);
    let scan_result = AstScanner::new(&id).scan(ast.program());
    if !scan_result.errors.is_empty() {
      return Err(scan_result.errors.into());
    }

    let mut resolved_paths = Vec::with_capacity(scan_result.import_records.len());
    let mut errors = Vec::new();
    for record in &scan_result.import_records {
      match self.resolver.resolve(Some(path), &record.specifier) {
        Ok(resolved) => resolved_paths.push(resolved.path),
        Err(err) => errors.push(anyhow::anyhow!("{err}\n  imported by {id}")),
      }
    }
    if !errors.is_empty() {
      return Err(errors.into());
    }

    let module = NormalModule {
      idx: self.idx,
      absolute_path: self.absolute_path,
      id,
      source: ast.source().clone(),
      ecma_ast: ast,
      import_records: scan_result.import_records,
      resolved_deps: IndexVec::default(),
      named_exports: scan_result.named_exports,
      default_export: scan_result.default_export,
      imported_bindings: scan_result.imported_bindings,
    };

    Ok(ModuleTaskResult { module, resolved_paths, warnings: scan_result.warnings })
  }
}
