mod impl_visit;

use arcstr::ArcStr;
use glasspack_common::{
  DefaultExport, DefaultExportKind, ImportKind, ImportRecord, ImportRecordIdx, ImportRecordMeta,
  ImportSpecifierRecord, ImportedBinding, ImportedName, ModuleId, NamedExport,
};
use oxc::{
  ast::ast,
  ast_visit::Visit,
  span::{GetSpan, Span},
};
use oxc_index::IndexVec;
use rustc_hash::FxHashMap;

/// Everything the scanner lifts out of one module's AST. Spans index into
/// the module's source; nothing here borrows the arena, so the result can
/// outlive the visit.
#[derive(Debug, Default)]
pub struct AstScanResult {
  pub import_records: IndexVec<ImportRecordIdx, ImportRecord>,
  pub named_exports: Vec<NamedExport>,
  pub default_export: Option<DefaultExport>,
  pub imported_bindings: FxHashMap<String, ImportedBinding>,
  pub warnings: Vec<anyhow::Error>,
  pub errors: Vec<anyhow::Error>,
}

pub struct AstScanner<'me> {
  id: &'me ModuleId,
  result: AstScanResult,
}

impl<'me> AstScanner<'me> {
  pub fn new(id: &'me ModuleId) -> Self {
    Self { id, result: AstScanResult::default() }
  }

  pub fn scan(mut self, program: &ast::Program<'_>) -> AstScanResult {
    self.visit_program(program);
    self.result
  }

  fn add_import_record(
    &mut self,
    span: Span,
    specifier: ArcStr,
    kind: ImportKind,
    meta: ImportRecordMeta,
  ) -> ImportRecordIdx {
    self.result.import_records.push(ImportRecord::new(span, specifier, kind).with_meta(meta))
  }

  /// ES-module scoping forbids two imports binding the same local name;
  /// without a semantic pass that rule is enforced right here.
  fn add_imported_binding(
    &mut self,
    local_name: &str,
    record_idx: ImportRecordIdx,
    imported: ImportedName,
  ) {
    let previous = self
      .result
      .imported_bindings
      .insert(local_name.to_string(), ImportedBinding { record_idx, imported });

    if previous.is_some() {
      self.result.errors.push(anyhow::anyhow!(
        "Parse error in {}: the name `{local_name}` is bound by more than one import",
        self.id
      ));
    }
  }

  fn scan_import_declaration(&mut self, decl: &ast::ImportDeclaration<'_>) {
    let record_idx = self.add_import_record(
      decl.span,
      decl.source.value.as_str().into(),
      ImportKind::Static,
      ImportRecordMeta::empty(),
    );

    let Some(specifiers) = &decl.specifiers else {
      // `import './side-effect.js';` pulls in the module and binds nothing.
      return;
    };

    for specifier in specifiers {
      let (local_name, imported) = match specifier {
        ast::ImportDeclarationSpecifier::ImportSpecifier(specifier) => (
          specifier.local.name.as_str(),
          ImportedName::Named(specifier.imported.name().to_string()),
        ),
        ast::ImportDeclarationSpecifier::ImportDefaultSpecifier(specifier) => {
          (specifier.local.name.as_str(), ImportedName::Default)
        }
        ast::ImportDeclarationSpecifier::ImportNamespaceSpecifier(specifier) => {
          (specifier.local.name.as_str(), ImportedName::Namespace)
        }
      };

      self.result.import_records[record_idx]
        .specifiers
        .push(ImportSpecifierRecord { local_name: local_name.to_string(), imported: imported.clone() });
      self.add_imported_binding(local_name, record_idx, imported);
    }
  }

  fn scan_export_named_declaration(&mut self, decl: &ast::ExportNamedDeclaration<'_>) {
    let statement_span = decl.span;

    if let Some(declaration) = &decl.declaration {
      let declaration_span = declaration.span();
      let mut declared_names = Vec::new();

      match declaration {
        ast::Declaration::VariableDeclaration(var_decl) => {
          for declarator in &var_decl.declarations {
            Self::collect_binding_names(&declarator.id.kind, &mut declared_names);
          }
        }
        ast::Declaration::FunctionDeclaration(func) => {
          if let Some(ident) = &func.id {
            declared_names.push(ident.name.to_string());
          }
        }
        ast::Declaration::ClassDeclaration(class) => {
          if let Some(ident) = &class.id {
            declared_names.push(ident.name.to_string());
          }
        }
        _ => {
          self.result.errors.push(anyhow::anyhow!(
            "Parse error in {}: unsupported declaration kind in a named export",
            self.id
          ));
        }
      }

      for name in declared_names {
        self.result.named_exports.push(NamedExport {
          local_name: name.clone(),
          exported_name: name,
          declaration_span: Some(declaration_span),
          statement_span,
          reexport: None,
        });
      }
    } else if let Some(source) = &decl.source {
      // `export { a as b } from './m.js'` is an import and an export in one
      // statement; recording the import half makes graph traversal reach
      // the source module.
      let record_idx = self.add_import_record(
        decl.span,
        source.value.as_str().into(),
        ImportKind::Static,
        ImportRecordMeta::IS_REEXPORT,
      );

      for specifier in &decl.specifiers {
        self.result.named_exports.push(NamedExport {
          local_name: specifier.local.name().to_string(),
          exported_name: specifier.exported.name().to_string(),
          declaration_span: None,
          statement_span,
          reexport: Some(record_idx),
        });
      }
    } else {
      for specifier in &decl.specifiers {
        self.result.named_exports.push(NamedExport {
          local_name: specifier.local.name().to_string(),
          exported_name: specifier.exported.name().to_string(),
          declaration_span: None,
          statement_span,
          reexport: None,
        });
      }
    }
  }

  fn scan_export_default_declaration(&mut self, decl: &ast::ExportDefaultDeclaration<'_>) {
    let (kind, inner_name) = match &decl.declaration {
      ast::ExportDefaultDeclarationKind::FunctionDeclaration(func) => match &func.id {
        Some(ident) => (DefaultExportKind::Declaration, Some(ident.name.to_string())),
        None => (DefaultExportKind::Expression, None),
      },
      ast::ExportDefaultDeclarationKind::ClassDeclaration(class) => match &class.id {
        Some(ident) => (DefaultExportKind::Declaration, Some(ident.name.to_string())),
        None => (DefaultExportKind::Expression, None),
      },
      _ => (DefaultExportKind::Expression, None),
    };

    let prefix_span = Span::new(decl.span.start, decl.declaration.span().start);
    self.result.default_export = Some(DefaultExport { kind, prefix_span, inner_name });
  }

  fn scan_import_expression(&mut self, expr: &ast::ImportExpression<'_>) {
    if let ast::Expression::StringLiteral(request) = &expr.source {
      self.add_import_record(
        expr.span,
        request.value.as_str().into(),
        ImportKind::Dynamic,
        ImportRecordMeta::empty(),
      );
    } else {
      self.result.warnings.push(anyhow::anyhow!(
        "Non-literal dynamic import in {} is left untouched and will not be chunked",
        self.id
      ));
    }
  }

  fn collect_binding_names(kind: &ast::BindingPatternKind<'_>, names: &mut Vec<String>) {
    match kind {
      ast::BindingPatternKind::BindingIdentifier(ident) => names.push(ident.name.to_string()),
      ast::BindingPatternKind::ObjectPattern(pattern) => {
        for property in &pattern.properties {
          Self::collect_binding_names(&property.value.kind, names);
        }
        if let Some(rest) = &pattern.rest {
          Self::collect_binding_names(&rest.argument.kind, names);
        }
      }
      ast::BindingPatternKind::ArrayPattern(pattern) => {
        for element in pattern.elements.iter().flatten() {
          Self::collect_binding_names(&element.kind, names);
        }
        if let Some(rest) = &pattern.rest {
          Self::collect_binding_names(&rest.argument.kind, names);
        }
      }
      ast::BindingPatternKind::AssignmentPattern(pattern) => {
        Self::collect_binding_names(&pattern.left.kind, names);
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use glasspack_ecmascript::EcmaCompiler;
  use oxc::span::SourceType;

  fn scan(source: &str) -> AstScanResult {
    let ast = EcmaCompiler::parse(source, SourceType::default().with_module(true)).unwrap();
    let id = ModuleId::new("./test.js");
    let scanner = AstScanner::new(&id);
    scanner.scan(ast.program())
  }

  #[test]
  fn extracts_import_specifiers_and_bindings() {
    let result = scan("import greet, { add, PI as pi } from './math.js';\nimport * as ns from './util.js';");

    assert_eq!(result.import_records.len(), 2);
    assert_eq!(&*result.import_records[ImportRecordIdx::from_usize(0)].specifier, "./math.js");
    assert_eq!(result.import_records[ImportRecordIdx::from_usize(0)].specifiers.len(), 3);

    assert_eq!(result.imported_bindings["greet"].imported, ImportedName::Default);
    assert_eq!(result.imported_bindings["add"].imported, ImportedName::Named("add".into()));
    assert_eq!(result.imported_bindings["pi"].imported, ImportedName::Named("PI".into()));
    assert_eq!(result.imported_bindings["ns"].imported, ImportedName::Namespace);
  }

  #[test]
  fn inline_declaration_exports_yield_one_record_per_name() {
    let result = scan("export const a = 1, { b, c } = obj;\nexport function f() {}\n");

    let names: Vec<_> = result.named_exports.iter().map(|e| e.exported_name.as_str()).collect();
    assert_eq!(names, ["a", "b", "c", "f"]);
    assert!(result.named_exports.iter().take(3).all(|e| e.declaration_span.is_some()));
  }

  #[test]
  fn specifier_exports_share_one_statement_span() {
    let result = scan("const a = 1, b = 2;\nexport { a, b as c };\n");

    assert_eq!(result.named_exports.len(), 2);
    assert_eq!(result.named_exports[0].statement_span, result.named_exports[1].statement_span);
    assert_eq!(result.named_exports[1].local_name, "b");
    assert_eq!(result.named_exports[1].exported_name, "c");
  }

  #[test]
  fn reexports_become_import_records() {
    let result = scan("export { PI as rePI } from './math.js';\n");

    assert_eq!(result.import_records.len(), 1);
    assert!(result.import_records[ImportRecordIdx::from_usize(0)].is_reexport());
    let export = &result.named_exports[0];
    assert_eq!(export.local_name, "PI");
    assert_eq!(export.exported_name, "rePI");
    assert_eq!(export.reexport, Some(ImportRecordIdx::from_usize(0)));
  }

  #[test]
  fn classifies_default_exports() {
    let named = scan("export default function main() {}\n");
    let default_export = named.default_export.unwrap();
    assert_eq!(default_export.kind, DefaultExportKind::Declaration);
    assert_eq!(default_export.inner_name.as_deref(), Some("main"));

    let anonymous = scan("export default () => 1;\n");
    let default_export = anonymous.default_export.unwrap();
    assert_eq!(default_export.kind, DefaultExportKind::Expression);
    assert!(default_export.inner_name.is_none());
  }

  #[test]
  fn records_literal_dynamic_imports_and_warns_on_the_rest() {
    let result = scan("const p = import('./feature.js');\nimport(someVariable);\n");

    assert_eq!(result.import_records.len(), 1);
    assert_eq!(result.import_records[ImportRecordIdx::from_usize(0)].kind, ImportKind::Dynamic);
    assert_eq!(result.warnings.len(), 1);
  }

  #[test]
  fn duplicate_import_bindings_are_rejected() {
    let result = scan("import { a } from './x.js';\nimport { a } from './y.js';\n");
    assert_eq!(result.errors.len(), 1);
  }

  #[test]
  fn export_star_is_rejected() {
    let result = scan("export * from './m.js';\n");
    assert_eq!(result.errors.len(), 1);
  }
}
