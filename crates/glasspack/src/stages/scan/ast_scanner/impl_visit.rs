use oxc::{
  ast::ast,
  ast_visit::{Visit, walk},
};

use super::AstScanner;

impl<'ast> Visit<'ast> for AstScanner<'_> {
  fn visit_import_declaration(&mut self, it: &ast::ImportDeclaration<'ast>) {
    // Nothing inside an import statement can contain further import sites.
    self.scan_import_declaration(it);
  }

  fn visit_export_named_declaration(&mut self, it: &ast::ExportNamedDeclaration<'ast>) {
    self.scan_export_named_declaration(it);
    // An inline declaration's initializer may hold dynamic imports.
    walk::walk_export_named_declaration(self, it);
  }

  fn visit_export_default_declaration(&mut self, it: &ast::ExportDefaultDeclaration<'ast>) {
    self.scan_export_default_declaration(it);
    walk::walk_export_default_declaration(self, it);
  }

  fn visit_export_all_declaration(&mut self, _it: &ast::ExportAllDeclaration<'ast>) {
    self.result.errors.push(anyhow::anyhow!(
      "Parse error in {}: `export * from` is not supported; re-export names explicitly",
      self.id
    ));
  }

  fn visit_import_expression(&mut self, it: &ast::ImportExpression<'ast>) {
    self.scan_import_expression(it);
    walk::walk_import_expression(self, it);
  }
}
