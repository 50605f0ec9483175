use oxc::{
  ast::{AstKind, ast},
  ast_visit::{Visit, walk},
};

use super::ModuleFinalizer;

impl<'me, 'ast: 'me> Visit<'ast> for ModuleFinalizer<'me, 'ast> {
  fn enter_node(&mut self, kind: AstKind<'ast>) {
    self.visit_path.push(kind);
  }

  fn leave_node(&mut self, _: AstKind<'ast>) {
    self.visit_path.pop();
  }

  fn visit_import_declaration(&mut self, _it: &ast::ImportDeclaration<'ast>) {
    // The whole statement is already deleted; descending would queue edits
    // inside a removed range.
  }

  fn visit_export_named_declaration(&mut self, it: &ast::ExportNamedDeclaration<'ast>) {
    // Only the inline-declaration form survives in the output (minus its
    // `export ` keyword); specifier and re-export statements are deleted
    // whole, so their children must not be rewritten. The removal here also
    // covers `export {};`, which yields no export records at all; duplicate
    // removals of the same range collapse in the patch buffer.
    if it.declaration.is_some() {
      walk::walk_export_named_declaration(self, it);
    } else {
      self.patches.remove(it.span);
    }
  }

  fn visit_import_expression(&mut self, it: &ast::ImportExpression<'ast>) {
    if matches!(it.source, ast::Expression::StringLiteral(_)) {
      // Replaced wholesale by the loadChunk(...).then(...) chain.
      return;
    }
    walk::walk_import_expression(self, it);
  }

  fn visit_identifier_reference(&mut self, it: &ast::IdentifierReference<'ast>) {
    self.try_rewrite_imported_reference(it);
  }
}
