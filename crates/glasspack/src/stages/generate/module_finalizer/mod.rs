mod impl_visit;

use glasspack_common::{
  DefaultExportKind, ImportKind, ImportedBinding, ImportedName, ModuleTable, NormalModule,
  PatchBuffer, SourceJoiner,
};
use glasspack_error::BuildResult;
use glasspack_utils::{
  concat_string,
  ecmascript::{
    binding_name_for_specifier, derive_chunk_id, is_valid_identifier_name, js_string_literal,
    property_access_str,
  },
  indexmap::FxIndexSet,
};
use oxc::{
  ast::{AstKind, ast},
  ast_visit::Visit,
  span::{GetSpan, Span},
};

pub struct FinalizerContext<'me> {
  pub module: &'me NormalModule,
  pub module_table: &'me ModuleTable,
}

/// Rewrites one module's source into the body of its factory function.
///
/// All edits go through a patch buffer over the original source; the AST is
/// only read. The emitted body is: the ES-module marker call, the getter
/// definitions, one loader call per import source, then the patched source.
pub struct ModuleFinalizer<'me, 'ast> {
  ctx: FinalizerContext<'me>,
  patches: PatchBuffer,
  visit_path: Vec<AstKind<'ast>>,
  default_export_name: Option<String>,
}

impl<'me, 'ast: 'me> ModuleFinalizer<'me, 'ast> {
  pub fn new(ctx: FinalizerContext<'me>) -> Self {
    Self { ctx, patches: PatchBuffer::default(), visit_path: Vec::new(), default_export_name: None }
  }

  pub fn finalize(mut self, program: &'ast ast::Program<'ast>) -> BuildResult<String> {
    self.default_export_name = self.pick_default_export_name();

    self.patch_import_sites();
    self.patch_export_statements();
    self.visit_program(program);

    let patched = std::mem::take(&mut self.patches).apply(&self.ctx.module.source).map_err(
      |errors| -> glasspack_error::BuildError {
        errors
          .into_iter()
          .map(|error| anyhow::anyhow!("{error} while transforming {}", self.ctx.module.id))
          .collect::<Vec<_>>()
          .into()
      },
    )?;

    let mut joiner = SourceJoiner::default();
    joiner.append_source("loadModule.markEsModule(exports);");
    if let Some(define_exports) = self.render_define_exports()? {
      joiner.append_source(define_exports);
    }
    for statement in self.render_import_loads() {
      joiner.append_source(statement);
    }
    joiner.append_source(patched);

    Ok(joiner.join())
  }

  /// The synthetic binding an anonymous/expression default export is stored
  /// under. Scanning the raw source text for collisions is coarser than a
  /// scope check but can only over-rename, never capture.
  fn pick_default_export_name(&self) -> Option<String> {
    let default_export = self.ctx.module.default_export.as_ref()?;
    if default_export.kind == DefaultExportKind::Declaration {
      return None;
    }

    let mut name = String::from("__default_export__");
    let mut counter = 0usize;
    while self.ctx.module.source.contains(&name) {
      counter += 1;
      name = format!("__default_export_{counter}__");
    }
    Some(name)
  }

  /// Deletes every static import statement (re-export statements included)
  /// and turns every literal dynamic import into a chunk-then-load chain.
  fn patch_import_sites(&mut self) {
    let module = self.ctx.module;
    for (record_idx, record) in module.import_records.iter_enumerated() {
      match record.kind {
        ImportKind::Static => self.patches.remove(record.span),
        ImportKind::Dynamic => {
          let target = self.ctx.module_table.get(module.resolved_deps[record_idx]);
          let chunk_id = derive_chunk_id(&target.id);
          self.patches.replace(
            record.span,
            concat_string!(
              "loadChunk(",
              js_string_literal(&chunk_id),
              ").then(loadModule.bind(loadModule, ",
              js_string_literal(&target.id),
              "))"
            ),
          );
        }
      }
    }
  }

  fn patch_export_statements(&mut self) {
    let module = self.ctx.module;

    for export in &module.named_exports {
      if export.reexport.is_some() {
        // The whole statement already goes away with its import record.
        continue;
      }
      match export.declaration_span {
        // Inline declaration: drop just the `export ` keyword, leaving a
        // plain declaration behind.
        Some(declaration_span) => {
          self.patches.remove(Span::new(export.statement_span.start, declaration_span.start));
        }
        None => self.patches.remove(export.statement_span),
      }
    }

    if let Some(default_export) = &module.default_export {
      match default_export.kind {
        DefaultExportKind::Declaration => self.patches.remove(default_export.prefix_span),
        DefaultExportKind::Expression => {
          let name = self.default_export_name.as_deref().unwrap_or("__default_export__");
          self
            .patches
            .replace(default_export.prefix_span, concat_string!("var ", name, " = "));
        }
      }
    }
  }

  /// One getter per named/default export. Getters read the live local
  /// binding; re-export getters read through the source module's namespace
  /// variable instead.
  fn render_define_exports(&self) -> BuildResult<Option<String>> {
    let module = self.ctx.module;
    let mut entries = Vec::with_capacity(module.named_exports.len() + 1);

    for export in &module.named_exports {
      let getter_body = match export.reexport {
        Some(record_idx) => {
          let record = &module.import_records[record_idx];
          let namespace_var = binding_name_for_specifier(&record.specifier);
          property_access_str(&namespace_var, &export.local_name)
        }
        // `import { x } from './a.js'; export { x };` is a re-export split
        // over two statements: the local binding is deleted along with the
        // import statement, so the getter must read through the source
        // module's namespace variable, same as the single-statement form.
        None => match module.imported_bindings.get(&export.local_name) {
          Some(binding) => self.imported_binding_access(binding),
          None => export.local_name.clone(),
        },
      };
      entries.push(concat_string!("  ", export_key(&export.exported_name), ": () => ", getter_body, ","));
    }

    if let Some(default_export) = &module.default_export {
      let target = match default_export.kind {
        DefaultExportKind::Declaration => {
          default_export.inner_name.clone().ok_or_else(|| {
            anyhow::anyhow!(
              "Internal error: default export declaration without a name in {}",
              module.id
            )
          })?
        }
        DefaultExportKind::Expression => self
          .default_export_name
          .clone()
          .unwrap_or_else(|| String::from("__default_export__")),
      };
      entries.push(concat_string!("  default: () => ", target, ","));
    }

    if entries.is_empty() {
      return Ok(None);
    }

    Ok(Some(concat_string!(
      "loadModule.defineExports(exports, {\n",
      entries.join("\n"),
      "\n});"
    )))
  }

  /// `var _math_ = loadModule("./src/math.js");`, one per distinct import
  /// source, however many import statements reference it.
  fn render_import_loads(&self) -> Vec<String> {
    let module = self.ctx.module;
    let mut seen = FxIndexSet::default();
    let mut statements = Vec::new();

    for (record_idx, record) in module.import_records.iter_enumerated() {
      if !record.kind.is_static() || !seen.insert(record.specifier.clone()) {
        continue;
      }
      let target = self.ctx.module_table.get(module.resolved_deps[record_idx]);
      statements.push(concat_string!(
        "var ",
        binding_name_for_specifier(&record.specifier),
        " = loadModule(",
        js_string_literal(&target.id),
        ");"
      ));
    }

    statements
  }

  /// The expression an imported binding reads as after rewriting:
  /// `<var>.<name>` for named imports, `<var>["default"]` for defaults,
  /// and the bare source variable for namespaces.
  fn imported_binding_access(&self, binding: &ImportedBinding) -> String {
    let record = &self.ctx.module.import_records[binding.record_idx];
    let source_var = binding_name_for_specifier(&record.specifier);
    match &binding.imported {
      ImportedName::Named(name) => property_access_str(&source_var, name),
      ImportedName::Default => concat_string!(source_var, "[\"default\"]"),
      ImportedName::Namespace => source_var,
    }
  }

  /// Rewrites a free reference to an imported name into a property access
  /// on the import source's loader variable. The immediate parent decides
  /// the final shape: callees and template tags get the `(0, …)` wrapper so
  /// the call runs with an unset receiver, and shorthand object properties
  /// are expanded so the rewrite stays syntactically valid.
  fn try_rewrite_imported_reference(&mut self, ident: &ast::IdentifierReference<'ast>) {
    let module = self.ctx.module;
    let Some(binding) = module.imported_bindings.get(ident.name.as_str()) else {
      return;
    };

    let replacement = self.imported_binding_access(binding);

    let replacement = match self.visit_path.last() {
      Some(AstKind::CallExpression(call)) if call.callee.span() == ident.span => {
        concat_string!("(0, ", replacement, ")")
      }
      Some(AstKind::TaggedTemplateExpression(tagged)) if tagged.tag.span() == ident.span => {
        concat_string!("(0, ", replacement, ")")
      }
      Some(AstKind::ObjectProperty(property))
        if property.shorthand && property.value.span() == ident.span =>
      {
        concat_string!(ident.name.as_str(), ": ", replacement)
      }
      _ => replacement,
    };

    self.patches.replace(ident.span, replacement);
  }
}

fn export_key(name: &str) -> String {
  if is_valid_identifier_name(name) { name.to_string() } else { js_string_literal(name) }
}
