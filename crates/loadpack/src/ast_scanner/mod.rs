mod impl_visit;

use oxc::{
  ast::ast::{
    BindingPattern, BindingPatternKind, Declaration, ExportAllDeclaration,
    ExportDefaultDeclaration, ExportDefaultDeclarationKind, ExportNamedDeclaration,
    ImportDeclaration, ImportDeclarationSpecifier, ModuleDeclaration, Program,
  },
  ast::Visit,
  span::{GetSpan, Span},
};
use rustc_hash::FxHashMap;

/// A specifier the module depends on, deduplicated by its text.
#[derive(Debug, Clone)]
pub struct ImportRecord {
  pub specifier: String,
}

pub type ImportRecordIdx = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Imported {
  Default,
  Namespace,
  Named(String),
}

#[derive(Debug, Clone)]
pub struct ImportBinding {
  pub local: String,
  pub imported: Imported,
}

/// A top-level ES module statement and what replaces it in the CommonJS
/// module function.
#[derive(Debug, Clone)]
pub enum ModuleDecl {
  /// `import a, { b as c } from "x"`, `import * as ns from "x"`, `import "x"`.
  Import { span: Span, record: ImportRecordIdx, bindings: Vec<ImportBinding> },
  /// `export { a as b } from "x"`, `export * as ns from "x"`.
  ReExport { span: Span, record: ImportRecordIdx, bindings: Vec<(String, Imported)> },
  /// `export * from "x"`.
  ExportStar { span: Span, record: ImportRecordIdx },
  /// `export { a, b as c }`, as `(exported, local)` pairs.
  ExportLocal { span: Span, names: Vec<(String, String)> },
  /// `export var a = 1`, `export function f() {}`. `keyword` covers `export `.
  ExportDeclaration { keyword: Span, names: Vec<String> },
  /// `export default ...`. `prefix` covers `export default `; `local` is the
  /// binding that already holds the value, if any.
  ExportDefault { prefix: Span, local: Option<String>, terminate_at: Option<u32> },
  /// `import type ...` and friends, dropped entirely.
  TypeOnly { span: Span },
}

#[derive(Debug, Default)]
pub struct ScanResult {
  pub records: Vec<ImportRecord>,
  pub decls: Vec<ModuleDecl>,
  /// String literal arguments of `require("x")` calls.
  pub require_literals: Vec<(Span, ImportRecordIdx)>,
  pub warnings: Vec<anyhow::Error>,
}

impl ScanResult {
  pub fn has_module_syntax(&self) -> bool {
    self.decls.iter().any(|decl| !matches!(decl, ModuleDecl::TypeOnly { .. }))
  }
}

/// Collects import records and the module statements the CommonJS rewrite
/// touches. The result owns its data so the AST can be dropped right after.
pub struct AstScanner<'me> {
  module_id: &'me str,
  result: ScanResult,
  record_lookup: FxHashMap<String, ImportRecordIdx>,
}

impl<'me> AstScanner<'me> {
  pub fn new(module_id: &'me str) -> Self {
    Self { module_id, result: ScanResult::default(), record_lookup: FxHashMap::default() }
  }

  pub fn scan(mut self, program: &Program<'_>) -> ScanResult {
    for stmt in &program.body {
      if let Some(decl) = stmt.as_module_declaration() {
        self.scan_module_decl(decl);
      }
    }
    self.visit_program(program);
    self.result
  }

  fn add_import_record(&mut self, specifier: &str) -> ImportRecordIdx {
    if let Some(idx) = self.record_lookup.get(specifier) {
      return *idx;
    }
    let idx = self.result.records.len();
    self.result.records.push(ImportRecord { specifier: specifier.to_string() });
    self.record_lookup.insert(specifier.to_string(), idx);
    idx
  }

  fn scan_module_decl(&mut self, decl: &ModuleDeclaration<'_>) {
    match decl {
      ModuleDeclaration::ImportDeclaration(decl) => self.scan_import_decl(decl),
      ModuleDeclaration::ExportNamedDeclaration(decl) => self.scan_export_named_decl(decl),
      ModuleDeclaration::ExportDefaultDeclaration(decl) => self.scan_export_default_decl(decl),
      ModuleDeclaration::ExportAllDeclaration(decl) => self.scan_export_all_decl(decl),
      ModuleDeclaration::TSExportAssignment(_)
      | ModuleDeclaration::TSNamespaceExportDeclaration(_) => {
        self.result.decls.push(ModuleDecl::TypeOnly { span: decl.span() });
      }
    }
  }

  fn scan_import_decl(&mut self, decl: &ImportDeclaration<'_>) {
    if decl.import_kind.is_type() {
      self.result.decls.push(ModuleDecl::TypeOnly { span: decl.span });
      return;
    }
    let record = self.add_import_record(decl.source.value.as_str());
    let bindings = decl
      .specifiers
      .iter()
      .flatten()
      .filter_map(|specifier| match specifier {
        ImportDeclarationSpecifier::ImportSpecifier(spec) => {
          (!spec.import_kind.is_type()).then(|| ImportBinding {
            local: spec.local.name.to_string(),
            imported: Imported::Named(spec.imported.name().to_string()),
          })
        }
        ImportDeclarationSpecifier::ImportDefaultSpecifier(spec) => {
          Some(ImportBinding { local: spec.local.name.to_string(), imported: Imported::Default })
        }
        ImportDeclarationSpecifier::ImportNamespaceSpecifier(spec) => {
          Some(ImportBinding { local: spec.local.name.to_string(), imported: Imported::Namespace })
        }
      })
      .collect();
    self.result.decls.push(ModuleDecl::Import { span: decl.span, record, bindings });
  }

  fn scan_export_named_decl(&mut self, decl: &ExportNamedDeclaration<'_>) {
    if decl.export_kind.is_type() {
      self.result.decls.push(ModuleDecl::TypeOnly { span: decl.span });
      return;
    }

    if let Some(declaration) = &decl.declaration {
      let mut names = vec![];
      collect_declared_names(declaration, &mut names);
      let keyword = Span::new(decl.span.start, declaration.span().start);
      self.result.decls.push(ModuleDecl::ExportDeclaration { keyword, names });
      return;
    }

    let specifiers = decl.specifiers.iter().filter(|spec| !spec.export_kind.is_type());
    match &decl.source {
      Some(source) => {
        let record = self.add_import_record(source.value.as_str());
        let bindings = specifiers
          .map(|spec| {
            let imported = match spec.local.name().as_str() {
              "default" => Imported::Default,
              name => Imported::Named(name.to_string()),
            };
            (spec.exported.name().to_string(), imported)
          })
          .collect();
        self.result.decls.push(ModuleDecl::ReExport { span: decl.span, record, bindings });
      }
      None => {
        let names = specifiers
          .map(|spec| (spec.exported.name().to_string(), spec.local.name().to_string()))
          .collect();
        self.result.decls.push(ModuleDecl::ExportLocal { span: decl.span, names });
      }
    }
  }

  fn scan_export_default_decl(&mut self, decl: &ExportDefaultDeclaration<'_>) {
    let declaration_span = decl.declaration.span();
    let prefix = Span::new(decl.span.start, declaration_span.start);
    let (local, terminate_at) = match &decl.declaration {
      ExportDefaultDeclarationKind::FunctionDeclaration(func) => match &func.id {
        Some(id) => (Some(id.name.to_string()), None),
        None => (None, Some(declaration_span.end)),
      },
      ExportDefaultDeclarationKind::ClassDeclaration(class) => match &class.id {
        Some(id) => (Some(id.name.to_string()), None),
        None => (None, Some(declaration_span.end)),
      },
      ExportDefaultDeclarationKind::TSInterfaceDeclaration(_) => {
        self.result.decls.push(ModuleDecl::TypeOnly { span: decl.span });
        return;
      }
      _ => (None, None),
    };
    self.result.decls.push(ModuleDecl::ExportDefault { prefix, local, terminate_at });
  }

  fn scan_export_all_decl(&mut self, decl: &ExportAllDeclaration<'_>) {
    if decl.export_kind.is_type() {
      self.result.decls.push(ModuleDecl::TypeOnly { span: decl.span });
      return;
    }
    let record = self.add_import_record(decl.source.value.as_str());
    match &decl.exported {
      Some(exported) => self.result.decls.push(ModuleDecl::ReExport {
        span: decl.span,
        record,
        bindings: vec![(exported.name().to_string(), Imported::Namespace)],
      }),
      None => self.result.decls.push(ModuleDecl::ExportStar { span: decl.span, record }),
    }
  }
}

fn collect_declared_names(declaration: &Declaration<'_>, names: &mut Vec<String>) {
  match declaration {
    Declaration::VariableDeclaration(decl) => {
      for declarator in &decl.declarations {
        collect_binding_names(&declarator.id, names);
      }
    }
    Declaration::FunctionDeclaration(func) => {
      names.extend(func.id.as_ref().map(|id| id.name.to_string()));
    }
    Declaration::ClassDeclaration(class) => {
      names.extend(class.id.as_ref().map(|id| id.name.to_string()));
    }
    _ => {}
  }
}

fn collect_binding_names(pattern: &BindingPattern<'_>, names: &mut Vec<String>) {
  match &pattern.kind {
    BindingPatternKind::BindingIdentifier(ident) => names.push(ident.name.to_string()),
    BindingPatternKind::ObjectPattern(object) => {
      for property in &object.properties {
        collect_binding_names(&property.value, names);
      }
      if let Some(rest) = &object.rest {
        collect_binding_names(&rest.argument, names);
      }
    }
    BindingPatternKind::ArrayPattern(array) => {
      for element in array.elements.iter().flatten() {
        collect_binding_names(element, names);
      }
      if let Some(rest) = &array.rest {
        collect_binding_names(&rest.argument, names);
      }
    }
    BindingPatternKind::AssignmentPattern(assign) => collect_binding_names(&assign.left, names),
  }
}
