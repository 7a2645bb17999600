use arcstr::ArcStr;
use loadpack_sourcemap::SourceMap;
use loadpack_utils::ecmascript::{property_access_str, to_js_string_literal};
use rustc_hash::FxHashSet;
use string_wizard::{MagicString, SourceMapOptions};

use crate::ast_scanner::{ImportRecordIdx, Imported, ModuleDecl, ScanResult};

/// Holds the value of `export default <expression>`.
const DEFAULT_EXPORT_BINDING: &str = "__loadpack_default__";

pub struct FinalizedModule {
  pub code: String,
  /// Map from `code` back to the code the finalizer was given.
  pub map: Option<SourceMap>,
}

/// Rewrite an ES module into the body of a CommonJS module function
/// `function (module, exports, require) { ... }`.
///
/// Imports become `require` calls hoisted to the top of the body and their
/// bindings are copied once. Exports become getters on `exports`, so they stay
/// live. `require("x")` arguments are replaced with module ids.
pub fn finalize_module(
  code: &str,
  scan: &ScanResult,
  ids: &[ArcStr],
  sourcemap_source: Option<&str>,
) -> FinalizedModule {
  let mut magic_string = MagicString::new(code);
  let mut getters: Vec<(String, String)> = vec![];
  let mut imports = String::new();
  let mut required = FxHashSet::<ImportRecordIdx>::default();

  let mut require_record = |imports: &mut String, record: ImportRecordIdx| -> String {
    let binding = import_binding_name(record);
    if required.insert(record) {
      imports.push_str(&format!(
        "var {binding} = require({});\n",
        to_js_string_literal(&ids[record])
      ));
    }
    binding
  };

  for decl in &scan.decls {
    match decl {
      ModuleDecl::Import { span, record, bindings } => {
        magic_string.remove(span.start as usize, span.end as usize);
        let namespace = require_record(&mut imports, *record);
        for binding in bindings {
          let value = match &binding.imported {
            Imported::Default => format!("require.n({namespace})"),
            Imported::Namespace => namespace.clone(),
            Imported::Named(name) => property_access_str(&namespace, name),
          };
          imports.push_str(&format!("var {} = {value};\n", binding.local));
        }
      }
      ModuleDecl::ReExport { span, record, bindings } => {
        magic_string.remove(span.start as usize, span.end as usize);
        let namespace = require_record(&mut imports, *record);
        for (exported, imported) in bindings {
          let value = match imported {
            Imported::Default => property_access_str(&namespace, "default"),
            Imported::Namespace => namespace.clone(),
            Imported::Named(name) => property_access_str(&namespace, name),
          };
          getters.push((exported.clone(), value));
        }
      }
      ModuleDecl::ExportStar { span, record } => {
        magic_string.remove(span.start as usize, span.end as usize);
        let namespace = require_record(&mut imports, *record);
        imports.push_str(&format!("require.s(exports, {namespace});\n"));
      }
      ModuleDecl::ExportLocal { span, names } => {
        magic_string.remove(span.start as usize, span.end as usize);
        getters.extend(names.iter().cloned());
      }
      ModuleDecl::ExportDeclaration { keyword, names } => {
        magic_string.remove(keyword.start as usize, keyword.end as usize);
        getters.extend(names.iter().map(|name| (name.clone(), name.clone())));
      }
      ModuleDecl::ExportDefault { prefix, local: Some(local), .. } => {
        magic_string.remove(prefix.start as usize, prefix.end as usize);
        getters.push(("default".to_string(), local.clone()));
      }
      ModuleDecl::ExportDefault { prefix, local: None, terminate_at } => {
        magic_string.update(
          prefix.start as usize,
          prefix.end as usize,
          format!("var {DEFAULT_EXPORT_BINDING} = "),
        );
        // Anonymous function and class declarations end without `;`.
        if let Some(end) = terminate_at.map(|end| end as usize) {
          if let Some(last) = code.get(end - 1..end) {
            magic_string.update(end - 1, end, format!("{last};"));
          }
        }
        getters.push(("default".to_string(), DEFAULT_EXPORT_BINDING.to_string()));
      }
      ModuleDecl::TypeOnly { span } => {
        magic_string.remove(span.start as usize, span.end as usize);
      }
    }
  }

  for (span, record) in &scan.require_literals {
    magic_string.update(span.start as usize, span.end as usize, to_js_string_literal(&ids[*record]));
  }

  let mut prologue = String::new();
  if scan.has_module_syntax() {
    prologue.push_str("\"use strict\";\nrequire.r(exports);\n");
  }
  if !getters.is_empty() {
    prologue.push_str("require.d(exports, {\n");
    for (exported, local) in &getters {
      prologue.push_str(&format!(
        "  {}: function () {{ return {local}; }},\n",
        to_js_string_literal(exported)
      ));
    }
    prologue.push_str("});\n");
  }
  prologue.push_str(&imports);
  if !prologue.is_empty() {
    magic_string.prepend(prologue);
  }

  let map = sourcemap_source.map(|source| {
    magic_string.source_map(SourceMapOptions {
      include_content: true,
      source: source.into(),
      ..SourceMapOptions::default()
    })
  });

  FinalizedModule { code: magic_string.to_string(), map }
}

fn import_binding_name(record: ImportRecordIdx) -> String {
  format!("__loadpack_import_{record}__")
}
