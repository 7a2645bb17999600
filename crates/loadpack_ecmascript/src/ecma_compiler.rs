use std::path::{Path, PathBuf};

use arcstr::ArcStr;
use itertools::Itertools;
use loadpack_common::ESTarget;
use loadpack_sourcemap::{collapse_sourcemaps, SourceMap};
use oxc::{
  codegen::{Codegen, CodegenOptions, CodegenReturn},
  diagnostics::{OxcDiagnostic, Severity},
  parser::Parser,
  semantic::SemanticBuilder,
  span::SourceType,
  transformer::{TransformOptions, Transformer},
};

use crate::{
  ecma_ast::{
    program_cell::{ProgramCell, ProgramCellDependent, ProgramCellOwner, WithMutFields},
    EcmaAst,
  },
  es5_lowering::lower_to_es5,
};

/// Options of one `EcmaCompiler::transform` call.
#[derive(Debug, Clone, Copy)]
pub struct EcmaTransformOptions<'a> {
  /// Environment preset: syntax newer than this is lowered.
  pub target: ESTarget,
  /// Map from `source` back to whatever produced it, composed into the
  /// returned map.
  pub input_source_map: Option<&'a SourceMap>,
  /// Name recorded for diagnostics and as the source of the returned map.
  pub filename: &'a str,
  pub source_maps: bool,
}

#[derive(Debug)]
pub struct EcmaTransformOutput {
  pub code: String,
  pub map: Option<SourceMap>,
}

pub struct EcmaCompiler;

impl EcmaCompiler {
  /// Source type guessed from `filename`, falling back to an ES module.
  pub fn source_type_for(filename: &str) -> SourceType {
    SourceType::from_path(filename).unwrap_or_else(|_| SourceType::default().with_module(true))
  }

  pub fn parse(
    filename: &str,
    source: impl Into<ArcStr>,
    source_type: SourceType,
  ) -> anyhow::Result<EcmaAst> {
    let allocator = oxc::allocator::Allocator::default();
    let owner = ProgramCellOwner { source: source.into(), allocator };
    let program = ProgramCell::try_new(owner, |owner| {
      let ret = Parser::new(&owner.allocator, &owner.source, source_type).parse();
      if ret.errors.is_empty() && !ret.panicked {
        Ok(ProgramCellDependent { program: ret.program })
      } else {
        Err(diagnostics_to_error(filename, "Failed to parse", &ret.errors))
      }
    })?;

    Ok(EcmaAst { program, source_type })
  }

  /// Lower `ast` to `target` in place.
  pub fn lower(ast: &mut EcmaAst, filename: &str, target: ESTarget) -> anyhow::Result<()> {
    ast.program.with_mut(|WithMutFields { allocator, program, .. }| {
      let semantic_ret = SemanticBuilder::new().build(program);
      if !semantic_ret.errors.is_empty() {
        return Err(diagnostics_to_error(filename, "Semantic check failed", &semantic_ret.errors));
      }
      let (symbols, scopes) = semantic_ret.semantic.into_symbol_table_and_scope_tree();

      let mut transform_options = TransformOptions::from(oxc::transformer::ESTarget::from(target));
      // JSX belongs to a separate preset, not the environment one.
      transform_options.jsx.jsx_plugin = false;

      let ret = Transformer::new(allocator, Path::new(filename), &transform_options)
        .build_with_symbols_and_scopes(symbols, scopes, program);

      let errors =
        ret.errors.into_iter().filter(|error| matches!(error.severity, Severity::Error)).collect_vec();
      if errors.is_empty() {
        Ok(())
      } else {
        Err(diagnostics_to_error(filename, "Failed to transform", &errors))
      }
    })
  }

  pub fn print(ast: &EcmaAst, sourcemap_path: Option<&str>) -> CodegenReturn {
    Codegen::new()
      .with_options(CodegenOptions {
        source_map_path: sourcemap_path.map(PathBuf::from),
        ..CodegenOptions::default()
      })
      .build(ast.program())
  }

  /// Parse, lower and print `source` in one go.
  ///
  /// This is the whole contract a transform loader relies on: it either
  /// returns code plus map or fails without producing anything.
  pub fn transform(
    source: &str,
    options: &EcmaTransformOptions<'_>,
  ) -> anyhow::Result<EcmaTransformOutput> {
    let source_type = Self::source_type_for(options.filename);
    let mut ast = Self::parse(options.filename, source, source_type)?;
    // ES2015 syntax itself is rewritten by `lower_to_es5` below.
    Self::lower(&mut ast, options.filename, options.target.max(ESTarget::Es2015))?;

    let CodegenReturn { code, map, .. } =
      Self::print(&ast, options.source_maps.then_some(options.filename));

    let (code, es5_map) = if options.target == ESTarget::Es5 {
      lower_to_es5(code, options.filename, map.is_some())?
    } else {
      (code, None)
    };

    let chain = [options.input_source_map, map.as_ref(), es5_map.as_ref()];
    let chain = chain.into_iter().flatten().collect_vec();
    let map = if map.is_some() { collapse_sourcemaps(&chain) } else { None };

    Ok(EcmaTransformOutput { code, map })
  }
}

fn diagnostics_to_error(filename: &str, action: &str, errors: &[OxcDiagnostic]) -> anyhow::Error {
  let messages = errors.iter().map(|error| error.message.to_string()).join("\n  ");
  anyhow::anyhow!("{action} {filename}:\n  {messages}")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn options(filename: &str) -> EcmaTransformOptions<'_> {
    EcmaTransformOptions {
      target: ESTarget::Es5,
      input_source_map: None,
      filename,
      source_maps: true,
    }
  }

  #[test]
  fn prints_parsed_program() {
    let ast = EcmaCompiler::parse("a.js", "const a = 1;", SourceType::default()).unwrap();
    assert_eq!(EcmaCompiler::print(&ast, None).code, "const a = 1;\n");
  }

  #[test]
  fn lowers_arrow_functions_for_es5() {
    let output = EcmaCompiler::transform("var f = (a) => a * 2;", &options("app.js")).unwrap();
    assert!(!output.code.contains("=>"), "{}", output.code);
    assert!(output.code.contains("function"), "{}", output.code);
    assert!(output.map.is_some());
  }

  #[test]
  fn es5_output_has_no_es2015_syntax() {
    let source = "const x = 1;\nclass A { get x() { return x; } }\nexport const s = `${x}`;\n";
    let output = EcmaCompiler::transform(source, &options("app.js")).unwrap();
    assert!(output.code.contains("var x = 1"), "{}", output.code);
    assert!(!output.code.contains("const "), "{}", output.code);
    assert!(!output.code.contains("class "), "{}", output.code);
    assert!(!output.code.contains('`'), "{}", output.code);
  }

  #[test]
  fn es5_map_traces_back_through_both_stages() {
    let output = EcmaCompiler::transform("\n\nconst x = 1;\n", &options("app.js")).unwrap();
    let map = output.map.unwrap();
    assert_eq!(map.get_source(0).map(ToString::to_string).as_deref(), Some("app.js"));
    assert!(map.get_tokens().any(|token| token.get_src_line() == 2), "{}", map.to_json_string());
  }

  #[test]
  fn es2015_keeps_classes() {
    let mut options = options("app.js");
    options.target = ESTarget::Es2015;
    let output = EcmaCompiler::transform("const x = 1; class A {}", &options).unwrap();
    assert!(output.code.contains("const x = 1"), "{}", output.code);
    assert!(output.code.contains("class A"), "{}", output.code);
  }

  #[test]
  fn esnext_keeps_modern_syntax() {
    let mut options = options("app.js");
    options.target = ESTarget::EsNext;
    let output = EcmaCompiler::transform("var f = (a) => a * 2;", &options).unwrap();
    assert!(output.code.contains("=>"));
  }

  #[test]
  fn syntax_errors_are_reported_with_filename() {
    let err = EcmaCompiler::transform("const = ;", &options("broken.js")).unwrap_err();
    assert!(err.to_string().contains("broken.js"), "{err}");
  }

  #[test]
  fn map_sources_name_the_file() {
    let output = EcmaCompiler::transform("var x = 1;", &options("app.js")).unwrap();
    let map = output.map.unwrap();
    assert_eq!(map.get_source(0).map(ToString::to_string).as_deref(), Some("app.js"));
  }
}
