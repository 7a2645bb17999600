use itertools::Itertools;
use loadpack_sourcemap::SourceMap;
use swc_core::{
  common::{
    comments::SingleThreadedComments,
    source_map::DefaultSourceMapGenConfig,
    sync::Lrc,
    FileName, Globals, Mark, SourceMap as SwcSourceMap, GLOBALS,
  },
  ecma::{
    ast::{EsVersion, Program},
    codegen::{text_writer::JsWriter, Config as CodegenConfig, Emitter},
    parser::{parse_file_as_program, EsSyntax, Syntax},
    transforms::{
      base::{
        fixer::fixer,
        helpers::{inject_helpers, Helpers, HELPERS},
        hygiene::hygiene,
        resolver,
      },
      compat::es2015,
    },
  },
};

/// Rewrites ES2015 syntax (block scoping, classes, templates, destructuring,
/// rest/spread, parameters, generators and what remains of arrows) to ES5.
///
/// `code` is expected to be already lowered to ES2015. Helpers are inlined
/// into the output, so the result has no runtime imports of its own.
pub fn lower_to_es5(
  code: String,
  filename: &str,
  source_maps: bool,
) -> anyhow::Result<(String, Option<SourceMap>)> {
  GLOBALS.set(&Globals::new(), || {
    HELPERS.set(&Helpers::new(false), || lower_in_scope(code, filename, source_maps))
  })
}

fn lower_in_scope(
  code: String,
  filename: &str,
  source_maps: bool,
) -> anyhow::Result<(String, Option<SourceMap>)> {
  let cm: Lrc<SwcSourceMap> = Lrc::default();
  let fm = cm.new_source_file(FileName::Custom(filename.to_string()).into(), code);
  let comments = SingleThreadedComments::default();

  let mut recovered = vec![];
  let program = parse_file_as_program(
    &fm,
    Syntax::Es(EsSyntax { jsx: filename.ends_with(".jsx"), ..EsSyntax::default() }),
    EsVersion::latest(),
    Some(&comments),
    &mut recovered,
  );
  let program = match program {
    Ok(program) if recovered.is_empty() => program,
    Ok(_) => return Err(parse_error(filename, &recovered)),
    Err(err) => return Err(parse_error(filename, &[err])),
  };

  let unresolved_mark = Mark::new();
  let top_level_mark = Mark::new();
  let program = program
    .apply(resolver(unresolved_mark, top_level_mark, false))
    .apply(es2015::es2015(unresolved_mark, Some(comments.clone()), es2015::Config::default()))
    .apply(inject_helpers(unresolved_mark))
    .apply(hygiene())
    .apply(fixer(Some(&comments)));

  emit(&cm, &comments, &program, filename, source_maps)
}

fn emit(
  cm: &Lrc<SwcSourceMap>,
  comments: &SingleThreadedComments,
  program: &Program,
  filename: &str,
  source_maps: bool,
) -> anyhow::Result<(String, Option<SourceMap>)> {
  let mut buf = vec![];
  let mut mappings = vec![];
  {
    let mut emitter = Emitter {
      cfg: CodegenConfig::default().with_target(EsVersion::Es5),
      cm: Lrc::clone(cm),
      comments: Some(comments),
      wr: JsWriter::new(Lrc::clone(cm), "\n", &mut buf, source_maps.then_some(&mut mappings)),
    };
    emitter
      .emit_program(program)
      .map_err(|err| anyhow::anyhow!("Failed to print {filename}: {err}"))?;
  }
  let code = String::from_utf8(buf)?;

  if !source_maps {
    return Ok((code, None));
  }

  let mut json = vec![];
  cm.build_source_map(&mappings, None, DefaultSourceMapGenConfig)
    .to_writer(&mut json)
    .map_err(|err| anyhow::anyhow!("Failed to serialize source map of {filename}: {err}"))?;
  let map = SourceMap::from_json_string(std::str::from_utf8(&json)?)
    .map_err(|err| anyhow::anyhow!("Failed to read source map of {filename}: {err}"))?;

  Ok((code, Some(map)))
}

fn parse_error(filename: &str, errors: &[swc_core::ecma::parser::error::Error]) -> anyhow::Error {
  let messages = errors.iter().map(|err| err.kind().msg()).join("\n  ");
  anyhow::anyhow!("Failed to parse {filename}:\n  {messages}")
}
