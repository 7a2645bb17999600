use std::borrow::Cow;

use loadpack_common::{request_filename, ESTarget};
use loadpack_ecmascript::{EcmaCompiler, EcmaTransformOptions, EcmaTransformOutput};
use loadpack_sourcemap::SourceMap;
use serde::Deserialize;

use crate::{Loader, LoaderContext, LoaderOutput};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct TransformLoaderOptions {
  target: Option<String>,
}

/// Syntax-lowering loader: parses the module, lowers it to the configured
/// environment preset (ES5 unless `options.target` says otherwise) and hands
/// back the printed code with a source map.
#[derive(Debug, Default)]
pub struct TransformLoader;

impl TransformLoader {
  pub const NAME: &'static str = "builtin:transform-loader";

  fn target(options: Option<&serde_json::Value>) -> anyhow::Result<ESTarget> {
    let Some(options) = options else {
      return Ok(ESTarget::default());
    };
    let options = TransformLoaderOptions::deserialize(options)
      .map_err(|err| anyhow::anyhow!("Invalid options for {}: {err}", Self::NAME))?;
    match options.target {
      Some(target) => target.parse().map_err(|err: String| anyhow::anyhow!(err)),
      None => Ok(ESTarget::default()),
    }
  }
}

impl Loader for TransformLoader {
  fn name(&self) -> Cow<'static, str> {
    Cow::Borrowed(Self::NAME)
  }

  fn run(
    &self,
    source: &str,
    input_map: Option<&SourceMap>,
    ctx: &mut dyn LoaderContext,
  ) -> anyhow::Result<()> {
    let filename = request_filename(ctx.request())?;
    let target = Self::target(ctx.options())?;

    let EcmaTransformOutput { code, map } = EcmaCompiler::transform(
      source,
      &EcmaTransformOptions { target, input_source_map: input_map, filename, source_maps: true },
    )?;

    ctx.complete(LoaderOutput { code, map });
    Ok(())
  }
}
