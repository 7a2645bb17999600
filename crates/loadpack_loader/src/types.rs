use std::{borrow::Cow, fmt::Debug, sync::Arc};

use loadpack_sourcemap::SourceMap;

/// What a loader hands back through `LoaderContext::complete`.
#[derive(Debug, Clone)]
pub struct LoaderOutput {
  pub code: String,
  pub map: Option<SourceMap>,
}

/// The host side of one loader invocation.
pub trait LoaderContext {
  /// `loader!loader!/abs/path/to/resource`.
  fn request(&self) -> &str;

  /// `module.rules[].options` of the rule that selected this loader.
  fn options(&self) -> Option<&serde_json::Value> {
    None
  }

  /// Hand the result back to the host. A loader calls this exactly once per
  /// successful run and never when it fails.
  fn complete(&mut self, output: LoaderOutput);
}

/// A per-module transform hook.
///
/// Loaders are shared between module tasks running concurrently and must not
/// keep state between runs.
pub trait Loader: Debug + Send + Sync {
  fn name(&self) -> Cow<'static, str>;

  fn run(
    &self,
    source: &str,
    input_map: Option<&SourceMap>,
    ctx: &mut dyn LoaderContext,
  ) -> anyhow::Result<()>;
}

pub type SharedLoader = Arc<dyn Loader>;
