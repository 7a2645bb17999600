use std::sync::Arc;

use anyhow::bail;
use loadpack_common::{build_loader_request, LoaderItem};
use loadpack_sourcemap::SourceMap;
use smallvec::SmallVec;

use crate::{LoaderContext, LoaderOutput, LoaderRegistry};

struct RunContext<'a> {
  request: &'a str,
  options: Option<&'a serde_json::Value>,
  completions: SmallVec<[LoaderOutput; 1]>,
}

impl LoaderContext for RunContext<'_> {
  fn request(&self) -> &str {
    self.request
  }

  fn options(&self) -> Option<&serde_json::Value> {
    self.options
  }

  fn complete(&mut self, output: LoaderOutput) {
    self.completions.push(output);
  }
}

/// Output of a whole loader chain.
#[derive(Debug)]
pub struct LoaderChainOutput {
  pub code: String,
  /// Map from `code` back to the resource as read from disk. `None` when the
  /// chain is empty or its last loader produced no map.
  pub map: Option<SourceMap>,
}

/// Runs `chain` over `source`, last loader first.
///
/// Every loader sees the same request string and the map produced by the
/// loader that ran before it. A loader that returns `Ok` without completing,
/// or completes more than once, fails the module.
pub fn run_loader_chain(
  registry: &LoaderRegistry,
  chain: &[LoaderItem],
  resource: &str,
  source: String,
) -> anyhow::Result<LoaderChainOutput> {
  let request =
    build_loader_request(&chain.iter().map(|item| item.name.as_str()).collect::<Vec<_>>(), resource);

  let mut code = source;
  let mut map: Option<SourceMap> = None;
  for item in chain.iter().rev() {
    let loader = registry.get(&item.name)?;
    let mut ctx = RunContext {
      request: &request,
      options: item.options.as_ref().map(Arc::as_ref),
      completions: SmallVec::new(),
    };
    loader.run(&code, map.as_ref(), &mut ctx).map_err(|err| err.context(request.clone()))?;

    let mut completions = ctx.completions.into_iter();
    let (Some(output), None) = (completions.next(), completions.next()) else {
      bail!("Loader {:?} must complete exactly once for {request}", item.name);
    };
    tracing::trace!(loader = %item.name, resource, "loader completed");

    // Loaders compose the incoming map into the one they return.
    code = output.code;
    map = output.map;
  }

  Ok(LoaderChainOutput { code, map })
}
