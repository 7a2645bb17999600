use std::{borrow::Cow, fmt::Debug, sync::Arc};

use loadpack_common::OutputAsset;
use loadpack_error::BuildResult;

use crate::PluginContext;

pub trait Plugin: Debug + Send + Sync {
  fn name(&self) -> Cow<'static, str>;

  /// Called once per build after every chunk is rendered and before anything
  /// is written. Plugins may add, rewrite or drop assets.
  fn generate_bundle(
    &self,
    _ctx: &PluginContext<'_>,
    _assets: &mut Vec<OutputAsset>,
  ) -> BuildResult<()> {
    Ok(())
  }
}

pub type SharedPlugin = Arc<dyn Plugin>;
