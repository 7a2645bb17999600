use loadpack_common::{NormalizedBundlerOptions, RenderedChunk};

/// Read-only view of the build handed to plugin hooks.
pub struct PluginContext<'a> {
  pub options: &'a NormalizedBundlerOptions,
  /// Entry chunks in entry order.
  pub chunks: &'a [RenderedChunk],
}
