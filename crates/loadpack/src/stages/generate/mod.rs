mod render_chunk;
mod runtime;

use loadpack_common::OutputAsset;
use loadpack_error::BuildResult;
use loadpack_plugin::{PluginContext, SharedPlugin};
use loadpack_utils::rayon::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};
use rustc_hash::{FxHashMap, FxHashSet};

use self::render_chunk::{render_chunk, ChunkRenderContext, RenderedChunkOutput};
use crate::{
  stages::scan::ScanStageOutput,
  types::{bundle_output::BundleOutput, SharedOptions},
};

pub struct GenerateStage<'a> {
  options: &'a SharedOptions,
  plugins: &'a [SharedPlugin],
}

impl<'a> GenerateStage<'a> {
  pub fn new(options: &'a SharedOptions, plugins: &'a [SharedPlugin]) -> Self {
    Self { options, plugins }
  }

  pub fn generate(&self, scan_output: ScanStageOutput) -> BuildResult<BundleOutput> {
    let ScanStageOutput { module_table, entry_points, warnings } = scan_output;

    let id_to_idx = module_table
      .iter_enumerated()
      .map(|(idx, module)| (module.id.as_str(), idx))
      .collect::<FxHashMap<_, _>>();
    let ctx =
      ChunkRenderContext { options: self.options, module_table: &module_table, id_to_idx: &id_to_idx };

    let rendered = entry_points
      .par_iter()
      .enumerate()
      .map(|(chunk_index, entry)| render_chunk(&ctx, chunk_index, entry))
      .collect::<Vec<_>>();

    let mut errors = vec![];
    let mut chunks = Vec::with_capacity(rendered.len());
    let mut assets = vec![];
    for ret in rendered {
      match ret {
        Ok(RenderedChunkOutput { chunk, assets: chunk_assets }) => {
          chunks.push(chunk);
          assets.extend(chunk_assets);
        }
        Err(err) => errors.push(err),
      }
    }
    if !errors.is_empty() {
      Err(errors)?;
    }

    let plugin_ctx = PluginContext { options: self.options, chunks: &chunks };
    for plugin in self.plugins {
      plugin.generate_bundle(&plugin_ctx, &mut assets)?;
      tracing::debug!(plugin = %plugin.name(), "generate_bundle finished");
    }

    ensure_unique_filenames(&assets)?;

    tracing::info!(chunks = chunks.len(), assets = assets.len(), "generate finished");
    Ok(BundleOutput { assets, warnings })
  }
}

fn ensure_unique_filenames(assets: &[OutputAsset]) -> BuildResult<()> {
  let mut seen = FxHashSet::default();
  let errors = assets
    .iter()
    .filter(|asset| !seen.insert(asset.filename.as_str()))
    .map(|asset| anyhow::anyhow!("Multiple assets are emitted to {:?}", asset.filename))
    .collect::<Vec<_>>();
  if errors.is_empty() {
    Ok(())
  } else {
    Err(errors.into())
  }
}
