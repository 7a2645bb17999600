use std::borrow::Cow;

use anyhow::anyhow;
use loadpack_common::{
  FilenameRenderOptions, NormalModule, NormalizedBundlerOptions, OutputAsset, OutputKind,
  RenderedChunk,
};
use loadpack_sourcemap::{
  inline_sourcemap_comment, source_mapping_url_comment, sourcemap_to_json, to_line_only_sourcemap,
  SourceJoiner, SourceMap, SourceMapJsonOptions, SourceMapSource,
};
use loadpack_utils::{
  concat_string, ecmascript::to_js_string_literal, sanitize_file_name::sanitize_file_name,
  xxhash::short_content_hash,
};
use rustc_hash::{FxHashMap, FxHashSet};

use super::runtime::{render_module_head, render_runtime_head, MODULE_TAIL, RUNTIME_TAIL};
use crate::types::{EntryPoint, ModuleIdx, ModuleTable};

pub struct ChunkRenderContext<'a> {
  pub options: &'a NormalizedBundlerOptions,
  pub module_table: &'a ModuleTable,
  pub id_to_idx: &'a FxHashMap<&'a str, ModuleIdx>,
}

pub struct RenderedChunkOutput {
  pub chunk: RenderedChunk,
  /// The chunk itself, followed by its map when one is written.
  pub assets: Vec<OutputAsset>,
}

pub fn render_chunk(
  ctx: &ChunkRenderContext<'_>,
  chunk_index: usize,
  entry: &EntryPoint,
) -> anyhow::Result<RenderedChunkOutput> {
  let devtool = ctx.options.devtool;
  let modules = collect_chunk_modules(ctx, entry.idx)?
    .into_iter()
    .map(|idx| &ctx.module_table[idx])
    .collect::<Vec<_>>();

  let eval_bodies = if devtool.is_eval() {
    modules.iter().map(|module| render_eval_body(ctx, module)).collect::<Vec<_>>()
  } else {
    vec![]
  };

  let mut joiner = SourceJoiner::default();
  joiner.append_source(render_runtime_head(&ctx.module_table[entry.idx].id));
  for (index, module) in modules.iter().enumerate() {
    joiner.append_source(render_module_head(&module.id));
    match (&module.sourcemap, eval_bodies.get(index)) {
      (_, Some(eval_body)) => joiner.append_source(eval_body.as_str()),
      (Some(map), None) => joiner.append_source(SourceMapSource::new(&module.code, map)),
      (None, None) => joiner.append_source(module.code.as_str()),
    }
    joiner.append_source(MODULE_TAIL);
  }
  joiner.append_source(RUNTIME_TAIL);

  let (mut content, map) = joiner.join();

  let name = sanitize_file_name(&entry.name);
  let id = chunk_index.to_string();
  let hash = |len: usize| short_content_hash(content.as_bytes(), len);
  let filename = ctx.options.output_filename.render(&FilenameRenderOptions {
    name: &name,
    id: &id,
    hash: Some(&hash),
  });
  tracing::debug!(%filename, modules = modules.len(), "rendered chunk");

  let mut map_asset = None;
  if let Some(map) = map.filter(|_| devtool.has_source_map() && !devtool.is_eval()) {
    let map = if devtool.is_cheap() { to_line_only_sourcemap(&map) } else { map };
    let basename = filename.rsplit('/').next().unwrap_or(&filename).to_string();
    let json_options = SourceMapJsonOptions {
      file: Some(&basename),
      include_sources_content: !devtool.is_nosources(),
    };

    if devtool.is_inline() {
      content.push('\n');
      content.push_str(&inline_sourcemap_comment(&map, json_options));
    } else {
      if !devtool.is_hidden() {
        content.push('\n');
        content.push_str(&source_mapping_url_comment(&concat_string!(basename, ".map")));
      }
      map_asset = Some(OutputAsset {
        filename: concat_string!(filename, ".map"),
        content: sourcemap_to_json(&map, json_options),
        kind: OutputKind::SourceMap,
      });
    }
  }

  let chunk = RenderedChunk {
    name: entry.name.clone(),
    filename: filename.clone(),
    modules: modules.iter().map(|module| module.id.clone()).collect(),
  };
  let mut assets = vec![OutputAsset { filename, content, kind: OutputKind::Chunk }];
  assets.extend(map_asset);

  Ok(RenderedChunkOutput { chunk, assets })
}

/// Every module reachable from `entry`, sorted by id.
fn collect_chunk_modules(
  ctx: &ChunkRenderContext<'_>,
  entry: ModuleIdx,
) -> anyhow::Result<Vec<ModuleIdx>> {
  let mut visited = FxHashSet::default();
  let mut stack = vec![entry];
  while let Some(idx) = stack.pop() {
    if !visited.insert(idx) {
      continue;
    }
    for dependency in &ctx.module_table[idx].dependencies {
      let dependency_idx = ctx.id_to_idx.get(dependency.as_str()).ok_or_else(|| {
        anyhow!("{} depends on {dependency}, which was never loaded", ctx.module_table[idx].id)
      })?;
      stack.push(*dependency_idx);
    }
  }

  let mut modules = visited.into_iter().collect::<Vec<_>>();
  modules.sort_by(|a, b| ctx.module_table[*a].id.cmp(&ctx.module_table[*b].id));
  Ok(modules)
}

/// `eval("<code>\n//# sourceURL=...")`, with the module map inlined when the
/// devtool asks for one.
fn render_eval_body(ctx: &ChunkRenderContext<'_>, module: &NormalModule) -> String {
  let devtool = ctx.options.devtool;
  let mut code = concat_string!(module.code, "\n//# sourceURL=loadpack:///", module.id);

  if let Some(map) = module.sourcemap.as_ref().filter(|_| devtool.has_source_map()) {
    let map: Cow<'_, SourceMap> =
      if devtool.is_cheap() { Cow::Owned(to_line_only_sourcemap(map)) } else { Cow::Borrowed(map) };
    code.push('\n');
    code.push_str(&inline_sourcemap_comment(
      &map,
      SourceMapJsonOptions { file: None, include_sources_content: !devtool.is_nosources() },
    ));
  }

  concat_string!("eval(", to_js_string_literal(&code), ");")
}
