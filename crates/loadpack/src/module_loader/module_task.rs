use std::sync::Arc;

use arcstr::ArcStr;
use itertools::Itertools;
use loadpack_common::{
  build_loader_request, loader_chain, ModuleLoaderMsg, NormalModule, NormalModuleTaskResult,
  ResolvedDependency,
};
use loadpack_ecmascript::EcmaCompiler;
use loadpack_error::BuildResult;
use loadpack_loader::{run_loader_chain, LoaderChainOutput};
use loadpack_sourcemap::{collapse_sourcemaps, rename_sources, SourceMap};
use loadpack_utils::{concat_string, path_ext::PathExt};

use super::task_context::TaskContext;
use crate::{
  ast_scanner::AstScanner,
  module_finalizer::{finalize_module, FinalizedModule},
  utils::load_source::load_source,
};

/// Builds one module: read, run loaders, scan, resolve, rewrite.
pub struct ModuleTask {
  ctx: Arc<TaskContext>,
  resolved: ResolvedDependency,
}

impl ModuleTask {
  pub fn new(ctx: Arc<TaskContext>, resolved: ResolvedDependency) -> Self {
    Self { ctx, resolved }
  }

  pub async fn run(self) {
    let msg = match self.run_inner() {
      Ok(result) => ModuleLoaderMsg::NormalModuleDone(result),
      Err(errors) => ModuleLoaderMsg::BuildErrors(errors.into_vec()),
    };
    if self.ctx.tx.send(msg).await.is_err() {
      tracing::debug!(id = %self.resolved.id, "module loader is gone, dropping result");
    }
  }

  fn run_inner(&self) -> BuildResult<NormalModuleTaskResult> {
    let TaskContext { options, resolver, loaders, .. } = &*self.ctx;
    let ResolvedDependency { id, path } = &self.resolved;

    let source = load_source(path)?;
    let resource = path.to_string_lossy();
    let chain = loader_chain(&options.rules, path);
    let request =
      build_loader_request(&chain.iter().map(|item| &item.name).collect_vec(), &resource);
    tracing::debug!(%id, %request, "building module");

    let LoaderChainOutput { code, map: loader_map } =
      run_loader_chain(loaders, &chain, &resource, source)?;

    let filename = path
      .file_name()
      .map_or_else(|| id.to_string(), |name| name.to_string_lossy().into_owned());
    let source_type = EcmaCompiler::source_type_for(&filename);
    let ast = EcmaCompiler::parse(&filename, code.as_str(), source_type)
      .map_err(|err| err.context(format!("Failed to parse the output of {request}")))?;
    let scan = AstScanner::new(id).scan(ast.program());
    drop(ast);

    let mut errors = vec![];
    let mut ids = Vec::with_capacity(scan.records.len());
    let mut resolved_deps = Vec::with_capacity(scan.records.len());
    for record in &scan.records {
      match resolver.resolve(Some(path), &record.specifier) {
        Ok(dep_path) => {
          let dep_id = ArcStr::from(dep_path.module_id(&options.context));
          ids.push(dep_id.clone());
          resolved_deps.push(ResolvedDependency { id: dep_id, path: dep_path });
        }
        Err(err) => errors.push(anyhow::anyhow!(
          "Could not resolve {:?} from {id}: {err}",
          record.specifier
        )),
      }
    }
    if !errors.is_empty() {
      Err(errors)?;
    }

    let devtool = options.devtool;
    let FinalizedModule { code, map: rewrite_map } =
      finalize_module(&code, &scan, &ids, devtool.has_source_map().then_some(filename.as_str()));

    let sourcemap = rewrite_map.map(|rewrite_map| {
      let map = match &loader_map {
        Some(loader_map) if devtool.maps_to_loader_input() => {
          collapse_sourcemaps(&[loader_map, &rewrite_map]).unwrap_or(rewrite_map)
        }
        _ => rewrite_map,
      };
      rename_module_sources(&map, id)
    });

    let dependencies = resolved_deps.iter().map(|dep| dep.id.clone()).unique().collect();

    Ok(NormalModuleTaskResult {
      module: NormalModule {
        id: id.clone(),
        code,
        sourcemap,
        dependencies,
      },
      resolved_deps,
      warnings: scan.warnings,
    })
  }
}

/// Name every source of a module map after the module, so maps of modules
/// sharing a file name stay apart once joined into a chunk.
fn rename_module_sources(map: &SourceMap, id: &str) -> SourceMap {
  rename_sources(map, |_| concat_string!("loadpack:///", id))
}
