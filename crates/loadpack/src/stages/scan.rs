use std::sync::Arc;

use loadpack_common::ResolvedDependency;
use loadpack_error::BuildResult;
use loadpack_utils::path_ext::PathExt;

use crate::{
  module_loader::{ModuleLoader, ModuleLoaderOutput},
  types::{SharedLoaderRegistry, SharedOptions, SharedResolver},
};

pub type ScanStageOutput = ModuleLoaderOutput;

pub struct ScanStage {
  options: SharedOptions,
  resolver: SharedResolver,
  loaders: SharedLoaderRegistry,
}

impl ScanStage {
  pub fn new(
    options: SharedOptions,
    resolver: SharedResolver,
    loaders: SharedLoaderRegistry,
  ) -> Self {
    Self { options, resolver, loaders }
  }

  pub async fn scan(&self) -> BuildResult<ScanStageOutput> {
    let user_entries = self.resolve_user_defined_entries()?;

    let module_loader = ModuleLoader::new(
      Arc::clone(&self.options),
      Arc::clone(&self.resolver),
      Arc::clone(&self.loaders),
    );
    let output = module_loader.fetch_all_modules(user_entries).await?;

    tracing::info!(modules = output.module_table.len(), "scan finished");
    Ok(output)
  }

  fn resolve_user_defined_entries(&self) -> BuildResult<Vec<(String, ResolvedDependency)>> {
    let mut ret = Vec::with_capacity(self.options.entries.len());
    let mut errors = vec![];

    for entry in &self.options.entries {
      match self.resolver.resolve(None, &entry.import) {
        Ok(path) => {
          let id = path.module_id(&self.options.context).into();
          ret.push((entry.name.clone(), ResolvedDependency { id, path }));
        }
        Err(err) => errors.push(anyhow::anyhow!(
          "Failed to resolve entry {:?} ({}): {err}",
          entry.name,
          entry.import
        )),
      }
    }

    if !errors.is_empty() {
      Err(errors)?;
    }

    Ok(ret)
  }
}
