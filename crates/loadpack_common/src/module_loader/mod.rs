use std::path::PathBuf;

use arcstr::ArcStr;

use crate::NormalModule;

pub enum ModuleLoaderMsg {
  NormalModuleDone(NormalModuleTaskResult),
  BuildErrors(Vec<anyhow::Error>),
}

pub struct NormalModuleTaskResult {
  pub module: NormalModule,
  pub resolved_deps: Vec<ResolvedDependency>,
  pub warnings: Vec<anyhow::Error>,
}

#[derive(Debug, Clone)]
pub struct ResolvedDependency {
  pub id: ArcStr,
  pub path: PathBuf,
}
