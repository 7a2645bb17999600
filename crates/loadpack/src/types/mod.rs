pub mod bundle_output;

use std::sync::Arc;

use loadpack_common::{NormalModule, NormalizedBundlerOptions};
use loadpack_loader::LoaderRegistry;
use loadpack_resolver::Resolver;
use oxc_index::IndexVec;

oxc_index::define_index_type! {
  #[derive(Default)]
  pub struct ModuleIdx = u32;
}

pub type ModuleTable = IndexVec<ModuleIdx, NormalModule>;

pub type SharedOptions = Arc<NormalizedBundlerOptions>;
pub type SharedResolver = Arc<Resolver>;
pub type SharedLoaderRegistry = Arc<LoaderRegistry>;

/// A user-defined entry and the module it resolved to.
#[derive(Debug, Clone)]
pub struct EntryPoint {
  pub name: String,
  pub idx: ModuleIdx,
}
