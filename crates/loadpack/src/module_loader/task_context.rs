use loadpack_common::ModuleLoaderMsg;

use crate::types::{SharedLoaderRegistry, SharedOptions, SharedResolver};

/// Used to store common data shared between all tasks.
pub struct TaskContext {
  pub options: SharedOptions,
  pub resolver: SharedResolver,
  pub loaders: SharedLoaderRegistry,
  pub tx: tokio::sync::mpsc::Sender<ModuleLoaderMsg>,
}
