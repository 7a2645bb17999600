mod module_task;
pub mod task_context;

use std::sync::Arc;

use arcstr::ArcStr;
use loadpack_common::{ModuleLoaderMsg, NormalModule, NormalModuleTaskResult, ResolvedDependency};
use loadpack_error::BuildResult;
use module_task::ModuleTask;
use oxc_index::IndexVec;
use rustc_hash::FxHashMap;
use task_context::TaskContext;
use tokio::sync::mpsc::{Receiver, Sender};

use crate::types::{
  EntryPoint, ModuleIdx, ModuleTable, SharedLoaderRegistry, SharedOptions, SharedResolver,
};

pub struct ModuleLoader {
  tx: Sender<ModuleLoaderMsg>,
  rx: Receiver<ModuleLoaderMsg>,
  remaining: u32,
  shared_context: Arc<TaskContext>,
  modules: IndexVec<ModuleIdx, Option<NormalModule>>,
  visited: FxHashMap<ArcStr, ModuleIdx>,
}

pub struct ModuleLoaderOutput {
  pub module_table: ModuleTable,
  /// One per configured entry, in configuration order.
  pub entry_points: Vec<EntryPoint>,
  pub warnings: Vec<anyhow::Error>,
}

impl ModuleLoader {
  pub fn new(
    options: SharedOptions,
    resolver: SharedResolver,
    loaders: SharedLoaderRegistry,
  ) -> Self {
    // Senders wait once 1024 results are queued.
    let (tx, rx) = tokio::sync::mpsc::channel(1024);

    let shared_context = Arc::new(TaskContext { options, resolver, loaders, tx: tx.clone() });

    Self {
      tx,
      rx,
      remaining: 0,
      shared_context,
      modules: IndexVec::new(),
      visited: FxHashMap::default(),
    }
  }

  fn try_spawn_new_task(&mut self, resolved: ResolvedDependency) -> ModuleIdx {
    if let Some(idx) = self.visited.get(&resolved.id) {
      return *idx;
    }

    let idx = self.modules.push(None);
    self.visited.insert(resolved.id.clone(), idx);
    self.remaining += 1;

    let task = ModuleTask::new(Arc::clone(&self.shared_context), resolved);
    // Loaders are synchronous but short; `spawn_blocking` would cost a thread each.
    tokio::runtime::Handle::current().spawn(task.run());

    idx
  }

  pub async fn fetch_all_modules(
    mut self,
    user_defined_entries: Vec<(String, ResolvedDependency)>,
  ) -> BuildResult<ModuleLoaderOutput> {
    let entry_points = user_defined_entries
      .into_iter()
      .map(|(name, resolved)| EntryPoint { name, idx: self.try_spawn_new_task(resolved) })
      .collect::<Vec<_>>();

    let mut errors = vec![];
    let mut warnings = vec![];

    while self.remaining > 0 {
      let Some(msg) = self.rx.recv().await else {
        break;
      };
      match msg {
        ModuleLoaderMsg::NormalModuleDone(NormalModuleTaskResult {
          module,
          resolved_deps,
          warnings: module_warnings,
        }) => {
          for dep in resolved_deps {
            self.try_spawn_new_task(dep);
          }
          if let Some(&idx) = self.visited.get(&module.id) {
            self.modules[idx] = Some(module);
          }
          warnings.extend(module_warnings);
        }
        ModuleLoaderMsg::BuildErrors(errs) => {
          errors.extend(errs);
        }
      }
      self.remaining -= 1;
    }

    if !errors.is_empty() {
      Err(errors)?;
    }

    let module_table = self
      .modules
      .into_iter()
      .collect::<Option<ModuleTable>>()
      .ok_or_else(|| anyhow::anyhow!("Module loading finished with unbuilt modules"))?;

    // The sender in `tx` is kept alive until here so the channel never closes
    // while tasks are pending.
    drop(self.tx);

    Ok(ModuleLoaderOutput { module_table, entry_points, warnings })
  }
}
