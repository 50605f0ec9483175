use std::collections::VecDeque;

use arcstr::ArcStr;
use glasspack_common::{ModuleId, ModuleIdx, ModuleTable, NormalModule};
use glasspack_error::BuildResult;
use glasspack_fs::FileSystem;
use glasspack_resolver::Resolver;
use oxc_index::IndexVec;
use rustc_hash::FxHashMap;

use crate::types::SharedOptions;

use super::module_task::{ModuleTask, ModuleTaskResult};

struct QueuedModule {
  idx: ModuleIdx,
  absolute_path: ArcStr,
  importer_id: Option<ModuleId>,
}

/// BFS over the transitive closure of static and literal-dynamic edges.
/// Modules are keyed by canonical absolute path, so a path seen twice gets
/// one record and the traversal terminates on cyclic graphs.
pub struct ModuleLoader<'a, F: FileSystem> {
  fs: &'a F,
  options: &'a SharedOptions,
  resolver: &'a Resolver<F>,
  visited: FxHashMap<ArcStr, ModuleIdx>,
  modules: IndexVec<ModuleIdx, Option<NormalModule>>,
  queue: VecDeque<QueuedModule>,
  warnings: Vec<anyhow::Error>,
}

pub struct ModuleLoaderOutput {
  pub module_table: ModuleTable,
  pub entry_idx: ModuleIdx,
  pub warnings: Vec<anyhow::Error>,
}

impl<'a, F: FileSystem> ModuleLoader<'a, F> {
  pub fn new(fs: &'a F, options: &'a SharedOptions, resolver: &'a Resolver<F>) -> Self {
    Self {
      fs,
      options,
      resolver,
      visited: FxHashMap::default(),
      modules: IndexVec::default(),
      queue: VecDeque::new(),
      warnings: Vec::new(),
    }
  }

  pub fn fetch_all_modules(mut self, entry_path: ArcStr) -> BuildResult<ModuleLoaderOutput> {
    let entry_idx = self.intern(entry_path, None);

    while let Some(queued) = self.queue.pop_front() {
      let task = ModuleTask::new(
        self.fs,
        self.options,
        self.resolver,
        queued.idx,
        queued.absolute_path,
        queued.importer_id,
      );
      let ModuleTaskResult { mut module, resolved_paths, warnings } = task.run()?;
      self.warnings.extend(warnings);

      module.resolved_deps = resolved_paths
        .into_iter()
        .map(|path| self.intern(path, Some(module.id.clone())))
        .collect();

      let idx = module.idx;
      self.modules[idx] = Some(module);
    }

    let modules = self
      .modules
      .into_iter()
      .map(|module| module.expect("every interned module has been scanned"))
      .collect();

    Ok(ModuleLoaderOutput {
      module_table: ModuleTable { modules },
      entry_idx,
      warnings: self.warnings,
    })
  }

  fn intern(&mut self, absolute_path: ArcStr, importer_id: Option<ModuleId>) -> ModuleIdx {
    if let Some(idx) = self.visited.get(&absolute_path) {
      return *idx;
    }

    let idx = self.modules.push(None);
    self.visited.insert(absolute_path.clone(), idx);
    self.queue.push_back(QueuedModule { idx, absolute_path, importer_id });
    idx
  }
}
