use std::collections::VecDeque;

use arcstr::ArcStr;
use glasspack_common::{Chunk, ChunkKind, ModuleIdx, ModuleTable};
use glasspack_utils::{
  concat_string,
  ecmascript::derive_chunk_id,
  indexmap::{FxIndexMap, FxIndexSet},
};
use rustc_hash::FxHashSet;

use crate::graph::ChunkGraph;

/// Partitions the module graph into the entry chunk, one lazy chunk per
/// dynamic-import target, and shared chunks for modules two or more lazy
/// chunks would otherwise duplicate. Deterministic given the graph: chunk
/// membership follows BFS discovery order, shared-chunk naming sorts.
pub struct PlanStage<'a> {
  module_table: &'a ModuleTable,
  entry_idx: ModuleIdx,
}

struct LazyChunkPlan {
  entry: ModuleIdx,
  chunk_id: ArcStr,
  members: FxIndexSet<ModuleIdx>,
}

struct SharedChunkPlan {
  chunk_id: ArcStr,
  members: Vec<ModuleIdx>,
  /// Indices into the lazy plan list: exactly the lazy chunks every member
  /// was originally reachable from.
  referencers: Vec<usize>,
}

impl<'a> PlanStage<'a> {
  pub fn new(module_table: &'a ModuleTable, entry_idx: ModuleIdx) -> Self {
    Self { module_table, entry_idx }
  }

  pub fn plan(&self) -> ChunkGraph {
    let main_members = self.static_closure(self.entry_idx, &FxIndexSet::default());

    // Distinct dynamic-import targets across all modules, discovery order.
    // Sites importing the same module coincide into one target.
    let mut dynamic_targets = FxIndexSet::default();
    for module in self.module_table.iter() {
      for (_, target) in module.dynamic_dependencies() {
        dynamic_targets.insert(target);
      }
    }

    // A target already in the main chunk plans no chunk at all; the group
    // map still gets an entry so the rewritten import site resolves.
    let mut lazy_plans: Vec<LazyChunkPlan> = Vec::new();
    let mut target_to_lazy_plan: FxIndexMap<ModuleIdx, Option<usize>> = FxIndexMap::default();
    for &target in &dynamic_targets {
      let chunk_id: ArcStr = derive_chunk_id(&self.module_table.get(target).id).into();
      if main_members.contains(&target) {
        target_to_lazy_plan.insert(target, None);
      } else {
        let members = self.static_closure(target, &main_members);
        target_to_lazy_plan.insert(target, Some(lazy_plans.len()));
        lazy_plans.push(LazyChunkPlan { entry: target, chunk_id, members });
      }
    }

    let shared_plans = self.extract_shared_chunks(&mut lazy_plans);

    let mut graph = ChunkGraph::new(self.module_table);

    let entry_chunk_idx = graph.add_chunk(Chunk::new(
      arcstr::literal!("main"),
      ChunkKind::Entry { module: self.entry_idx },
      Vec::new(),
    ));
    for &member in &main_members {
      graph.add_module_to_chunk(member, entry_chunk_idx);
    }

    for plan in &lazy_plans {
      let chunk_idx =
        graph.add_chunk(Chunk::new(plan.chunk_id.clone(), ChunkKind::Lazy { module: plan.entry }, Vec::new()));
      for &member in &plan.members {
        graph.add_module_to_chunk(member, chunk_idx);
      }
    }

    for plan in &shared_plans {
      let chunk_idx = graph.add_chunk(Chunk::new(plan.chunk_id.clone(), ChunkKind::Shared, Vec::new()));
      for &member in &plan.members {
        graph.add_module_to_chunk(member, chunk_idx);
      }
    }

    // Group map entries follow target discovery order. A lazy chunk's group
    // lists its shared dependencies in chunk-id order and itself last.
    for (&target, &lazy_plan_idx) in &target_to_lazy_plan {
      match lazy_plan_idx {
        Some(lazy_idx) => {
          let plan = &lazy_plans[lazy_idx];
          let mut group: Vec<ArcStr> = shared_plans
            .iter()
            .filter(|shared| shared.referencers.contains(&lazy_idx))
            .map(|shared| shared.chunk_id.clone())
            .collect();
          group.sort();
          group.push(plan.chunk_id.clone());
          graph.chunk_group_map.insert(plan.chunk_id.clone(), group);
        }
        None => {
          let chunk_id: ArcStr = derive_chunk_id(&self.module_table.get(target).id).into();
          graph.chunk_group_map.insert(chunk_id, Vec::new());
        }
      }
    }

    graph
  }

  /// Modules appearing in two or more lazy chunks, grouped by the exact set
  /// of lazy chunks referencing them: each distinct reference set becomes
  /// one shared chunk, and its members leave the lazy chunks they were in.
  fn extract_shared_chunks(&self, lazy_plans: &mut [LazyChunkPlan]) -> Vec<SharedChunkPlan> {
    let mut reference_sets: FxIndexMap<ModuleIdx, Vec<usize>> = FxIndexMap::default();
    for (lazy_idx, plan) in lazy_plans.iter().enumerate() {
      for &member in &plan.members {
        reference_sets.entry(member).or_default().push(lazy_idx);
      }
    }

    let mut shared_groups: FxIndexMap<Vec<usize>, Vec<ModuleIdx>> = FxIndexMap::default();
    for (module_idx, referencers) in reference_sets {
      if referencers.len() >= 2 {
        shared_groups.entry(referencers).or_default().push(module_idx);
      }
    }

    let shared_plans: Vec<SharedChunkPlan> = shared_groups
      .into_iter()
      .map(|(referencers, members)| {
        let first_member_id = members
          .iter()
          .map(|&member| &self.module_table.get(member).id)
          .min()
          .expect("a shared group has at least one member");
        let chunk_id = concat_string!("shared_", derive_chunk_id(first_member_id));
        SharedChunkPlan { chunk_id: chunk_id.into(), members, referencers }
      })
      .collect();

    let shared_members: FxHashSet<ModuleIdx> =
      shared_plans.iter().flat_map(|plan| plan.members.iter().copied()).collect();
    for plan in lazy_plans.iter_mut() {
      plan.members.retain(|member| !shared_members.contains(member));
    }

    shared_plans
  }

  /// BFS over static edges only. `pruned` members are skipped entirely, so
  /// a lazy chunk never duplicates a main-chunk module.
  fn static_closure(
    &self,
    start: ModuleIdx,
    pruned: &FxIndexSet<ModuleIdx>,
  ) -> FxIndexSet<ModuleIdx> {
    let mut visited = FxIndexSet::default();
    let mut queue = VecDeque::new();

    visited.insert(start);
    queue.push_back(start);

    while let Some(module_idx) = queue.pop_front() {
      for dep in self.module_table.get(module_idx).static_dependencies() {
        if pruned.contains(&dep) || !visited.insert(dep) {
          continue;
        }
        queue.push_back(dep);
      }
    }

    visited
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use glasspack_common::{ImportKind, ImportRecord, ModuleId, NormalModule};
  use oxc::span::Span;
  use oxc_index::IndexVec;

  fn test_module(
    idx: usize,
    id: &str,
    static_deps: &[usize],
    dynamic_deps: &[usize],
  ) -> NormalModule {
    let mut import_records = IndexVec::default();
    let mut resolved_deps = IndexVec::default();

    for &dep in static_deps {
      import_records.push(ImportRecord::new(Span::default(), "./dep.js".into(), ImportKind::Static));
      resolved_deps.push(ModuleIdx::from_usize(dep));
    }
    for &dep in dynamic_deps {
      import_records.push(ImportRecord::new(Span::default(), "./dep.js".into(), ImportKind::Dynamic));
      resolved_deps.push(ModuleIdx::from_usize(dep));
    }

    NormalModule {
      idx: ModuleIdx::from_usize(idx),
      absolute_path: id.into(),
      id: ModuleId::new(id),
      source: arcstr::ArcStr::new(),
      ecma_ast: Default::default(),
      import_records,
      resolved_deps,
      named_exports: Vec::new(),
      default_export: None,
      imported_bindings: Default::default(),
    }
  }

  fn table(modules: Vec<NormalModule>) -> ModuleTable {
    ModuleTable { modules: modules.into_iter().collect() }
  }

  fn chunk_module_ids<'a>(graph: &ChunkGraph, table: &'a ModuleTable, chunk_id: &str) -> Vec<&'a str> {
    let chunk = graph.chunk_table.iter().find(|chunk| chunk.id == chunk_id).unwrap();
    chunk.modules.iter().map(|&idx| &*table.get(idx).id).collect()
  }

  #[test]
  fn static_graph_yields_a_single_main_chunk() {
    // entry -> math, greet
    let table = table(vec![
      test_module(0, "./index.js", &[1, 2], &[]),
      test_module(1, "./math.js", &[], &[]),
      test_module(2, "./greet.js", &[], &[]),
    ]);
    let graph = PlanStage::new(&table, ModuleIdx::from_usize(0)).plan();

    assert_eq!(graph.chunk_table.len(), 1);
    assert_eq!(chunk_module_ids(&graph, &table, "main"), ["./index.js", "./math.js", "./greet.js"]);
    assert!(graph.chunk_group_map.is_empty());
  }

  #[test]
  fn independent_lazy_imports_get_singleton_groups() {
    // entry -(dyn)-> a, b
    let table = table(vec![
      test_module(0, "./index.js", &[], &[1, 2]),
      test_module(1, "./a.js", &[], &[]),
      test_module(2, "./b.js", &[], &[]),
    ]);
    let graph = PlanStage::new(&table, ModuleIdx::from_usize(0)).plan();

    assert_eq!(chunk_module_ids(&graph, &table, "a_js"), ["./a.js"]);
    assert_eq!(chunk_module_ids(&graph, &table, "b_js"), ["./b.js"]);
    assert_eq!(graph.chunk_group_map["a_js"], ["a_js"]);
    assert_eq!(graph.chunk_group_map["b_js"], ["b_js"]);
  }

  #[test]
  fn module_shared_by_two_lazy_chunks_moves_to_a_shared_chunk() {
    // entry -(dyn)-> feature-a, feature-b; both -> shared-utils
    let table = table(vec![
      test_module(0, "./index.js", &[], &[1, 2]),
      test_module(1, "./feature-a.js", &[3], &[]),
      test_module(2, "./feature-b.js", &[3], &[]),
      test_module(3, "./shared-utils.js", &[], &[]),
    ]);
    let graph = PlanStage::new(&table, ModuleIdx::from_usize(0)).plan();

    assert_eq!(chunk_module_ids(&graph, &table, "feature-a_js"), ["./feature-a.js"]);
    assert_eq!(chunk_module_ids(&graph, &table, "feature-b_js"), ["./feature-b.js"]);
    assert_eq!(chunk_module_ids(&graph, &table, "shared_shared-utils_js"), ["./shared-utils.js"]);

    assert_eq!(
      graph.chunk_group_map["feature-a_js"],
      ["shared_shared-utils_js", "feature-a_js"]
    );
    assert_eq!(
      graph.chunk_group_map["feature-b_js"],
      ["shared_shared-utils_js", "feature-b_js"]
    );
  }

  #[test]
  fn distinct_reference_sets_become_distinct_shared_chunks() {
    // x, y, z are lazy; a shared by {x, y}, b shared by {x, z}
    let table = table(vec![
      test_module(0, "./index.js", &[], &[1, 2, 3]),
      test_module(1, "./x.js", &[4, 5], &[]),
      test_module(2, "./y.js", &[4], &[]),
      test_module(3, "./z.js", &[5], &[]),
      test_module(4, "./a.js", &[], &[]),
      test_module(5, "./b.js", &[], &[]),
    ]);
    let graph = PlanStage::new(&table, ModuleIdx::from_usize(0)).plan();

    assert_eq!(chunk_module_ids(&graph, &table, "shared_a_js"), ["./a.js"]);
    assert_eq!(chunk_module_ids(&graph, &table, "shared_b_js"), ["./b.js"]);
    let mut x_group = graph.chunk_group_map["x_js"].clone();
    let own = x_group.pop();
    assert_eq!(own.as_deref(), Some("x_js"));
    assert_eq!(x_group, ["shared_a_js", "shared_b_js"]);
  }

  #[test]
  fn main_chunk_membership_preempts_lazy_chunks() {
    // entry imports util statically and dynamically imports feature, which
    // also imports util; util stays in main and feature's chunk excludes it.
    let table = table(vec![
      test_module(0, "./index.js", &[1], &[2]),
      test_module(1, "./util.js", &[], &[]),
      test_module(2, "./feature.js", &[1], &[]),
    ]);
    let graph = PlanStage::new(&table, ModuleIdx::from_usize(0)).plan();

    assert_eq!(chunk_module_ids(&graph, &table, "main"), ["./index.js", "./util.js"]);
    assert_eq!(chunk_module_ids(&graph, &table, "feature_js"), ["./feature.js"]);
  }

  #[test]
  fn dynamic_target_inside_main_plans_no_chunk_but_keeps_a_group_entry() {
    let table = table(vec![
      test_module(0, "./index.js", &[1], &[1]),
      test_module(1, "./util.js", &[], &[]),
    ]);
    let graph = PlanStage::new(&table, ModuleIdx::from_usize(0)).plan();

    assert_eq!(graph.chunk_table.len(), 1);
    assert_eq!(graph.chunk_group_map["util_js"], Vec::<ArcStr>::new());
  }

  #[test]
  fn cyclic_static_imports_terminate() {
    let table = table(vec![
      test_module(0, "./a.js", &[1], &[]),
      test_module(1, "./b.js", &[0], &[]),
    ]);
    let graph = PlanStage::new(&table, ModuleIdx::from_usize(0)).plan();

    assert_eq!(chunk_module_ids(&graph, &table, "main"), ["./a.js", "./b.js"]);
  }
}
