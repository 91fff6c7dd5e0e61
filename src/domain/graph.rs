//! Dependency graph for tasks
//!
//! Read-only view of task dependencies used for diagnostics. Cycles are not
//! rejected anywhere: a task on a cycle can never be completed, and this
//! graph is how that gets reported.

use std::collections::HashMap;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use super::task::Task;

/// A dependency graph over task names
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// Edge direction: dependency -> dependent
    graph: DiGraph<String, ()>,

    /// Map from task name to node index
    node_map: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Creates an empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from a collection of tasks
    ///
    /// Dependencies on names that are not among `tasks` are skipped.
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut graph = Self::new();

        // First pass: add all nodes
        let tasks: Vec<_> = tasks.into_iter().collect();
        for task in &tasks {
            graph.add_task(task.name());
        }

        // Second pass: add all edges
        for task in &tasks {
            for dep in task.dependencies() {
                graph.add_dependency(task.name(), dep);
            }
        }

        graph
    }

    /// Adds a task node if not already present
    pub fn add_task(&mut self, name: &str) {
        if !self.node_map.contains_key(name) {
            let idx = self.graph.add_node(name.to_string());
            self.node_map.insert(name.to_string(), idx);
        }
    }

    /// Adds an edge: `task` depends on `depends_on`
    ///
    /// Returns false if either task is unknown.
    pub fn add_dependency(&mut self, task: &str, depends_on: &str) -> bool {
        match (self.node_map.get(depends_on), self.node_map.get(task)) {
            (Some(&dep_idx), Some(&task_idx)) => {
                self.graph.update_edge(dep_idx, task_idx, ());
                true
            }
            _ => false,
        }
    }

    /// Groups of tasks that depend on each other in a cycle
    ///
    /// Each group is sorted by name, and groups are sorted by their first name.
    /// A task that depends on itself forms a group of one.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<String>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || self.graph.contains_edge(component[0], component[0])
            })
            .map(|component| {
                let mut names: Vec<String> = component
                    .into_iter()
                    .filter_map(|idx| self.graph.node_weight(idx).cloned())
                    .collect();
                names.sort();
                names
            })
            .collect();
        cycles.sort();
        cycles
    }
}
