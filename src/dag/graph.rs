// src/dag/graph.rs

use std::collections::{BTreeMap, BTreeSet};

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::ConfigFile;
use crate::errors::{Result, WstError};

/// Internal node structure.
#[derive(Debug, Clone)]
struct ProjectNode {
    /// Direct dependencies: projects that must be built before this one.
    deps: Vec<String>,
}

/// In-memory DAG of projects keyed by project name.
///
/// Acyclicity is already checked in `config::validate`; the graph still
/// reports a cycle as an error rather than assuming it away.
#[derive(Debug, Clone)]
pub struct ProjectGraph {
    nodes: BTreeMap<String, ProjectNode>,
}

impl ProjectGraph {
    /// Build the graph from a validated [`ConfigFile`].
    pub fn from_config(cfg: &ConfigFile) -> Self {
        let nodes = cfg
            .project
            .iter()
            .map(|(name, project)| {
                (
                    name.clone(),
                    ProjectNode {
                        deps: project.after.clone(),
                    },
                )
            })
            .collect();

        Self { nodes }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Immediate dependencies of a project (its `after` list).
    pub fn dependencies_of(&self, name: &str) -> &[String] {
        self.nodes
            .get(name)
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    /// Every project, dependencies first.
    ///
    /// The order is stable across runs for the same configuration.
    pub fn build_order(&self) -> Result<Vec<String>> {
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
        for name in self.nodes.keys() {
            graph.add_node(name.as_str());
        }
        for (name, node) in self.nodes.iter() {
            for dep in node.deps.iter() {
                graph.add_edge(dep.as_str(), name.as_str(), ());
            }
        }

        toposort(&graph, None)
            .map(|order| order.into_iter().map(str::to_string).collect())
            .map_err(|cycle| {
                WstError::DagCycle(format!(
                    "cycle detected in project graph involving project '{}'",
                    cycle.node_id()
                ))
            })
    }

    /// `selected` plus everything they transitively depend on.
    pub fn with_dependencies(&self, selected: &[String]) -> Result<BTreeSet<String>> {
        let mut closure = BTreeSet::new();
        let mut stack: Vec<&str> = Vec::new();

        for name in selected {
            if !self.contains(name) {
                return Err(WstError::ProjectNotFound(name.clone()));
            }
            stack.push(name.as_str());
        }

        while let Some(name) = stack.pop() {
            if closure.insert(name.to_string()) {
                stack.extend(self.dependencies_of(name).iter().map(String::as_str));
            }
        }

        Ok(closure)
    }
}
