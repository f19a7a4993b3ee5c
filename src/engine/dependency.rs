// ABOUTME: Dependency graph construction and topological scheduling of pipeline nodes
// ABOUTME: Strict ordering fails on cycles; lenient estimation falls back to source order

use petgraph::algo::tarjan_scc;
use petgraph::graph::NodeIndex;
use petgraph::{Direction, Graph};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use tracing::{debug, warn};

use super::error::{PipelineError, Result};
use crate::parser::PipelineNode;

pub struct DependencyGraph {
    graph: Graph<String, ()>,
    node_indices: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Build the graph, rejecting empty or duplicate names and unresolvable references
    pub fn from_nodes(nodes: &[PipelineNode]) -> Result<Self> {
        let mut graph = Graph::new();
        let mut node_indices = HashMap::new();

        for (index, node) in nodes.iter().enumerate() {
            if node.name.trim().is_empty() {
                return Err(PipelineError::EmptyNodeName { index });
            }
            if node_indices.contains_key(&node.name) {
                return Err(PipelineError::DuplicateNode {
                    node: node.name.clone(),
                });
            }
            let node_index = graph.add_node(node.name.clone());
            node_indices.insert(node.name.clone(), node_index);
        }

        for node in nodes {
            let node_index = node_indices[&node.name];

            for dependency in &node.depends_on {
                if *dependency == node.name {
                    return Err(PipelineError::SelfDependency {
                        node: node.name.clone(),
                    });
                }
                match node_indices.get(dependency) {
                    // Edge runs dependency -> dependent
                    Some(&dep_index) => {
                        graph.update_edge(dep_index, node_index, ());
                    }
                    None => {
                        return Err(PipelineError::UnknownDependency {
                            node: node.name.clone(),
                            dependency: dependency.clone(),
                        })
                    }
                }
            }
        }

        Ok(Self {
            graph,
            node_indices,
        })
    }

    /// Build the graph skipping references that cannot be resolved.
    /// Returns None when node names are not unique.
    pub fn lenient(nodes: &[PipelineNode]) -> Option<Self> {
        let mut graph = Graph::new();
        let mut node_indices = HashMap::new();

        for node in nodes {
            if node_indices.contains_key(&node.name) {
                return None;
            }
            let node_index = graph.add_node(node.name.clone());
            node_indices.insert(node.name.clone(), node_index);
        }

        for node in nodes {
            let node_index = node_indices[&node.name];
            for dependency in &node.depends_on {
                match node_indices.get(dependency) {
                    Some(&dep_index) if dep_index != node_index => {
                        graph.update_edge(dep_index, node_index, ());
                    }
                    _ => debug!(
                        "Ignoring dependency '{}' of node '{}' while estimating order",
                        dependency, node.name
                    ),
                }
            }
        }

        Some(Self {
            graph,
            node_indices,
        })
    }

    /// Kahn's algorithm; the ready node earliest in source order is always taken first
    pub fn execution_order(&self) -> Result<Vec<String>> {
        let mut in_degree: Vec<usize> = self
            .graph
            .node_indices()
            .map(|n| self.graph.neighbors_directed(n, Direction::Incoming).count())
            .collect();

        let mut ready: BinaryHeap<Reverse<NodeIndex>> = self
            .graph
            .node_indices()
            .filter(|n| in_degree[n.index()] == 0)
            .map(Reverse)
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some(Reverse(current)) = ready.pop() {
            order.push(self.graph[current].clone());

            for dependent in self.graph.neighbors_directed(current, Direction::Outgoing) {
                in_degree[dependent.index()] -= 1;
                if in_degree[dependent.index()] == 0 {
                    ready.push(Reverse(dependent));
                }
            }
        }

        if order.len() < self.graph.node_count() {
            return Err(PipelineError::CircularDependency {
                nodes: self.cycle_members(),
            });
        }

        Ok(order)
    }

    /// Nodes that sit on a cycle, in source order
    pub fn cycle_members(&self) -> Vec<String> {
        let mut members: Vec<NodeIndex> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1 || self.graph.contains_edge(component[0], component[0])
            })
            .flatten()
            .collect();
        members.sort();
        members.into_iter().map(|n| self.graph[n].clone()).collect()
    }
}

/// Strict scheduling used before execution: configuration and cycle errors are fatal
pub fn build_order(nodes: &[PipelineNode]) -> Result<Vec<String>> {
    DependencyGraph::from_nodes(nodes)?.execution_order()
}

/// Read-only order estimation that never fails; degrades to source order
pub fn estimate_order(nodes: &[PipelineNode]) -> Vec<String> {
    let source_order = || -> Vec<String> { nodes.iter().map(|n| n.name.clone()).collect() };

    let Some(graph) = DependencyGraph::lenient(nodes) else {
        warn!("Duplicate node names, using configuration order");
        return source_order();
    };

    match graph.execution_order() {
        Ok(order) => order,
        Err(e) => {
            warn!("{}, using configuration order", e);
            source_order()
        }
    }
}
