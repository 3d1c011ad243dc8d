//! Prerequisite graph over the exercise catalog.
//!
//! Offline validation of the skill tree: every prerequisite must exist, no
//! exercise may require itself, and the graph must be acyclic. Unlock
//! evaluation in [`crate::skills`] never consults this; it is run once when
//! a catalog is loaded.

use crate::ExerciseCatalog;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("Exercise '{0}' lists itself as a prerequisite")]
    SelfPrerequisite(String),

    #[error("Exercise '{exercise}' references non-existent prerequisite '{prerequisite}'")]
    UnknownPrerequisite {
        exercise: String,
        prerequisite: String,
    },

    #[error("Prerequisite cycle detected involving exercise '{0}'")]
    CycleDetected(String),
}

/// Directed graph with an edge `prerequisite -> exercise`
#[derive(Debug)]
pub struct PrerequisiteGraph {
    graph: DiGraph<String, ()>,
    node_map: HashMap<String, NodeIndex>,
}

impl PrerequisiteGraph {
    /// Builds the graph, failing on the first integrity problem found
    pub fn from_catalog(catalog: &ExerciseCatalog) -> Result<Self, GraphError> {
        let (graph, mut problems) = Self::build(catalog);
        if problems.is_empty() {
            Ok(graph)
        } else {
            Err(problems.remove(0))
        }
    }

    /// Every integrity problem in the catalog, in catalog order
    pub fn problems(catalog: &ExerciseCatalog) -> Vec<GraphError> {
        Self::build(catalog).1
    }

    fn build(catalog: &ExerciseCatalog) -> (Self, Vec<GraphError>) {
        let mut graph = DiGraph::new();
        let mut node_map = HashMap::new();
        let mut problems = Vec::new();

        // First pass: add all nodes
        for exercise in catalog.exercises() {
            if !node_map.contains_key(&exercise.id) {
                let idx = graph.add_node(exercise.id.clone());
                node_map.insert(exercise.id.clone(), idx);
            }
        }

        // Second pass: add all edges that point at known exercises
        for exercise in catalog.exercises() {
            let to = node_map[&exercise.id];
            for prereq in &exercise.prerequisites {
                if prereq == &exercise.id {
                    problems.push(GraphError::SelfPrerequisite(exercise.id.clone()));
                    continue;
                }
                match node_map.get(prereq) {
                    Some(&from) => {
                        graph.update_edge(from, to, ());
                    }
                    None => problems.push(GraphError::UnknownPrerequisite {
                        exercise: exercise.id.clone(),
                        prerequisite: prereq.clone(),
                    }),
                }
            }
        }

        if let Err(cycle) = toposort(&graph, None) {
            problems.push(GraphError::CycleDetected(graph[cycle.node_id()].clone()));
        }

        (Self { graph, node_map }, problems)
    }

    /// Exercise ids ordered so that every prerequisite precedes its dependents
    pub fn topological_order(&self) -> Vec<&str> {
        match toposort(&self.graph, None) {
            Ok(order) => order.into_iter().map(|i| self.graph[i].as_str()).collect(),
            // Unreachable for a graph built through `from_catalog`
            Err(_) => Vec::new(),
        }
    }

    /// Exercises that list `exercise_id` directly as a prerequisite
    pub fn dependents(&self, exercise_id: &str) -> Vec<&str> {
        self.neighbors(exercise_id, Direction::Outgoing)
    }

    /// Direct prerequisites of `exercise_id` that exist in the catalog
    pub fn prerequisites(&self, exercise_id: &str) -> Vec<&str> {
        self.neighbors(exercise_id, Direction::Incoming)
    }

    fn neighbors(&self, exercise_id: &str, direction: Direction) -> Vec<&str> {
        let Some(&idx) = self.node_map.get(exercise_id) else {
            return Vec::new();
        };
        let mut ids: Vec<&str> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| self.graph[n].as_str())
            .collect();
        // petgraph yields neighbors newest-edge first
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}
