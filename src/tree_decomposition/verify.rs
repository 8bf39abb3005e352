use crate::datastructures::BitSet;
use crate::graph::BaseGraph;
use crate::tree_decomposition::TreeDecomposition;
use fxhash::FxHashSet;
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};

/// First violated property of a decomposition with respect to a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeDecompositionValidationError {
    HasCycle,
    NotConnected,
    UnknownVertex(usize),
    MissingVertex(usize),
    MissingEdge((usize, usize)),
    NotInducingSubtree(usize),
}

impl Display for TreeDecompositionValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            TreeDecompositionValidationError::HasCycle => write!(f, "Has Cycle"),
            TreeDecompositionValidationError::NotConnected => write!(f, "Not Connected"),
            TreeDecompositionValidationError::UnknownVertex(v) => {
                write!(f, "Unknown Vertex: {}", v)
            }
            TreeDecompositionValidationError::MissingVertex(v) => {
                write!(f, "Missing Vertex: {}", v)
            }
            TreeDecompositionValidationError::MissingEdge((u, v)) => {
                write!(f, "Missing Edge: ({}, {})", u, v)
            }
            TreeDecompositionValidationError::NotInducingSubtree(v) => {
                write!(f, "Not Inducing Subtree: {}", v)
            }
        }
    }
}

impl Error for TreeDecompositionValidationError {}

impl TreeDecomposition {
    pub fn verify<G: BaseGraph>(&self, graph: &G) -> Result<(), TreeDecompositionValidationError> {
        if !self.is_connected() {
            return Err(TreeDecompositionValidationError::NotConnected);
        }

        if self.is_cyclic() {
            return Err(TreeDecompositionValidationError::HasCycle);
        }

        if let Some(v) = self.get_unknown_vertex(graph) {
            return Err(TreeDecompositionValidationError::UnknownVertex(v));
        }

        if let Some(v) = self.get_missing_vertex(graph) {
            return Err(TreeDecompositionValidationError::MissingVertex(v));
        }

        if let Some(e) = self.get_missing_edge(graph) {
            return Err(TreeDecompositionValidationError::MissingEdge(e));
        }

        if let Some(v) = self.get_vertex_not_inducing_subtree(graph) {
            return Err(TreeDecompositionValidationError::NotInducingSubtree(v));
        }

        Ok(())
    }

    pub fn is_valid<G: BaseGraph>(&self, graph: &G) -> bool {
        self.verify(graph).is_ok()
    }

    fn is_connected(&self) -> bool {
        self.nodes.is_empty() || self.dfs(0).count() == self.nodes.len()
    }

    // a connected graph is a tree iff it has one edge less than nodes
    fn is_cyclic(&self) -> bool {
        !self.nodes.is_empty() && self.edge_count() != self.nodes.len() - 1
    }

    fn get_unknown_vertex<G: BaseGraph>(&self, graph: &G) -> Option<usize> {
        self.nodes
            .iter()
            .flat_map(|n| n.bag.iter().copied())
            .find(|v| *v >= graph.order())
    }

    fn get_missing_vertex<G: BaseGraph>(&self, graph: &G) -> Option<usize> {
        let mut covered = BitSet::new(graph.order());
        for v in self.nodes.iter().flat_map(|n| n.bag.iter()) {
            covered.set_bit(*v);
        }
        graph.vertices().find(|v| !covered[*v])
    }

    fn get_missing_edge<G: BaseGraph>(&self, graph: &G) -> Option<(usize, usize)> {
        let mut covered: FxHashSet<(usize, usize)> = FxHashSet::default();
        for node in &self.nodes {
            for (i, u) in node.bag.iter().enumerate() {
                for v in node.bag.iter().skip(i + 1) {
                    covered.insert((*u, *v));
                }
            }
        }
        graph
            .edges()
            .map(|(u, v)| if u < v { (u, v) } else { (v, u) })
            .find(|e| !covered.contains(e))
    }

    fn get_vertex_not_inducing_subtree<G: BaseGraph>(&self, graph: &G) -> Option<usize> {
        let mut containing: Vec<Vec<usize>> = vec![Vec::new(); graph.order()];
        for node in &self.nodes {
            for v in node.bag.iter() {
                containing[*v].push(node.id);
            }
        }

        let mut visited = BitSet::new(self.nodes.len());
        for u in graph.vertices() {
            let first = match containing[u].first() {
                Some(first) => *first,
                None => continue,
            };
            let mut reached = 1;
            visited.set_bit(first);
            let mut stack: Vec<usize> = vec![first];
            while let Some(c) = stack.pop() {
                for n in self.nodes[c].neighbors.iter().copied() {
                    if !visited[n] && self.nodes[n].contains(u) {
                        visited.set_bit(n);
                        stack.push(n);
                        reached += 1;
                    }
                }
            }
            for id in &containing[u] {
                visited.unset_bit(*id);
            }
            if reached != containing[u].len() {
                return Some(u);
            }
        }
        None
    }
}
