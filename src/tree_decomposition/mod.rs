use crate::datastructures::BitSet;
use fxhash::{FxHashMap, FxHashSet};
#[cfg(feature = "log")]
use log::info;
use std::cmp::Reverse;
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};

mod nice;
mod verify;

pub use nice::NiceNodeKind;
pub use verify::TreeDecompositionValidationError;

/// Violated structural precondition of an operation on a [`TreeDecomposition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidStructure {
    Empty,
    NotATree,
    AlreadyRooted,
    NotRooted,
    UnknownNode(usize),
    ChildCount { node: usize, found: usize },
    NotNice(usize),
    BagTooLarge { node: usize, size: usize },
}

impl Display for InvalidStructure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            InvalidStructure::Empty => write!(f, "Empty Decomposition"),
            InvalidStructure::NotATree => write!(f, "Not A Tree"),
            InvalidStructure::AlreadyRooted => write!(f, "Already Rooted"),
            InvalidStructure::NotRooted => write!(f, "Not Rooted"),
            InvalidStructure::UnknownNode(n) => write!(f, "Unknown Node: {}", n),
            InvalidStructure::ChildCount { node, found } => {
                write!(f, "Unexpected Child Count: node {} has {}", node, found)
            }
            InvalidStructure::NotNice(n) => write!(f, "Not Nice: {}", n),
            InvalidStructure::BagTooLarge { node, size } => {
                write!(f, "Bag Too Large: node {} has {} vertices", node, size)
            }
        }
    }
}

impl Error for InvalidStructure {}

#[derive(Debug, Clone, Default)]
pub struct Node {
    id: usize,
    name: String,
    bag: Vec<usize>,
    neighbors: FxHashSet<usize>,
    parent: Option<usize>,
    children: Vec<usize>,
}

impl Node {
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Vertex ids of the bag, sorted ascending.
    pub fn bag(&self) -> &[usize] {
        self.bag.as_slice()
    }

    pub fn contains(&self, v: usize) -> bool {
        self.bag.binary_search(&v).is_ok()
    }

    pub fn neighbors(&self) -> impl Iterator<Item = usize> + '_ {
        self.neighbors.iter().copied()
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub fn children(&self) -> &[usize] {
        self.children.as_slice()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Tree of bags stored as an arena of nodes with dense ids.
///
/// Nodes, bags and tree edges are added first, then the tree is rooted once,
/// which derives every node's parent and children from the undirected edges.
#[derive(Debug, Clone, Default)]
pub struct TreeDecomposition {
    nodes: Vec<Node>,
    ids: FxHashMap<String, usize>,
    root: Option<usize>,
    synthetic_count: usize,
}

impl TreeDecomposition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of the node called `name`, creating it if necessary.
    pub fn add_node(&mut self, name: &str) -> usize {
        assert!(self.root.is_none(), "cannot add nodes to a rooted decomposition");
        if let Some(id) = self.ids.get(name) {
            return *id;
        }
        let id = self.nodes.len();
        self.nodes.push(Node {
            id,
            name: name.to_string(),
            ..Default::default()
        });
        self.ids.insert(name.to_string(), id);
        id
    }

    pub fn set_bag<I: IntoIterator<Item = usize>>(&mut self, id: usize, vertices: I) {
        let mut bag: Vec<usize> = vertices.into_iter().collect();
        bag.sort_unstable();
        bag.dedup();
        self.nodes[id].bag = bag;
    }

    pub fn add_edge(&mut self, b1: usize, b2: usize) {
        assert!(self.root.is_none(), "cannot add edges to a rooted decomposition");
        assert!(b1 < self.nodes.len());
        assert!(b2 < self.nodes.len());
        assert_ne!(b1, b2);
        self.nodes[b1].neighbors.insert(b2);
        self.nodes[b2].neighbors.insert(b1);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: usize) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn name_to_id(&self, name: &str) -> Option<usize> {
        self.ids.get(name).copied()
    }

    pub fn id_to_name(&self, id: usize) -> Option<&str> {
        self.nodes.get(id).map(|n| n.name())
    }

    pub fn are_neighbours(&self, b1: usize, b2: usize) -> bool {
        self.nodes
            .get(b1)
            .map(|n| n.neighbors.contains(&b2))
            .unwrap_or(false)
    }

    /// Every tree edge once, as `(a, b)` with `a < b`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nodes.iter().flat_map(|node| {
            node.neighbors
                .iter()
                .copied()
                .filter(move |n| node.id < *n)
                .map(move |n| (node.id, n))
        })
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.neighbors.len()).sum::<usize>() / 2
    }

    pub fn root(&self) -> Option<usize> {
        self.root
    }

    pub fn is_rooted(&self) -> bool {
        self.root.is_some()
    }

    pub fn max_bag_size(&self) -> usize {
        self.nodes.iter().map(|n| n.bag.len()).max().unwrap_or(0)
    }

    pub fn treewidth(&self) -> usize {
        self.max_bag_size().saturating_sub(1)
    }

    /// Roots the tree at the node with the largest bag, lowest id on ties.
    pub fn root_tree(&mut self) -> Result<usize, InvalidStructure> {
        if self.root.is_some() {
            return Err(InvalidStructure::AlreadyRooted);
        }
        let root = (0..self.nodes.len())
            .min_by_key(|id| (Reverse(self.nodes[*id].bag.len()), *id))
            .ok_or(InvalidStructure::Empty)?;
        self.root_tree_at(root)
    }

    pub fn root_tree_at(&mut self, root: usize) -> Result<usize, InvalidStructure> {
        if self.root.is_some() {
            return Err(InvalidStructure::AlreadyRooted);
        }
        if self.nodes.is_empty() {
            return Err(InvalidStructure::Empty);
        }
        if root >= self.nodes.len() {
            return Err(InvalidStructure::UnknownNode(root));
        }
        self.derive_rooting(root)?;
        #[cfg(feature = "log")]
        info!(
            "rooted decomposition with {} nodes at {} (bag size {})",
            self.nodes.len(),
            self.nodes[root].name,
            self.nodes[root].bag.len()
        );
        Ok(root)
    }

    fn derive_rooting(&mut self, root: usize) -> Result<(), InvalidStructure> {
        let n = self.nodes.len();
        let mut parents: Vec<Option<usize>> = vec![None; n];
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut visited = BitSet::new(n);
        visited.set_bit(root);
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            let mut neighbors: Vec<usize> = self.nodes[current].neighbors().collect();
            neighbors.sort_unstable();
            for neighbor in neighbors {
                if parents[current] == Some(neighbor) {
                    continue;
                }
                if visited.set_bit(neighbor) {
                    return Err(InvalidStructure::NotATree);
                }
                parents[neighbor] = Some(current);
                children[current].push(neighbor);
                stack.push(neighbor);
            }
        }
        if !visited.full() {
            return Err(InvalidStructure::NotATree);
        }
        for ((node, parent), children) in self.nodes.iter_mut().zip(parents).zip(children) {
            node.parent = parent;
            node.children = children;
        }
        self.root = Some(root);
        Ok(())
    }

    pub fn pre_order(&self) -> Result<Vec<usize>, InvalidStructure> {
        let root = self.root.ok_or(InvalidStructure::NotRooted)?;
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            order.push(current);
            stack.extend(self.nodes[current].children.iter().rev().copied());
        }
        Ok(order)
    }

    /// Node ids such that every node comes after all of its descendants.
    pub fn post_order(&self) -> Result<Vec<usize>, InvalidStructure> {
        let root = self.root.ok_or(InvalidStructure::NotRooted)?;
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(root, false)];
        while let Some((current, expanded)) = stack.pop() {
            if expanded {
                order.push(current);
                continue;
            }
            stack.push((current, true));
            for child in self.nodes[current].children.iter().rev() {
                stack.push((*child, false));
            }
        }
        Ok(order)
    }

    pub fn for_each_pre_order<F: FnMut(&Node)>(&self, mut f: F) -> Result<(), InvalidStructure> {
        for id in self.pre_order()? {
            f(&self.nodes[id]);
        }
        Ok(())
    }

    pub fn for_each_post_order<F: FnMut(&Node)>(&self, mut f: F) -> Result<(), InvalidStructure> {
        for id in self.post_order()? {
            f(&self.nodes[id]);
        }
        Ok(())
    }

    /// Depth first search over the undirected tree edges, rooted or not.
    pub fn dfs(&self, start: usize) -> TreeDecompositionIterator<'_> {
        let mut visited = BitSet::new(self.nodes.len());
        let stack = if start < self.nodes.len() {
            visited.set_bit(start);
            vec![start]
        } else {
            vec![]
        };
        TreeDecompositionIterator {
            td: self,
            stack,
            visited,
        }
    }

    fn fresh_name(&mut self) -> String {
        loop {
            self.synthetic_count += 1;
            let name = format!("~{}", self.synthetic_count);
            if !self.ids.contains_key(&name) {
                return name;
            }
        }
    }

    /// Adds a detached synthetic node. `bag` must be sorted.
    fn push_node(&mut self, bag: Vec<usize>) -> usize {
        debug_assert!(bag.windows(2).all(|w| w[0] < w[1]));
        let id = self.nodes.len();
        let name = self.fresh_name();
        self.ids.insert(name.clone(), id);
        self.nodes.push(Node {
            id,
            name,
            bag,
            ..Default::default()
        });
        id
    }

    fn attach(&mut self, parent: usize, child: usize) {
        debug_assert!(self.nodes[child].parent.is_none());
        assert_ne!(parent, child);
        self.nodes[parent].neighbors.insert(child);
        self.nodes[child].neighbors.insert(parent);
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
    }

    fn detach(&mut self, parent: usize, child: usize) {
        debug_assert_eq!(self.nodes[child].parent, Some(parent));
        self.nodes[parent].neighbors.remove(&child);
        self.nodes[child].neighbors.remove(&parent);
        self.nodes[parent].children.retain(|c| *c != child);
        self.nodes[child].parent = None;
    }

    /// Drops every node marked in `removed` and renumbers the rest densely.
    fn compact(&mut self, removed: &BitSet) {
        let mut new_ids: Vec<Option<usize>> = vec![None; self.nodes.len()];
        let mut next = 0;
        for (id, new_id) in new_ids.iter_mut().enumerate() {
            if !removed[id] {
                *new_id = Some(next);
                next += 1;
            }
        }

        let old_nodes = std::mem::take(&mut self.nodes);
        self.nodes = old_nodes
            .into_iter()
            .filter(|node| !removed[node.id])
            .enumerate()
            .map(|(id, mut node)| {
                debug_assert!(node.neighbors.iter().all(|n| !removed[*n]));
                node.id = id;
                node.neighbors = node.neighbors.iter().filter_map(|n| new_ids[*n]).collect();
                node.parent = node.parent.and_then(|p| new_ids[p]);
                node.children = node.children.iter().filter_map(|c| new_ids[*c]).collect();
                node
            })
            .collect();
        self.ids = self
            .nodes
            .iter()
            .map(|node| (node.name.clone(), node.id))
            .collect();
        self.root = self.root.and_then(|r| new_ids[r]);
    }
}

pub struct TreeDecompositionIterator<'a> {
    td: &'a TreeDecomposition,
    stack: Vec<usize>,
    visited: BitSet,
}

impl<'a> Iterator for TreeDecompositionIterator<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        for c in self.td.nodes[current].neighbors.iter().copied() {
            if !self.visited[c] {
                self.stack.push(c);
                self.visited.set_bit(c);
            }
        }
        self.td.nodes.get(current)
    }
}
