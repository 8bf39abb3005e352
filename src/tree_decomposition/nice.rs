use crate::datastructures::BitSet;
use crate::tree_decomposition::{InvalidStructure, TreeDecomposition};
use crate::util::{sorted_difference, sorted_insert, sorted_remove, symmetric_difference_len};
#[cfg(feature = "log")]
use log::{debug, info};

/// Category of a node in a nice tree decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NiceNodeKind {
    Leaf,
    /// The node's bag is its child's bag plus this vertex.
    Introduce(usize),
    /// The node's bag is its child's bag minus this vertex.
    Forget(usize),
    Join,
}

impl TreeDecomposition {
    pub fn nice_kind(&self, id: usize) -> Result<NiceNodeKind, InvalidStructure> {
        if self.root.is_none() {
            return Err(InvalidStructure::NotRooted);
        }
        let node = self.nodes.get(id).ok_or(InvalidStructure::UnknownNode(id))?;
        match node.children.as_slice() {
            [] => {
                if node.bag.len() == 1 || (node.bag.is_empty() && self.nodes.len() == 1) {
                    Ok(NiceNodeKind::Leaf)
                } else {
                    Err(InvalidStructure::NotNice(id))
                }
            }
            [child] => {
                let child = &self.nodes[*child];
                let introduced = sorted_difference(&node.bag, &child.bag);
                let forgotten = sorted_difference(&child.bag, &node.bag);
                match (introduced.as_slice(), forgotten.as_slice()) {
                    ([v], []) => Ok(NiceNodeKind::Introduce(*v)),
                    ([], [v]) => Ok(NiceNodeKind::Forget(*v)),
                    _ => Err(InvalidStructure::NotNice(id)),
                }
            }
            [left, right] => {
                if self.nodes[*left].bag == node.bag && self.nodes[*right].bag == node.bag {
                    Ok(NiceNodeKind::Join)
                } else {
                    Err(InvalidStructure::NotNice(id))
                }
            }
            _ => Err(InvalidStructure::NotNice(id)),
        }
    }

    pub fn is_nice_tree_decomposition(&self) -> bool {
        self.root.is_some() && (0..self.nodes.len()).all(|id| self.nice_kind(id).is_ok())
    }

    /// Rewrites the rooted decomposition into a nice one. Running it on a
    /// nice decomposition leaves it unchanged.
    pub fn turn_into_nice_tree_decomposition(&mut self) -> Result<(), InvalidStructure> {
        if self.root.is_none() {
            return Err(InvalidStructure::NotRooted);
        }
        #[cfg(feature = "log")]
        let before = self.nodes.len();

        self.prune_empty_leaves()?;
        for id in self.post_order()? {
            match self.nodes[id].children.len() {
                0 => self.pad_leaf(id),
                1 => {
                    let child = self.nodes[id].children[0];
                    self.bridge(id, child);
                }
                _ => self.flatten_children(id),
            }
        }
        let _removed = self.remove_duplicate_bags()?;

        debug_assert!(self.is_nice_tree_decomposition());
        #[cfg(feature = "log")]
        info!(
            "nice decomposition: {} nodes before, {} after ({} duplicates collapsed)",
            before,
            self.nodes.len(),
            _removed
        );
        Ok(())
    }

    /// Interpolates bags between `parent` and its only child so that
    /// consecutive bags differ by exactly one vertex.
    pub fn bridge_difference(&mut self, parent: usize) -> Result<(), InvalidStructure> {
        let child = match self.checked_children(parent)? {
            [child] => *child,
            children => {
                return Err(InvalidStructure::ChildCount {
                    node: parent,
                    found: children.len(),
                })
            }
        };
        self.bridge(parent, child);
        Ok(())
    }

    /// Replaces the children of `node` by a cascade of binary join nodes.
    pub fn flatten_join(&mut self, node: usize) -> Result<(), InvalidStructure> {
        let found = self.checked_children(node)?.len();
        if found < 2 {
            return Err(InvalidStructure::ChildCount { node, found });
        }
        self.flatten_children(node);
        Ok(())
    }

    /// Collapses every node that is the only child of a node with the same
    /// bag. Returns the number of removed nodes.
    pub fn remove_duplicate_bags(&mut self) -> Result<usize, InvalidStructure> {
        let mut removed = BitSet::new(self.nodes.len());
        for id in self.post_order()? {
            if self.nodes[id].children.len() != 1 {
                continue;
            }
            let child = self.nodes[id].children[0];
            if self.nodes[child].bag != self.nodes[id].bag {
                continue;
            }
            // the child already absorbed its own duplicates
            let grandchildren = self.nodes[child].children.clone();
            self.detach(id, child);
            for grandchild in grandchildren {
                self.detach(child, grandchild);
                self.attach(id, grandchild);
            }
            removed.set_bit(child);
        }

        let count = removed.cardinality();
        if count > 0 {
            self.compact(&removed);
        }
        #[cfg(feature = "log")]
        debug!("removed {} duplicate bags", count);
        Ok(count)
    }

    fn checked_children(&self, id: usize) -> Result<&[usize], InvalidStructure> {
        if self.root.is_none() {
            return Err(InvalidStructure::NotRooted);
        }
        self.nodes
            .get(id)
            .map(|node| node.children())
            .ok_or(InvalidStructure::UnknownNode(id))
    }

    /// Removes non-root leaves without vertices, cascading upwards.
    fn prune_empty_leaves(&mut self) -> Result<(), InvalidStructure> {
        let mut removed = BitSet::new(self.nodes.len());
        for id in self.post_order()? {
            if self.root == Some(id)
                || !self.nodes[id].bag.is_empty()
                || !self.nodes[id].children.is_empty()
            {
                continue;
            }
            if let Some(parent) = self.nodes[id].parent {
                self.detach(parent, id);
                removed.set_bit(id);
            }
        }
        if !removed.empty() {
            #[cfg(feature = "log")]
            debug!("pruned {} empty leaves", removed.cardinality());
            self.compact(&removed);
        }
        Ok(())
    }

    fn pad_leaf(&mut self, id: usize) {
        if self.nodes[id].bag.len() <= 1 {
            return;
        }
        let smallest = self.nodes[id].bag[0];
        let child = self.push_node(vec![smallest]);
        self.attach(id, child);
        self.bridge(id, child);
    }

    fn bridge(&mut self, parent: usize, child: usize) {
        let parent_bag = self.nodes[parent].bag.clone();
        let child_bag = &self.nodes[child].bag;
        if symmetric_difference_len(&parent_bag, child_bag) <= 1 {
            return;
        }
        let forgotten = sorted_difference(&parent_bag, child_bag);
        let introduced = sorted_difference(child_bag, &parent_bag);

        let mut bags = Vec::with_capacity(forgotten.len() + introduced.len());
        let mut current = parent_bag;
        for v in forgotten {
            sorted_remove(&mut current, v);
            bags.push(current.clone());
        }
        for v in introduced {
            sorted_insert(&mut current, v);
            bags.push(current.clone());
        }
        // the last step reproduces the child's bag
        bags.pop();

        self.detach(parent, child);
        let mut last = parent;
        for bag in bags {
            let id = self.push_node(bag);
            self.attach(last, id);
            last = id;
        }
        self.attach(last, child);
    }

    fn flatten_children(&mut self, node: usize) {
        let bag = self.nodes[node].bag.clone();
        let children = self.nodes[node].children.clone();
        debug_assert!(children.len() >= 2);

        let mut slots = Vec::with_capacity(children.len());
        for child in children {
            self.detach(node, child);
            if self.nodes[child].bag == bag {
                slots.push(child);
            } else {
                let slot = self.push_node(bag.clone());
                self.attach(slot, child);
                self.bridge(slot, child);
                slots.push(slot);
            }
        }

        let (cascade, last_two) = slots.split_at(slots.len() - 2);
        let mut join = node;
        for slot in cascade {
            self.attach(join, *slot);
            let next = self.push_node(bag.clone());
            self.attach(join, next);
            join = next;
        }
        self.attach(join, last_two[0]);
        self.attach(join, last_two[1]);
    }
}
