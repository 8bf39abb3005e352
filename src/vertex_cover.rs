use crate::graph::{Weight, WeightedGraph};
use crate::tree_decomposition::{InvalidStructure, NiceNodeKind, Node, TreeDecomposition};
use fxhash::FxHashMap;
#[cfg(feature = "log")]
use log::{debug, info};
use std::rc::Rc;

/// Largest bag the solver accepts, one bit per vertex of a bag.
pub const MAX_BAG_SIZE: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Vertex ids, sorted ascending.
    pub cover: Vec<usize>,
    pub weight: Weight,
}

/// Cover vertices that were forgotten below a table entry, shared between
/// entries of different tables.
#[derive(Debug)]
enum PastCover {
    Empty,
    Forgot(usize, Rc<PastCover>),
    Join(Rc<PastCover>, Rc<PastCover>),
}

#[derive(Debug, Clone)]
struct Entry {
    weight: Weight,
    past: Rc<PastCover>,
}

/// Partial covers as bit masks over the positions of the sorted bag.
type Table = FxHashMap<u64, Entry>;

pub struct VertexCoverSolver<'a, G: WeightedGraph> {
    graph: &'a G,
    td: &'a TreeDecomposition,
    root: usize,
    tables: FxHashMap<usize, Table>,
}

impl<'a, G: WeightedGraph> VertexCoverSolver<'a, G> {
    /// Fails unless `td` is rooted, nice and has no bag larger than
    /// [`MAX_BAG_SIZE`].
    pub fn new(graph: &'a G, td: &'a TreeDecomposition) -> Result<Self, InvalidStructure> {
        let root = td.root().ok_or(InvalidStructure::NotRooted)?;
        for node in td.nodes() {
            if node.bag().len() > MAX_BAG_SIZE {
                return Err(InvalidStructure::BagTooLarge {
                    node: node.id(),
                    size: node.bag().len(),
                });
            }
            td.nice_kind(node.id())?;
        }
        Ok(Self {
            graph,
            td,
            root,
            tables: FxHashMap::default(),
        })
    }

    pub fn solve(&mut self) -> Result<Solution, InvalidStructure> {
        self.tables.clear();
        let td = self.td;
        for id in td.post_order()? {
            let node = &td.nodes()[id];
            let table = match td.nice_kind(id)? {
                NiceNodeKind::Leaf => self.leaf(node),
                NiceNodeKind::Introduce(v) => {
                    let child = self.take_table(node.children()[0])?;
                    self.introduce(node, v, child)
                }
                NiceNodeKind::Forget(v) => {
                    let child_id = node.children()[0];
                    let child = self.take_table(child_id)?;
                    self.forget(&td.nodes()[child_id], v, child)
                }
                NiceNodeKind::Join => {
                    let left = self.take_table(node.children()[0])?;
                    let right = self.take_table(node.children()[1])?;
                    self.join(node, left, right)
                }
            };
            #[cfg(feature = "log")]
            debug!("table of node {} has {} entries", node.name(), table.len());
            self.tables.insert(id, table);
        }

        let root = &td.nodes()[self.root];
        let table = self
            .tables
            .get(&self.root)
            .ok_or(InvalidStructure::UnknownNode(self.root))?;
        #[cfg(feature = "log")]
        info!("root table has {} entries", table.len());

        let (mask, entry) = table
            .iter()
            .min_by_key(|(mask, entry)| (entry.weight, **mask))
            .ok_or(InvalidStructure::NotNice(self.root))?;

        let mut cover: Vec<usize> = bag_subset(root.bag(), *mask).collect();
        let mut stack = vec![&entry.past];
        while let Some(past) = stack.pop() {
            match &**past {
                PastCover::Empty => {}
                PastCover::Forgot(v, rest) => {
                    cover.push(*v);
                    stack.push(rest);
                }
                PastCover::Join(left, right) => {
                    stack.push(left);
                    stack.push(right);
                }
            }
        }
        cover.sort_unstable();
        cover.dedup();

        #[cfg(feature = "log")]
        info!("minimum vertex cover weight: {}", entry.weight);
        Ok(Solution {
            cover,
            weight: entry.weight,
        })
    }

    /// Number of tables still held. After [`solve`](Self::solve) only the
    /// root's table remains.
    pub fn retained_tables(&self) -> usize {
        self.tables.len()
    }

    fn take_table(&mut self, child: usize) -> Result<Table, InvalidStructure> {
        self.tables
            .remove(&child)
            .ok_or(InvalidStructure::UnknownNode(child))
    }

    fn leaf(&self, node: &Node) -> Table {
        let mut table = Table::default();
        table.insert(0, Entry::empty(0));
        if let Some(v) = node.bag().first() {
            table.insert(1, Entry::empty(self.graph.weight(*v)));
        }
        table
    }

    fn introduce(&self, node: &Node, v: usize, child: Table) -> Table {
        let bag = node.bag();
        let slot = slot_of(bag, v);
        let low = (1u64 << slot) - 1;
        let v_bit = 1u64 << slot;
        let neighbors = bag
            .iter()
            .enumerate()
            .filter(|(_, u)| self.graph.has_edge(v, **u))
            .fold(0u64, |mask, (i, _)| mask | 1u64 << i);
        let weight = self.graph.weight(v);

        let mut table = Table::default();
        table.reserve(2 * child.len());
        for (mask, entry) in child {
            let expanded = (mask & low) | ((mask & !low) << 1);
            if neighbors & !expanded == 0 {
                table.insert(expanded, entry.clone());
            }
            table.insert(
                expanded | v_bit,
                Entry {
                    weight: entry.weight + weight,
                    past: entry.past,
                },
            );
        }
        table
    }

    fn forget(&self, child_node: &Node, v: usize, child: Table) -> Table {
        let slot = slot_of(child_node.bag(), v);
        let low = (1u64 << slot) - 1;
        let v_bit = 1u64 << slot;

        let mut table = Table::default();
        for (mask, entry) in child {
            let squeezed = (mask & low) | ((mask >> slot) >> 1 << slot);
            if let Some(existing) = table.get(&squeezed) {
                if existing.weight <= entry.weight {
                    continue;
                }
            }
            let past = if mask & v_bit != 0 {
                Rc::new(PastCover::Forgot(v, entry.past))
            } else {
                entry.past
            };
            table.insert(
                squeezed,
                Entry {
                    weight: entry.weight,
                    past,
                },
            );
        }
        table
    }

    fn join(&self, node: &Node, left: Table, mut right: Table) -> Table {
        let bag = node.bag();
        let mut table = Table::default();
        for (mask, entry) in left {
            if let Some(other) = right.remove(&mask) {
                let shared: Weight = bag_subset(bag, mask).map(|v| self.graph.weight(v)).sum();
                table.insert(
                    mask,
                    Entry {
                        weight: entry.weight + other.weight - shared,
                        past: Rc::new(PastCover::Join(entry.past, other.past)),
                    },
                );
            }
        }
        table
    }
}

impl Entry {
    fn empty(weight: Weight) -> Self {
        Self {
            weight,
            past: Rc::new(PastCover::Empty),
        }
    }
}

fn slot_of(bag: &[usize], v: usize) -> usize {
    match bag.binary_search(&v) {
        Ok(slot) => slot,
        Err(_) => panic!("vertex {} is not part of the bag {:?}", v, bag),
    }
}

fn bag_subset(bag: &[usize], mask: u64) -> impl Iterator<Item = usize> + '_ {
    bag.iter()
        .enumerate()
        .filter(move |(i, _)| mask & (1u64 << i) != 0)
        .map(|(_, v)| *v)
}
