use crate::graph::base_graph::{BaseGraph, WeightedGraph};
use crate::graph::Weight;
use fxhash::{FxHashMap, FxHashSet};

/// Weight given to vertices whose weight is never set.
pub const DEFAULT_WEIGHT: Weight = 1;

/// Immutable undirected graph with integer vertex weights and named vertices.
///
/// Vertex ids are dense, assigned in order of first appearance while the
/// graph is built through [`GraphBuilder`].
#[derive(Clone, Debug)]
pub struct VertexWeightedGraph {
    data: Vec<FxHashSet<usize>>,
    weights: Vec<Weight>,
    names: Vec<String>,
    ids: FxHashMap<String, usize>,
    edge_count: usize,
}

impl VertexWeightedGraph {
    pub fn name(&self, u: usize) -> &str {
        self.names[u].as_str()
    }

    pub fn id(&self, name: &str) -> Option<usize> {
        self.ids.get(name).copied()
    }

    pub fn names(&self, vertices: &[usize]) -> Vec<&str> {
        vertices.iter().map(|v| self.name(*v)).collect()
    }
}

impl BaseGraph for VertexWeightedGraph {
    fn degree(&self, u: usize) -> usize {
        self.data[u].len()
    }

    fn order(&self) -> usize {
        self.data.len()
    }

    fn size(&self) -> usize {
        self.edge_count
    }

    fn has_edge(&self, u: usize, v: usize) -> bool {
        self.data
            .get(u)
            .map(|neighbors| neighbors.contains(&v))
            .unwrap_or(false)
    }

    fn vertices(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        Box::new(0..self.data.len())
    }

    fn neighborhood(&self, u: usize) -> Box<dyn Iterator<Item = usize> + '_> {
        Box::new(self.data[u].iter().copied())
    }

    fn edges(&self) -> Box<dyn Iterator<Item = (usize, usize)> + '_> {
        Box::new(self.data.iter().enumerate().flat_map(|(u, neighbors)| {
            neighbors
                .iter()
                .copied()
                .filter(move |v| u < *v)
                .map(move |v| (u, v))
        }))
    }
}

impl WeightedGraph for VertexWeightedGraph {
    fn weight(&self, u: usize) -> Weight {
        self.weights[u]
    }
}

#[derive(Debug, Default)]
pub struct GraphBuilder {
    data: Vec<FxHashSet<usize>>,
    weights: Vec<Option<Weight>>,
    names: Vec<String>,
    ids: FxHashMap<String, usize>,
    edge_count: usize,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of the vertex called `name`, creating it if necessary.
    pub fn add_vertex(&mut self, name: &str) -> usize {
        if let Some(id) = self.ids.get(name) {
            return *id;
        }
        let id = self.data.len();
        self.data.push(FxHashSet::default());
        self.weights.push(None);
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    pub fn set_weight(&mut self, name: &str, weight: Weight) -> usize {
        let id = self.add_vertex(name);
        self.weights[id] = Some(weight);
        id
    }

    pub fn add_edge(&mut self, a: &str, b: &str) -> (usize, usize) {
        let u = self.add_vertex(a);
        let v = self.add_vertex(b);
        assert_ne!(u, v, "self loop on vertex {}", a);
        if self.data[u].insert(v) {
            self.data[v].insert(u);
            self.edge_count += 1;
        }
        (u, v)
    }

    pub fn build(self) -> VertexWeightedGraph {
        VertexWeightedGraph {
            data: self.data,
            weights: self
                .weights
                .into_iter()
                .map(|w| w.unwrap_or(DEFAULT_WEIGHT))
                .collect(),
            names: self.names,
            ids: self.ids,
            edge_count: self.edge_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{BaseGraph, GraphBuilder, WeightedGraph, DEFAULT_WEIGHT};

    fn k5() -> crate::graph::VertexWeightedGraph {
        let names = ["a", "b", "c", "d", "e"];
        let mut builder = GraphBuilder::new();
        for (i, u) in names.iter().enumerate() {
            for v in names.iter().skip(i + 1) {
                builder.add_edge(u, v);
            }
        }
        builder.build()
    }

    #[test]
    fn test_order_and_size() {
        let graph = k5();
        assert_eq!(graph.order(), 5);
        assert_eq!(graph.size(), 10);
        assert_eq!(graph.edges().count(), 10);
        for u in graph.vertices() {
            assert_eq!(graph.degree(u), 4);
            for v in graph.vertices().filter(|v| *v != u) {
                assert!(graph.has_edge(u, v));
            }
        }
    }

    #[test]
    fn test_duplicate_edges_are_ignored() {
        let mut builder = GraphBuilder::new();
        builder.add_edge("a", "b");
        builder.add_edge("b", "a");
        let graph = builder.build();
        assert_eq!(graph.size(), 1);
        assert_eq!(graph.degree(graph.id("a").unwrap()), 1);
    }

    #[test]
    fn test_names_and_weights() {
        let mut builder = GraphBuilder::new();
        builder.add_edge("x", "y");
        builder.set_weight("y", 7);
        builder.set_weight("z", 3);
        let graph = builder.build();

        let x = graph.id("x").unwrap();
        let y = graph.id("y").unwrap();
        let z = graph.id("z").unwrap();
        assert_eq!((x, y, z), (0, 1, 2));
        assert_eq!(graph.name(z), "z");
        assert_eq!(graph.id("w"), None);
        assert_eq!(graph.weight(x), DEFAULT_WEIGHT);
        assert_eq!(graph.weight(y), 7);
        assert_eq!(graph.degree(z), 0);
        assert_eq!(graph.total_weight(&[x, y, z]), DEFAULT_WEIGHT + 10);
        assert_eq!(graph.names(&[z, x]), vec!["z", "x"]);
    }

    #[test]
    fn test_is_vertex_cover() {
        let graph = k5();
        assert!(graph.is_vertex_cover(&[0, 1, 2, 3]));
        assert!(!graph.is_vertex_cover(&[0, 1, 2]));
        assert!(!graph.is_vertex_cover(&[0, 1, 2, 3, 17]));
    }
}
