use crate::graph::Weight;
use std::fmt::Debug;

pub trait BaseGraph: Clone + Debug {
    fn degree(&self, u: usize) -> usize;
    fn order(&self) -> usize;
    fn size(&self) -> usize;
    fn has_edge(&self, u: usize, v: usize) -> bool;
    fn vertices(&self) -> Box<dyn Iterator<Item = usize> + '_>;
    fn neighborhood(&self, u: usize) -> Box<dyn Iterator<Item = usize> + '_>;

    /// Every undirected edge once, as `(u, v)` with `u < v`.
    fn edges(&self) -> Box<dyn Iterator<Item = (usize, usize)> + '_>;
}

pub trait WeightedGraph: BaseGraph {
    fn weight(&self, u: usize) -> Weight;

    fn total_weight(&self, vertices: &[usize]) -> Weight {
        vertices.iter().map(|v| self.weight(*v)).sum()
    }

    /// Every edge has at least one endpoint in `vertices`.
    fn is_vertex_cover(&self, vertices: &[usize]) -> bool {
        let mut in_cover = vec![false; self.order()];
        for v in vertices.iter().copied() {
            if v >= in_cover.len() {
                return false;
            }
            in_cover[v] = true;
        }
        self.edges().all(|(u, v)| in_cover[u] || in_cover[v])
    }
}
