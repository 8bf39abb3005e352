pub use base_graph::{BaseGraph, WeightedGraph};
pub use vertex_weighted_graph::{GraphBuilder, VertexWeightedGraph, DEFAULT_WEIGHT};

mod base_graph;
mod vertex_weighted_graph;

pub type Weight = i64;
