#[macro_use]
mod util;

pub(crate) mod datastructures;

pub mod graph;
pub mod io;
#[cfg(feature = "logging")]
pub mod log;
pub mod solver;
pub mod tree_decomposition;
pub mod vertex_cover;

#[cfg(test)]
mod test_support;

pub use solver::{RootSelection, SolveError, Solver};
pub use vertex_cover::{Solution, VertexCoverSolver};
