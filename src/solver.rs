use crate::graph::WeightedGraph;
use crate::tree_decomposition::{
    InvalidStructure, TreeDecomposition, TreeDecompositionValidationError,
};
use crate::vertex_cover::{Solution, VertexCoverSolver};
#[cfg(feature = "log")]
use log::info;
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootSelection {
    /// Node with the largest bag, lowest id on ties.
    LargestBag,
    /// Node with the given name.
    Named(String),
}

impl Default for RootSelection {
    fn default() -> Self {
        Self::LargestBag
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    Invalid(TreeDecompositionValidationError),
    Structure(InvalidStructure),
    UnknownRoot(String),
}

impl Display for SolveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::Invalid(e) => write!(f, "Invalid Tree Decomposition: {}", e),
            SolveError::Structure(e) => write!(f, "Invalid Structure: {}", e),
            SolveError::UnknownRoot(name) => write!(f, "Unknown Root: {}", name),
        }
    }
}

impl Error for SolveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SolveError::Invalid(e) => Some(e),
            SolveError::Structure(e) => Some(e),
            SolveError::UnknownRoot(_) => None,
        }
    }
}

impl From<TreeDecompositionValidationError> for SolveError {
    fn from(e: TreeDecompositionValidationError) -> Self {
        SolveError::Invalid(e)
    }
}

impl From<InvalidStructure> for SolveError {
    fn from(e: InvalidStructure) -> Self {
        SolveError::Structure(e)
    }
}

/// Runs validation, rooting, nicification and the dynamic program in order.
#[derive(Debug, Clone)]
pub struct Solver {
    verify: bool,
    root: RootSelection,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            verify: true,
            root: RootSelection::default(),
        }
    }
}

impl Solver {
    impl_setter!(self, verify, bool);
    impl_setter!(self, root, RootSelection);

    /// Rewrites `td` into a rooted nice decomposition and returns a minimum
    /// weight vertex cover of `graph`. A decomposition that is already
    /// rooted keeps its root.
    pub fn solve<G: WeightedGraph>(
        &self,
        graph: &G,
        td: &mut TreeDecomposition,
    ) -> Result<Solution, SolveError> {
        #[cfg(feature = "log")]
        info!(
            "solving graph with {} vertices, decomposition with {} nodes and width {}",
            graph.order(),
            td.len(),
            td.treewidth()
        );
        if self.verify {
            td.verify(graph)?;
            #[cfg(feature = "log")]
            info!("decomposition is valid");
        }

        if !td.is_rooted() {
            match &self.root {
                RootSelection::LargestBag => td.root_tree()?,
                RootSelection::Named(name) => {
                    let id = td
                        .name_to_id(name)
                        .ok_or_else(|| SolveError::UnknownRoot(name.clone()))?;
                    td.root_tree_at(id)?
                }
            };
        }

        td.turn_into_nice_tree_decomposition()?;
        let solution = VertexCoverSolver::new(graph, td)?.solve()?;
        Ok(solution)
    }
}
