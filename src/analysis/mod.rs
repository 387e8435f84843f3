//! Graph analyses over the compact representation.

pub mod reach;
pub mod matching;
pub mod scc;
pub mod order;

pub use matching::{MatchInfo, Matching};
pub use order::TopSort;
pub use reach::min_reach;
pub use scc::Scc;

use crate::graph::{DirectedSetGraph, SetGraph};
use crate::piecewise::pwmap::PWMap;
use crate::piecewise::set::PieceSet;
use crate::utils::errors::SbgResult;

/// Compute a maximum matching of a bipartite set graph.
pub fn maximum_matching(graph: SetGraph) -> SbgResult<MatchInfo> {
    Matching::new(graph).calculate()
}

/// Compute the strongly-connected-component representative map.
pub fn strongly_connected_components(graph: DirectedSetGraph) -> SbgResult<PWMap> {
    Scc::new(graph).calculate()
}

/// Compute the topological layering of an acyclic directed set graph.
pub fn topological_layers(graph: DirectedSetGraph) -> SbgResult<Vec<PieceSet>> {
    TopSort::new(graph).calculate()
}
