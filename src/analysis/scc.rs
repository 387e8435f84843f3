//! Strongly-connected components of a directed set graph.
//!
//! Each round computes a minimum-reachable representative map, keeps the
//! edges whose endpoints agree on it (the edge stays within its candidate
//! component), and confirms candidates with a reversed pass in which only
//! the self-representative pivots are left unoffset: a vertex is confirmed
//! exactly when it reaches its own pivot inside its candidate class, which
//! is mutual reachability. Confirmed classes retire, the edge direction
//! swaps, and the rounds repeat until nothing remains.

use crate::analysis::reach::min_reach;
use crate::graph::DirectedSetGraph;
use crate::piecewise::pwmap::PWMap;
use crate::utils::errors::SbgResult;

/// Iterative SCC engine.
#[derive(Debug, Clone)]
pub struct Scc {
    graph: DirectedSetGraph,
}

impl Scc {
    /// Create an engine over the given graph.
    pub fn new(graph: DirectedSetGraph) -> Self {
        Self { graph }
    }

    /// Compute the representative map: every vertex is sent to the
    /// lexicographically smallest member of its strongly connected
    /// component, so the preimage of each image point is one component.
    pub fn calculate(&self) -> SbgResult<PWMap> {
        let mut result = PWMap::empty();
        let mut remaining = self.graph.v().clone();
        let mut map_b = self.graph.map_b().clone();
        let mut map_d = self.graph.map_d().clone();

        while !remaining.is_empty() {
            let rmap = min_reach(&remaining, &map_b, &map_d, &remaining)?;

            // edges that stay within one representative class
            let tails = rmap.composition(&map_b)?;
            let heads = rmap.composition(&map_d)?;
            let intra = tails.equal_image(&heads);
            let ib = map_b.restrict(&intra)?;
            let id = map_d.restrict(&intra)?;

            // reversed pass: does each vertex reach its pivot inside the
            // class? Pivots are the vertices that represent themselves.
            let pivots = rmap.equal_image(&PWMap::identity(&remaining));
            let back = min_reach(&remaining, &id, &ib, &pivots)?;
            let confirmed = rmap.equal_image(&back);

            let found = rmap.restrict(&confirmed)?;
            log::debug!("confirmed components over {}", confirmed);
            result = result.concatenation(&found);

            remaining = remaining.difference(&confirmed);
            let gone = map_b
                .pre_image_of(&confirmed)?
                .cup(&map_d.pre_image_of(&confirmed)?);
            let keep = map_b.dom().difference(&gone);
            map_b = map_b.restrict(&keep)?;
            map_d = map_d.restrict(&keep)?;

            // swap edge direction between rounds
            std::mem::swap(&mut map_b, &mut map_d);
        }
        result.compacted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piecewise::expr::{AffineExpr, AffineLaw};
    use crate::piecewise::interval::Interval;
    use crate::piecewise::piece::SetPiece;
    use crate::piecewise::set::PieceSet;

    fn set1(ranges: &[(i64, i64, i64)]) -> PieceSet {
        PieceSet::new(
            ranges
                .iter()
                .map(|&(lo, step, hi)| SetPiece::from_interval(Interval::new(lo, step, hi)))
                .collect(),
        )
    }

    fn vertex_map(pairs: &[(i64, i64)]) -> PWMap {
        PWMap::new(
            pairs
                .iter()
                .map(|&(e, v)| {
                    (
                        set1(&[(e, 1, e)]),
                        AffineLaw::new(vec![AffineExpr::constant(v)]),
                    )
                })
                .collect(),
        )
        .unwrap()
    }

    fn graph(v: &PieceSet, arcs: &[(i64, i64)]) -> DirectedSetGraph {
        let e = set1(&[(1, 1, arcs.len() as i64)]);
        let map_b = vertex_map(
            &arcs
                .iter()
                .enumerate()
                .map(|(i, &(b, _))| (i as i64 + 1, b))
                .collect::<Vec<_>>(),
        );
        let map_d = vertex_map(
            &arcs
                .iter()
                .enumerate()
                .map(|(i, &(_, d))| (i as i64 + 1, d))
                .collect::<Vec<_>>(),
        );
        DirectedSetGraph::new(v.clone(), PWMap::identity(v), map_b, map_d, PWMap::identity(&e))
    }

    #[test]
    fn test_cycle_with_tail() {
        // 1 -> 2 -> 3 -> 1 and 3 -> 4
        let v = set1(&[(1, 1, 4)]);
        let g = graph(&v, &[(1, 2), (2, 3), (3, 1), (3, 4)]);
        let rmap = Scc::new(g).calculate().unwrap();
        for x in 1..=3 {
            assert_eq!(rmap.apply(&[x]), Some(vec![1]), "vertex {}", x);
        }
        assert_eq!(rmap.apply(&[4]), Some(vec![4]));
    }

    #[test]
    fn test_diamond_is_all_singletons() {
        // 1 -> 2, 1 -> 3, 2 -> 4, 3 -> 4: no cycles at all
        let v = set1(&[(1, 1, 4)]);
        let g = graph(&v, &[(1, 2), (1, 3), (2, 4), (3, 4)]);
        let rmap = Scc::new(g).calculate().unwrap();
        for x in 1..=4 {
            assert_eq!(rmap.apply(&[x]), Some(vec![x]), "vertex {}", x);
        }
    }

    #[test]
    fn test_two_components() {
        // 1 <-> 2 and 3 <-> 4, connected by 2 -> 3
        let v = set1(&[(1, 1, 4)]);
        let g = graph(&v, &[(1, 2), (2, 1), (3, 4), (4, 3), (2, 3)]);
        let rmap = Scc::new(g).calculate().unwrap();
        assert_eq!(rmap.apply(&[1]), Some(vec![1]));
        assert_eq!(rmap.apply(&[2]), Some(vec![1]));
        assert_eq!(rmap.apply(&[3]), Some(vec![3]));
        assert_eq!(rmap.apply(&[4]), Some(vec![3]));
    }
}
