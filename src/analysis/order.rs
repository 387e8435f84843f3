//! Topological ordering of a directed set graph.
//!
//! A thin reuse of the set and map primitives: repeatedly peel the vertices
//! with no incoming edge among the remaining edge set. Callers typically
//! run this over the component condensation produced by the SCC engine.

use crate::graph::DirectedSetGraph;
use crate::piecewise::set::PieceSet;
use crate::utils::errors::{SbgError, SbgResult};

/// Layered topological ordering engine.
#[derive(Debug, Clone)]
pub struct TopSort {
    graph: DirectedSetGraph,
}

impl TopSort {
    /// Create an engine over the given graph.
    pub fn new(graph: DirectedSetGraph) -> Self {
        Self { graph }
    }

    /// Compute the layers: each returned set depends only on earlier ones.
    /// Fails with `CyclicGraph` when the graph has a cycle.
    pub fn calculate(&self) -> SbgResult<Vec<PieceSet>> {
        let mut remaining = self.graph.v().clone();
        let mut map_b = self.graph.map_b().clone();
        let mut map_d = self.graph.map_d().clone();
        let mut layers = Vec::new();

        while !remaining.is_empty() {
            let with_preds = map_d.image();
            let layer = remaining.difference(&with_preds);
            if layer.is_empty() {
                return Err(SbgError::CyclicGraph);
            }
            log::debug!("layer {}: {}", layers.len(), layer);
            remaining = remaining.difference(&layer);
            let gone = map_b.pre_image_of(&layer)?;
            let keep = map_b.dom().difference(&gone);
            map_b = map_b.restrict(&keep)?;
            map_d = map_d.restrict(&keep)?;
            layers.push(layer);
        }
        Ok(layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piecewise::expr::{AffineExpr, AffineLaw};
    use crate::piecewise::interval::Interval;
    use crate::piecewise::piece::SetPiece;
    use crate::piecewise::pwmap::PWMap;

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
    fn test_diamond_layers() {
        let v = set1(&[(1, 1, 4)]);
        let g = graph(&v, &[(1, 2), (1, 3), (2, 4), (3, 4)]);
        let layers = TopSort::new(g).calculate().unwrap();
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0], set1(&[(1, 1, 1)]));
        assert_eq!(layers[1], set1(&[(2, 1, 3)]));
        assert_eq!(layers[2], set1(&[(4, 1, 4)]));
    }

    #[test]
    fn test_cycle_is_rejected() {
        let v = set1(&[(1, 1, 2)]);
        let g = graph(&v, &[(1, 2), (2, 1)]);
        assert_eq!(TopSort::new(g).calculate().unwrap_err(), SbgError::CyclicGraph);
    }
}
