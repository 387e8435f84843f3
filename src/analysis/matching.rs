//! Maximum matching over a bipartite set graph.
//!
//! The engine alternates searching and augmenting: each iteration builds
//! forward and backward representative maps over the alternating
//! orientation of the graph, extracts a set of vertex-disjoint augmenting
//! paths from the edges on which both directions agree, and flips the
//! matched status of every edge on those paths. It terminates when the
//! unknown side is fully matched or no augmenting path remains.
//!
//! "Minimal" always means the lexicographically smallest index; this
//! determines which of several equally valid matchings is produced.

use crate::analysis::reach::min_reach;
use crate::graph::SetGraph;
use crate::piecewise::pwmap::PWMap;
use crate::piecewise::set::PieceSet;
use crate::utils::errors::SbgResult;
use serde::{Deserialize, Serialize};

/// Result of a matching run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchInfo {
    /// The matched edge index set.
    pub matched_edges: PieceSet,
    /// Whether every vertex on the `map2` side is covered.
    pub fully_matched: bool,
}

/// Iterative matching engine. The graph's two endpoint maps partition the
/// vertices into equations (`map1` image) and unknowns (`map2` image); the
/// two images must be disjoint.
#[derive(Debug, Clone)]
pub struct Matching {
    graph: SetGraph,
    matched_e: PieceSet,
}

impl Matching {
    /// Create an engine with an empty initial matching.
    pub fn new(graph: SetGraph) -> Self {
        Self { graph, matched_e: PieceSet::empty() }
    }

    /// Run the engine to completion.
    pub fn calculate(&mut self) -> SbgResult<MatchInfo> {
        let unknowns = self.graph.map2().image();
        loop {
            let paths = self.min_reachable_step()?;
            if paths.is_empty() {
                break;
            }
            self.update_paths(&paths);
            log::debug!(
                "augmented along {}, matching now {}",
                paths,
                self.matched_e
            );
            let matched_u = self.graph.map2().image_of(&self.matched_e)?;
            if matched_u == unknowns {
                break;
            }
        }
        let matched_u = self.graph.map2().image_of(&self.matched_e)?;
        Ok(MatchInfo {
            matched_edges: self.matched_e.clone(),
            fully_matched: matched_u == unknowns,
        })
    }

    /// Flip the matched status of every path edge: the symmetric difference
    /// augments each discovered alternating path.
    fn update_paths(&mut self, paths: &PieceSet) {
        let kept = self.matched_e.difference(paths);
        let gained = paths.difference(&self.matched_e);
        self.matched_e = kept.concatenation(&gained);
    }

    /// One search pass: returns the edges of a set of vertex-disjoint
    /// augmenting paths, or the empty set when none exists.
    fn min_reachable_step(&self) -> SbgResult<PieceSet> {
        let g = &self.graph;
        let edges = g.edges();
        let unmatched_e = edges.difference(&self.matched_e);

        let eq_side = g.map1().image();
        let unk_side = g.map2().image();
        let matched_f = g.map1().image_of(&self.matched_e)?;
        let matched_u = g.map2().image_of(&self.matched_e)?;
        let unm_f = eq_side.difference(&matched_f);
        let unm_u = unk_side.difference(&matched_u);
        if unm_f.is_empty() || unm_u.is_empty() {
            return Ok(PieceSet::empty());
        }

        // alternating orientation: unmatched edges run equation -> unknown,
        // matched edges run back
        let map_b = g
            .map1()
            .restrict(&unmatched_e)?
            .concatenation(&g.map2().restrict(&self.matched_e)?);
        let map_d = g
            .map2()
            .restrict(&unmatched_e)?
            .concatenation(&g.map1().restrict(&self.matched_e)?);

        let v = g.v();
        let rmap_f = min_reach(v, &map_b, &map_d, &unm_f)?;
        let rmap_b = min_reach(v, &map_d, &map_b, &unm_u)?;

        // candidate edges: both endpoints agree on both representatives,
        // the forward one an unmatched equation, the backward one an
        // unmatched unknown
        let tail_f = rmap_f.composition(&map_b)?;
        let head_f = rmap_f.composition(&map_d)?;
        let tail_b = rmap_b.composition(&map_b)?;
        let head_b = rmap_b.composition(&map_d)?;
        let same_rep = tail_f
            .equal_image(&head_f)
            .intersection(&tail_b.equal_image(&head_b));
        let from_f = head_f.pre_image_of(&unm_f)?;
        let to_u = tail_b.pre_image_of(&unm_u)?;
        let cand = same_rep.intersection(&from_f).intersection(&to_u);
        if cand.is_empty() {
            return Ok(PieceSet::empty());
        }
        log::debug!("candidate path edges {}", cand);

        // one chosen successor per tail, then one chosen predecessor per
        // head, so the surviving edges form vertex-disjoint chains
        let mb = map_b.restrict(&cand)?;
        let md = map_d.restrict(&cand)?;
        let psmap = mb.min_adj_map(&md)?;
        let chosen = psmap.composition(&mb)?.equal_image(&md);
        let mb = mb.restrict(&chosen)?;
        let md = md.restrict(&chosen)?;
        let ppmap = md.min_adj_map(&mb)?;
        let chosen = ppmap.composition(&md)?.equal_image(&mb);
        let mb = mb.restrict(&chosen)?;
        let md = md.restrict(&chosen)?;

        // parallel edges share both endpoints and survive the vertex-level
        // choices together; keep the smallest edge index per tail
        let pick = mb.min_inv(&mb.image())?;
        let chosen = pick.composition(&mb)?.equal_image(&PWMap::identity(&mb.dom()));
        let mb = mb.restrict(&chosen)?;
        let md = md.restrict(&chosen)?;

        // completeness: keep chains that start at an unmatched equation and
        // end at an unmatched unknown. Edges used to close an alternating
        // cycle can reach neither endpoint through the chosen maps, which
        // keeps one pass from looping around such a cycle forever.
        let rf = min_reach(v, &mb, &md, &unm_f)?;
        let rb = min_reach(v, &md, &mb, &unm_u)?;
        let starts_ok = rf.composition(&mb)?.pre_image_of(&unm_f)?;
        let ends_ok = rb.composition(&md)?.pre_image_of(&unm_u)?;
        Ok(starts_ok.intersection(&ends_ok))
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

    #[test]
    fn test_single_edge() {
        let v = set1(&[(1, 1, 2)]);
        let e = set1(&[(1, 1, 1)]);
        let g = SetGraph::new(
            v.clone(),
            PWMap::identity(&v),
            vertex_map(&[(1, 1)]),
            vertex_map(&[(1, 2)]),
            PWMap::identity(&e),
        );
        let info = Matching::new(g).calculate().unwrap();
        assert!(info.fully_matched);
        assert_eq!(info.matched_edges, e);
    }

    #[test]
    fn test_requires_augmentation() {
        // equations {1,2}, unknowns {3,4}, edges 1: 1-3, 2: 1-4, 3: 2-3.
        // Greedy 1-3 must be undone in favour of 1-4 and 2-3.
        let v = set1(&[(1, 1, 4)]);
        let e = set1(&[(1, 1, 3)]);
        let g = SetGraph::new(
            v.clone(),
            PWMap::identity(&v),
            vertex_map(&[(1, 1), (2, 1), (3, 2)]),
            vertex_map(&[(1, 3), (2, 4), (3, 3)]),
            PWMap::identity(&e),
        );
        let info = Matching::new(g).calculate().unwrap();
        assert!(info.fully_matched);
        assert_eq!(info.matched_edges.cardinal(), 2);
        assert_eq!(info.matched_edges, set1(&[(2, 1, 3)]));
    }

    #[test]
    fn test_parallel_edges_collapse() {
        // edges 1 and 2 both join vertex 1 to vertex 2; only one may match
        let v = set1(&[(1, 1, 2)]);
        let e = set1(&[(1, 1, 2)]);
        let g = SetGraph::new(
            v.clone(),
            PWMap::identity(&v),
            vertex_map(&[(1, 1), (2, 1)]),
            vertex_map(&[(1, 2), (2, 2)]),
            PWMap::identity(&e),
        );
        let info = Matching::new(g).calculate().unwrap();
        assert!(info.fully_matched);
        assert_eq!(info.matched_edges, set1(&[(1, 1, 1)]));
    }

    #[test]
    fn test_deficient_side_reports_partial() {
        // one equation, two unknowns reachable only through it
        let v = set1(&[(1, 1, 3)]);
        let e = set1(&[(1, 1, 2)]);
        let g = SetGraph::new(
            v.clone(),
            PWMap::identity(&v),
            vertex_map(&[(1, 1), (2, 1)]),
            vertex_map(&[(1, 2), (2, 3)]),
            PWMap::identity(&e),
        );
        let info = Matching::new(g).calculate().unwrap();
        assert!(!info.fully_matched);
        assert_eq!(info.matched_edges.cardinal(), 1);
    }
}
