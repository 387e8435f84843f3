//! Compact set-based graphs.
//!
//! A graph here is pure data: a vertex [`PieceSet`] plus incidence
//! [`PWMap`]s from an edge index set to endpoint vertices, with structural
//! bookkeeping maps (`vmap`, `emap`) recording which original vertex or
//! edge array a compact element belongs to. All graph algorithms are
//! expressed through the `piecewise` operations applied to these fields.

use crate::piecewise::pwmap::PWMap;
use crate::piecewise::set::PieceSet;
use crate::utils::errors::SbgResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An undirected bipartite set graph: `map1` and `map2` send each edge
/// index to its two endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetGraph {
    v: PieceSet,
    vmap: PWMap,
    map1: PWMap,
    map2: PWMap,
    emap: PWMap,
}

/// A directed set graph: following an edge forward leads from `map_b` to
/// `map_d`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectedSetGraph {
    v: PieceSet,
    vmap: PWMap,
    map_b: PWMap,
    map_d: PWMap,
    emap: PWMap,
}

fn check_incidence(v: &PieceSet, left: &PWMap, right: &PWMap, emap: &PWMap) {
    let e = left.dom();
    assert!(
        e == right.dom() && e == emap.dom(),
        "incidence maps and emap must share the edge index set"
    );
    assert!(
        left.image().is_subset(v) && right.image().is_subset(v),
        "edge endpoints must lie in the vertex set"
    );
}

impl SetGraph {
    /// Create a graph. The incidence maps and `emap` must share the edge
    /// index set and the endpoints must lie in `v`; violating either is a
    /// programming error and panics.
    pub fn new(v: PieceSet, vmap: PWMap, map1: PWMap, map2: PWMap, emap: PWMap) -> Self {
        check_incidence(&v, &map1, &map2, &emap);
        Self { v, vmap, map1, map2, emap }
    }

    /// Vertex set.
    pub fn v(&self) -> &PieceSet {
        &self.v
    }

    /// Vertex to structural group map.
    pub fn vmap(&self) -> &PWMap {
        &self.vmap
    }

    /// Edge index to first endpoint.
    pub fn map1(&self) -> &PWMap {
        &self.map1
    }

    /// Edge index to second endpoint.
    pub fn map2(&self) -> &PWMap {
        &self.map2
    }

    /// Edge to structural group map.
    pub fn emap(&self) -> &PWMap {
        &self.emap
    }

    /// Edge index set.
    pub fn edges(&self) -> PieceSet {
        self.map1.dom()
    }

    /// Remove `victims` and every edge touching them.
    pub fn erase_vertices(&self, victims: &PieceSet) -> SbgResult<SetGraph> {
        let gone = self
            .map1
            .pre_image_of(victims)?
            .cup(&self.map2.pre_image_of(victims)?);
        let keep = self.edges().difference(&gone);
        let v = self.v.difference(victims);
        Ok(SetGraph {
            vmap: self.vmap.restrict(&v)?,
            v,
            map1: self.map1.restrict(&keep)?,
            map2: self.map2.restrict(&keep)?,
            emap: self.emap.restrict(&keep)?,
        })
    }

    /// Partition the edge index set by structural group: one sub-set per
    /// `emap` entry.
    pub fn sub_e_map(&self) -> Vec<PieceSet> {
        self.emap.entries().iter().map(|e| e.dom().clone()).collect()
    }
}

impl DirectedSetGraph {
    /// Create a directed graph with the same validation as [`SetGraph`].
    pub fn new(v: PieceSet, vmap: PWMap, map_b: PWMap, map_d: PWMap, emap: PWMap) -> Self {
        check_incidence(&v, &map_b, &map_d, &emap);
        Self { v, vmap, map_b, map_d, emap }
    }

    /// Vertex set.
    pub fn v(&self) -> &PieceSet {
        &self.v
    }

    /// Vertex to structural group map.
    pub fn vmap(&self) -> &PWMap {
        &self.vmap
    }

    /// Edge index to tail vertex.
    pub fn map_b(&self) -> &PWMap {
        &self.map_b
    }

    /// Edge index to head vertex.
    pub fn map_d(&self) -> &PWMap {
        &self.map_d
    }

    /// Edge to structural group map.
    pub fn emap(&self) -> &PWMap {
        &self.emap
    }

    /// Edge index set.
    pub fn edges(&self) -> PieceSet {
        self.map_b.dom()
    }

    /// The same graph with every edge reversed.
    pub fn reversed(&self) -> DirectedSetGraph {
        DirectedSetGraph {
            v: self.v.clone(),
            vmap: self.vmap.clone(),
            map_b: self.map_d.clone(),
            map_d: self.map_b.clone(),
            emap: self.emap.clone(),
        }
    }

    /// Remove `victims` and every edge touching them.
    pub fn erase_vertices(&self, victims: &PieceSet) -> SbgResult<DirectedSetGraph> {
        let gone = self
            .map_b
            .pre_image_of(victims)?
            .cup(&self.map_d.pre_image_of(victims)?);
        let keep = self.edges().difference(&gone);
        let v = self.v.difference(victims);
        Ok(DirectedSetGraph {
            vmap: self.vmap.restrict(&v)?,
            v,
            map_b: self.map_b.restrict(&keep)?,
            map_d: self.map_d.restrict(&keep)?,
            emap: self.emap.restrict(&keep)?,
        })
    }

    /// Partition the edge index set by structural group.
    pub fn sub_e_map(&self) -> Vec<PieceSet> {
        self.emap.entries().iter().map(|e| e.dom().clone()).collect()
    }
}

impl fmt::Display for SetGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "V = {}, map1 = {}, map2 = {}",
            self.v, self.map1, self.map2
        )
    }
}

impl fmt::Display for DirectedSetGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "V = {}, mapB = {}, mapD = {}",
            self.v, self.map_b, self.map_d
        )
    }
}
