//! Piecewise affine maps.
//!
//! A [`PWMap`] is an ordered collection of disjoint (domain, law) entries
//! forming one possibly-partial piecewise-affine map. This is the only map
//! representation the graph layer sees; every graph algorithm in the crate
//! is a sequence of the operations below.

use crate::piecewise::expr::{AffineExpr, AffineLaw};
use crate::piecewise::interval::Interval;
use crate::piecewise::map::{pre_image_piece, PieceMap};
use crate::piecewise::piece::SetPiece;
use crate::piecewise::set::PieceSet;
use crate::utils::errors::{SbgError, SbgResult};
use num_rational::Rational64;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One (domain, law) entry of a piecewise map. The cached image is rebuilt
/// whenever an entry is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapEntry {
    dom: PieceSet,
    law: AffineLaw,
    img: PieceSet,
}

impl MapEntry {
    /// The entry's domain.
    pub fn dom(&self) -> &PieceSet {
        &self.dom
    }

    /// The entry's law.
    pub fn law(&self) -> &AffineLaw {
        &self.law
    }

    /// The entry's image.
    pub fn img(&self) -> &PieceSet {
        &self.img
    }
}

/// A piecewise affine partial function with pairwise-disjoint entry
/// domains. Disjointness of caller-supplied entries is an unchecked
/// invariant, as with [`PieceSet`] pieces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PWMap {
    entries: Vec<MapEntry>,
}

impl PWMap {
    /// Build a map from (domain, law) pairs. Empty domains are dropped.
    /// Fails with `DimensionMismatch` on arity disagreement and
    /// `NonIntegralMap` when a law leaves the integral strides of its
    /// domain.
    pub fn new(pairs: Vec<(PieceSet, AffineLaw)>) -> SbgResult<Self> {
        let mut entries = Vec::with_capacity(pairs.len());
        for (dom, law) in pairs {
            if let Some(entry) = MapEntry::build(dom, law)? {
                entries.push(entry);
            }
        }
        Ok(Self { entries })
    }

    /// The empty map.
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// The identity map over `s`.
    pub fn identity(s: &PieceSet) -> Self {
        match s.dims() {
            None => Self::empty(),
            Some(d) => Self {
                entries: vec![MapEntry {
                    dom: s.clone(),
                    law: AffineLaw::identity(d),
                    img: s.clone(),
                }],
            },
        }
    }

    /// Build a map from atomic piece maps, one entry each.
    pub fn from_piece_maps(maps: Vec<PieceMap>) -> SbgResult<Self> {
        Self::new(
            maps.into_iter()
                .map(|m| (PieceSet::from_piece(m.domain().clone()), m.law().clone()))
                .collect(),
        )
    }

    /// The entries, in storage order.
    pub fn entries(&self) -> &[MapEntry] {
        &self.entries
    }

    /// Arity; `None` for the empty map.
    pub fn dims(&self) -> Option<usize> {
        self.entries.first().map(|e| e.law.dims())
    }

    /// Check for an empty map.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Union of the entry domains.
    pub fn dom(&self) -> PieceSet {
        self.entries
            .iter()
            .fold(PieceSet::empty(), |acc, e| acc.concatenation(&e.dom))
    }

    /// Union of the entry images.
    pub fn image(&self) -> PieceSet {
        self.entries
            .iter()
            .fold(PieceSet::empty(), |acc, e| acc.cup(&e.img))
    }

    /// Image of the restriction to `s`.
    pub fn image_of(&self, s: &PieceSet) -> SbgResult<PieceSet> {
        let mut acc = PieceSet::empty();
        for e in &self.entries {
            let d = e.dom.intersection(s);
            for p in d.pieces() {
                acc = acc.cup(&PieceSet::from_piece(e.law.image_of(p)?));
            }
        }
        Ok(acc)
    }

    /// Preimage of `s`: every domain point whose image lands in `s`.
    pub fn pre_image_of(&self, s: &PieceSet) -> SbgResult<PieceSet> {
        let mut out = Vec::new();
        for e in &self.entries {
            for p in e.dom.pieces() {
                for t in s.pieces() {
                    let q = pre_image_piece(p, &e.law, t)?;
                    if !q.is_empty() {
                        out.push(q);
                    }
                }
            }
        }
        Ok(PieceSet::new(out))
    }

    /// Evaluate at a point of the domain.
    pub fn apply(&self, point: &[i64]) -> Option<Vec<i64>> {
        self.entries
            .iter()
            .find(|e| e.dom.contains(point))
            .and_then(|e| e.law.apply(point))
    }

    /// Composition `self ∘ inner`: defined where `inner` lands in the
    /// domain of `self`.
    pub fn composition(&self, inner: &PWMap) -> SbgResult<PWMap> {
        let mut pairs = Vec::new();
        for fe in &self.entries {
            for ge in &inner.entries {
                let mut pieces = Vec::new();
                for p in ge.dom.pieces() {
                    for t in fe.dom.pieces() {
                        let q = pre_image_piece(p, &ge.law, t)?;
                        if !q.is_empty() {
                            pieces.push(q);
                        }
                    }
                }
                if !pieces.is_empty() {
                    pairs.push((PieceSet::new(pieces), fe.law.compose(&ge.law)));
                }
            }
        }
        Self::new(pairs)
    }

    /// Restriction to `subdom`.
    pub fn restrict(&self, subdom: &PieceSet) -> SbgResult<PWMap> {
        Self::new(
            self.entries
                .iter()
                .map(|e| (e.dom.intersection(subdom), e.law.clone()))
                .collect(),
        )
    }

    /// Override-wins union: where domains overlap, `self` wins.
    pub fn combine(&self, other: &PWMap) -> SbgResult<PWMap> {
        let mine = self.dom();
        let mut pairs: Vec<(PieceSet, AffineLaw)> = self
            .entries
            .iter()
            .map(|e| (e.dom.clone(), e.law.clone()))
            .collect();
        for e in &other.entries {
            pairs.push((e.dom.difference(&mine), e.law.clone()));
        }
        Self::new(pairs)
    }

    /// Union of maps with a priori disjoint domains. Skips the overlap
    /// removal of [`PWMap::combine`]; calling it on overlapping domains
    /// produces a value that violates the entry-disjointness invariant, with
    /// meaningless results from then on. No check is performed.
    pub fn concatenation(&self, other: &PWMap) -> PWMap {
        let mut entries = self.entries.clone();
        entries.extend_from_slice(&other.entries);
        Self { entries }
    }

    /// Keep only the entries satisfying the predicate.
    pub fn filter_entries<F>(&self, pred: F) -> PWMap
    where
        F: Fn(&PieceSet, &AffineLaw) -> bool,
    {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|e| pred(&e.dom, &e.law))
                .cloned()
                .collect(),
        }
    }

    /// Shift every image by `delta`.
    pub fn offset_image(&self, delta: &[i64]) -> SbgResult<PWMap> {
        Self::new(
            self.entries
                .iter()
                .map(|e| (e.dom.clone(), e.law.offset_image(delta)))
                .collect(),
        )
    }

    /// Shift every domain by `delta`, keeping images unchanged.
    pub fn offset_dom(&self, delta: &[i64]) -> SbgResult<PWMap> {
        Self::new(
            self.entries
                .iter()
                .map(|e| {
                    let dom = PieceSet::new(
                        e.dom.pieces().iter().map(|p| p.offset(delta)).collect(),
                    );
                    (dom, e.law.shift_dom(delta))
                })
                .collect(),
        )
    }

    /// Strict inverse. Fails with `UndefinedInverse` unless the map is
    /// injective: constant axes must be pinned to singletons and entry
    /// images must not collide.
    pub fn inverse(&self) -> SbgResult<PWMap> {
        let mut pairs: Vec<(SetPiece, AffineLaw)> = Vec::new();
        for e in &self.entries {
            for p in e.dom.pieces() {
                let img = e.law.image_of(p)?;
                let mut exprs = Vec::with_capacity(e.law.dims());
                for (expr, iv) in e.law.exprs().iter().zip(p.intervals()) {
                    if expr.is_constant() {
                        if iv.cardinal() > 1 {
                            return Err(SbgError::UndefinedInverse);
                        }
                        let back = iv.min_elem().ok_or(SbgError::UndefinedInverse)?;
                        exprs.push(AffineExpr::constant(back));
                    } else {
                        exprs.push(expr.inverse()?);
                    }
                }
                pairs.push((img, AffineLaw::new(exprs)));
            }
        }
        for (i, (a, _)) in pairs.iter().enumerate() {
            for (b, _) in &pairs[i + 1..] {
                if !a.intersection(b).is_empty() {
                    return Err(SbgError::UndefinedInverse);
                }
            }
        }
        Self::new(
            pairs
                .into_iter()
                .map(|(p, l)| (PieceSet::from_piece(p), l))
                .collect(),
        )
    }

    /// Minimum inverse restricted to `target`: maps each image point in
    /// `target` to the lexicographically smallest preimage point.
    pub fn min_inv(&self, target: &PieceSet) -> SbgResult<PWMap> {
        let mut acc: Vec<(PieceSet, AffineLaw)> = Vec::new();
        for e in &self.entries {
            for p in e.dom.pieces() {
                let img = e.law.image_of(p)?;
                for tp in target.pieces() {
                    let t = img.intersection(tp);
                    if t.is_empty() {
                        continue;
                    }
                    let q = pre_image_piece(p, &e.law, &t)?;
                    let mut exprs = Vec::with_capacity(e.law.dims());
                    for (expr, iv) in e.law.exprs().iter().zip(q.intervals()) {
                        if expr.is_constant() {
                            let back = iv.min_elem().ok_or(SbgError::UndefinedInverse)?;
                            exprs.push(AffineExpr::constant(back));
                        } else {
                            exprs.push(expr.inverse()?);
                        }
                    }
                    acc = merge_min(acc, PieceSet::from_piece(t), AffineLaw::new(exprs));
                }
            }
        }
        Self::new(acc)
    }

    /// Fiber-wise minimum: `self` is the key map, `val` the value map, both
    /// over a shared domain. The result maps each point `v` of the key
    /// image to the lexicographically smallest value `val` takes on the
    /// key's fiber at `v`. This is the canonical-successor workhorse of the
    /// matching and SCC engines.
    pub fn min_adj_map(&self, val: &PWMap) -> SbgResult<PWMap> {
        let mut acc: Vec<(PieceSet, AffineLaw)> = Vec::new();
        for ke in &self.entries {
            for ve in &val.entries {
                let common = ke.dom.intersection(&ve.dom);
                for p in common.pieces() {
                    let mut intervals = Vec::with_capacity(p.dims());
                    let mut exprs = Vec::with_capacity(p.dims());
                    for ((kx, vx), piv) in ke
                        .law
                        .exprs()
                        .iter()
                        .zip(ve.law.exprs())
                        .zip(p.intervals())
                    {
                        let img_iv = kx.image_of(piv)?;
                        intervals.push(img_iv);
                        if kx.is_constant() {
                            // the fiber spans this whole axis; take the
                            // extreme the value law minimizes at
                            let at = if vx.slope.is_negative() {
                                piv.max_elem()
                            } else {
                                piv.min_elem()
                            };
                            let at = at.ok_or(SbgError::EmptyOperation { op: "min_adj_map" })?;
                            let m = vx.apply_int(at).ok_or(SbgError::NonIntegralMap)?;
                            exprs.push(AffineExpr::constant(m));
                        } else {
                            exprs.push(vx.compose(&kx.inverse()?));
                        }
                    }
                    acc = merge_min(
                        acc,
                        PieceSet::from_piece(SetPiece::new(intervals)),
                        AffineLaw::new(exprs),
                    );
                }
            }
        }
        Self::new(acc)
    }

    /// Pointwise lexicographic minimum. On the common domain the smaller
    /// image wins, with exact splitting at law crossovers; entries outside
    /// the common domain pass through unchanged.
    pub fn min_map(&self, other: &PWMap) -> SbgResult<PWMap> {
        let mut acc: Vec<(PieceSet, AffineLaw)> = self
            .entries
            .iter()
            .map(|e| (e.dom.clone(), e.law.clone()))
            .collect();
        for e in &other.entries {
            acc = merge_min(acc, e.dom.clone(), e.law.clone());
        }
        Self::new(acc)
    }

    /// Repeated self-composition to a fixed point: the map-algebra
    /// equivalent of transitive closure. Precondition: the map sends every
    /// point to a point no greater than itself (lexicographically), which
    /// every caller in the crate establishes; termination follows from that
    /// monotonicity.
    pub fn map_inf(&self) -> SbgResult<PWMap> {
        let mut m = self.compacted()?;
        loop {
            let next = m.composition(&m)?.compacted()?;
            if next == m {
                return Ok(m);
            }
            log::trace!("map_inf step: {} entries", next.entries.len());
            m = next;
        }
    }

    /// Sub-domain on which the two maps take equal values, solved exactly
    /// axis by axis.
    pub fn equal_image(&self, other: &PWMap) -> PieceSet {
        let mut out = Vec::new();
        for e1 in &self.entries {
            for e2 in &other.entries {
                let common = e1.dom.intersection(&e2.dom);
                for p in common.pieces() {
                    if let Some(q) = equal_region(p, &e1.law, &e2.law) {
                        out.push(q);
                    }
                }
            }
        }
        PieceSet::new(out)
    }

    /// Check if the map is a no-op: identity laws everywhere, or image
    /// equal to domain.
    pub fn is_id(&self) -> bool {
        self.entries.iter().all(|e| e.law.is_identity()) || self.image() == self.dom()
    }

    /// Merge entries sharing a law and compact their domains. Semantics are
    /// unchanged; representations stay small across iterative algorithms.
    pub fn compacted(&self) -> SbgResult<PWMap> {
        let mut groups: Vec<(AffineLaw, PieceSet)> = Vec::new();
        for e in &self.entries {
            match groups.iter_mut().find(|(l, _)| *l == e.law) {
                Some((_, d)) => *d = d.cup(&e.dom),
                None => groups.push((e.law.clone(), e.dom.clone())),
            }
        }
        Self::new(
            groups
                .into_iter()
                .map(|(l, d)| (d.compact(), l))
                .collect(),
        )
    }
}

impl MapEntry {
    fn build(dom: PieceSet, law: AffineLaw) -> SbgResult<Option<MapEntry>> {
        if dom.is_empty() {
            return Ok(None);
        }
        if dom.dims() != Some(law.dims()) {
            return Err(SbgError::DimensionMismatch {
                left: dom.dims().unwrap_or(0),
                right: law.dims(),
            });
        }
        let mut img = PieceSet::empty();
        for p in dom.pieces() {
            img = img.cup(&PieceSet::from_piece(law.image_of(p)?));
        }
        Ok(Some(MapEntry { dom, law, img }))
    }
}

/// Fold a new (domain, law) pair into disjoint accumulated entries, keeping
/// the pointwise lexicographically smaller value wherever domains overlap.
/// Ties keep the accumulated side.
fn merge_min(
    acc: Vec<(PieceSet, AffineLaw)>,
    new_dom: PieceSet,
    new_law: AffineLaw,
) -> Vec<(PieceSet, AffineLaw)> {
    let mut out = Vec::new();
    let mut rest = new_dom;
    for (d, l) in acc {
        let ov = d.intersection(&rest);
        if ov.is_empty() {
            out.push((d, l));
            continue;
        }
        let keep = d.difference(&ov);
        if !keep.is_empty() {
            out.push((keep, l.clone()));
        }
        let (first, second) = lex_split(&ov, &l, &new_law, 0);
        if !first.is_empty() {
            out.push((first, l));
        }
        if !second.is_empty() {
            out.push((second, new_law.clone()));
        }
        rest = rest.difference(&ov);
    }
    if !rest.is_empty() {
        out.push((rest, new_law));
    }
    out
}

/// Split `dom` into the region where `f(x) <= g(x)` lexicographically and
/// the region where `g(x) < f(x)`, recursing across axes on ties.
fn lex_split(dom: &PieceSet, f: &AffineLaw, g: &AffineLaw, axis: usize) -> (PieceSet, PieceSet) {
    if dom.is_empty() {
        return (PieceSet::empty(), PieceSet::empty());
    }
    if axis == f.dims() {
        // equal on every axis: ties go to f
        return (dom.clone(), PieceSet::empty());
    }
    let fa = &f.exprs()[axis];
    let ga = &g.exprs()[axis];
    if fa == ga {
        return lex_split(dom, f, g, axis + 1);
    }
    let da = fa.slope - ga.slope;
    let db = ga.offset - fa.offset;
    if da.is_zero() {
        // slopes agree, offsets differ: one side dominates everywhere
        return if db.is_positive() {
            (dom.clone(), PieceSet::empty())
        } else {
            (PieceSet::empty(), dom.clone())
        };
    }
    // f(x) < g(x) on this axis iff da * x < db
    let t = db / da;
    let (below, at, above) = split_dom_at(dom, axis, t);
    let (f_side, g_side) = if da.is_positive() {
        (below, above)
    } else {
        (above, below)
    };
    let (f_eq, g_eq) = lex_split(&at, f, g, axis + 1);
    (f_side.concatenation(&f_eq), g_side.concatenation(&g_eq))
}

/// Partition `dom` along one axis into points below, exactly at, and above
/// the rational threshold `t`.
fn split_dom_at(dom: &PieceSet, axis: usize, t: Rational64) -> (PieceSet, PieceSet, PieceSet) {
    let mut below = Vec::new();
    let mut at = Vec::new();
    let mut above = Vec::new();
    for p in dom.pieces() {
        let iv = &p.intervals()[axis];
        let (b, a, u) = split_interval_at(iv, t);
        if !b.is_empty() {
            below.push(replace_axis(p, axis, b));
        }
        if let Some(x) = a {
            at.push(replace_axis(p, axis, Interval::singleton(x)));
        }
        if !u.is_empty() {
            above.push(replace_axis(p, axis, u));
        }
    }
    (PieceSet::new(below), PieceSet::new(at), PieceSet::new(above))
}

fn replace_axis(p: &SetPiece, axis: usize, iv: Interval) -> SetPiece {
    let mut intervals = p.intervals().to_vec();
    intervals[axis] = iv;
    SetPiece::new(intervals)
}

fn split_interval_at(iv: &Interval, t: Rational64) -> (Interval, Option<i64>, Interval) {
    let (Some(lo), Some(step), Some(hi)) = (iv.min_elem(), iv.step(), iv.max_elem()) else {
        return (Interval::Empty, None, Interval::Empty);
    };
    let t_int = t.is_integer().then(|| t.to_integer());
    let ub = match t_int {
        Some(ti) => ti - 1,
        None => t.floor().to_integer(),
    };
    let below = if ub < lo {
        Interval::Empty
    } else {
        Interval::new(lo, step, hi.min(ub))
    };
    let at = t_int.filter(|&ti| iv.contains(ti));
    let lb = match t_int {
        Some(ti) => ti + 1,
        None => t.ceil().to_integer(),
    };
    let above = match iv.next_elem(lb - 1) {
        Some(first) => Interval::new(first, step, hi),
        None => Interval::Empty,
    };
    (below, at, above)
}

/// Sub-piece of `p` on which `f` and `g` agree, or `None` when they agree
/// nowhere on `p`.
fn equal_region(p: &SetPiece, f: &AffineLaw, g: &AffineLaw) -> Option<SetPiece> {
    let mut intervals = Vec::with_capacity(p.dims());
    for ((fa, ga), iv) in f.exprs().iter().zip(g.exprs()).zip(p.intervals()) {
        if fa == ga {
            intervals.push(*iv);
            continue;
        }
        let da = fa.slope - ga.slope;
        let db = ga.offset - fa.offset;
        if da.is_zero() {
            return None;
        }
        let t = db / da;
        if !t.is_integer() {
            return None;
        }
        let x = t.to_integer();
        if !iv.contains(x) {
            return None;
        }
        intervals.push(Interval::singleton(x));
    }
    Some(SetPiece::new(intervals))
}

/// Equality is agreement as partial functions: equal domains and equal
/// values everywhere on them.
impl PartialEq for PWMap {
    fn eq(&self, other: &Self) -> bool {
        let d = self.dom();
        if d != other.dom() {
            return false;
        }
        self.equal_image(other) == d
    }
}

impl Eq for PWMap {}

impl fmt::Display for PWMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, e) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} -> {}", e.dom, e.law)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set1(ranges: &[(i64, i64, i64)]) -> PieceSet {
        PieceSet::new(
            ranges
                .iter()
                .map(|&(lo, step, hi)| SetPiece::from_interval(Interval::new(lo, step, hi)))
                .collect(),
        )
    }

    fn law1(slope: i64, offset: i64) -> AffineLaw {
        AffineLaw::new(vec![AffineExpr::with_ints(slope, offset)])
    }

    fn map1(pairs: &[((i64, i64, i64), (i64, i64))]) -> PWMap {
        PWMap::new(
            pairs
                .iter()
                .map(|&(r, (m, h))| (set1(&[r]), law1(m, h)))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_dom_image() {
        let f = map1(&[((1, 1, 3), (1, 3)), ((4, 4, 4), (1, 1))]);
        assert_eq!(f.dom(), set1(&[(1, 1, 4)]));
        assert_eq!(f.image(), set1(&[(4, 1, 6), (5, 1, 5)]));
        assert_eq!(f.apply(&[2]), Some(vec![5]));
        assert_eq!(f.apply(&[9]), None);
    }

    #[test]
    fn test_composition() {
        let f = map1(&[((10, 1, 20), (1, -10))]);
        let g = map1(&[((0, 1, 5), (2, 10))]);
        // f(g(x)) = 2x + 10 - 10 = 2x on {0..5}
        let h = f.composition(&g).unwrap();
        assert_eq!(h.dom(), set1(&[(0, 1, 5)]));
        assert_eq!(h.apply(&[3]), Some(vec![6]));
    }

    #[test]
    fn test_pre_image() {
        let f = map1(&[((0, 1, 5), (2, 0))]);
        let pre = f.pre_image_of(&set1(&[(4, 1, 7)])).unwrap();
        assert_eq!(pre, set1(&[(2, 1, 3)]));
    }

    #[test]
    fn test_combine_override_wins() {
        let f = map1(&[((0, 1, 5), (1, 0))]);
        let g = map1(&[((3, 1, 8), (1, 100))]);
        let c = f.combine(&g).unwrap();
        assert_eq!(c.apply(&[4]), Some(vec![4]));
        assert_eq!(c.apply(&[7]), Some(vec![107]));
    }

    #[test]
    fn test_min_map_crossover() {
        // f(x) = x and g(x) = 10 - x cross at 5
        let f = map1(&[((0, 1, 10), (1, 0))]);
        let g = map1(&[((0, 1, 10), (-1, 10))]);
        let m = f.min_map(&g).unwrap();
        assert_eq!(m.apply(&[2]), Some(vec![2]));
        assert_eq!(m.apply(&[5]), Some(vec![5]));
        assert_eq!(m.apply(&[8]), Some(vec![2]));
        assert_eq!(m.dom(), set1(&[(0, 1, 10)]));
    }

    #[test]
    fn test_min_adj_map_constant_fiber() {
        // key collapses {0..9} to 50, value is x + 100: the fiber minimum
        // sits at the smallest domain point
        let key = map1(&[((0, 1, 9), (0, 50))]);
        let val = map1(&[((0, 1, 9), (1, 100))]);
        let adj = key.min_adj_map(&val).unwrap();
        assert_eq!(adj.dom(), set1(&[(50, 1, 50)]));
        assert_eq!(adj.apply(&[50]), Some(vec![100]));
    }

    #[test]
    fn test_min_adj_map_collision_takes_min() {
        // two key entries hit the same image point 7 with values 3 and 1
        let key = PWMap::new(vec![
            (set1(&[(0, 1, 0)]), law1(0, 7)),
            (set1(&[(1, 1, 1)]), law1(0, 7)),
        ])
        .unwrap();
        let val = PWMap::new(vec![
            (set1(&[(0, 1, 0)]), law1(0, 3)),
            (set1(&[(1, 1, 1)]), law1(0, 1)),
        ])
        .unwrap();
        let adj = key.min_adj_map(&val).unwrap();
        assert_eq!(adj.apply(&[7]), Some(vec![1]));
    }

    #[test]
    fn test_map_inf_chain() {
        // 3 -> 2 -> 1 -> 0 -> 0 collapses to the chain bottom
        let m = PWMap::new(vec![
            (set1(&[(1, 1, 3)]), law1(1, -1)),
            (set1(&[(0, 1, 0)]), law1(1, 0)),
        ])
        .unwrap();
        let inf = m.map_inf().unwrap();
        for x in 0..=3 {
            assert_eq!(inf.apply(&[x]), Some(vec![0]), "x = {}", x);
        }
        assert_eq!(inf.composition(&inf).unwrap(), inf);
    }

    #[test]
    fn test_equal_image() {
        let f = map1(&[((0, 1, 10), (1, 0))]);
        let g = map1(&[((0, 1, 10), (-1, 6))]);
        // x = 6 - x only at x = 3
        assert_eq!(f.equal_image(&g), set1(&[(3, 1, 3)]));
    }

    #[test]
    fn test_inverse() {
        let f = map1(&[((0, 1, 5), (2, 1))]);
        let inv = f.inverse().unwrap();
        assert_eq!(inv.apply(&[7]), Some(vec![3]));

        // constant over more than one point is not injective
        let c = map1(&[((0, 1, 5), (0, 9))]);
        assert_eq!(c.inverse().unwrap_err(), SbgError::UndefinedInverse);
    }

    #[test]
    fn test_min_inv_picks_least_preimage() {
        let c = map1(&[((2, 1, 5), (0, 9))]);
        let inv = c.min_inv(&set1(&[(9, 1, 9)])).unwrap();
        assert_eq!(inv.apply(&[9]), Some(vec![2]));
    }

    #[test]
    fn test_map_equality_across_partitions() {
        let f = map1(&[((0, 1, 9), (1, 1))]);
        let g = map1(&[((0, 1, 4), (1, 1)), ((5, 1, 9), (1, 1))]);
        assert_eq!(f, g);
        let h = map1(&[((0, 1, 9), (1, 2))]);
        assert_ne!(f, h);
    }

    #[test]
    fn test_offset_dom_keeps_values() {
        let f = map1(&[((0, 1, 5), (1, 100))]);
        let g = f.offset_dom(&[10]).unwrap();
        assert_eq!(g.dom(), set1(&[(10, 1, 15)]));
        assert_eq!(g.apply(&[12]), Some(vec![102]));
    }
}
