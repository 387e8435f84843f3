//! Finite unions of disjoint pieces.
//!
//! A [`PieceSet`] holds pairwise-disjoint, non-empty [`SetPiece`]s behind
//! one of two backing arrangements: canonical (sorted by minimum element and
//! maximally compacted) or loose (arbitrary order). The arrangement is
//! chosen by a runtime check at construction, never by the caller. Every
//! operation is correct on either arrangement; the linear fast paths only
//! fire when both operands are canonical.

use crate::piecewise::piece::SetPiece;
use crate::utils::errors::{SbgError, SbgResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Backing arrangement for the pieces of a set.
#[derive(Debug, Clone, Serialize, Deserialize)]
enum Store {
    /// Sorted by minimum element, no two pieces compactible.
    Canonical(Vec<SetPiece>),
    /// Arbitrary order; operations fall back to pairwise traversal.
    Loose(Vec<SetPiece>),
}

/// A finite union of pairwise-disjoint pieces.
///
/// Disjointness of caller-supplied collections is an unchecked invariant:
/// constructors filter empty pieces and classify the arrangement, but do not
/// verify that the pieces avoid one another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PieceSet {
    store: Store,
}

impl PieceSet {
    /// Create a set from a collection of disjoint pieces.
    ///
    /// Panics if the non-empty pieces disagree on arity.
    pub fn new(pieces: Vec<SetPiece>) -> Self {
        let pieces: Vec<SetPiece> = pieces.into_iter().filter(|p| !p.is_empty()).collect();
        if let Some(first) = pieces.first() {
            let d = first.dims();
            assert!(
                pieces.iter().all(|p| p.dims() == d),
                "mixed arity in piece set"
            );
        }
        let store = if is_canonical_order(&pieces) {
            Store::Canonical(pieces)
        } else {
            Store::Loose(pieces)
        };
        Self { store }
    }

    /// The empty set.
    pub fn empty() -> Self {
        Self { store: Store::Canonical(Vec::new()) }
    }

    /// A set holding a single piece.
    pub fn from_piece(piece: SetPiece) -> Self {
        Self::new(vec![piece])
    }

    /// The underlying pieces, in storage order.
    pub fn pieces(&self) -> &[SetPiece] {
        match &self.store {
            Store::Canonical(p) | Store::Loose(p) => p,
        }
    }

    /// Whether the set is in canonical arrangement.
    pub fn is_canonical(&self) -> bool {
        matches!(self.store, Store::Canonical(_))
    }

    /// Arity of the pieces; `None` for the empty set.
    pub fn dims(&self) -> Option<usize> {
        self.pieces().first().map(SetPiece::dims)
    }

    /// Check if the set has no points.
    pub fn is_empty(&self) -> bool {
        self.pieces().is_empty()
    }

    /// Total number of points.
    pub fn cardinal(&self) -> u64 {
        self.pieces().iter().fold(0u64, |acc, p| acc.saturating_add(p.cardinal()))
    }

    /// Check if `point` belongs to the set.
    pub fn contains(&self, point: &[i64]) -> bool {
        self.pieces().iter().any(|p| p.contains(point))
    }

    /// Lexicographically smallest point. Fails with `EmptyOperation` on the
    /// empty set.
    pub fn min_elem(&self) -> SbgResult<Vec<i64>> {
        let result = match &self.store {
            Store::Canonical(pieces) => pieces.first().and_then(SetPiece::min_elem),
            Store::Loose(pieces) => pieces.iter().filter_map(SetPiece::min_elem).min(),
        };
        result.ok_or(SbgError::EmptyOperation { op: "min_elem" })
    }

    /// Lexicographically largest point. Fails with `EmptyOperation` on the
    /// empty set.
    pub fn max_elem(&self) -> SbgResult<Vec<i64>> {
        self.pieces()
            .iter()
            .filter_map(SetPiece::max_elem)
            .max()
            .ok_or(SbgError::EmptyOperation { op: "max_elem" })
    }

    /// Intersection by pairwise piece traversal. Pieces of each operand are
    /// disjoint, so the pairwise intersections are too.
    pub fn intersection(&self, other: &PieceSet) -> PieceSet {
        if self.is_empty() || other.is_empty() {
            return PieceSet::empty();
        }
        let mut out = Vec::new();
        for a in self.pieces() {
            for b in other.pieces() {
                let i = a.intersection(b);
                if !i.is_empty() {
                    out.push(i);
                }
            }
        }
        PieceSet::new(out)
    }

    /// Union. When both operands are canonical and do not interleave, the
    /// pieces concatenate in order; otherwise the general path removes the
    /// overlap from `other` first.
    pub fn cup(&self, other: &PieceSet) -> PieceSet {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        if self.is_canonical() && other.is_canonical() {
            if let (Ok(a_max), Ok(b_min)) = (self.max_elem(), other.min_elem()) {
                if a_max < b_min {
                    return self.concatenation(other);
                }
            }
            if let (Ok(b_max), Ok(a_min)) = (other.max_elem(), self.min_elem()) {
                if b_max < a_min {
                    return other.concatenation(self);
                }
            }
        }
        self.concatenation(&other.difference(self))
    }

    /// Set difference: `self` with every point of `other` removed.
    pub fn difference(&self, other: &PieceSet) -> PieceSet {
        if self.is_empty() || other.is_empty() {
            return self.clone();
        }
        let mut current = self.pieces().to_vec();
        for p in other.pieces() {
            let comp = p.complement();
            let mut next = Vec::new();
            for a in &current {
                for c in &comp {
                    let i = a.intersection(c);
                    if !i.is_empty() {
                        next.push(i);
                    }
                }
            }
            current = next;
            if current.is_empty() {
                break;
            }
        }
        PieceSet::new(current)
    }

    /// Union of operands known a priori to be disjoint. Skips the general
    /// union algorithm entirely.
    ///
    /// Calling this on overlapping operands produces a set whose pieces
    /// overlap, which violates the `PieceSet` invariant and makes the
    /// results of every later operation on the value meaningless. No check
    /// is performed.
    pub fn concatenation(&self, other: &PieceSet) -> PieceSet {
        let mut pieces = self.pieces().to_vec();
        pieces.extend_from_slice(other.pieces());
        PieceSet::new(pieces)
    }

    /// Merge compactible piece pairs to a fixed point and sort. The result
    /// is always canonical.
    pub fn compact(&self) -> PieceSet {
        let mut pieces = self.pieces().to_vec();
        loop {
            let mut merged = None;
            'search: for i in 0..pieces.len() {
                for j in (i + 1)..pieces.len() {
                    if let Some(m) = pieces[i].compact(&pieces[j]) {
                        merged = Some((i, j, m));
                        break 'search;
                    }
                }
            }
            match merged {
                Some((i, j, m)) => {
                    pieces.swap_remove(j);
                    pieces[i] = m;
                }
                None => break,
            }
        }
        pieces.sort();
        Self { store: Store::Canonical(pieces) }
    }

    /// Check if every point of `self` belongs to `other`.
    pub fn is_subset(&self, other: &PieceSet) -> bool {
        self.difference(other).is_empty()
    }

    /// Enumerate the points of the set. Intended for tests and debugging on
    /// small sets only.
    pub fn points(&self) -> Vec<Vec<i64>> {
        let mut out = Vec::new();
        for piece in self.pieces() {
            let mut axes: Vec<Vec<i64>> = Vec::new();
            for iv in piece.intervals() {
                let mut vals = Vec::new();
                let mut cur = iv.min_elem();
                while let Some(x) = cur {
                    vals.push(x);
                    cur = iv.next_elem(x);
                }
                axes.push(vals);
            }
            let mut combos: Vec<Vec<i64>> = vec![Vec::new()];
            for axis in &axes {
                let mut next = Vec::with_capacity(combos.len() * axis.len());
                for c in &combos {
                    for &v in axis {
                        let mut c = c.clone();
                        c.push(v);
                        next.push(c);
                    }
                }
                combos = next;
            }
            out.extend(combos);
        }
        out
    }
}

fn is_canonical_order(pieces: &[SetPiece]) -> bool {
    if !pieces.windows(2).all(|w| w[0] < w[1]) {
        return false;
    }
    for (i, a) in pieces.iter().enumerate() {
        for b in &pieces[i + 1..] {
            if a.compact(b).is_some() {
                return false;
            }
        }
    }
    true
}

/// Equality is mutual inclusion: two differently-partitioned
/// representations of the same point set are equal.
impl PartialEq for PieceSet {
    fn eq(&self, other: &Self) -> bool {
        if self.pieces() == other.pieces() {
            return true;
        }
        self.difference(other).is_empty() && other.difference(self).is_empty()
    }
}

impl Eq for PieceSet {}

impl fmt::Display for PieceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, p) in self.pieces().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, "}}")
    }
}
