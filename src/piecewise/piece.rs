//! Multi-dimensional strided intervals.
//!
//! A [`SetPiece`] is an axis-aligned strided box: one [`Interval`] per axis.
//! All binary algebra requires equal arity between operands; a mismatch is a
//! programming error and panics.

use crate::piecewise::interval::{Interval, MAX_POINT};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// An axis-aligned strided box, one interval per axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SetPiece {
    intervals: Vec<Interval>,
}

impl SetPiece {
    /// Create a piece from per-axis intervals.
    pub fn new(intervals: Vec<Interval>) -> Self {
        Self { intervals }
    }

    /// Convenience constructor for a one-dimensional piece.
    pub fn from_interval(interval: Interval) -> Self {
        Self { intervals: vec![interval] }
    }

    /// Number of axes.
    pub fn dims(&self) -> usize {
        self.intervals.len()
    }

    /// Per-axis intervals.
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// A piece is empty when it has no axes or any axis is empty.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty() || self.intervals.iter().any(Interval::is_empty)
    }

    /// Number of points: product of per-axis cardinalities.
    pub fn cardinal(&self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        self.intervals
            .iter()
            .fold(1u64, |acc, iv| acc.saturating_mul(iv.cardinal()))
    }

    /// Check if `point` lies in the box.
    pub fn contains(&self, point: &[i64]) -> bool {
        assert_eq!(self.dims(), point.len());
        !self.intervals.is_empty()
            && self.intervals.iter().zip(point).all(|(iv, &x)| iv.contains(x))
    }

    /// Lexicographically smallest point, if any.
    pub fn min_elem(&self) -> Option<Vec<i64>> {
        if self.is_empty() {
            return None;
        }
        self.intervals.iter().map(Interval::min_elem).collect()
    }

    /// Lexicographically largest point, if any.
    pub fn max_elem(&self) -> Option<Vec<i64>> {
        if self.is_empty() {
            return None;
        }
        self.intervals.iter().map(Interval::max_elem).collect()
    }

    /// Component-wise intersection; empty as soon as any axis is empty.
    pub fn intersection(&self, other: &SetPiece) -> SetPiece {
        assert_eq!(self.dims(), other.dims());
        let intervals = self
            .intervals
            .iter()
            .zip(&other.intervals)
            .map(|(a, b)| a.intersection(b))
            .collect();
        Self { intervals }
    }

    /// Shift the box by `delta`, one component per axis.
    pub fn offset(&self, delta: &[i64]) -> SetPiece {
        assert_eq!(self.dims(), delta.len());
        let intervals = self
            .intervals
            .iter()
            .zip(delta)
            .map(|(iv, &d)| iv.offset(d))
            .collect();
        Self { intervals }
    }

    /// Try to merge with `other` along a single axis. The pieces must agree
    /// on every other axis and the differing intervals must merge into one.
    pub fn compact(&self, other: &SetPiece) -> Option<SetPiece> {
        assert_eq!(self.dims(), other.dims());
        let mut differing = None;
        for (j, (a, b)) in self.intervals.iter().zip(&other.intervals).enumerate() {
            if a != b {
                if differing.is_some() {
                    return None;
                }
                differing = Some(j);
            }
        }
        let Some(j) = differing else {
            return Some(self.clone());
        };
        let merged = self.intervals[j].compact(&other.intervals[j])?;
        let mut intervals = self.intervals.clone();
        intervals[j] = merged;
        Some(Self { intervals })
    }

    /// Complement as a Cartesian combination of per-axis complements: for
    /// each axis j, original intervals before j, the axis complement at j,
    /// the universe after. Output pieces are unsorted and uncompacted; used
    /// only by set difference.
    pub(crate) fn complement(&self) -> Vec<SetPiece> {
        let n = self.dims();
        if self.is_empty() {
            return vec![SetPiece::new(vec![Interval::new(0, 1, MAX_POINT); n.max(1)])];
        }
        let universe = Interval::new(0, 1, MAX_POINT);
        let mut out = Vec::new();
        for j in 0..n {
            for comp in self.intervals[j].complement() {
                let mut intervals = Vec::with_capacity(n);
                intervals.extend_from_slice(&self.intervals[..j]);
                intervals.push(comp);
                intervals.extend(std::iter::repeat(universe).take(n - j - 1));
                out.push(SetPiece::new(intervals));
            }
        }
        out
    }
}

impl Ord for SetPiece {
    fn cmp(&self, other: &Self) -> Ordering {
        self.min_elem()
            .cmp(&other.min_elem())
            .then_with(|| self.intervals.cmp(&other.intervals))
    }
}

impl PartialOrd for SetPiece {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<Vec<Interval>> for SetPiece {
    fn from(intervals: Vec<Interval>) -> Self {
        Self::new(intervals)
    }
}

impl fmt::Display for SetPiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, iv) in self.intervals.iter().enumerate() {
            if i > 0 {
                write!(f, "x")?;
            }
            write!(f, "{}", iv)?;
        }
        Ok(())
    }
}
