//! Strided intervals over the naturals.
//!
//! An interval `[lo:step:hi]` is the arithmetic progression
//! `{lo, lo+step, ..., hi}`. The empty interval is a distinguished state,
//! not a degenerate range.

use num_integer::Integer;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Upper bound of the universe used by interval complement. Complements are
/// always intersected back against bounded sets before they become visible,
/// so this never leaks into public values.
pub(crate) const MAX_POINT: i64 = i64::MAX / 4;

/// An arithmetic progression `{lo, lo+step, ..., hi}` on the naturals.
///
/// Invariants: `step >= 1`, `lo <= hi`, `hi` lies on the progression and
/// singletons carry `step == 1`. All of these are established by
/// [`Interval::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    /// No elements.
    Empty,
    /// A non-empty progression.
    Range {
        /// Smallest element.
        lo: i64,
        /// Distance between consecutive elements.
        step: i64,
        /// Largest element.
        hi: i64,
    },
}

impl Interval {
    /// Create a normalized interval. `lo > hi` yields the empty interval;
    /// `hi` is snapped down onto the progression.
    ///
    /// Panics if `step < 1`.
    pub fn new(lo: i64, step: i64, hi: i64) -> Self {
        assert!(step >= 1, "interval step must be at least 1");
        if lo > hi {
            return Interval::Empty;
        }
        let hi = lo + ((hi - lo) / step) * step;
        let step = if lo == hi { 1 } else { step };
        Interval::Range { lo, step, hi }
    }

    /// Create an interval holding a single element.
    pub fn singleton(value: i64) -> Self {
        Interval::Range { lo: value, step: 1, hi: value }
    }

    fn parts(&self) -> Option<(i64, i64, i64)> {
        match *self {
            Interval::Empty => None,
            Interval::Range { lo, step, hi } => Some((lo, step, hi)),
        }
    }

    /// Check if the interval has no elements.
    pub fn is_empty(&self) -> bool {
        matches!(self, Interval::Empty)
    }

    /// Number of elements.
    pub fn cardinal(&self) -> u64 {
        match self.parts() {
            None => 0,
            Some((lo, step, hi)) => ((hi - lo) / step) as u64 + 1,
        }
    }

    /// Check if `x` lies on the progression.
    pub fn contains(&self, x: i64) -> bool {
        match self.parts() {
            None => false,
            Some((lo, step, hi)) => lo <= x && x <= hi && (x - lo) % step == 0,
        }
    }

    /// Smallest element, if any.
    pub fn min_elem(&self) -> Option<i64> {
        self.parts().map(|(lo, _, _)| lo)
    }

    /// Largest element, if any.
    pub fn max_elem(&self) -> Option<i64> {
        self.parts().map(|(_, _, hi)| hi)
    }

    /// Distance between consecutive elements, if non-empty.
    pub fn step(&self) -> Option<i64> {
        self.parts().map(|(_, step, _)| step)
    }

    /// Successor of `x` in progression order: the smallest element
    /// strictly greater than `x`.
    pub fn next_elem(&self, x: i64) -> Option<i64> {
        let (lo, step, hi) = self.parts()?;
        if x < lo {
            return Some(lo);
        }
        let next = lo + ((x - lo).div_euclid(step) + 1) * step;
        (next <= hi).then_some(next)
    }

    /// Intersection of two progressions. Solves the stride congruences
    /// exactly, so mismatched residues yield the empty interval without
    /// enumeration.
    pub fn intersection(&self, other: &Interval) -> Interval {
        let (Some((l1, s1, h1)), Some((l2, s2, h2))) = (self.parts(), other.parts()) else {
            return Interval::Empty;
        };
        let lo = l1.max(l2);
        let hi = h1.min(h2);
        if lo > hi {
            return Interval::Empty;
        }
        let eg = s1.extended_gcd(&s2);
        let g = eg.gcd;
        if (l2 - l1) % g != 0 {
            return Interval::Empty;
        }
        // x ≡ l1 (mod s1) and x ≡ l2 (mod s2); the common solutions form a
        // progression with step lcm(s1, s2).
        let lcm = (s1 as i128 / g as i128) * s2 as i128;
        let m2 = s2 as i128 / g as i128;
        let t = ((l2 - l1) as i128 / g as i128 % m2 * (eg.x as i128 % m2)) % m2;
        let x0 = l1 as i128 + s1 as i128 * t;
        let first = x0 + ceil_div(lo as i128 - x0, lcm) * lcm;
        if first > hi as i128 {
            return Interval::Empty;
        }
        let step = if lcm > i64::MAX as i128 { i64::MAX } else { lcm as i64 };
        Interval::new(first as i64, step, hi)
    }

    /// Shift every element by `delta`.
    pub fn offset(&self, delta: i64) -> Interval {
        match self.parts() {
            None => Interval::Empty,
            Some((lo, step, hi)) => Interval::Range { lo: lo + delta, step, hi: hi + delta },
        }
    }

    /// Try to merge two progressions into one. Succeeds when both share a
    /// step (singletons absorb the other operand's step) and the ranges
    /// touch without leaving a gap. Returns `None` when not compactible.
    pub fn compact(&self, other: &Interval) -> Option<Interval> {
        let (l1, s1, h1) = self.parts()?;
        let (l2, s2, h2) = other.parts()?;
        if l1 == h1 && l2 == h2 {
            if l1 == l2 {
                return Some(*self);
            }
            return Some(Interval::new(l1.min(l2), (l2 - l1).abs(), l1.max(l2)));
        }
        let s1e = if l1 == h1 { s2 } else { s1 };
        let s2e = if l2 == h2 { s1 } else { s2 };
        if s1e != s2e {
            return None;
        }
        let s = s1e;
        if (l2 - l1).rem_euclid(s) != 0 {
            return None;
        }
        if l2 > h1 + s || l1 > h2 + s {
            return None;
        }
        Some(Interval::new(l1.min(l2), s, h1.max(h2)))
    }

    /// Complement within `[0, MAX_POINT]` as before / stride-gap / after
    /// pieces. Output is not normalized and is used only by set difference.
    pub(crate) fn complement(&self) -> Vec<Interval> {
        match *self {
            Interval::Empty => vec![Interval::new(0, 1, MAX_POINT)],
            Interval::Range { lo, step, hi } => {
                let mut out = Vec::new();
                if lo > 0 {
                    out.push(Interval::new(0, 1, lo - 1));
                }
                for r in 1..step {
                    if lo + r > hi {
                        break;
                    }
                    out.push(Interval::new(lo + r, step, hi));
                }
                if hi < MAX_POINT {
                    out.push(Interval::new(hi + 1, 1, MAX_POINT));
                }
                out
            }
        }
    }
}

fn ceil_div(a: i128, b: i128) -> i128 {
    let d = a.div_euclid(b);
    if a.rem_euclid(b) != 0 {
        d + 1
    } else {
        d
    }
}

impl Ord for Interval {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.parts(), other.parts()) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some((l1, s1, h1)), Some((l2, s2, h2))) => {
                l1.cmp(&l2).then(h1.cmp(&h2)).then(s1.cmp(&s2))
            }
        }
    }
}

impl PartialOrd for Interval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Interval::Empty => write!(f, "[]"),
            Interval::Range { lo, step, hi } => write!(f, "[{}:{}:{}]", lo, step, hi),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        assert_eq!(Interval::new(1, 2, 10), Interval::new(1, 2, 9));
        assert_eq!(Interval::new(5, 3, 5), Interval::singleton(5));
        assert!(Interval::new(7, 1, 3).is_empty());
    }

    #[test]
    fn test_cardinal_and_membership() {
        let iv = Interval::new(0, 2, 10);
        assert_eq!(iv.cardinal(), 6);
        assert!(iv.contains(6));
        assert!(!iv.contains(5));
        assert!(!iv.contains(12));
    }

    #[test]
    fn test_next_elem() {
        let iv = Interval::new(3, 4, 19);
        assert_eq!(iv.next_elem(0), Some(3));
        assert_eq!(iv.next_elem(3), Some(7));
        assert_eq!(iv.next_elem(8), Some(11));
        assert_eq!(iv.next_elem(19), None);
    }

    #[test]
    fn test_intersection_aligned() {
        let a = Interval::new(0, 2, 10);
        let b = Interval::new(0, 3, 12);
        assert_eq!(a.intersection(&b), Interval::new(0, 6, 6));
    }

    #[test]
    fn test_intersection_crt() {
        // {3,7,11,15,19} and {1,7,13,19,25} share {7,19}.
        let a = Interval::new(3, 4, 19);
        let b = Interval::new(1, 6, 25);
        assert_eq!(a.intersection(&b), Interval::new(7, 12, 19));
    }

    #[test]
    fn test_intersection_incompatible_residues() {
        let a = Interval::new(1, 2, 9);
        let b = Interval::new(0, 2, 10);
        assert!(a.intersection(&b).is_empty());
    }

    #[test]
    fn test_compact() {
        let a = Interval::new(0, 3, 9);
        let b = Interval::new(12, 3, 18);
        assert_eq!(a.compact(&b), Some(Interval::new(0, 3, 18)));

        // gap too wide
        let c = Interval::new(15, 3, 18);
        assert_eq!(a.compact(&c), None);

        // singleton absorbs the neighbour's step
        let s = Interval::singleton(12);
        assert_eq!(a.compact(&s), Some(Interval::new(0, 3, 12)));

        // two singletons define their own step
        assert_eq!(
            Interval::singleton(4).compact(&Interval::singleton(9)),
            Some(Interval::new(4, 5, 9))
        );
    }

    #[test]
    fn test_complement_covers_gaps() {
        let iv = Interval::new(4, 3, 10);
        let comp = iv.complement();
        for x in 0..20 {
            let in_comp = comp.iter().any(|c| c.contains(x));
            assert_eq!(in_comp, !iv.contains(x), "point {}", x);
        }
    }

    #[test]
    fn test_order_by_minimum() {
        let mut ivs = vec![Interval::new(5, 1, 9), Interval::new(0, 2, 10), Interval::Empty];
        ivs.sort();
        assert_eq!(ivs[0], Interval::Empty);
        assert_eq!(ivs[1].min_elem(), Some(0));
        assert_eq!(ivs[2].min_elem(), Some(5));
    }
}
