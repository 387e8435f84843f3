//! Affine expressions and per-axis affine laws.
//!
//! An affine expression is `slope * x + offset` with rational coefficients.
//! An [`AffineLaw`] carries one expression per axis; axis `i` of the output
//! depends only on axis `i` of the input. Laws compose, and invert whenever
//! every slope is non-zero.

use crate::piecewise::interval::Interval;
use crate::piecewise::piece::SetPiece;
use crate::utils::errors::{SbgError, SbgResult};
use num_rational::Rational64;
use num_traits::{One, Signed, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single-axis affine expression `slope * x + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AffineExpr {
    /// Multiplier applied to the input.
    pub slope: Rational64,
    /// Constant added after the multiplication.
    pub offset: Rational64,
}

impl AffineExpr {
    /// Create an expression from rational coefficients.
    pub fn new(slope: Rational64, offset: Rational64) -> Self {
        Self { slope, offset }
    }

    /// Create an expression from integer coefficients.
    pub fn with_ints(slope: i64, offset: i64) -> Self {
        Self {
            slope: Rational64::from_integer(slope),
            offset: Rational64::from_integer(offset),
        }
    }

    /// The identity expression `x`.
    pub fn identity() -> Self {
        Self::with_ints(1, 0)
    }

    /// A constant expression.
    pub fn constant(value: i64) -> Self {
        Self::with_ints(0, value)
    }

    /// Check for slope 1, offset 0.
    pub fn is_identity(&self) -> bool {
        self.slope.is_one() && self.offset.is_zero()
    }

    /// Check for slope 0.
    pub fn is_constant(&self) -> bool {
        self.slope.is_zero()
    }

    /// Evaluate at an integer point.
    pub fn apply(&self, x: i64) -> Rational64 {
        self.slope * Rational64::from_integer(x) + self.offset
    }

    /// Evaluate at an integer point, `None` when the value is fractional.
    pub fn apply_int(&self, x: i64) -> Option<i64> {
        let v = self.apply(x);
        v.is_integer().then(|| v.to_integer())
    }

    /// Composition `self(inner(x))`.
    pub fn compose(&self, inner: &AffineExpr) -> AffineExpr {
        AffineExpr {
            slope: self.slope * inner.slope,
            offset: self.slope * inner.offset + self.offset,
        }
    }

    /// Inverse expression. Fails with `UndefinedInverse` on slope 0.
    pub fn inverse(&self) -> SbgResult<AffineExpr> {
        if self.slope.is_zero() {
            return Err(SbgError::UndefinedInverse);
        }
        Ok(AffineExpr {
            slope: self.slope.recip(),
            offset: -self.offset / self.slope,
        })
    }

    /// Image of a strided interval. A negative slope swaps the bounds.
    /// Fails with `NonIntegralMap` when the image leaves the integers.
    pub fn image_of(&self, iv: &Interval) -> SbgResult<Interval> {
        if iv.is_empty() {
            return Ok(Interval::Empty);
        }
        if self.slope.is_zero() {
            if !self.offset.is_integer() {
                return Err(SbgError::NonIntegralMap);
            }
            return Ok(Interval::singleton(self.offset.to_integer()));
        }
        let (lo, step, hi) = match (iv.min_elem(), iv.step(), iv.max_elem()) {
            (Some(lo), Some(step), Some(hi)) => (lo, step, hi),
            _ => return Ok(Interval::Empty),
        };
        let a_lo = self.apply(lo);
        if !a_lo.is_integer() {
            return Err(SbgError::NonIntegralMap);
        }
        if lo == hi {
            return Ok(Interval::singleton(a_lo.to_integer()));
        }
        let a_hi = self.apply(hi);
        let a_step = self.slope * Rational64::from_integer(step);
        if !a_step.is_integer() {
            return Err(SbgError::NonIntegralMap);
        }
        if self.slope.is_positive() {
            Ok(Interval::new(a_lo.to_integer(), a_step.to_integer().max(1), a_hi.to_integer()))
        } else {
            Ok(Interval::new(a_hi.to_integer(), (-a_step).to_integer().max(1), a_lo.to_integer()))
        }
    }
}

impl fmt::Display for AffineExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.slope.is_zero() {
            return write!(f, "{}", self.offset);
        }
        if self.slope.is_one() {
            write!(f, "x")?;
        } else {
            write!(f, "{}*x", self.slope)?;
        }
        if self.offset.is_positive() {
            write!(f, " + {}", self.offset)?;
        } else if self.offset.is_negative() {
            write!(f, " - {}", -self.offset)?;
        }
        Ok(())
    }
}

/// A per-axis tuple of affine expressions forming one map law.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AffineLaw {
    exprs: Vec<AffineExpr>,
}

impl AffineLaw {
    /// Create a law from per-axis expressions.
    pub fn new(exprs: Vec<AffineExpr>) -> Self {
        Self { exprs }
    }

    /// The identity law on `dims` axes.
    pub fn identity(dims: usize) -> Self {
        Self { exprs: vec![AffineExpr::identity(); dims] }
    }

    /// A constant law sending every point to `value`.
    pub fn constant(value: &[i64]) -> Self {
        Self { exprs: value.iter().map(|&v| AffineExpr::constant(v)).collect() }
    }

    /// Number of axes.
    pub fn dims(&self) -> usize {
        self.exprs.len()
    }

    /// Per-axis expressions.
    pub fn exprs(&self) -> &[AffineExpr] {
        &self.exprs
    }

    /// Check for the identity on every axis.
    pub fn is_identity(&self) -> bool {
        self.exprs.iter().all(AffineExpr::is_identity)
    }

    /// Check for slope 0 on every axis.
    pub fn is_constant(&self) -> bool {
        self.exprs.iter().all(AffineExpr::is_constant)
    }

    /// Evaluate at a point, `None` when any axis leaves the integers.
    pub fn apply(&self, point: &[i64]) -> Option<Vec<i64>> {
        assert_eq!(self.dims(), point.len());
        self.exprs
            .iter()
            .zip(point)
            .map(|(e, &x)| e.apply_int(x))
            .collect()
    }

    /// Composition `self(inner(x))`, axis by axis.
    pub fn compose(&self, inner: &AffineLaw) -> AffineLaw {
        assert_eq!(self.dims(), inner.dims());
        let exprs = self
            .exprs
            .iter()
            .zip(&inner.exprs)
            .map(|(a, b)| a.compose(b))
            .collect();
        AffineLaw { exprs }
    }

    /// Axis-wise inverse. Fails with `UndefinedInverse` when any slope is 0.
    pub fn inverse(&self) -> SbgResult<AffineLaw> {
        let exprs: SbgResult<Vec<AffineExpr>> =
            self.exprs.iter().map(AffineExpr::inverse).collect();
        Ok(AffineLaw { exprs: exprs? })
    }

    /// Image of a piece, axis by axis.
    pub fn image_of(&self, piece: &SetPiece) -> SbgResult<SetPiece> {
        assert_eq!(self.dims(), piece.dims());
        let intervals: SbgResult<Vec<Interval>> = self
            .exprs
            .iter()
            .zip(piece.intervals())
            .map(|(e, iv)| e.image_of(iv))
            .collect();
        Ok(SetPiece::new(intervals?))
    }

    /// Add `delta` to the output on every axis.
    pub fn offset_image(&self, delta: &[i64]) -> AffineLaw {
        assert_eq!(self.dims(), delta.len());
        let exprs = self
            .exprs
            .iter()
            .zip(delta)
            .map(|(e, &d)| AffineExpr::new(e.slope, e.offset + Rational64::from_integer(d)))
            .collect();
        AffineLaw { exprs }
    }

    /// Adjust the law for a domain shifted by `delta` so the image is
    /// unchanged: the new law evaluates `self` at `x - delta`.
    pub fn shift_dom(&self, delta: &[i64]) -> AffineLaw {
        assert_eq!(self.dims(), delta.len());
        let exprs = self
            .exprs
            .iter()
            .zip(delta)
            .map(|(e, &d)| {
                AffineExpr::new(e.slope, e.offset - e.slope * Rational64::from_integer(d))
            })
            .collect();
        AffineLaw { exprs }
    }
}

impl fmt::Display for AffineLaw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, e) in self.exprs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", e)?;
        }
        write!(f, "]")
    }
}
