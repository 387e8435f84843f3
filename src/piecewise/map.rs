//! Atomic piece maps: one domain piece paired with one affine law.

use crate::piecewise::expr::{AffineExpr, AffineLaw};
use crate::piecewise::interval::Interval;
use crate::piecewise::piece::SetPiece;
use crate::utils::errors::{SbgError, SbgResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single-piece affine map: `law` applied over `domain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceMap {
    domain: SetPiece,
    law: AffineLaw,
    image: SetPiece,
}

impl PieceMap {
    /// Create a piece map. Fails with `DimensionMismatch` when domain and
    /// law arity disagree, and with `NonIntegralMap` when the law does not
    /// send the domain's strided points to integral strided points.
    pub fn new(domain: SetPiece, law: AffineLaw) -> SbgResult<Self> {
        if domain.dims() != law.dims() {
            return Err(SbgError::DimensionMismatch {
                left: domain.dims(),
                right: law.dims(),
            });
        }
        let image = law.image_of(&domain)?;
        Ok(Self { domain, law, image })
    }

    /// The domain piece.
    pub fn domain(&self) -> &SetPiece {
        &self.domain
    }

    /// The affine law.
    pub fn law(&self) -> &AffineLaw {
        &self.law
    }

    /// The image piece.
    pub fn image(&self) -> &SetPiece {
        &self.image
    }

    /// Check if the map is a no-op: the law is the identity, or the domain
    /// equals the image (weaker, but equivalent on this restricted domain).
    pub fn is_id(&self) -> bool {
        self.law.is_identity() || self.domain == self.image
    }

    /// Check for an empty domain.
    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }

    /// Evaluate at a point of the domain.
    pub fn apply(&self, point: &[i64]) -> Option<Vec<i64>> {
        if !self.domain.contains(point) {
            return None;
        }
        self.law.apply(point)
    }

    /// Exact preimage of `target` within the domain piece.
    pub fn pre_image_of(&self, target: &SetPiece) -> SbgResult<SetPiece> {
        pre_image_piece(&self.domain, &self.law, target)
    }
}

/// Exact preimage of `target` under `law` restricted to `domain`, axis by
/// axis: the target is clipped against the actual image first, so the
/// pullback through the inverse always lands on integral strides.
pub(crate) fn pre_image_piece(
    domain: &SetPiece,
    law: &AffineLaw,
    target: &SetPiece,
) -> SbgResult<SetPiece> {
    assert_eq!(domain.dims(), target.dims());
    let mut intervals = Vec::with_capacity(domain.dims());
    for ((expr, dom_iv), target_iv) in law
        .exprs()
        .iter()
        .zip(domain.intervals())
        .zip(target.intervals())
    {
        intervals.push(pre_image_axis(expr, dom_iv, target_iv)?);
    }
    Ok(SetPiece::new(intervals))
}

fn pre_image_axis(expr: &AffineExpr, dom_iv: &Interval, target_iv: &Interval) -> SbgResult<Interval> {
    if dom_iv.is_empty() || target_iv.is_empty() {
        return Ok(Interval::Empty);
    }
    if expr.is_constant() {
        let img = expr.image_of(dom_iv)?;
        let hit = img
            .min_elem()
            .map(|v| target_iv.contains(v))
            .unwrap_or(false);
        return Ok(if hit { *dom_iv } else { Interval::Empty });
    }
    let img = expr.image_of(dom_iv)?;
    let clipped = img.intersection(target_iv);
    if clipped.is_empty() {
        return Ok(Interval::Empty);
    }
    let back = expr.inverse()?.image_of(&clipped)?;
    Ok(back.intersection(dom_iv))
}

impl fmt::Display for PieceMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.domain, self.law)
    }
}
