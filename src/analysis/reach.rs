//! Minimum-reachable-vertex computation.
//!
//! Both graph engines reduce to the same fixed point: for every vertex,
//! find the lexicographically smallest distinguished source that reaches it
//! along directed edges. The computation never walks vertices; it iterates
//! `min_adj_map` and `map_inf` over the incidence maps until the
//! representative map stops changing.

use crate::piecewise::expr::AffineLaw;
use crate::piecewise::pwmap::PWMap;
use crate::piecewise::set::PieceSet;
use crate::utils::errors::SbgResult;

/// Compute the representative map of `vertices` under the directed edges
/// `map_b` (tail) and `map_d` (head): each vertex is sent to the smallest
/// vertex with a path to it, with `sources` made globally smallest by a
/// directed offset so that `rmap(v)` lands in `sources` exactly when some
/// source reaches `v`.
///
/// The offset shifts every non-source out of the way on the first axis;
/// searches over the shared numeric range therefore cannot collide, and the
/// result is mapped back through the offset inverse before returning.
pub fn min_reach(
    vertices: &PieceSet,
    map_b: &PWMap,
    map_d: &PWMap,
    sources: &PieceSet,
) -> SbgResult<PWMap> {
    let Some(dims) = vertices.dims() else {
        return Ok(PWMap::empty());
    };
    let max = vertices.max_elem()?;
    let mut delta = vec![0i64; dims];
    delta[0] = max[0] + 1;

    let src = sources.intersection(vertices);
    let rest = vertices.difference(&src);
    let shift = AffineLaw::identity(dims).offset_image(&delta);
    let omap = PWMap::new(vec![(src, AffineLaw::identity(dims)), (rest, shift)])?;

    let ob = omap.composition(map_b)?;
    let od = omap.composition(map_d)?;
    let offset_v = omap.image();

    let mut rmap = PWMap::identity(&offset_v);
    loop {
        // adj(v) = min over incoming edges of the tail's representative
        let vals = rmap.composition(&ob)?;
        let adj = od.min_adj_map(&vals)?;
        let smap = rmap.min_map(&adj)?;
        let next = smap.map_inf()?;
        if next == rmap {
            break;
        }
        log::trace!("min_reach pass: {} entries", next.entries().len());
        rmap = next;
    }

    let inv = omap.inverse()?;
    inv.composition(&rmap)?.composition(&omap)
}
