//! Algebraic laws of the piecewise set and map layer, checked against a
//! naive point-by-point model on small inputs.

use proptest::prelude::*;
use sbgraph::prelude::*;
use std::collections::BTreeSet;

fn interval_strategy() -> impl Strategy<Value = Interval> {
    (0i64..30, 1i64..5, 0i64..25).prop_map(|(lo, step, len)| Interval::new(lo, step, lo + len))
}

fn set_strategy() -> impl Strategy<Value = PieceSet> {
    prop::collection::vec(interval_strategy(), 1..4).prop_map(|ivs| {
        ivs.into_iter().fold(PieceSet::empty(), |acc, iv| {
            acc.cup(&PieceSet::from_piece(SetPiece::from_interval(iv)))
        })
    })
}

fn naive(s: &PieceSet) -> BTreeSet<i64> {
    s.points().into_iter().map(|p| p[0]).collect()
}

proptest! {
    #[test]
    fn prop_cup_matches_point_union(s1 in set_strategy(), s2 in set_strategy()) {
        let expected: BTreeSet<i64> = naive(&s1).union(&naive(&s2)).copied().collect();
        prop_assert_eq!(naive(&s1.cup(&s2)), expected);
    }

    #[test]
    fn prop_intersection_matches_points(s1 in set_strategy(), s2 in set_strategy()) {
        let expected: BTreeSet<i64> =
            naive(&s1).intersection(&naive(&s2)).copied().collect();
        prop_assert_eq!(naive(&s1.intersection(&s2)), expected);
        prop_assert_eq!(s1.intersection(&s2), s2.intersection(&s1));
    }

    #[test]
    fn prop_difference_matches_points(s1 in set_strategy(), s2 in set_strategy()) {
        let expected: BTreeSet<i64> =
            naive(&s1).difference(&naive(&s2)).copied().collect();
        prop_assert_eq!(naive(&s1.difference(&s2)), expected);
    }

    #[test]
    fn prop_cup_of_difference(s1 in set_strategy(), s2 in set_strategy()) {
        prop_assert_eq!(s1.cup(&s2.difference(&s1)), s1.cup(&s2));
    }

    #[test]
    fn prop_compact_preserves_the_set(s in set_strategy()) {
        let c = s.compact();
        prop_assert_eq!(&c, &s);
        prop_assert_eq!(c.cardinal(), s.cardinal());
        prop_assert_eq!(c.compact(), c);
    }

    #[test]
    fn prop_piece_intersection_cardinality(
        a1 in interval_strategy(), a2 in interval_strategy(),
        b1 in interval_strategy(), b2 in interval_strategy(),
    ) {
        let a = SetPiece::new(vec![a1, a2]);
        let b = SetPiece::new(vec![b1, b2]);
        let i = a.intersection(&b);
        prop_assert!(i.cardinal() <= a.cardinal().min(b.cardinal()));
    }

    #[test]
    fn prop_injective_round_trip(
        s in set_strategy(),
        slope in 1i64..4,
        offset in 0i64..10,
    ) {
        let dom = PieceSet::from_piece(SetPiece::from_interval(Interval::new(0, 1, 60)));
        let f = PWMap::new(vec![(
            dom.clone(),
            AffineLaw::new(vec![AffineExpr::with_ints(slope, offset)]),
        )])
        .unwrap();
        let s = s.intersection(&dom);
        let img = f.image_of(&s).unwrap();
        let back = f.pre_image_of(&img).unwrap();
        // exact on an injective map
        prop_assert_eq!(back, s);
    }

    #[test]
    fn prop_non_injective_round_trip_is_expansive(s in set_strategy(), c in 0i64..60) {
        let dom = PieceSet::from_piece(SetPiece::from_interval(Interval::new(0, 1, 60)));
        let f = PWMap::new(vec![(
            dom.clone(),
            AffineLaw::new(vec![AffineExpr::constant(c)]),
        )])
        .unwrap();
        let s = s.intersection(&dom);
        let img = f.image_of(&s).unwrap();
        let back = f.pre_image_of(&img).unwrap();
        prop_assert!(s.is_subset(&back));
    }

    #[test]
    fn prop_map_inf_reaches_fixed_point(n in 5i64..40, s in 1i64..4) {
        // v -> v - s above s, identity below: the fixed point is v mod s
        let m = PWMap::new(vec![
            (
                PieceSet::from_piece(SetPiece::from_interval(Interval::new(s, 1, n))),
                AffineLaw::new(vec![AffineExpr::with_ints(1, -s)]),
            ),
            (
                PieceSet::from_piece(SetPiece::from_interval(Interval::new(0, 1, s - 1))),
                AffineLaw::identity(1),
            ),
        ])
        .unwrap();
        let inf = m.map_inf().unwrap();
        prop_assert_eq!(&inf.composition(&inf).unwrap(), &inf);
        for x in 0..=n {
            prop_assert_eq!(inf.apply(&[x]), Some(vec![x % s]));
        }
    }
}
