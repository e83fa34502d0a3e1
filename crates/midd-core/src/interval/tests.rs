//! Tests for the interval algebra.

use super::*;
use crate::error::MiddError;

fn sample_intervals() -> Vec<Interval<i64>> {
    vec![
        Interval::closed(0, 10).unwrap(),
        Interval::open(0, 10).unwrap(),
        Interval::closed_open(0, 10).unwrap(),
        Interval::open_closed(0, 10).unwrap(),
        Interval::closed(3, 7).unwrap(),
        Interval::open(3, 5).unwrap(),
        Interval::closed(10, 15).unwrap(),
        Interval::open_closed(10, 15).unwrap(),
        Interval::point(0),
        Interval::point(5),
        Interval::point(10),
        Interval::less_than(5),
        Interval::at_most(5),
        Interval::greater_than(5),
        Interval::at_least(10),
        Interval::unbounded(),
    ]
}

// Integer grid wide enough to see every bound used above.
fn grid() -> impl Iterator<Item = i64> {
    -3..=18
}

// ============================================================================
// EndPoint Tests
// ============================================================================

mod endpoint {
    use super::*;

    #[test]
    fn test_ordering() {
        let neg: EndPoint<i64> = EndPoint::NegativeInfinity;
        let pos: EndPoint<i64> = EndPoint::PositiveInfinity;

        assert!(neg < EndPoint::Finite(i64::MIN));
        assert!(EndPoint::Finite(i64::MAX) < pos);
        assert!(EndPoint::Finite(-1) < EndPoint::Finite(1));
        assert_eq!(EndPoint::of(3), EndPoint::Finite(3));
    }

    #[test]
    fn test_infinity_queries() {
        assert!(EndPoint::<i64>::NegativeInfinity.is_infinite());
        assert!(EndPoint::<i64>::PositiveInfinity.is_positive_infinity());
        assert!(!EndPoint::Finite(0).is_infinite());
        assert_eq!(EndPoint::Finite(4).value(), Some(&4));
        assert_eq!(EndPoint::<i64>::NegativeInfinity.value(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(EndPoint::<i64>::NegativeInfinity.to_string(), "-inf");
        assert_eq!(EndPoint::Finite(7).to_string(), "7");
        assert_eq!(EndPoint::<i64>::PositiveInfinity.to_string(), "+inf");
    }
}

// ============================================================================
// Construction Tests
// ============================================================================

mod construction {
    use super::*;

    #[test]
    fn test_rejects_closed_infinite_bound() {
        let err = Interval::new(EndPoint::NegativeInfinity, EndPoint::Finite(3), true, false)
            .unwrap_err();
        assert!(matches!(err, MiddError::InvalidInterval(_)));

        let err =
            Interval::new(EndPoint::Finite(3), EndPoint::PositiveInfinity, false, true).unwrap_err();
        assert!(matches!(err, MiddError::InvalidInterval(_)));
    }

    #[test]
    fn test_rejects_reversed_bounds() {
        assert!(matches!(
            Interval::closed(10, 0),
            Err(MiddError::InvalidInterval(_))
        ));
    }

    #[test]
    fn test_validate() {
        assert!(Interval::closed(5, 5).unwrap().validate());
        assert!(!Interval::open(5, 5).unwrap().validate());
        assert!(!Interval::closed_open(5, 5).unwrap().validate());
        assert!(Interval::open(4, 5).unwrap().validate());
        assert!(Interval::<i64>::unbounded().validate());
    }

    #[test]
    fn test_single_point() {
        assert!(Interval::point(5).is_single_point());
        assert!(!Interval::closed(5, 6).unwrap().is_single_point());
        assert!(!Interval::open(5, 5).unwrap().is_single_point());
    }

    #[test]
    fn test_display() {
        assert_eq!(Interval::closed(0, 10).unwrap().to_string(), "[0, 10]");
        assert_eq!(Interval::open_closed(0, 10).unwrap().to_string(), "(0, 10]");
        assert_eq!(Interval::point(5).to_string(), "[5]");
        assert_eq!(Interval::at_least(3).to_string(), "[3, +inf)");
        assert_eq!(Interval::<i64>::unbounded().to_string(), "(-inf, +inf)");
    }

    #[test]
    fn test_bound_value() {
        assert_eq!(Interval::less_than(4).bound_value(), Ok(&4));
        assert_eq!(Interval::closed(1, 2).unwrap().bound_value(), Ok(&1));
        assert_eq!(
            Interval::<i64>::unbounded().bound_value(),
            Err(MiddError::MissingType)
        );
    }
}

// ============================================================================
// Copy-on-write Tests
// ============================================================================

mod copy_on_write {
    use super::*;

    #[test]
    fn test_close_left_returns_copy() {
        let original = Interval::open(0, 10).unwrap();
        let closed = original.close_left(true).unwrap();

        assert_eq!(closed, Interval::closed_open(0, 10).unwrap());
        assert_eq!(original, Interval::open(0, 10).unwrap());
    }

    #[test]
    fn test_close_right_rejects_infinity() {
        let i = Interval::at_least(3);
        assert!(matches!(
            i.close_right(true),
            Err(MiddError::InvalidInterval(_))
        ));
        assert_eq!(i.close_right(false).unwrap(), i);
    }

    #[test]
    fn test_close_left_rejects_infinity() {
        assert!(Interval::less_than(3).close_left(true).is_err());
    }

    #[test]
    fn test_with_single_value() {
        let i = Interval::open(0, 10).unwrap();
        assert_eq!(
            i.with_single_value(EndPoint::Finite(4)).unwrap(),
            Interval::point(4)
        );
        assert!(i.with_single_value(EndPoint::PositiveInfinity).is_err());
    }

    #[test]
    fn test_with_upper_infinite() {
        let i = Interval::closed(2, 10).unwrap();
        assert_eq!(i.with_upper_infinite(), Interval::at_least(2));
        assert_eq!(i, Interval::closed(2, 10).unwrap());
    }
}

// ============================================================================
// Membership Tests
// ============================================================================

mod has_value {
    use super::*;

    #[test]
    fn test_closed_bounds() {
        let i = Interval::closed(0, 10).unwrap();
        assert!(i.has_value(Some(&0)));
        assert!(i.has_value(Some(&10)));
        assert!(i.has_value(Some(&5)));
        assert!(!i.has_value(Some(&11)));
        assert!(!i.has_value(Some(&-1)));
    }

    #[test]
    fn test_open_bounds() {
        let i = Interval::open(0, 10).unwrap();
        assert!(!i.has_value(Some(&0)));
        assert!(!i.has_value(Some(&10)));
        assert!(i.has_value(Some(&1)));
    }

    #[test]
    fn test_missing_value() {
        assert!(!Interval::closed(0, 10).unwrap().has_value(None));
        assert!(Interval::less_than(10).has_value(None));
        assert!(Interval::at_least(10).has_value(None));
        assert!(Interval::<i64>::unbounded().has_value(None));
        assert!(!Interval::point(3).has_value(None));
    }

    #[test]
    fn test_half_line() {
        let i = Interval::less_than(10);
        assert!(i.has_value(Some(&i64::MIN)));
        assert!(i.has_value(Some(&9)));
        assert!(!i.has_value(Some(&10)));
    }

    #[test]
    fn test_is_below() {
        assert!(Interval::closed_open(0, 5).unwrap().is_below(&5));
        assert!(!Interval::closed(0, 5).unwrap().is_below(&5));
        assert!(!Interval::at_least(0).is_below(&100));
    }
}

// ============================================================================
// Relation Tests
// ============================================================================

mod relations {
    use super::*;

    #[test]
    fn test_intersects_touching() {
        let a = Interval::closed(0, 5).unwrap();
        assert!(a.intersects(&Interval::closed(5, 10).unwrap()));
        assert!(!a.intersects(&Interval::open_closed(5, 10).unwrap()));
        assert!(!Interval::closed_open(0, 5)
            .unwrap()
            .intersects(&Interval::closed(5, 10).unwrap()));
    }

    #[test]
    fn test_intersects_disjoint_and_nested() {
        let a = Interval::closed(0, 3).unwrap();
        assert!(!a.intersects(&Interval::closed(4, 10).unwrap()));
        assert!(a.intersects(&Interval::unbounded()));
        assert!(Interval::open(3, 5)
            .unwrap()
            .intersects(&Interval::closed(0, 10).unwrap()));
    }

    #[test]
    fn test_intersects_matches_grid() {
        for a in sample_intervals() {
            for b in sample_intervals() {
                let shared = grid().any(|v| a.has_value(Some(&v)) && b.has_value(Some(&v)));
                // Open intervals over an integer grid can intersect between
                // grid points, so only the positive direction is exact.
                if shared {
                    assert!(a.intersects(&b), "{} should intersect {}", a, b);
                }
                assert_eq!(a.intersects(&b), b.intersects(&a), "{} vs {}", a, b);
            }
        }
    }

    #[test]
    fn test_contains() {
        let outer = Interval::closed(0, 10).unwrap();
        assert!(outer.contains(&Interval::open(0, 10).unwrap()));
        assert!(outer.contains(&Interval::point(10)));
        assert!(!Interval::open(0, 10).unwrap().contains(&outer));
        assert!(!outer.contains(&Interval::closed(5, 11).unwrap()));
        assert!(Interval::unbounded().contains(&Interval::less_than(3)));
    }

    #[test]
    fn test_contains_reflexive_and_antisymmetric() {
        for a in sample_intervals() {
            assert!(a.contains(&a), "{} should contain itself", a);
            for b in sample_intervals() {
                if a.contains(&b) && b.contains(&a) {
                    assert_eq!(a, b);
                }
            }
        }
    }
}

// ============================================================================
// Complement Tests
// ============================================================================

mod complement {
    use super::*;

    #[test]
    fn test_middle_cut() {
        let a = Interval::closed(0, 10).unwrap();
        let rest = a.complement(&Interval::point(3));
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[0], Interval::closed_open(0, 3).unwrap());
        assert_eq!(rest[1], Interval::open_closed(3, 10).unwrap());
    }

    #[test]
    fn test_touching_bound_is_dropped() {
        let a = Interval::closed(0, 5).unwrap();
        let rest = a.complement(&Interval::closed(5, 10).unwrap());
        assert_eq!(rest.as_slice(), &[Interval::closed_open(0, 5).unwrap()]);

        let rest = a.complement(&Interval::open_closed(5, 10).unwrap());
        assert_eq!(rest.as_slice(), &[a.clone()]);
    }

    #[test]
    fn test_open_other_keeps_end_points() {
        let a = Interval::closed(0, 10).unwrap();
        let rest = a.complement(&Interval::open(0, 10).unwrap());
        assert_eq!(rest.as_slice(), &[Interval::point(0), Interval::point(10)]);
    }

    #[test]
    fn test_one_sided() {
        let a = Interval::closed(0, 10).unwrap();
        let rest = a.complement(&Interval::greater_than(5));
        assert_eq!(rest.as_slice(), &[Interval::closed(0, 5).unwrap()]);

        let rest = Interval::unbounded().complement(&Interval::point(3));
        assert_eq!(
            rest.as_slice(),
            &[Interval::less_than(3), Interval::greater_than(3)]
        );
    }

    #[test]
    fn test_self_complement_is_empty() {
        for a in sample_intervals() {
            assert!(a.complement(&a).is_empty(), "{} \\ {} not empty", a, a);
        }
    }

    #[test]
    fn test_partition_of_unity() {
        for a in sample_intervals() {
            for b in sample_intervals() {
                let rest = a.complement(&b);
                let common = a.intersection(&b);
                for piece in &rest {
                    assert!(piece.validate());
                    assert!(a.contains(piece), "{} \\ {} escaped: {}", a, b, piece);
                }
                for v in grid() {
                    let in_rest = rest.iter().any(|p| p.has_value(Some(&v)));
                    let in_common = common.as_ref().is_some_and(|c| c.has_value(Some(&v)));
                    assert_eq!(
                        a.has_value(Some(&v)),
                        in_rest || in_common,
                        "{} \\ {} at {}",
                        a,
                        b,
                        v
                    );
                    if b.has_value(Some(&v)) {
                        assert!(!in_rest, "{} \\ {} kept {}", a, b, v);
                    }
                }
            }
        }
    }

    #[test]
    fn test_intersection() {
        let a = Interval::closed(0, 10).unwrap();
        assert_eq!(
            a.intersection(&Interval::open(5, 20).unwrap()),
            Some(Interval::open_closed(5, 10).unwrap())
        );
        assert_eq!(a.intersection(&Interval::greater_than(10)), None);
        assert_eq!(
            a.intersection(&Interval::at_least(10)),
            Some(Interval::point(10))
        );
    }
}

// ============================================================================
// Merge Tests
// ============================================================================

mod merge {
    use super::*;

    #[test]
    fn test_include_point_into_range() {
        let range = Interval::open(0, 5).unwrap();
        assert_eq!(
            range.include_bound(&Interval::point(5)).unwrap(),
            Interval::open_closed(0, 5).unwrap()
        );
        assert_eq!(
            range.include_bound(&Interval::point(0)).unwrap(),
            Interval::closed_open(0, 5).unwrap()
        );
    }

    #[test]
    fn test_include_range_into_point() {
        let point = Interval::point(5);
        assert_eq!(
            point.include_bound(&Interval::open(5, 9).unwrap()).unwrap(),
            Interval::closed_open(5, 9).unwrap()
        );
        assert_eq!(
            point.include_bound(&Interval::less_than(5)).unwrap(),
            Interval::at_most(5)
        );
    }

    #[test]
    fn test_include_bound_rejects_unsupported_pairs() {
        let range = Interval::open(0, 5).unwrap();
        assert!(matches!(
            range.include_bound(&Interval::open(5, 9).unwrap()),
            Err(MiddError::InvalidMerge(_))
        ));
        assert!(matches!(
            range.include_bound(&Interval::point(7)),
            Err(MiddError::InvalidMerge(_))
        ));
        assert!(matches!(
            Interval::point(1).include_bound(&Interval::point(1)),
            Err(MiddError::InvalidMerge(_))
        ));
    }

    #[test]
    fn test_coalesce() {
        let left = Interval::closed_open(0, 5).unwrap();
        let right = Interval::closed(5, 9).unwrap();
        assert_eq!(left.coalesce(&right).unwrap(), Interval::closed(0, 9).unwrap());

        let point = Interval::point(9);
        let after = Interval::greater_than(9);
        assert_eq!(point.coalesce(&after).unwrap(), Interval::at_least(9));

        assert!(left.coalesce(&Interval::open(5, 9).unwrap()).is_err());
        assert!(left.coalesce(&Interval::closed(6, 9).unwrap()).is_err());
    }
}

// ============================================================================
// Partition Tests
// ============================================================================

mod partition {
    use super::*;

    #[test]
    fn test_cover_fills_gaps() {
        let edges = [
            (Interval::closed_open(0, 5).unwrap(), 1),
            (Interval::open(5, 10).unwrap(), 2),
        ];
        let segments = cover(edges.iter().map(|(i, c)| (i, *c)));

        let intervals: Vec<_> = segments.iter().map(|s| s.interval.clone()).collect();
        assert_eq!(
            intervals,
            vec![
                Interval::less_than(0),
                Interval::closed_open(0, 5).unwrap(),
                Interval::point(5),
                Interval::open(5, 10).unwrap(),
                Interval::at_least(10),
            ]
        );
        let payloads: Vec<_> = segments.iter().map(|s| s.payload).collect();
        assert_eq!(payloads, vec![None, Some(1), None, Some(2), None]);
    }

    #[test]
    fn test_cover_of_nothing_is_the_line() {
        let segments = cover::<i64, u8, _>(std::iter::empty());
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].interval, Interval::unbounded());
    }

    #[test]
    fn test_cover_with_unbounded_edges() {
        let edges = [
            (Interval::less_than(0), 'a'),
            (Interval::at_least(0), 'b'),
        ];
        let segments = cover(edges.iter().map(|(i, c)| (i, *c)));
        assert_eq!(segments.len(), 2);
        assert!(segments.iter().all(|s| s.payload.is_some()));
    }

    #[test]
    fn test_overlay() {
        let left = cover([(&Interval::closed(0, 10).unwrap(), 'a')]);
        let right = cover([(&Interval::open_closed(5, 20).unwrap(), 'b')]);
        let pieces = overlay(&left, &right);

        let got: Vec<_> = pieces
            .iter()
            .map(|p| (p.interval.clone(), p.left, p.right))
            .collect();
        assert_eq!(
            got,
            vec![
                (Interval::less_than(0), None, None),
                (Interval::closed(0, 5).unwrap(), Some('a'), None),
                (Interval::open_closed(5, 10).unwrap(), Some('a'), Some('b')),
                (Interval::open_closed(10, 20).unwrap(), None, Some('b')),
                (Interval::greater_than(20), None, None),
            ]
        );
    }

    #[test]
    fn test_overlay_pieces_are_a_partition() {
        let left = cover([
            (&Interval::point(3), 1),
            (&Interval::open(3, 8).unwrap(), 2),
        ]);
        let right = cover([
            (&Interval::less_than(5), 3),
            (&Interval::closed(7, 7).unwrap(), 4),
        ]);
        let pieces = overlay(&left, &right);
        assert!(is_partition(pieces.iter().map(|p| &p.interval)));
        for v in -2..12 {
            let hits = pieces.iter().filter(|p| p.interval.has_value(Some(&v))).count();
            assert_eq!(hits, 1, "value {} covered {} times", v, hits);
        }
    }

    #[test]
    fn test_is_partition() {
        let ok = [Interval::closed(0, 1).unwrap(), Interval::open(1, 3).unwrap()];
        assert!(is_partition(ok.iter()));

        let overlapping = [Interval::closed(0, 2).unwrap(), Interval::closed(2, 3).unwrap()];
        assert!(!is_partition(overlapping.iter()));

        let unsorted = [Interval::closed(5, 6).unwrap(), Interval::closed(0, 1).unwrap()];
        assert!(!is_partition(unsorted.iter()));

        let empty_edge = [Interval::open(1, 1).unwrap()];
        assert!(!is_partition(empty_edge.iter()));
    }
}
