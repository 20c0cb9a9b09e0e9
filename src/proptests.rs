//! Model-based tests driving both engines through the same operation
//! sequences and checking them against `std` ordered collections, plus a
//! paste-generated suite run once per engine.

use std::collections::{BTreeSet, HashMap};

use paste::paste;
use proptest::prelude::*;
use rand::{rngs::SmallRng, SeedableRng};

use crate::{
    test_utils::{depth, validate_avl, validate_treap},
    AllocStrategy, AvlTree, ByKey, Natural, Options, OrderedTree, Reverse, Treap,
};

#[derive(Debug, Clone)]
enum Op<K> {
    Insert(K),
    InsertOrIgnore(K),
    Remove(K),
    Clear,
}

fn arbitrary_op<K: std::fmt::Debug + Clone>(
    key: impl Strategy<Value = K> + Clone,
) -> impl Strategy<Value = Op<K>> {
    prop_oneof![
        8 => key.clone().prop_map(Op::Insert),
        2 => key.clone().prop_map(Op::InsertOrIgnore),
        5 => key.prop_map(Op::Remove),
        1 => Just(Op::Clear),
    ]
}

/// Every read-only query, checked against the sorted model contents.
fn check_queries<T, K>(t: &T, sorted: &[K], p: K) -> Result<(), TestCaseError>
where
    T: OrderedTree<K>,
    K: Ord + Copy + std::fmt::Debug,
{
    prop_assert_eq!(t.find(&p), sorted.iter().find(|&&v| v == p));
    prop_assert_eq!(t.contains(&p), sorted.contains(&p));

    prop_assert_eq!(t.prev(&p), sorted.iter().rev().find(|&&v| v < p));
    prop_assert_eq!(t.next(&p), sorted.iter().find(|&&v| v > p));
    prop_assert_eq!(t.find_or_prev(&p), sorted.iter().rev().find(|&&v| v <= p));
    prop_assert_eq!(t.find_or_next(&p), sorted.iter().find(|&&v| v >= p));

    let less = sorted.iter().filter(|&&v| v < p).count();
    prop_assert_eq!(t.rank(&p), less + 1);

    Ok(())
}

/// Both engines and a `BTreeSet` stay observably identical through any
/// operation sequence, with every structural invariant intact after every
/// step. Generated once per key domain: dense domains hammer the
/// displace-on-clash paths, sparse ones the structural churn.
macro_rules! model_fuzz {
    ($name:ident, $key:ty, $domain:expr) => {
        paste! {
            proptest! {
                #[test]
                fn [<prop_engines_match_model_ $name>](
                    ops in prop::collection::vec(arbitrary_op($domain), 1..128),
                    probes in prop::collection::vec($domain, 8),
                ) {
                    let mut avl = AvlTree::new();
                    let mut treap = Treap::with_rng(
                        Natural,
                        Options::default(),
                        SmallRng::seed_from_u64(0xfeed),
                    );
                    let mut model = BTreeSet::new();

                    for op in ops {
                        match op {
                            Op::Insert(v) => {
                                let displaced = model.take(&v);
                                model.insert(v);
                                prop_assert_eq!(avl.insert(v), displaced);
                                prop_assert_eq!(treap.insert(v), displaced);
                            }
                            Op::InsertOrIgnore(v) => {
                                let fresh = model.insert(v);
                                prop_assert_eq!(avl.insert_or_ignore(v), fresh);
                                prop_assert_eq!(treap.insert_or_ignore(v), fresh);
                            }
                            Op::Remove(v) => {
                                let had = model.remove(&v).then_some(v);
                                prop_assert_eq!(avl.remove(&v), had);
                                prop_assert_eq!(treap.remove(&v), had);
                            }
                            Op::Clear => {
                                avl.clear();
                                treap.clear();
                                model.clear();
                            }
                        }

                        validate_avl(&avl);
                        validate_treap(&treap);
                        prop_assert_eq!(avl.len(), model.len());
                        prop_assert_eq!(treap.len(), model.len());
                    }

                    let sorted: Vec<$key> = model.iter().copied().collect();
                    prop_assert_eq!(avl.iter().copied().collect::<Vec<_>>(), sorted.clone());
                    prop_assert_eq!(treap.iter().copied().collect::<Vec<_>>(), sorted.clone());

                    prop_assert_eq!(avl.min(), model.first());
                    prop_assert_eq!(avl.max(), model.last());
                    prop_assert_eq!(treap.min(), model.first());
                    prop_assert_eq!(treap.max(), model.last());

                    for p in probes {
                        check_queries(&avl, &sorted, p)?;
                        check_queries(&treap, &sorted, p)?;
                    }

                    for (i, v) in sorted.iter().enumerate() {
                        prop_assert_eq!(avl.rank_nth(i + 1), Some(v));
                        prop_assert_eq!(treap.rank_nth(i + 1), Some(v));
                        prop_assert_eq!(avl.rank(v), i + 1);
                        prop_assert_eq!(treap.rank(v), i + 1);
                    }
                    prop_assert_eq!(avl.rank_nth(0), None);
                    prop_assert_eq!(avl.rank_nth(sorted.len() + 1), None);
                    prop_assert_eq!(treap.rank_nth(0), None);
                    prop_assert_eq!(treap.rank_nth(sorted.len() + 1), None);
                }
            }
        }
    };
}

model_fuzz!(dense_keys, u8, 0..16_u8);
model_fuzz!(byte_keys, u8, any::<u8>());
model_fuzz!(wide_keys, u32, any::<u32>());

proptest! {
    /// Bounded scans agree with `BTreeSet::range` for every bound
    /// combination, on both engines.
    #[test]
    fn prop_range_bounds_match_model(
        values in prop::collection::btree_set(any::<u8>(), 0..64),
        start in any::<u8>(),
        end in any::<u8>(),
    ) {
        let mut avl = AvlTree::new();
        let mut treap = Treap::with_rng(
            Natural,
            Options::default(),
            SmallRng::seed_from_u64(0xbeef),
        );
        for &v in &values {
            avl.insert(v);
            treap.insert(v);
        }

        fn collect_scan(scan: impl FnOnce(&mut dyn FnMut(&u8) -> bool)) -> Vec<u8> {
            let mut out = Vec::new();
            scan(&mut |v: &u8| {
                out.push(*v);
                true
            });
            out
        }

        let want_from_to: Vec<u8> = if start <= end {
            values.range(start..end).copied().collect()
        } else {
            Vec::new()
        };
        let want_from: Vec<u8> = values.range(start..).copied().collect();
        let want_to: Vec<u8> = values.range(..end).copied().collect();

        prop_assert_eq!(
            collect_scan(|f| avl.range_from_to(&start, &end, f)),
            want_from_to.clone()
        );
        prop_assert_eq!(
            collect_scan(|f| treap.range_from_to(&start, &end, f)),
            want_from_to
        );
        prop_assert_eq!(collect_scan(|f| avl.range_from(&start, f)), want_from.clone());
        prop_assert_eq!(collect_scan(|f| treap.range_from(&start, f)), want_from);
        prop_assert_eq!(collect_scan(|f| avl.range_to(&end, f)), want_to.clone());
        prop_assert_eq!(collect_scan(|f| treap.range_to(&end, f)), want_to);

        let mut want_rev: Vec<u8> = values.iter().copied().collect();
        want_rev.reverse();
        prop_assert_eq!(collect_scan(|f| avl.range_rev(f)), want_rev.clone());
        prop_assert_eq!(collect_scan(|f| treap.range_rev(f)), want_rev);

        // A false return stops the scan immediately.
        let mut seen = 0;
        avl.range(|_| {
            seen += 1;
            seen < 3
        });
        prop_assert_eq!(seen, values.len().min(3));
    }

    /// The AVL discipline's worst-case height holds for arbitrary inputs.
    #[test]
    fn prop_avl_height_bound(values in prop::collection::vec(any::<u32>(), 1..512)) {
        let mut t = AvlTree::new();
        for v in values {
            t.insert(v);
        }

        let n = t.len() as f64;
        let bound = (1.44 * (n + 2.0).log2()).floor() as usize;
        prop_assert!(depth(t.raw()) <= bound.max(1));
    }
}

/// The suite below runs once per engine; `$ctor` builds a tree from a
/// comparator and [`Options`].
macro_rules! engine_tests {
    ($name:ident, $ctor:expr) => {
        paste! {
            #[test]
            fn [<test_ $name _neighbour_queries>]() {
                let mut t = ($ctor)(Natural, Options::default());
                for v in [10_u32, 20, 30] {
                    t.insert(v);
                }

                assert_eq!(t.prev(&10), None);
                assert_eq!(t.prev(&25), Some(&20));
                assert_eq!(t.next(&20), Some(&30));
                assert_eq!(t.next(&30), None);

                // Probes entirely outside the stored range.
                assert_eq!(t.find_or_next(&5), Some(&10));
                assert_eq!(t.find_or_next(&35), None);
                assert_eq!(t.find_or_prev(&35), Some(&30));
                assert_eq!(t.find_or_prev(&5), None);

                // Equal probes resolve to the stored element itself.
                assert_eq!(t.find_or_next(&20), Some(&20));
                assert_eq!(t.find_or_prev(&20), Some(&20));
            }

            #[test]
            fn [<test_ $name _rank_round_trip>]() {
                let mut t = ($ctor)(Natural, Options::default());
                for v in [5_u32, 3, 8, 1, 4, 7, 9] {
                    t.insert(v);
                }

                assert_eq!(t.rank(&1), 1);
                assert_eq!(t.rank(&5), 4);
                assert_eq!(t.rank(&9), 7);

                // Absent probes report their insertion rank.
                assert_eq!(t.rank(&0), 1);
                assert_eq!(t.rank(&6), 5);
                assert_eq!(t.rank(&10), 8);

                assert_eq!(t.rank_nth(4), Some(&5));
                assert_eq!(t.rank_nth(7), Some(&9));

                t.remove(&5);
                assert_eq!(t.rank(&7), 4);
                assert_eq!(t.rank_nth(4), Some(&7));
            }

            #[test]
            fn [<test_ $name _counted_multiset>]() {
                let opts = Options {
                    multiplicity: Some(|v: &(u32, usize)| v.1),
                    ..Options::default()
                };
                let mut t = ($ctor)(ByKey::new(|v: &(u32, usize)| v.0), opts);

                t.insert((1, 2));
                t.insert((2, 1));
                t.insert((3, 3));
                assert_eq!(t.len(), 6);

                // Ranks and positions are in units, not elements.
                assert_eq!(t.rank(&(3, 0)), 4);
                assert_eq!(t.rank_nth(1), Some(&(1, 2)));
                assert_eq!(t.rank_nth(3), Some(&(2, 1)));
                assert_eq!(t.rank_nth(6), Some(&(3, 3)));
                assert_eq!(t.rank_nth(7), None);

                // Visitors adjusting the count are reflected immediately.
                t.insert_or_visit((1, 1), |slot| slot.1 += 1);
                assert_eq!(t.len(), 7);
                assert_eq!(t.rank(&(2, 0)), 4);

                for round in 0..3 {
                    let removed = t.remove_if(&(1, 0), |slot| {
                        slot.1 -= 1;
                        slot.1 == 0
                    });
                    // Only the decrement that reaches zero removes the node.
                    assert_eq!(removed, round == 2);
                }
                assert!(!t.contains(&(1, 0)));
                assert_eq!(t.len(), 4);
            }

            #[test]
            fn [<test_ $name _insert_or_ignore_idempotent>]() {
                let mut t = ($ctor)(ByKey::new(|v: &(u32, &str)| v.0), Options::default());

                assert!(t.insert_or_ignore((1, "first")));

                // The first value wins; the clash leaves the tree untouched.
                assert!(!t.insert_or_ignore((1, "second")));
                assert_eq!(t.find(&(1, "")), Some(&(1, "first")));
                assert_eq!(t.len(), 1);
            }

            #[test]
            fn [<test_ $name _custom_comparator>]() {
                let mut t = ($ctor)(Reverse::new(Natural), Options::default());
                for v in [1_u32, 2, 3] {
                    t.insert(v);
                }

                // Descending order: the comparator's least element is 3.
                assert_eq!(t.min(), Some(&3));
                assert_eq!(t.max(), Some(&1));
                assert_eq!(t.rank(&3), 1);
                assert_eq!(t.next(&3), Some(&2));
                assert_eq!(t.iter().copied().collect::<Vec<_>>(), [3, 2, 1]);
            }

            #[test]
            fn [<test_ $name _block_allocator>]() {
                let opts = Options {
                    allocator: AllocStrategy::Block { block_size: 16 },
                    ..Options::default()
                };
                let mut t = ($ctor)(Natural, opts);

                for v in 0..100_u32 {
                    t.insert(v);
                }
                for v in (0..100).step_by(2) {
                    assert_eq!(t.remove(&v), Some(v));
                }
                assert_eq!(t.len(), 50);
                assert_eq!(t.min(), Some(&1));

                t.clear();
                assert!(t.is_empty());
                t.insert(7);
                assert_eq!(t.find(&7), Some(&7));
            }

            proptest! {
                /// Counted-multiset bookkeeping agrees with a key-to-count
                /// map for arbitrary add/subtract sequences.
                #[test]
                fn [<prop_ $name _multiset_matches_model>](
                    ops in prop::collection::vec((any::<bool>(), 0..16_u32), 1..128),
                ) {
                    let opts = Options {
                        multiplicity: Some(|v: &(u32, usize)| v.1),
                        ..Options::default()
                    };
                    let mut t = ($ctor)(ByKey::new(|v: &(u32, usize)| v.0), opts);
                    let mut model: HashMap<u32, usize> = HashMap::new();

                    for (add, key) in ops {
                        if add {
                            t.insert_or_visit((key, 1), |slot| slot.1 += 1);
                            *model.entry(key).or_insert(0) += 1;
                        } else {
                            let removed = t.remove_if(&(key, 0), |slot| {
                                slot.1 -= 1;
                                slot.1 == 0
                            });
                            prop_assert_eq!(removed, model.get(&key) == Some(&1));
                            if let Some(count) = model.get_mut(&key) {
                                *count -= 1;
                                if *count == 0 {
                                    model.remove(&key);
                                }
                            }
                        }

                        prop_assert_eq!(t.len(), model.values().sum::<usize>());
                    }

                    let mut keys: Vec<u32> = model.keys().copied().collect();
                    keys.sort_unstable();

                    let mut rank = 1;
                    for key in keys {
                        prop_assert_eq!(t.rank(&(key, 0)), rank);
                        prop_assert_eq!(t.rank_nth(rank), t.find(&(key, 0)));
                        rank += model[&key];
                    }
                }
            }
        }
    };
}

engine_tests!(avl, AvlTree::with_options);
engine_tests!(treap, |cmp, opts| Treap::with_rng(
    cmp,
    opts,
    SmallRng::seed_from_u64(7)
));
