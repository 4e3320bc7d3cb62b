use std::collections::HashSet;

use itertools::Itertools;
use quickcheck::{Arbitrary, Gen, QuickCheck, TestResult};
use sorted_table::OrderedMultimap;

// Helper macro to allow us to use smaller quickcheck limits under miri.
macro_rules! quickcheck_limit {
    (@as_items $($i:item)*) => ($($i)*);
    {
        $(
            $(#[$m:meta])*
            fn $fn_name:ident($($arg_name:ident : $arg_ty:ty),*) -> $ret:ty {
                $($code:tt)*
            }
        )*
    } => (
        quickcheck::quickcheck! {
            @as_items
            $(
                #[test]
                $(#[$m])*
                fn $fn_name() {
                    fn prop($($arg_name: $arg_ty),*) -> $ret {
                        $($code)*
                    }
                    let mut quickcheck = QuickCheck::new();
                    if cfg!(miri) {
                        quickcheck = quickcheck
                            .gen(Gen::new(10))
                            .tests(10)
                            .max_tests(100);
                    }

                    quickcheck.quickcheck(prop as fn($($arg_ty),*) -> $ret);
                }
            )*
        }
    )
}

#[derive(Clone, Debug)]
enum Op {
    Insert(u8, u8),
    InsertAll(Vec<(u8, u8)>),
    Remove(u8),
    Erase(usize),
    GetOrInsert(u8),
}

impl Arbitrary for Op {
    fn arbitrary(g: &mut Gen) -> Self {
        match u8::arbitrary(g) % 5 {
            0 | 1 => Op::Insert(u8::arbitrary(g), u8::arbitrary(g)),
            2 => Op::InsertAll(Vec::arbitrary(g)),
            3 => Op::Remove(u8::arbitrary(g)),
            _ if bool::arbitrary(g) => Op::Erase(usize::arbitrary(g)),
            _ => Op::GetOrInsert(u8::arbitrary(g)),
        }
    }
}

fn is_sorted<K: Ord, V>(table: &OrderedMultimap<K, V>) -> bool {
    table.keys().tuple_windows().all(|(a, b)| a <= b)
}

fn sorted_rows(table: &OrderedMultimap<u8, u8>) -> Vec<(u8, u8)> {
    table.iter().map(|(k, v)| (*k, *v)).sorted().collect()
}

/// Applies `op` to both the table and a plain vector model, checking the
/// per-operation size contract along the way.
fn apply(table: &mut OrderedMultimap<u8, u8>, model: &mut Vec<(u8, u8)>, op: &Op) {
    let before = table.len();
    match op {
        Op::Insert(key, value) => {
            table.insert(*key, *value);
            model.push((*key, *value));
            assert_eq!(table.len(), before + 1);
        }
        Op::InsertAll(rows) => {
            let mut batch = rows.clone();
            table.insert_all(&mut batch);
            assert!(batch.is_empty());
            model.extend(rows.iter().copied());
            assert_eq!(table.len(), before + rows.len());
        }
        Op::Remove(key) => {
            if table.contains(key) {
                let value = table.remove(key);
                let pos = model
                    .iter()
                    .position(|row| *row == (*key, value))
                    .expect("removed row must exist in the model");
                model.swap_remove(pos);
                assert_eq!(table.len(), before - 1);
            } else {
                assert!(table.try_remove(key).is_err());
                assert_eq!(table.len(), before);
            }
        }
        Op::Erase(index) => {
            if table.is_empty() {
                assert!(table.try_erase(*index).is_err());
            } else {
                let row = table.erase(index % table.len());
                let pos = model
                    .iter()
                    .position(|r| *r == row)
                    .expect("erased row must exist in the model");
                model.swap_remove(pos);
                assert_eq!(table.len(), before - 1);
            }
        }
        Op::GetOrInsert(key) => {
            let existed = table.contains(key);
            let value = *table.get_or_insert_default(*key);
            if !existed {
                assert_eq!(value, 0);
                model.push((*key, 0));
            }
            assert_eq!(table.len(), before + usize::from(!existed));
        }
    }
}

quickcheck_limit! {
    fn sorted_after_inserts(insert: Vec<(u8, u8)>) -> bool {
        let mut table = OrderedMultimap::new();
        for &(key, value) in &insert {
            table.insert(key, value);
        }
        is_sorted(&table) && table.len() == insert.len()
    }

    fn contains_inserted(insert: Vec<(u8, u8)>, not: Vec<u8>) -> bool {
        let table: OrderedMultimap<_, _> = insert.iter().copied().collect();
        let present: HashSet<u8> = insert.iter().map(|(k, _)| *k).collect();
        insert.iter().all(|(k, v)| table.equal_range_rows(k).iter().any(|row| row.1 == *v))
            && not.iter().all(|k| table.contains(k) == present.contains(k))
    }

    fn count_matches_equal_range(insert: Vec<(u8, ())>) -> bool {
        let table = OrderedMultimap::from(insert.clone());
        (0..=u8::MAX).all(|key| {
            let expected = insert.iter().filter(|(k, _)| *k == key).count();
            table.count(&key) == expected && table.equal_range(&key).len() == expected
        })
    }

    fn bounds_match_linear_scan(insert: Vec<u8>, probe: u8) -> bool {
        let table: OrderedMultimap<u8, ()> = insert.iter().map(|&k| (k, ())).collect();
        let keys: Vec<u8> = table.keys().copied().collect();
        let lower = keys.iter().position(|k| *k >= probe).unwrap_or(keys.len());
        let upper = keys.iter().position(|k| *k > probe).unwrap_or(keys.len());
        table.lower_bound(&probe) == lower
            && table.upper_bound(&probe) == upper
            && table.equal_range(&probe) == (lower..upper)
    }

    fn insert_all_matches_repeated_insert(base: Vec<(u8, u8)>, batch: Vec<(u8, u8)>) -> bool {
        let mut one_by_one = OrderedMultimap::from(base.clone());
        for &(key, value) in &batch {
            one_by_one.insert(key, value);
        }

        let mut bulk = OrderedMultimap::from(base);
        let mut rows = batch;
        bulk.insert_all(&mut rows);

        rows.is_empty() && is_sorted(&bulk) && sorted_rows(&bulk) == sorted_rows(&one_by_one)
    }

    fn get_or_insert_is_idempotent(insert: Vec<(u8, u8)>, key: u8) -> TestResult {
        let mut table = OrderedMultimap::from(insert);
        if table.contains(&key) {
            return TestResult::discard();
        }
        let before = table.len();
        *table.get_or_insert_default(key) = 7;
        let again = *table.get_or_insert_default(key);
        TestResult::from_bool(again == 7 && table.len() == before + 1 && table.count(&key) == 1)
    }

    fn random_ops_keep_invariants(ops: Vec<Op>) -> bool {
        let mut table = OrderedMultimap::new();
        let mut model = Vec::new();
        for op in &ops {
            apply(&mut table, &mut model, op);
            assert!(is_sorted(&table), "unsorted after {:?}", op);
            assert_eq!(table.iter().count(), table.len());
        }
        model.sort();
        sorted_rows(&table) == model
    }

    fn clear_empties(insert: Vec<(u8, u8)>) -> bool {
        let mut table = OrderedMultimap::from(insert.clone());
        table.clear();
        table.is_empty() && insert.iter().all(|(k, _)| !table.contains(k))
    }
}
