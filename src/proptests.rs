use super::*;

use proptest::prelude::*;
use std::collections::HashMap;

const BLOCK: u64 = 24 * 600;

#[derive(Debug, Clone)]
enum Op {
    Put(i64, i64),
    Get(i64),
}

fn key_strategy() -> impl Strategy<Value = i64> + Clone {
    prop_oneof![
        8 => -64i64..64,
        1 => any::<i64>(),
        1 => Just(i64::MIN),
    ]
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let op = prop_oneof![
        3 => (key.clone(), any::<i64>()).prop_map(|(k, v)| Op::Put(k, v)),
        2 => key.prop_map(Op::Get),
    ];
    prop::collection::vec(op, 1..300)
}

fn fresh() -> LongLongMap<HeapMemory> {
    LongLongMap::new(HeapMemory::new(0, BLOCK as usize), 0, BLOCK).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 10_000,
        .. ProptestConfig::default()
    })]

    // Keys are only put while they are new or still own their primary slot,
    // which is where `put` and a std map agree.
    #[test]
    fn prop_agrees_with_hashmap(ops in ops_strategy()) {
        let mut map = fresh();
        let mut model: HashMap<i64, i64> = HashMap::new();

        for op in ops {
            match op {
                Op::Put(key, value) => {
                    let owns_slot = map.chain(key).next().map(|(k, _)| k) == Some(key);
                    if model.contains_key(&key) && !owns_slot {
                        continue;
                    }
                    let expected = model.insert(key, value).unwrap_or(0);
                    prop_assert_eq!(map.put(key, value), Ok(expected));
                }
                Op::Get(key) => {
                    prop_assert_eq!(map.find(key), model.get(&key).copied());
                    prop_assert_eq!(map.get(key), model.get(&key).copied().unwrap_or(0));
                }
            }
            prop_assert_eq!(map.len(), model.len() as u64);
        }

        for (k, v) in &model {
            prop_assert_eq!(map.get(*k), *v);
        }
    }

    #[test]
    fn prop_reads_never_write(
        puts in prop::collection::vec((key_strategy(), any::<i64>()), 0..100),
        reads in prop::collection::vec(any::<i64>(), 0..100),
    ) {
        let mut map = fresh();
        for (k, v) in puts {
            map.put(k, v).unwrap();
        }
        let before = map.memory().as_bytes().to_vec();
        let stats = map.stats();
        for k in reads {
            map.get(k);
            map.find(k);
        }
        prop_assert_eq!(before.as_slice(), map.memory().as_bytes());
        prop_assert_eq!(stats, map.stats());
    }

    #[test]
    fn prop_colliding_keys_exhaust_cleanly(slot in 0i64..400, extra in 1usize..10) {
        let mut map = fresh();
        let primary = map.primary_slots() as i64;
        let overflow = map.overflow_slots() as usize;
        map.put(slot + 1, 1).unwrap();
        let colliding: Vec<i64> = (0..=overflow + extra).map(|i| slot + i as i64 * primary).collect();

        for (i, k) in colliding.iter().enumerate() {
            let result = map.put(*k, i as i64 + 10);
            if i <= overflow {
                prop_assert_eq!(result, Ok(0));
            } else {
                let is_out_of_capacity = matches!(result, Err(MapError::OutOfCapacity { .. }));
                prop_assert!(is_out_of_capacity);
            }
        }
        for (i, k) in colliding.iter().take(overflow + 1).enumerate() {
            prop_assert_eq!(map.get(*k), i as i64 + 10);
        }
        prop_assert_eq!(map.get(slot + 1), 1);
        prop_assert_eq!(map.overflow_remaining(), 0);
    }
}
