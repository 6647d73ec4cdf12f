use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use longmap::{HeapMemory, LongLongMap};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn keys(n: usize) -> Vec<i64> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n).map(|_| rng.gen()).collect()
}

fn block_for(n: usize) -> u64 {
    // Twice the nodes needed keeps the overflow area from running dry.
    (n * 2 * 24) as u64
}

pub fn fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill");
    for n in [1_000, 100_000].iter() {
        let keys = keys(*n);
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, &n| {
            b.iter(|| {
                let size = block_for(n);
                let mut map = LongLongMap::new(HeapMemory::new(0, 0), 0, size)
                    .expect("Block too small?");
                for (i, k) in keys.iter().enumerate() {
                    map.put(*k, i as i64).expect("Ran out of overflow slots");
                }
                map
            })
        });
    }
    group.finish()
}

pub fn lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    for n in [1_000, 100_000].iter() {
        let keys = keys(*n);
        let mut map = LongLongMap::new(HeapMemory::new(0, 0), 0, block_for(*n))
            .expect("Block too small?");
        for (i, k) in keys.iter().enumerate() {
            map.put(*k, i as i64).expect("Ran out of overflow slots");
        }
        group.bench_with_input(BenchmarkId::new("hit", n), &keys, |b, keys| {
            b.iter(|| keys.iter().map(|k| map.get(*k)).fold(0i64, i64::wrapping_add))
        });
        let misses: Vec<i64> = keys.iter().map(|k| k.wrapping_add(1)).collect();
        group.bench_with_input(BenchmarkId::new("miss", n), &misses, |b, keys| {
            b.iter(|| keys.iter().filter(|k| map.find(**k).is_none()).count())
        });
    }
    group.finish()
}

pub fn collisions(c: &mut Criterion) {
    c.bench_function("single_chain_64", |b| {
        b.iter(|| {
            let mut map = LongLongMap::new(HeapMemory::new(0, 0), 0, 24 * 195)
                .expect("Block too small?");
            let primary = map.primary_slots() as i64;
            for i in 0..64 {
                map.put(i * primary, i).expect("Ran out of overflow slots");
            }
            map.get(63 * primary)
        })
    });
}

criterion_group!(map_benches, fill, lookup, collisions);
criterion_main!(map_benches);
