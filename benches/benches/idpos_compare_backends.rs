// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_idpos::{BackendKind, GridSize, Pos, SpatialIndex, Tracked};

struct Obj {
    id: u64,
    pos: Pos,
}

impl Tracked for Obj {
    type Id = u64;
    fn id(&self) -> u64 {
        self.id
    }
    fn pos(&self) -> Pos {
        self.pos
    }
}

type Idx = Box<dyn SpatialIndex<Obj> + Send + Sync>;

/// One object per cell of an `n × n` grid.
fn gen_full_grid(n: usize) -> Vec<Arc<Obj>> {
    let mut out = Vec::with_capacity(n * n);
    for x in 0..n {
        for y in 0..n {
            out.push(Arc::new(Obj {
                id: out.len() as u64,
                pos: Pos::new(x, y),
            }));
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

fn filled(kind: BackendKind, n: usize, objs: &[Arc<Obj>]) -> Idx {
    let idx = kind.build(GridSize::new(n, n));
    for o in objs {
        idx.add(o.clone()).unwrap();
    }
    idx
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");
    for &n in &[64usize, 256] {
        let objs = gen_full_grid(n);
        group.throughput(Throughput::Elements((n * n) as u64));
        for kind in BackendKind::ALL {
            group.bench_function(format!("{kind}_n{n}"), |b| {
                b.iter_batched(
                    || kind.build::<Obj>(GridSize::new(n, n)),
                    |idx| {
                        for o in &objs {
                            let _ = idx.add(o.clone());
                        }
                        black_box(idx.count());
                    },
                    BatchSize::LargeInput,
                )
            });
        }
    }
    group.finish();
}

fn bench_move_transpose(c: &mut Criterion) {
    let mut group = c.benchmark_group("move_transpose");
    let n = 128;
    let objs = gen_full_grid(n);
    group.throughput(Throughput::Elements((n * n * 10) as u64));
    for kind in BackendKind::ALL {
        group.bench_function(kind.name(), |b| {
            b.iter_batched(
                || filled(kind, n, &objs),
                |idx| {
                    let mut at: Vec<Pos> = objs.iter().map(|o| o.pos).collect();
                    for _ in 0..10 {
                        for (o, p) in objs.iter().zip(&mut at) {
                            let to = p.transposed();
                            let _ = idx.update_position(o, to);
                            *p = to;
                        }
                    }
                    black_box(idx);
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_move_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("move_random");
    let n = 128;
    let objs = gen_full_grid(n);
    group.throughput(Throughput::Elements((n * n) as u64));
    for kind in BackendKind::ALL {
        group.bench_function(kind.name(), |b| {
            b.iter_batched(
                || (filled(kind, n, &objs), Rng::new(0xCAFE_F00D_DEAD_BEEF)),
                |(idx, mut rng)| {
                    for o in &objs {
                        let to = Pos::new(rng.next_below(n), rng.next_below(n));
                        let _ = idx.update_position(o, to);
                    }
                    black_box(idx);
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_del(c: &mut Criterion) {
    let mut group = c.benchmark_group("del");
    let n = 128;
    let objs = gen_full_grid(n);
    group.throughput(Throughput::Elements((n * n) as u64));
    for kind in BackendKind::ALL {
        group.bench_function(kind.name(), |b| {
            b.iter_batched(
                || filled(kind, n, &objs),
                |idx| {
                    for o in &objs {
                        let _ = idx.del(o);
                    }
                    black_box(idx.count());
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

// Timings include the per-call occupant snapshot, which costs the same for
// every backend; differences come from cell lookup.
fn bench_iterate(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterate_at");
    let n = 128;
    let objs = gen_full_grid(n);
    for kind in BackendKind::ALL {
        let idx = filled(kind, n, &objs);
        group.bench_function(kind.name(), |b| {
            b.iter(|| {
                let mut hits = 0_usize;
                for x in 0..n {
                    for y in 0..n {
                        idx.iterate_at_xy(x, y, &mut |_| {
                            hits += 1;
                            false
                        });
                    }
                }
                black_box(hits);
            })
        });
    }
    group.finish();
}

fn bench_churn_one_cell(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn_one_cell");
    let objs: Vec<_> = (0..64_u64)
        .map(|id| {
            Arc::new(Obj {
                id,
                pos: Pos::new(3, 3),
            })
        })
        .collect();
    for kind in BackendKind::ALL {
        let idx = kind.build::<Obj>(GridSize::new(8, 8));
        group.bench_function(kind.name(), |b| {
            b.iter(|| {
                for o in &objs {
                    let _ = idx.add(o.clone());
                }
                for o in objs.iter().rev() {
                    let _ = idx.del(o);
                }
                black_box(idx.slot_count(Pos::new(3, 3)));
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_add,
    bench_move_transpose,
    bench_move_random,
    bench_del,
    bench_iterate,
    bench_churn_one_cell,
);
criterion_main!(benches);
