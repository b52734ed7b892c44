//! Benchmarks for schedule parsing and evaluation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tempo::{ScheduleList, Seed, TickInstant};

const SPEC: &str = "\
H H(0-5) * * * KIND=nightly
*/15 9-17 * * 1-5 KIND=business
0,30 * 1,15 * * KIND=twice-monthly
H/10 9-17 * * * KIND=spread
0 0 1 * 1 KIND=first-or-monday";

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("schedule_parse");
    let seed = Seed::from_owner("bench-owner").unwrap();

    for lines in [1usize, 5] {
        let spec: String = SPEC
            .lines()
            .cycle()
            .take(lines)
            .collect::<Vec<_>>()
            .join("\n");

        group.bench_with_input(BenchmarkId::from_parameter(lines), &spec, |b, spec| {
            b.iter(|| ScheduleList::parse_with_seed(black_box(spec.as_str()), seed))
        });
    }
    group.finish();
}

fn bench_check(c: &mut Criterion) {
    let seed = Seed::from_owner("bench-owner").unwrap();
    let list = ScheduleList::parse_with_seed(SPEC, seed).unwrap();
    let hit = TickInstant::new(15, 10, 3, 6, 1);
    let miss = TickInstant::new(59, 23, 30, 12, 6);

    let mut group = c.benchmark_group("schedule_check");
    group.bench_function("hit", |b| b.iter(|| list.check(black_box(&hit))));
    group.bench_function("miss", |b| b.iter(|| list.check(black_box(&miss))));
    group.finish();
}

criterion_group!(benches, bench_parse, bench_check);
criterion_main!(benches);
