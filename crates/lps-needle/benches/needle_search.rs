use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lps_core::Marker;
use lps_needle::{find_needle, NeedleModel, NeedleSpec, SearchParams};
use nalgebra::Point3;

/// Deterministic pseudo-random scatter in a 4 m cube.
fn noise(count: usize, seed: u32) -> Vec<Marker> {
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        (state >> 8) as f32 / (1u32 << 24) as f32 * 4.0
    };
    (0..count).map(|_| Marker::new(next(), next(), next())).collect()
}

fn bench_search(c: &mut Criterion) {
    let spec = NeedleSpec::new(vec![
        Point3::new(0.12, 0.0, 0.0),
        Point3::new(0.0, 0.07, 0.0),
        Point3::new(0.0, 0.0, 0.05),
    ]);
    let model = NeedleModel::new(&spec).expect("needle");
    let params = SearchParams::default();

    let mut group = c.benchmark_group("find_needle");
    for &count in &[8usize, 32, 128] {
        // Needle at the end of the haystack: worst case for the origin scan.
        let mut haystack = noise(count, 7);
        let base = Point3::new(5.0, 5.0, 5.0);
        haystack.push(Marker::from(base));
        for m in &spec.markers {
            haystack.push(Marker::from(base + m.coords));
        }

        group.bench_with_input(BenchmarkId::from_parameter(count), &haystack, |b, h| {
            b.iter(|| find_needle(black_box(h), &model, &params))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
