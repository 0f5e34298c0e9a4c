use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use stripsweeper::{overlay_plane_sweep, parallel_overlay, region, FaceId, Halfsegment, RegionId};

fn squares(
    (x0, y0): (f64, f64),
    size: f64,
    offset: f64,
    count: usize,
    region_id: RegionId,
) -> Vec<Halfsegment> {
    let mut out = Vec::new();
    let mut face = 1;
    for i in 0..count {
        for j in 0..count {
            let x = x0 + i as f64 * offset;
            let y = y0 + j as f64 * offset;
            out.extend(
                region::from_polygon(
                    [(x, y), (x + size, y), (x + size, y + size), (x, y + size)],
                    FaceId(face),
                    FaceId::NONE,
                    region_id,
                )
                .unwrap(),
            );
            face += 1;
        }
    }
    out.sort();
    out
}

fn checkerboard(n: usize) -> (Vec<Halfsegment>, Vec<Halfsegment>) {
    (
        squares((0.0, 0.0), 30.0, 40.0, n, RegionId::First),
        squares((20.0, 20.0), 30.0, 40.0, n - 1, RegionId::Second),
    )
}

fn serial_sweep(c: &mut Criterion) {
    let (r1, r2) = checkerboard(10);
    c.bench_function("serial overlay", |b| {
        b.iter(|| overlay_plane_sweep(&r1, &r2))
    });
}

fn strip_parallel(c: &mut Criterion) {
    let (r1, r2) = checkerboard(10);
    let mut group = c.benchmark_group("parallel overlay");
    for k in [2, 4, 8, 16] {
        group.bench_function(BenchmarkId::from_parameter(k), |b| {
            b.iter(|| parallel_overlay(&r1, &r2, k))
        });
    }
    group.finish();
}

criterion_group!(benches, serial_sweep, strip_parallel);
criterion_main!(benches);
