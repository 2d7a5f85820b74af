use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use geo::{geometry::Coord, LineString};
use profile::{math::resample, Profile, Raster, Rasters};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

/// Zig-zag across a 10km square in meters.
fn zig_zag() -> LineString<f64> {
    (0..20)
        .map(|i| {
            let x = f64::from(i) * 500.0;
            let y = if i % 2 == 0 { 0.0 } else { 10_000.0 };
            Coord { x, y }
        })
        .collect()
}

fn synthetic_rasters() -> Rasters {
    Rasters::new()
        .with(
            "dem",
            Raster::new(|c: Coord<f64>| Some((c.x / 100.0).sin() * 50.0 + c.y / 10.0)).round(1),
        )
        .with(
            "mask",
            Raster::new(|c: Coord<f64>| (c.y < 5_000.0).then_some(1.0)),
        )
}

fn resampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("Resample");
    let line = zig_zag();
    for nb_points in [100, 1_000, 10_000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(nb_points),
            &nb_points,
            |b, n| b.iter(|| resample(&line.0, *n)),
        );
    }
}

fn raster_profile(c: &mut Criterion) {
    let mut group = c.benchmark_group("Raster Profile");
    let rasters = synthetic_rasters();
    let line = zig_zag();

    for parallel in [false, true] {
        let builder = Profile::builder()
            .line(line.clone())
            .nb_points(5_000)
            .parallel(parallel);
        group.bench_with_input(
            BenchmarkId::new("parallel", parallel),
            &builder,
            |b, builder| b.iter(|| builder.build(&rasters).unwrap()),
        );
    }
}

criterion_group!(benches, resampling, raster_profile);
criterion_main!(benches);
