//! Criterion benchmark for lattice enumeration over a random sky patch.
//!
//! The sky block of the metric controls the lattice step size on the sky,
//! so the two inputs probe a coarse and a fine template bank.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use nalgebra::{DMatrix, DVector};

use dopplerscan::prelude::*;
use dopplerscan::sky::rand::{draw_sky_patch, PatchCfg};

fn diag_metric(
    sky: f64,
) -> impl Fn(usize, f64, f64, f64) -> Result<DMatrix<f64>, ScanError> {
    move |dim, _, _, _| {
        let mut diag = vec![sky; dim];
        diag[0] = 1.0;
        Ok(DMatrix::from_diagonal(&DVector::from_vec(diag)))
    }
}

fn patch_scan(seed: u64, sky: f64) -> DopplerLatticeScan {
    let cfg = PatchCfg {
        radial_jitter: 0.15,
        ..PatchCfg::default()
    };
    let points = draw_sky_patch(&cfg, seed);
    let spin_range = SpinRange {
        ref_time: 700_000_000.0,
        fkdot: [100.0, 0.0, 0.0, 0.0],
        fkdot_band: [0.0; 4],
    };
    let boundary = DopplerBoundary::from_ecliptic_points(&points, spin_range).unwrap();
    DopplerLatticeScan::from_boundary(boundary, 1e6, 700_000_000.0, 0.01, &diag_metric(sky))
        .unwrap()
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    for &sky in &[2e-9, 5e-10] {
        group.bench_with_input(BenchmarkId::new("drain_patch", sky), &sky, |b, &sky| {
            b.iter_batched(
                || patch_scan(3, sky),
                |mut scan| {
                    let mut count = 0usize;
                    loop {
                        match scan.advance().unwrap() {
                            StepOutcome::Advanced => count += 1,
                            StepOutcome::Finished => break,
                        }
                    }
                    count
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scan);
criterion_main!(benches);
