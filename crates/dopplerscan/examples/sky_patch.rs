//! Enumerate a narrow follow-up sky patch with the circular-orbit metric.
//!
//! A third-of-a-year span makes the sky block of the metric well
//! conditioned; the patch is deliberately tiny (a follow-up region around a
//! candidate) so the full bank stays small enough to print.

use dopplerscan::metric::YRSID_SI;
use dopplerscan::prelude::*;

fn main() {
    let tspan = YRSID_SI / 3.0;
    let init = DopplerLatticeInit {
        tspan,
        start_time: 900_000_000.0,
        max_mismatch: 0.02,
        // ~2e-5 rad triangle around (alpha, delta) = (1.0, 0.5)
        sky_region: "(1.00000, 0.50000), (1.00003, 0.50000), (1.000015, 0.50002)".into(),
        spin_range: SpinRange {
            ref_time: 900_000_000.0,
            fkdot: [100.0, 0.0, 0.0, 0.0],
            fkdot_band: [0.0; 4],
        },
    };

    let metric = CircularOrbitMetric::default();
    let mut scan = DopplerLatticeScan::new(&init, &metric).expect("scan init");
    println!("search dimension: {}", scan.dim());

    let mut count = 0usize;
    loop {
        let p = scan
            .current(CoordinateSystem::Equatorial)
            .expect("current template");
        count += 1;
        if count <= 10 {
            println!(
                "{count:4}  alpha={:.8} delta={:.8} f={:.6}",
                p.alpha, p.delta, p.fkdot[0]
            );
        }
        match scan.advance().expect("advance") {
            StepOutcome::Advanced => {}
            StepOutcome::Finished => break,
        }
    }
    println!("templates: {count}");
}
