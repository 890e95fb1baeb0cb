//! Flat mismatch metric: the collaborator seam and a reference model.
//!
//! The scanner only needs a positive-definite matrix in canonical
//! coordinates `(w0, kX, kY, w1, ...)`; where it comes from is the
//! caller's business. [`FlatMetric`] is that seam (closures implement it),
//! and [`CircularOrbitMetric`] is a self-contained reference model good
//! enough for driving the scanner without an ephemeris pipeline.

use nalgebra::DMatrix;

use crate::error::ScanError;

/// Sidereal year in seconds.
pub const YRSID_SI: f64 = 31_558_149.763_545_6;

const TWO_PI: f64 = std::f64::consts::TAU;

/// Source of the flat mismatch metric in canonical coordinates.
///
/// Implementations must return a symmetric positive-definite `dim × dim`
/// matrix and be reentrant (the scanner calls this once per scan, but
/// independent scans may run in parallel).
pub trait FlatMetric {
    fn flat_metric(
        &self,
        dim: usize,
        ref_time: f64,
        start_time: f64,
        tspan: f64,
    ) -> Result<DMatrix<f64>, ScanError>;
}

impl<F> FlatMetric for F
where
    F: Fn(usize, f64, f64, f64) -> Result<DMatrix<f64>, ScanError>,
{
    fn flat_metric(
        &self,
        dim: usize,
        ref_time: f64,
        start_time: f64,
        tspan: f64,
    ) -> Result<DMatrix<f64>, ScanError> {
        self(dim, ref_time, start_time, tspan)
    }
}

/// Phase metric for a circular ecliptic Earth orbit.
///
/// The signal phase in canonical coordinates over scaled time `x ∈ [0, 1]`
/// (with `t = start_time + x T`) has derivatives
///
/// - `∂φ/∂w_s  = x^(s+1) / (s+1)!`,
/// - `∂φ/∂kX   = cos(Ω_orb t)`, `∂φ/∂kY = sin(Ω_orb t)`,
///
/// and the metric is the covariance `⟨∂aφ ∂bφ⟩ - ⟨∂aφ⟩⟨∂bφ⟩` of those
/// derivatives, time-averaged over the span. Integrals are evaluated by
/// composite Simpson quadrature. Earth rotation and orbital eccentricity
/// are neglected, which is the usual approximation for spans well below a
/// year; very short spans leave the sky block nearly degenerate and the
/// Cholesky step downstream reports the metric as not positive definite.
#[derive(Clone, Copy, Debug)]
pub struct CircularOrbitMetric {
    /// Number of Simpson intervals (rounded up to even).
    pub intervals: usize,
}

impl Default for CircularOrbitMetric {
    fn default() -> Self {
        Self { intervals: 256 }
    }
}

impl CircularOrbitMetric {
    fn phase_derivative(a: usize, x: f64, t: f64) -> f64 {
        let omega = TWO_PI / YRSID_SI;
        match a {
            0 => x,
            1 => (omega * t).cos(),
            2 => (omega * t).sin(),
            a => {
                // spin order a - 2: x^(a-1) / (a-1)!
                let mut val = 1.0;
                for k in 1..=(a - 1) {
                    val *= x / k as f64;
                }
                val
            }
        }
    }
}

impl FlatMetric for CircularOrbitMetric {
    fn flat_metric(
        &self,
        dim: usize,
        _ref_time: f64,
        start_time: f64,
        tspan: f64,
    ) -> Result<DMatrix<f64>, ScanError> {
        if dim < 3 {
            return Err(ScanError::DimensionMismatch {
                expected: 3,
                got: dim,
            });
        }
        if !(tspan > 0.0) {
            return Err(ScanError::InvalidArgument(
                "observation span must be positive",
            ));
        }

        let n = self.intervals.max(2).next_multiple_of(2);
        let h = 1.0 / n as f64;

        // sample all phase derivatives on the Simpson grid
        let mut samples = vec![vec![0.0; n + 1]; dim];
        for i in 0..=n {
            let x = i as f64 * h;
            let t = start_time + x * tspan;
            for (a, row) in samples.iter_mut().enumerate() {
                row[i] = Self::phase_derivative(a, x, t);
            }
        }

        let weight = |i: usize| -> f64 {
            if i == 0 || i == n {
                h / 3.0
            } else if i % 2 == 1 {
                4.0 * h / 3.0
            } else {
                2.0 * h / 3.0
            }
        };

        let mut mean = vec![0.0; dim];
        for (a, row) in samples.iter().enumerate() {
            mean[a] = (0..=n).map(|i| weight(i) * row[i]).sum();
        }

        let mut g = DMatrix::zeros(dim, dim);
        for a in 0..dim {
            for b in a..dim {
                let moment: f64 = (0..=n)
                    .map(|i| weight(i) * samples[a][i] * samples[b][i])
                    .sum();
                let cov = moment - mean[a] * mean[b];
                g[(a, b)] = cov;
                g[(b, a)] = cov;
            }
        }
        Ok(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Cholesky;

    #[test]
    fn spin_block_matches_closed_form() {
        // ⟨x^p x^q⟩ - ⟨x^p⟩⟨x^q⟩ with p = q = 1: 1/3 - 1/4
        let m = CircularOrbitMetric::default();
        let g = m.flat_metric(4, 0.0, 0.0, 0.5 * YRSID_SI).unwrap();
        assert!((g[(0, 0)] - (1.0 / 3.0 - 0.25)).abs() < 1e-10);
        // w1 diagonal: ⟨x⁴⟩/4 - (⟨x²⟩/2)² = 1/20 - 1/36
        assert!((g[(3, 3)] - (0.05 - 1.0 / 36.0)).abs() < 1e-10);
        // w0–w1 cross term: ⟨x³⟩/2 - ⟨x⟩⟨x²⟩/2 = 1/8 - 1/12
        assert!((g[(0, 3)] - (0.125 - 1.0 / 12.0)).abs() < 1e-10);
    }

    #[test]
    fn half_year_span_gives_positive_definite_metric() {
        let m = CircularOrbitMetric::default();
        let g = m.flat_metric(3, 0.0, 1e9, 0.5 * YRSID_SI).unwrap();
        assert!(Cholesky::new(g).is_some());
    }

    #[test]
    fn metric_is_symmetric() {
        let m = CircularOrbitMetric::default();
        let g = m.flat_metric(5, 0.0, 7e8, 0.3 * YRSID_SI).unwrap();
        for a in 0..5 {
            for b in 0..5 {
                assert_eq!(g[(a, b)], g[(b, a)]);
            }
        }
    }

    #[test]
    fn closures_implement_the_seam() {
        let unit = |dim: usize, _: f64, _: f64, _: f64| -> Result<DMatrix<f64>, ScanError> {
            Ok(DMatrix::identity(dim, dim))
        };
        let g = unit.flat_metric(3, 0.0, 0.0, 1.0).unwrap();
        assert_eq!(g.nrows(), 3);
    }
}
