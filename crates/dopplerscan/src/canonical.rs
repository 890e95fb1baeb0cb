//! Conversion between physical Doppler parameters and canonical coordinates.
//!
//! Canonical coordinates `(w0, kX, kY, w1, w2, ...)` are chosen so that the
//! flat mismatch metric is (approximately) Euclidean:
//!
//! - `w_s = 2π T^(s+1) fkdot_s` for the spin terms,
//! - `k_{X,Y} = -(2π R_orb / c) fkdot_0 n_{X,Y}` for the sky terms,
//!
//! with `T` the observation span and `n` the unit sky vector in ecliptic
//! coordinates. The inverse recovers `nZ` from the hemisphere tag and must
//! refuse sky vectors that leave the unit disk.

use std::cmp::Ordering;

use nalgebra::{DVector, Vector3};

use crate::cmp::{rel_cmp, EPS_REL};
use crate::error::ScanError;
use crate::sky::Hemisphere;

/// Highest spin order carried by a Doppler point (`f`, `f1dot` ... `f3dot`).
pub const MAX_SPINS: usize = 4;

/// Spin polynomial coefficients `f^(k)` at the reference time, SI units.
pub type PulsarSpins = [f64; MAX_SPINS];

/// Full dimension of a canonical point: `(w0, kX, kY)` plus the higher spins.
pub const CANONICAL_DIM: usize = 2 + MAX_SPINS;

/// Astronomical unit in meters.
pub const AU_SI: f64 = 1.495_978_706_6e11;
/// Speed of light in m/s.
pub const C_SI: f64 = 299_792_458.0;

const TWO_PI: f64 = std::f64::consts::TAU;

/// Physical Doppler parameters: unit sky vector (ecliptic) plus spins.
#[derive(Clone, Copy, Debug)]
pub struct DopplerPoint {
    /// Unit vector pointing to the sky location, ecliptic frame.
    pub vn: Vector3<f64>,
    /// Spin vector `f^(k)`.
    pub fkdot: PulsarSpins,
}

/// Convert SI-unit spins into canonical units `w_s = 2π T^(s+1) fkdot_s`.
pub fn spins_to_canonical(fkdot: &PulsarSpins, tspan: f64) -> PulsarSpins {
    let mut wk = [0.0; MAX_SPINS];
    let mut prefact = TWO_PI * tspan;
    for s in 0..MAX_SPINS {
        wk[s] = prefact * fkdot[s];
        prefact *= tspan;
    }
    wk
}

/// Map a Doppler point to its full canonical vector `(w0, kX, kY, w1, ...)`.
pub fn doppler_to_canonical(doppler: &DopplerPoint, tspan: f64) -> DVector<f64> {
    // vk = -2π (R_orb / c) f0 · vn
    let prefix = TWO_PI * (AU_SI / C_SI) * doppler.fkdot[0];
    let kx = -prefix * doppler.vn.x;
    let ky = -prefix * doppler.vn.y;

    let wk = spins_to_canonical(&doppler.fkdot, tspan);

    let mut ret = DVector::zeros(CANONICAL_DIM);
    ret[0] = wk[0];
    ret[1] = kx;
    ret[2] = ky;
    for s in 1..MAX_SPINS {
        ret[2 + s] = wk[s];
    }
    ret
}

/// Invert a canonical vector back to physical Doppler parameters.
///
/// `canonical` may be shorter than [`CANONICAL_DIM`] (trailing spins are
/// zero), but needs at least the `(w0, kX, kY)` block. Fails when the implied
/// sky vector leaves the unit disk by more than the relative tolerance;
/// otherwise `nZ = ±sqrt(max(0, 1 - nX² - nY²))` with the sign taken from
/// `hemisphere`.
pub fn canonical_to_doppler(
    canonical: &DVector<f64>,
    hemisphere: Hemisphere,
    tspan: f64,
) -> Result<DopplerPoint, ScanError> {
    let dim = canonical.len();
    if !(3..=CANONICAL_DIM).contains(&dim) {
        return Err(ScanError::DimensionMismatch {
            expected: CANONICAL_DIM,
            got: dim,
        });
    }
    let num_spins = dim - 2;

    let mut fkdot = [0.0; MAX_SPINS];
    let mut prefact = TWO_PI * tspan;
    fkdot[0] = canonical[0] / prefact;
    for s in 1..num_spins {
        prefact *= tspan;
        fkdot[s] = canonical[s + 2] / prefact;
    }

    let prefix = TWO_PI * (AU_SI / C_SI) * fkdot[0];
    let nx = -canonical[1] / prefix;
    let ny = -canonical[2] / prefix;

    let vn2 = nx * nx + ny * ny;
    if rel_cmp(vn2, 1.0, EPS_REL) == Ordering::Greater {
        return Err(ScanError::SkyVectorTooLong { norm2: vn2 });
    }
    let nz = hemisphere.sign() * (1.0 - vn2).max(0.0).sqrt();

    Ok(DopplerPoint {
        vn: Vector3::new(nx, ny, nz),
        fkdot,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_vn(nx: f64, ny: f64) -> Vector3<f64> {
        Vector3::new(nx, ny, (1.0 - nx * nx - ny * ny).max(0.0).sqrt())
    }

    #[test]
    fn spin_units_scale_with_powers_of_tspan() {
        let fkdot = [100.0, -1e-10, 0.0, 0.0];
        let t = 1e6;
        let wk = spins_to_canonical(&fkdot, t);
        assert!((wk[0] - TWO_PI * t * 100.0).abs() < 1e-3);
        assert!((wk[1] - TWO_PI * t * t * (-1e-10)).abs() < 1e-12);
        assert_eq!(wk[2], 0.0);
    }

    #[test]
    fn round_trip_is_identity_inside_unit_disk() {
        let doppler = DopplerPoint {
            vn: unit_vn(0.3, -0.4),
            fkdot: [123.4, -5.6e-9, 7.8e-18, 0.0],
        };
        let t = 2.5e6;
        let canonical = doppler_to_canonical(&doppler, t);
        let back = canonical_to_doppler(&canonical, Hemisphere::North, t).unwrap();
        assert!((back.vn - doppler.vn).norm() < 1e-9);
        for s in 0..MAX_SPINS {
            let scale = doppler.fkdot[s].abs().max(1.0);
            assert!((back.fkdot[s] - doppler.fkdot[s]).abs() < 1e-12 * scale);
        }
        // and forward again reproduces the canonical vector
        let canonical2 = doppler_to_canonical(&back, t);
        assert!((canonical2 - &canonical).norm() < 1e-10 * canonical.norm());
    }

    #[test]
    fn southern_hemisphere_flips_nz() {
        let doppler = DopplerPoint {
            vn: unit_vn(0.1, 0.2),
            fkdot: [50.0, 0.0, 0.0, 0.0],
        };
        let canonical = doppler_to_canonical(&doppler, 1e6);
        let south = canonical_to_doppler(&canonical, Hemisphere::South, 1e6).unwrap();
        assert!(south.vn.z < 0.0);
        assert!((south.vn.z + doppler.vn.z).abs() < 1e-12);
    }

    #[test]
    fn sky_vector_outside_unit_disk_is_an_error() {
        // kX chosen so that nX = 1.5
        let f0 = 100.0;
        let prefix = TWO_PI * (AU_SI / C_SI) * f0;
        let mut canonical = DVector::zeros(3);
        canonical[0] = TWO_PI * 1e6 * f0;
        canonical[1] = -prefix * 1.5;
        canonical[2] = 0.0;
        let err = canonical_to_doppler(&canonical, Hemisphere::North, 1e6).unwrap_err();
        assert!(matches!(err, ScanError::SkyVectorTooLong { .. }));
    }

    #[test]
    fn boundary_of_unit_disk_is_tolerated() {
        // |n| = 1 exactly: nZ becomes 0, no error
        let doppler = DopplerPoint {
            vn: Vector3::new(0.6, 0.8, 0.0),
            fkdot: [100.0, 0.0, 0.0, 0.0],
        };
        let canonical = doppler_to_canonical(&doppler, 1e6);
        let back = canonical_to_doppler(&canonical, Hemisphere::North, 1e6).unwrap();
        assert!(back.vn.z.abs() < 1e-7);
    }
}
