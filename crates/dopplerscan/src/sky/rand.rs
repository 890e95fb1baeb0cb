//! Deterministic random sky patches for tests and benchmarks.
//!
//! Draws a roughly-circular polygon of unit vectors around a center
//! direction: equally spaced position angles with bounded jitter, each
//! vertex pushed an angular radius away from the center along the local
//! tangent plane. Seeded draws replay exactly.

use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TWO_PI: f64 = std::f64::consts::TAU;

/// Sky-patch sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct PatchCfg {
    /// Number of polygon vertices (>= 3).
    pub vertex_count: usize,
    /// Patch center, ecliptic frame; normalized internally.
    pub center: Vector3<f64>,
    /// Angular radius of the patch in radians.
    pub radius: f64,
    /// Relative radial jitter in [0, 1): radii vary by `radius * (1 ± j)`.
    pub radial_jitter: f64,
}

impl Default for PatchCfg {
    fn default() -> Self {
        Self {
            vertex_count: 6,
            // mid-latitude northern ecliptic hemisphere
            center: Vector3::new(0.6, 0.3, 0.74),
            radius: 0.05,
            radial_jitter: 0.3,
        }
    }
}

/// Draw one sky patch as a list of ecliptic unit vectors (polygon order).
pub fn draw_sky_patch(cfg: &PatchCfg, seed: u64) -> Vec<Vector3<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = cfg.vertex_count.max(3);
    let c = cfg.center.normalize();

    // tangent basis at the center
    let helper = if c.z.abs() < 0.9 {
        Vector3::z()
    } else {
        Vector3::x()
    };
    let e1 = c.cross(&helper).normalize();
    let e2 = c.cross(&e1);

    let spacing = TWO_PI / n as f64;
    (0..n)
        .map(|k| {
            let jitter = (rng.gen::<f64>() - 0.5) * 0.5 * spacing;
            let theta = k as f64 * spacing + jitter;
            let u: f64 = rng.gen::<f64>() * 2.0 - 1.0;
            let r = cfg.radius * (1.0 + cfg.radial_jitter.clamp(0.0, 0.99) * u);
            let tangent = e1 * theta.cos() + e2 * theta.sin();
            c * r.cos() + tangent * r.sin()
        })
        .collect()
}
