//! Data types for the lattice scan.

use nalgebra::{DMatrix, DVector};

use crate::boundary::{DopplerBoundary, SpinRange};
use crate::canonical::PulsarSpins;

/// Lifecycle state of a scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanState {
    /// Enumerating; `current` points at a valid template.
    Ready,
    /// Exhausted; terminal.
    Finished,
}

/// Outcome of a successful `advance` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved to the next template inside the boundary.
    Advanced,
    /// No lattice points left; the scan is now Finished.
    Finished,
}

/// Construction parameters for a lattice scan.
#[derive(Clone, Debug)]
pub struct DopplerLatticeInit {
    /// Total observation span in seconds; drives the Doppler ⇔ canonical
    /// conversion.
    pub tspan: f64,
    /// Start of the observation (GPS seconds), passed to the metric source.
    pub start_time: f64,
    /// Maximal squared metric distance between a signal and its nearest
    /// template.
    pub max_mismatch: f64,
    /// Sky region: `(alpha, delta)` pairs in equatorial radians, see
    /// [`crate::boundary::parse_sky_region`].
    pub sky_region: String,
    /// Spin search intervals, anchored at their reference time.
    pub spin_range: SpinRange,
}

/// Template handed to the detection-statistic stage.
#[derive(Clone, Copy, Debug)]
pub struct PulsarDopplerParams {
    /// Reference time the spins refer to (GPS seconds).
    pub ref_time: f64,
    /// Sky longitude in `[0, 2π)`, in the requested frame.
    pub alpha: f64,
    /// Sky latitude in `[-π/2, π/2]`, in the requested frame.
    pub delta: f64,
    /// Spin vector `f^(k)` at `ref_time`.
    pub fkdot: PulsarSpins,
}

/// Scan over a translated, sheared integer lattice covering a Doppler-space
/// boundary.
///
/// Owns its boundary, canonical origin, generating matrix, and index; a
/// `Clone` is an independent scan (checkpoint copies are cheap).
#[derive(Clone, Debug)]
pub struct DopplerLatticeScan {
    pub(super) state: ScanState,
    pub(super) tspan: f64,
    /// Dimension of the covered search space: 2 sky + active spins.
    pub(super) dim: usize,
    pub(super) boundary: DopplerBoundary,
    /// Canonical image of the region midpoint, full canonical dimension.
    pub(super) origin: DVector<f64>,
    /// Rows are lattice basis vectors in canonical coordinates, `dim × dim`.
    pub(super) generator: DMatrix<f64>,
    /// Integer index of the current lattice point, length `dim`.
    pub(super) index: DVector<i32>,
}

impl DopplerLatticeScan {
    #[inline]
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Dimension of the covered search space (2 sky + active spins).
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn tspan(&self) -> f64 {
        self.tspan
    }

    #[inline]
    pub fn boundary(&self) -> &DopplerBoundary {
        &self.boundary
    }

    /// Canonical origin of the lattice (full canonical dimension).
    #[inline]
    pub fn origin(&self) -> &DVector<f64> {
        &self.origin
    }

    /// Generating matrix; rows are lattice basis vectors.
    #[inline]
    pub fn generator(&self) -> &DMatrix<f64> {
        &self.generator
    }
}
