//! Scan construction: boundary setup, metric, and covering generator.

use nalgebra::DVector;

use crate::boundary::DopplerBoundary;
use crate::canonical::doppler_to_canonical;
use crate::error::ScanError;
use crate::lattice::covering_generator;
use crate::metric::FlatMetric;

use super::types::{DopplerLatticeInit, DopplerLatticeScan, ScanState};

impl DopplerLatticeScan {
    /// Build a scan from init parameters and a flat-metric source.
    ///
    /// Fixed order: parse the sky region (rejecting two-hemisphere
    /// regions), derive the active spin dimension, map the region midpoint
    /// to the canonical origin, obtain the metric, build the covering
    /// generator, and start Ready at index 0. Construction is atomic: on
    /// any failure nothing of the scan escapes.
    pub fn new<M: FlatMetric + ?Sized>(
        init: &DopplerLatticeInit,
        metric: &M,
    ) -> Result<Self, ScanError> {
        let boundary = DopplerBoundary::from_region_string(&init.sky_region, init.spin_range)?;
        Self::from_boundary(
            boundary,
            init.tspan,
            init.start_time,
            init.max_mismatch,
            metric,
        )
    }

    /// Build a scan from an already-validated boundary.
    pub fn from_boundary<M: FlatMetric + ?Sized>(
        boundary: DopplerBoundary,
        tspan: f64,
        start_time: f64,
        max_mismatch: f64,
        metric: &M,
    ) -> Result<Self, ScanError> {
        if !(tspan > 0.0) {
            return Err(ScanError::InvalidArgument(
                "observation span must be positive",
            ));
        }

        // midpoint of the region becomes the lattice origin
        let origin = doppler_to_canonical(&boundary.midpoint(), tspan);

        // sky (2) + active spin dimensions
        let dim = 2 + boundary.spin_range().num_spins();

        let g = metric.flat_metric(dim, boundary.spin_range().ref_time, start_time, tspan)?;
        if g.nrows() != dim || g.ncols() != dim {
            return Err(ScanError::DimensionMismatch {
                expected: dim,
                got: g.nrows(),
            });
        }
        let generator = covering_generator(&g, max_mismatch)?;

        Ok(DopplerLatticeScan {
            state: ScanState::Ready,
            tspan,
            dim,
            boundary,
            origin,
            generator,
            index: DVector::zeros(dim),
        })
    }
}
