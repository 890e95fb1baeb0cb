//! Lattice stepping and template read-out.

use nalgebra::DVector;

use crate::canonical::{canonical_to_doppler, DopplerPoint};
use crate::error::ScanError;
use crate::sky::{CoordinateSystem, SkyPosition};

use super::types::{DopplerLatticeScan, PulsarDopplerParams, ScanState, StepOutcome};

impl DopplerLatticeScan {
    /// Canonical point of an index: origin plus `iᵀ · G` in the first
    /// `dim` components.
    fn index_to_canonical(&self, index: &DVector<i32>) -> DVector<f64> {
        let mut canonical = self.origin.clone();
        for i in 0..self.dim {
            let mut comp = 0.0;
            for j in 0..self.dim {
                comp += index[j] as f64 * self.generator[(j, i)];
            }
            canonical[i] += comp;
        }
        canonical
    }

    /// Physical Doppler point of an index.
    pub(super) fn index_to_doppler(&self, index: &DVector<i32>) -> Result<DopplerPoint, ScanError> {
        canonical_to_doppler(
            &self.index_to_canonical(index),
            self.boundary.hemisphere(),
            self.tspan,
        )
    }

    /// Does the index map into the boundary?
    ///
    /// Trials whose sky vector leaves the unit disk have no physical image
    /// and count as outside; that is how the walk terminates at the rim of
    /// the hemisphere. Other conversion failures propagate.
    fn index_inside(&self, index: &DVector<i32>) -> Result<bool, ScanError> {
        match self.index_to_doppler(index) {
            Ok(doppler) => Ok(self.boundary.contains(&doppler)),
            Err(ScanError::SkyVectorTooLong { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Advance to the next lattice point inside the boundary.
    ///
    /// Walks outward from the origin: on each axis, positive indices grow
    /// and negative indices shrink; when the positive direction leaves the
    /// boundary the walk restarts that axis at -1; when both directions are
    /// exhausted the axis collapses to 0 and the next axis steps. When the
    /// last axis collapses the scan is Finished.
    ///
    /// On error the scan is left unchanged.
    pub fn advance(&mut self) -> Result<StepOutcome, ScanError> {
        if self.state != ScanState::Ready {
            return Err(ScanError::NotReady);
        }

        let mut base = self.index.clone();
        for axis in 0..self.dim {
            let going_up = base[axis] >= 0;

            let mut trial = base.clone();
            trial[axis] += if going_up { 1 } else { -1 };
            if self.index_inside(&trial)? {
                self.index = trial;
                return Ok(StepOutcome::Advanced);
            }

            if going_up {
                // positive side exhausted: restart this axis on the negative side
                trial = base.clone();
                trial[axis] = -1;
                if self.index_inside(&trial)? {
                    self.index = trial;
                    return Ok(StepOutcome::Advanced);
                }
            }

            // axis exhausted: collapse back to the origin plane
            base[axis] = 0;
        }

        self.state = ScanState::Finished;
        Ok(StepOutcome::Finished)
    }

    /// Current template in the requested sky frame.
    pub fn current(&self, sky_coords: CoordinateSystem) -> Result<PulsarDopplerParams, ScanError> {
        if self.state != ScanState::Ready {
            return Err(ScanError::NotReady);
        }
        let doppler = self.index_to_doppler(&self.index)?;
        let pos = SkyPosition::from_ecliptic_vect(&doppler.vn, sky_coords);
        Ok(PulsarDopplerParams {
            ref_time: self.boundary.spin_range().ref_time,
            alpha: pos.longitude,
            delta: pos.latitude,
            fkdot: doppler.fkdot,
        })
    }

    /// Current lattice index, for checkpointing.
    pub fn current_index(&self) -> Result<DVector<i32>, ScanError> {
        if self.state != ScanState::Ready {
            return Err(ScanError::NotReady);
        }
        Ok(self.index.clone())
    }

    /// Restore a lattice index, e.g. from a checkpoint.
    ///
    /// Validates dimension and state only; the caller is responsible for
    /// the index lying inside the boundary.
    pub fn set_index(&mut self, index: &DVector<i32>) -> Result<(), ScanError> {
        if self.state != ScanState::Ready {
            return Err(ScanError::NotReady);
        }
        if index.len() != self.dim {
            return Err(ScanError::DimensionMismatch {
                expected: self.dim,
                got: index.len(),
            });
        }
        self.index.copy_from(index);
        Ok(())
    }
}
