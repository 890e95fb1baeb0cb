//! Boundary of a (single-hemisphere) search region in Doppler space.
//!
//! A boundary is the triple (sky polygon, hemisphere, spin range). A Doppler
//! point lies inside iff its hemisphere matches, its `(nX, nY)` projection
//! lies in the polygon, and every spin lies in its interval up to the
//! relative tolerance — so points exactly on the boundary are inside.

use nalgebra::{Vector2, Vector3};

use crate::canonical::{DopplerPoint, PulsarSpins, MAX_SPINS};
use crate::cmp::in_interval;
use crate::error::ScanError;
use crate::sky::{hemisphere_of_points, CoordinateSystem, Hemisphere, SkyPolygon, SkyPosition};

/// Search region in the spin parameters: lower bounds plus non-negative
/// bandwidths, anchored at a reference time.
#[derive(Clone, Copy, Debug)]
pub struct SpinRange {
    /// Reference time (GPS seconds) the spins refer to.
    pub ref_time: f64,
    /// Lower bound of each spin interval.
    pub fkdot: PulsarSpins,
    /// Width of each spin interval; all components must be >= 0.
    pub fkdot_band: PulsarSpins,
}

impl SpinRange {
    /// Number of active spins: the highest order with a non-zero band,
    /// plus one. At least 1 (the frequency itself).
    pub fn num_spins(&self) -> usize {
        let mut n = MAX_SPINS;
        while n > 1 && self.fkdot_band[n - 1] == 0.0 {
            n -= 1;
        }
        n
    }

    /// Center of each spin interval.
    pub fn midpoint(&self) -> PulsarSpins {
        let mut mid = [0.0; MAX_SPINS];
        for s in 0..MAX_SPINS {
            mid[s] = self.fkdot[s] + 0.5 * self.fkdot_band[s];
        }
        mid
    }

    /// All spins inside their intervals, boundary points included.
    pub fn contains(&self, fkdot: &PulsarSpins) -> bool {
        (0..MAX_SPINS).all(|s| {
            in_interval(
                fkdot[s],
                self.fkdot[s],
                self.fkdot[s] + self.fkdot_band[s],
            )
        })
    }
}

/// Boundary of the search region: sky polygon on one ecliptic hemisphere
/// plus a spin box.
#[derive(Clone, Debug)]
pub struct DopplerBoundary {
    polygon: SkyPolygon,
    hemisphere: Hemisphere,
    spin_range: SpinRange,
}

impl DopplerBoundary {
    /// Build a boundary from ecliptic unit vectors tracing the sky polygon.
    ///
    /// Rejects vertex lists that straddle both hemispheres (or lie entirely
    /// on the ecliptic equator), degenerate polygons, and negative bands.
    pub fn from_ecliptic_points(
        points: &[Vector3<f64>],
        spin_range: SpinRange,
    ) -> Result<Self, ScanError> {
        if spin_range.fkdot_band.iter().any(|&b| b < 0.0) {
            return Err(ScanError::InvalidArgument(
                "spin bands must be non-negative",
            ));
        }
        let hemisphere = hemisphere_of_points(points).ok_or(ScanError::BothHemispheres)?;
        let polygon = SkyPolygon::from_ecliptic_points(points)?;
        Ok(DopplerBoundary {
            polygon,
            hemisphere,
            spin_range,
        })
    }

    /// Parse a sky-region string (see [`parse_sky_region`]) and build the
    /// boundary from it.
    pub fn from_region_string(region: &str, spin_range: SpinRange) -> Result<Self, ScanError> {
        let points: Vec<Vector3<f64>> = parse_sky_region(region)?
            .iter()
            .map(|pos| pos.to_ecliptic_vect())
            .collect();
        Self::from_ecliptic_points(&points, spin_range)
    }

    #[inline]
    pub fn polygon(&self) -> &SkyPolygon {
        &self.polygon
    }

    #[inline]
    pub fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }

    #[inline]
    pub fn spin_range(&self) -> &SpinRange {
        &self.spin_range
    }

    /// Midpoint of the region: 2D vertex centroid completed to a sky vector
    /// on our hemisphere, spin intervals at their centers.
    ///
    /// Only the `(nX, nY)` components feed the canonical origin; they are the
    /// centroid of the vertex projections, which lies inside any convex
    /// polygon.
    pub fn midpoint(&self) -> DopplerPoint {
        let verts = self.polygon.verts();
        let mut com = Vector2::zeros();
        for v in verts {
            com += v;
        }
        com /= verts.len() as f64;
        let nz = self.hemisphere.sign() * (1.0 - com.norm_squared()).max(0.0).sqrt();
        DopplerPoint {
            vn: Vector3::new(com.x, com.y, nz),
            fkdot: self.spin_range.midpoint(),
        }
    }

    /// Is the Doppler point inside the boundary?
    pub fn contains(&self, doppler: &DopplerPoint) -> bool {
        let same_hemi = Hemisphere::of(&doppler.vn) == Some(self.hemisphere);
        let inside_sky = self
            .polygon
            .contains(Vector2::new(doppler.vn.x, doppler.vn.y));
        let inside_spins = self.spin_range.contains(&doppler.fkdot);
        same_hemi && inside_sky && inside_spins
    }
}

/// Parse a sky-region string into equatorial sky positions.
///
/// The format is a list of `(alpha, delta)` pairs in equatorial radians,
/// e.g. `"(0.1, 0.2), (0.3, 0.2), (0.2, 0.4)"`; whitespace and the comma
/// between pairs are optional.
pub fn parse_sky_region(region: &str) -> Result<Vec<SkyPosition>, ScanError> {
    let mut out = Vec::new();
    let mut rest = region.trim();
    while !rest.is_empty() {
        let open = rest
            .find('(')
            .ok_or_else(|| ScanError::ParseRegion(format!("expected '(' at `{rest}`")))?;
        let close = rest[open..]
            .find(')')
            .map(|k| open + k)
            .ok_or_else(|| ScanError::ParseRegion(format!("unclosed '(' at `{rest}`")))?;
        let pair = &rest[open + 1..close];
        let mut nums = pair.split(',').map(str::trim);
        let alpha = nums
            .next()
            .and_then(|t| t.parse::<f64>().ok())
            .ok_or_else(|| ScanError::ParseRegion(format!("bad longitude in `({pair})`")))?;
        let delta = nums
            .next()
            .and_then(|t| t.parse::<f64>().ok())
            .ok_or_else(|| ScanError::ParseRegion(format!("bad latitude in `({pair})`")))?;
        if nums.next().is_some() {
            return Err(ScanError::ParseRegion(format!(
                "more than two numbers in `({pair})`"
            )));
        }
        out.push(SkyPosition {
            longitude: alpha,
            latitude: delta,
            system: CoordinateSystem::Equatorial,
        });
        rest = rest[close + 1..].trim_start_matches([' ', '\t', '\n', ',']);
    }
    if out.is_empty() {
        return Err(ScanError::ParseRegion("empty sky region".into()));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(fkdot: PulsarSpins, band: PulsarSpins) -> SpinRange {
        SpinRange {
            ref_time: 800_000_000.0,
            fkdot,
            fkdot_band: band,
        }
    }

    #[test]
    fn active_spin_dimension_tracks_highest_band() {
        assert_eq!(range([100.0, 0.0, 0.0, 0.0], [0.0; 4]).num_spins(), 1);
        assert_eq!(
            range([100.0, 0.0, 0.0, 0.0], [0.1, 1e-10, 0.0, 0.0]).num_spins(),
            2
        );
        assert_eq!(
            range([100.0, 0.0, 0.0, 0.0], [0.0, 0.0, 0.0, 1e-20]).num_spins(),
            4
        );
    }

    #[test]
    fn spin_box_includes_exact_boundary_points() {
        let r = range([100.0, -1e-10, 0.0, 0.0], [1.0, 2e-10, 0.0, 0.0]);
        assert!(r.contains(&[100.0, -1e-10, 0.0, 0.0]));
        assert!(r.contains(&[101.0, 1e-10, 0.0, 0.0]));
        assert!(r.contains(&[100.5, 0.0, 0.0, 0.0]));
        assert!(!r.contains(&[101.1, 0.0, 0.0, 0.0]));
        assert!(!r.contains(&[100.5, 1.1e-10, 0.0, 0.0]));
    }

    #[test]
    fn parses_whitespace_and_comma_separated_pairs() {
        let pts = parse_sky_region("(0.1, 0.2), (0.3,0.2)\n(0.2, 0.4)").unwrap();
        assert_eq!(pts.len(), 3);
        assert!((pts[1].longitude - 0.3).abs() < 1e-15);
        assert!((pts[2].latitude - 0.4).abs() < 1e-15);
        assert!(parse_sky_region("").is_err());
        assert!(parse_sky_region("(0.1)").is_err());
        assert!(parse_sky_region("(0.1, 0.2, 0.3)").is_err());
        assert!(parse_sky_region("(0.1, 0.2").is_err());
    }

    #[test]
    fn both_hemisphere_regions_are_rejected() {
        let r = range([100.0, 0.0, 0.0, 0.0], [0.0; 4]);
        let err = DopplerBoundary::from_region_string("(1.0, 0.5), (1.0, -0.5), (1.2, 0.0)", r)
            .unwrap_err();
        assert!(matches!(err, ScanError::BothHemispheres));
    }

    #[test]
    fn negative_bands_are_rejected() {
        let r = range([100.0, 0.0, 0.0, 0.0], [-1.0, 0.0, 0.0, 0.0]);
        let err = DopplerBoundary::from_region_string("(1.0, 0.5)", r).unwrap_err();
        assert!(matches!(err, ScanError::InvalidArgument(_)));
    }

    #[test]
    fn midpoint_lies_inside_the_boundary() {
        let r = range([100.0, -1e-10, 0.0, 0.0], [1.0, 2e-10, 0.0, 0.0]);
        let boundary =
            DopplerBoundary::from_region_string("(0.1, 0.3), (0.2, 0.3), (0.15, 0.42)", r)
                .unwrap();
        let mid = boundary.midpoint();
        assert!(boundary.contains(&mid));
    }

    #[test]
    fn contains_requires_matching_hemisphere() {
        let r = range([100.0, 0.0, 0.0, 0.0], [1.0, 0.0, 0.0, 0.0]);
        let boundary =
            DopplerBoundary::from_region_string("(0.1, 0.3), (0.2, 0.3), (0.15, 0.42)", r)
                .unwrap();
        let mut inside = boundary.midpoint();
        assert!(boundary.contains(&inside));
        inside.vn.z = -inside.vn.z;
        assert!(!boundary.contains(&inside));
    }
}
