//! Coordinate systems, sky positions, and hemisphere classification.

use nalgebra::Vector3;

/// Sine of the obliquity of the ecliptic (IAU 1976, J2000).
pub const SIN_OBLIQUITY: f64 = 0.397_777_155_931_913_7;
/// Cosine of the obliquity of the ecliptic (IAU 1976, J2000).
pub const COS_OBLIQUITY: f64 = 0.917_482_062_069_181_8;

const TWO_PI: f64 = std::f64::consts::TAU;

/// Celestial frame of an `(α, δ)` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoordinateSystem {
    Equatorial,
    Ecliptic,
}

/// Ecliptic hemisphere of a sky direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    /// Classify a 3-vector by the sign of its ecliptic-z component.
    /// `None` for vectors exactly on the ecliptic equator.
    #[inline]
    pub fn of(v: &Vector3<f64>) -> Option<Hemisphere> {
        if v.z > 0.0 {
            Some(Hemisphere::North)
        } else if v.z < 0.0 {
            Some(Hemisphere::South)
        } else {
            None
        }
    }

    /// Sign of `nZ` on this hemisphere.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Hemisphere::North => 1.0,
            Hemisphere::South => -1.0,
        }
    }
}

/// Sky position as longitude/latitude in a stated frame.
///
/// `longitude ∈ [0, 2π)`, `latitude ∈ [-π/2, π/2]` when produced by
/// [`SkyPosition::from_ecliptic_vect`]; arbitrary radians are accepted as
/// input.
#[derive(Clone, Copy, Debug)]
pub struct SkyPosition {
    pub longitude: f64,
    pub latitude: f64,
    pub system: CoordinateSystem,
}

impl SkyPosition {
    /// Unit 3-vector in *ecliptic* coordinates.
    ///
    /// Equatorial input is rotated about the X axis through the obliquity:
    /// `(n0, n1 cos ε + n2 sin ε, -n1 sin ε + n2 cos ε)`.
    pub fn to_ecliptic_vect(&self) -> Vector3<f64> {
        let (sina, cosa) = self.longitude.sin_cos();
        let (sind, cosd) = self.latitude.sin_cos();
        let n = Vector3::new(cosa * cosd, sina * cosd, sind);
        match self.system {
            CoordinateSystem::Equatorial => Vector3::new(
                n.x,
                n.y * COS_OBLIQUITY + n.z * SIN_OBLIQUITY,
                -n.y * SIN_OBLIQUITY + n.z * COS_OBLIQUITY,
            ),
            CoordinateSystem::Ecliptic => n,
        }
    }

    /// Longitude/latitude of an ecliptic 3-vector, expressed in `system`.
    ///
    /// The input need not be normalized; the result has
    /// `longitude ∈ [0, 2π)` and `latitude ∈ [-π/2, π/2]`.
    pub fn from_ecliptic_vect(v: &Vector3<f64>, system: CoordinateSystem) -> SkyPosition {
        let n = match system {
            CoordinateSystem::Equatorial => Vector3::new(
                v.x,
                v.y * COS_OBLIQUITY - v.z * SIN_OBLIQUITY,
                v.y * SIN_OBLIQUITY + v.z * COS_OBLIQUITY,
            ),
            CoordinateSystem::Ecliptic => *v,
        };
        let n = n / n.norm();
        let mut longitude = n.y.atan2(n.x);
        if longitude < 0.0 {
            longitude += TWO_PI;
        }
        SkyPosition {
            longitude,
            latitude: n.z.asin(),
            system,
        }
    }
}

/// Arithmetic mean of a list of 3-vectors. Not renormalized onto the unit
/// sphere; callers that need a unit vector renormalize themselves.
pub fn center_of_mass(points: &[Vector3<f64>]) -> Option<Vector3<f64>> {
    if points.is_empty() {
        return None;
    }
    let mut com = Vector3::zeros();
    for p in points {
        com += p;
    }
    Some(com / points.len() as f64)
}

/// Hemisphere shared by a list of sky points.
///
/// The first off-equator point fixes the hemisphere; a later point of
/// opposite sign means the list straddles both hemispheres and `None` is
/// returned. Empty or all-equator lists also return `None`.
pub fn hemisphere_of_points(points: &[Vector3<f64>]) -> Option<Hemisphere> {
    let mut ours: Option<Hemisphere> = None;
    for p in points {
        match (ours, Hemisphere::of(p)) {
            (None, h) => ours = h,
            (Some(a), Some(b)) if a != b => return None,
            _ => {}
        }
    }
    ours
}
