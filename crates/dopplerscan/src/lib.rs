//! Lattice-covering template banks over Doppler parameter spaces.
//!
//! Given a bounded search region — a sky polygon on one ecliptic
//! hemisphere plus a box in frequency and spindowns — the scanner
//! enumerates the points of a sheared A*_n covering lattice whose physical
//! image lies inside the region, so that every signal in the region is
//! within a prescribed mismatch of some template.
//!
//! Internal operations use *ecliptic* coordinates throughout; equatorial
//! input and output are rotated through the obliquity at the edges.
//!
//! The public face is [`scan::DopplerLatticeScan`]; the flat mismatch
//! metric comes from a caller-supplied [`metric::FlatMetric`] source.

pub mod boundary;
pub mod canonical;
pub mod cmp;
pub mod error;
pub mod lattice;
pub mod metric;
pub mod scan;
pub mod sky;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::ScanError;
pub use scan::{DopplerLatticeInit, DopplerLatticeScan, ScanState, StepOutcome};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::boundary::{parse_sky_region, DopplerBoundary, SpinRange};
    pub use crate::canonical::{DopplerPoint, PulsarSpins, MAX_SPINS};
    pub use crate::error::ScanError;
    pub use crate::metric::{CircularOrbitMetric, FlatMetric};
    pub use crate::scan::{
        DopplerLatticeInit, DopplerLatticeScan, PulsarDopplerParams, ScanState, StepOutcome,
    };
    pub use crate::sky::{CoordinateSystem, Hemisphere, SkyPosition};
}
