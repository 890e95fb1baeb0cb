//! Error type surfaced by scan construction and stepping.
//!
//! The C-era ambient status object is replaced by an explicit result type;
//! every fallible operation returns `Result<_, ScanError>` to its immediate
//! caller and nothing is retried internally.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    /// Sky points lie on both ecliptic hemispheres; only single-hemisphere
    /// regions are supported.
    #[error("sky region spans both ecliptic hemispheres")]
    BothHemispheres,

    /// Malformed sky polygon (empty, or exactly two vertices).
    #[error("invalid sky polygon: {0}")]
    InvalidPolygon(&'static str),

    /// Sky-region string did not parse as `(alpha, delta)` pairs.
    #[error("cannot parse sky region string: {0}")]
    ParseRegion(String),

    /// Operation requires a Ready scan.
    #[error("scan is not in the Ready state")]
    NotReady,

    /// Caller-supplied vector has the wrong dimension.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Non-positive or otherwise unusable scalar argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Canonical point maps to a sky vector outside the unit disk.
    #[error("sky vector leaves the unit disk: nX^2 + nY^2 = {norm2}")]
    SkyVectorTooLong { norm2: f64 },

    /// Metric is not positive definite (Cholesky failed).
    #[error("flat metric is not positive definite")]
    MetricNotPositiveDefinite,

    /// The flat-metric collaborator failed.
    #[error("flat metric computation failed: {0}")]
    Metric(String),
}
