//! Lattice scan over a Doppler-space boundary.
//!
//! Purpose
//! - Own the whole scan state (boundary, canonical origin, generating
//!   matrix, integer index) and expose the four external operations:
//!   construction, `advance`, `current`, and index get/set for
//!   checkpointing.
//!
//! Contract notes
//! - A freshly constructed scan is Ready with index 0, which maps to the
//!   region midpoint: callers must read `current` *before* the first
//!   `advance` or they skip the origin template.
//! - `advance` must always be called on the index it last produced; the
//!   outward walk is driven by the current index, not by a visited set.
//!
//! Split for readability: `types.rs` (data types), `build.rs`
//! (construction), `step.rs` (stepping and read-out).

mod build;
mod step;
mod types;

pub use types::{
    DopplerLatticeInit, DopplerLatticeScan, PulsarDopplerParams, ScanState, StepOutcome,
};
