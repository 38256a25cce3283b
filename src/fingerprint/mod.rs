// src/fingerprint/mod.rs

//! Content fingerprints for build output and the per-controller store that
//! remembers them between builds.
//!
//! This module does not know about endpoints or notifications; it only turns
//! a set of output files into "which of these changed since the last
//! successful build".

pub mod hash;
pub mod store;

pub use hash::{compute_fingerprint, Fingerprint};
pub use store::{FingerprintMap, FingerprintStore};
