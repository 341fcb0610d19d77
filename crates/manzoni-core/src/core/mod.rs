//! # Core Module
//!
//! The stateless foundation of the tracking engine.
//!
//! - **Beamline Representation** ([`models`]) - Element records, beamlines, beams and the
//!   fixed numeric record layout shared by every function reading an element.
//! - **Beam Optics** ([`optics`]) - Transfer matrices, in-place kicks and aperture checks.
//! - **Utilities** ([`utils`]) - Reproducible random sampling.
//!
//! Nothing in this module keeps state between calls; the engine owns all mutable state
//! for the duration of a run.

pub mod models;
pub mod optics;
pub mod utils;
