//! # Workflows Module
//!
//! High-level entry points for callers that hold numeric element records rather than
//! a ready-made [`Beamline`](crate::core::models::beamline::Beamline).
//!
//! - **Tracking Workflow** ([`track`]) - Normalizes records, builds the engine and runs
//!   it, optionally after setting named element parameters to new values.

pub mod track;
