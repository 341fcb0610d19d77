//! # Manzoni Core Library
//!
//! A fast particle-beam tracking engine. A beamline is an ordered sequence of optical
//! elements; a beam is a set of particles described by their transverse phase-space
//! coordinates. Tracking propagates the beam through the line, element by element and
//! turn by turn, removing particles that hit an aperture.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Element`, `Beamline`, `Beam`)
//!   and the pure optics: transfer matrices, in-place kicks and aperture filtering.
//!
//! - **[`engine`]: The Logic Core.** The turn/element tracking loop, its configuration,
//!   error taxonomy and the `Observer` instrumentation contract.
//!
//! - **[`workflows`]: The Public API.** High-level entry points that normalize numeric
//!   element records, build the engine and run it.

pub mod core;
pub mod engine;
pub mod workflows;
