//! # Core Models Module
//!
//! Data structures describing what is tracked and what it is tracked through.
//!
//! ## Key Components
//!
//! - [`layout`] - Column positions of the numeric element record and the class/aperture codes
//! - [`element`] - Typed beamline element: class, optical parameters and aperture
//! - [`beamline`] - Ordered, immutable sequence of elements with optional labels
//! - [`beam`] - Particle coordinates as rows of `(x, px, y, py, 1)`
//!
//! ## Usage
//!
//! ```ignore
//! use manzoni::core::models::{beam::Beam, beamline::Beamline, element::Element};
//!
//! let line = Beamline::new(vec![Element::drift(1.0), Element::quadrupole(0.5, 2.0)]);
//! let beam = Beam::from_phase_space(&[[0.001, 0.0, 0.001, 0.0]]);
//! ```

pub mod beam;
pub mod beamline;
pub mod element;
pub mod layout;
