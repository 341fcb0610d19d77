//! # Beam Optics Module
//!
//! The physics applied to a beam by a single element.
//!
//! - [`transfer`] - Closed-form 5×5 transfer matrices for drifts, sector bends,
//!   quadrupoles and axial rotations.
//! - [`kick`] - In-place updates for elements that are not a fixed linear map.
//! - [`aperture`] - Removal of particles outside an element's physical boundary.
//!
//! Transfer matrices act on row vectors `(x, px, y, py, 1)`; the trailing unit
//! component lets affine maps be expressed as plain matrix products.

use thiserror::Error;

pub mod aperture;
pub mod kick;
pub mod transfer;

/// A formula input outside the domain where the element's map is defined.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("parameter '{parameter}' = {value}: {reason}")]
pub struct Degeneracy {
    pub parameter: &'static str,
    pub value: f64,
    pub reason: &'static str,
}

#[inline]
pub(crate) fn finite(parameter: &'static str, value: f64) -> Result<f64, Degeneracy> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Degeneracy {
            parameter,
            value,
            reason: "value is not finite",
        })
    }
}
