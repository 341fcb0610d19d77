use super::{Degeneracy, finite};
use crate::core::models::beam::{PX, PY, X, Y};
use crate::core::models::element::{Element, ElementClass};
use nalgebra::{Matrix2, Matrix5};
use serde::Deserialize;

/// Below this bending angle a sector bend is tracked as a drift.
pub const ANGLE_EPSILON: f64 = 1e-12;

/// What to do with a quadrupole whose strength is exactly zero.
///
/// The closed-form map divides by `sqrt(|k1|)`, so the zero case has to be decided
/// explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZeroStrengthPolicy {
    /// Abort with a numeric degeneracy on `K1`.
    #[default]
    Reject,
    /// Track the quadrupole as a drift of the same length.
    Drift,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransferOptions {
    pub zero_strength: ZeroStrengthPolicy,
}

/// Transfer matrix of a matrix-handled element, or `None` for any other class.
pub fn matrix(
    element: &Element,
    options: &TransferOptions,
) -> Result<Option<Matrix5<f64>>, Degeneracy> {
    let m = match element.class {
        ElementClass::Drift => drift(element.length)?,
        ElementClass::SBend => sbend(element.length, element.angle, element.e1, element.e2)?,
        ElementClass::Quadrupole => {
            quadrupole(element.length, element.k1, options.zero_strength)?
        }
        ElementClass::SRotation => srotation(element.angle)?,
        ElementClass::None | ElementClass::Scatterer => return Ok(None),
    };
    Ok(Some(m))
}

pub fn drift(length: f64) -> Result<Matrix5<f64>, Degeneracy> {
    let length = finite("L", length)?;
    let mut m = Matrix5::identity();
    m[(X, PX)] = length;
    m[(Y, PY)] = length;
    Ok(m)
}

/// Sector bend with entrance and exit pole-face rotations: `M_e2 · M_b · M_e1`.
pub fn sbend(length: f64, angle: f64, e1: f64, e2: f64) -> Result<Matrix5<f64>, Degeneracy> {
    let length = finite("L", length)?;
    let angle = finite("ANGLE", angle)?;
    let e1 = finite("E1", e1)?;
    let e2 = finite("E2", e2)?;

    if angle.abs() < ANGLE_EPSILON {
        return drift(length);
    }
    if length == 0.0 {
        return Err(Degeneracy {
            parameter: "L",
            value: length,
            reason: "a bend with a non-zero angle needs a non-zero length",
        });
    }

    let rho = length / angle;
    let (s, c) = angle.sin_cos();

    let mut body = Matrix5::identity();
    body.fixed_view_mut::<2, 2>(X, X)
        .copy_from(&Matrix2::new(c, rho * s, -s / rho, c));
    body[(Y, PY)] = length;

    Ok(pole_face(e2, rho) * body * pole_face(e1, rho))
}

/// Thin edge focusing of a pole face rotated by `edge`, for a bend of radius `rho`.
fn pole_face(edge: f64, rho: f64) -> Matrix5<f64> {
    let h = -edge.tan() / rho;
    let mut m = Matrix5::identity();
    m[(PX, X)] = -h;
    m[(PY, Y)] = h;
    m
}

/// Thick quadrupole. `k1 > 0` focuses horizontally, `k1 < 0` vertically.
pub fn quadrupole(
    length: f64,
    k1: f64,
    zero_strength: ZeroStrengthPolicy,
) -> Result<Matrix5<f64>, Degeneracy> {
    let length = finite("L", length)?;
    let k1 = finite("K1", k1)?;

    if k1 == 0.0 {
        return match zero_strength {
            ZeroStrengthPolicy::Drift => drift(length),
            ZeroStrengthPolicy::Reject => Err(Degeneracy {
                parameter: "K1",
                value: k1,
                reason: "quadrupole strength is exactly zero",
            }),
        };
    }

    let k = k1.abs().sqrt();
    let phi = k * length;
    let (s, c) = phi.sin_cos();
    let (sh, ch) = (phi.sinh(), phi.cosh());

    let focusing = Matrix2::new(c, s / k, -k * s, c);
    let defocusing = Matrix2::new(ch, sh / k, k * sh, ch);
    let (horizontal, vertical) = if k1 > 0.0 {
        (focusing, defocusing)
    } else {
        (defocusing, focusing)
    };

    let mut m = Matrix5::identity();
    m.fixed_view_mut::<2, 2>(X, X).copy_from(&horizontal);
    m.fixed_view_mut::<2, 2>(Y, Y).copy_from(&vertical);
    Ok(m)
}

/// Rotation of the transverse frame about the beam axis by `psi`.
pub fn srotation(psi: f64) -> Result<Matrix5<f64>, Degeneracy> {
    let psi = finite("ANGLE", psi)?;
    let (s, c) = psi.sin_cos();
    let mut m = Matrix5::identity();
    m[(X, X)] = c;
    m[(X, Y)] = s;
    m[(PX, PX)] = c;
    m[(PX, PY)] = s;
    m[(Y, X)] = -s;
    m[(Y, Y)] = c;
    m[(PY, PX)] = -s;
    m[(PY, PY)] = c;
    Ok(m)
}
