use super::{Degeneracy, finite};
use crate::core::models::beam::{Beam, PX, PY};
use crate::core::models::element::{Element, ElementClass};
use crate::core::utils::sampling::{seeded_rng, standard_normal};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct KickOptions {
    /// Seed of the generator shared by every stochastic kick of a run.
    pub seed: u64,
}

/// Mutable state threaded through every kick of one tracking run.
#[derive(Debug, Clone)]
pub struct KickContext {
    rng: ChaCha8Rng,
}

impl KickContext {
    pub fn new(options: &KickOptions) -> Self {
        Self {
            rng: seeded_rng(options.seed),
        }
    }
}

/// Applies a kick-handled element to every particle in place.
///
/// Row order is preserved and an empty beam is left untouched. Elements of other
/// classes are a no-op.
pub fn kick(element: &Element, beam: &mut Beam, context: &mut KickContext) -> Result<(), Degeneracy> {
    match element.class {
        ElementClass::Scatterer => scatter(element.scattering, beam, context),
        ElementClass::None
        | ElementClass::Drift
        | ElementClass::SBend
        | ElementClass::Quadrupole
        | ElementClass::SRotation => Ok(()),
    }
}

/// Checks the parameters a kick will read without touching any beam.
pub fn validate(element: &Element) -> Result<(), Degeneracy> {
    match element.class {
        ElementClass::Scatterer => checked_rms_angle(element.scattering).map(|_| ()),
        ElementClass::None
        | ElementClass::Drift
        | ElementClass::SBend
        | ElementClass::Quadrupole
        | ElementClass::SRotation => Ok(()),
    }
}

fn checked_rms_angle(value: f64) -> Result<f64, Degeneracy> {
    let value = finite("SCATTERING", value)?;
    if value < 0.0 {
        return Err(Degeneracy {
            parameter: "SCATTERING",
            value,
            reason: "RMS scattering angle must not be negative",
        });
    }
    Ok(value)
}

/// Multiple scattering in a thin foil: independent Gaussian angle deviates of width
/// `rms_angle` in both planes.
fn scatter(rms_angle: f64, beam: &mut Beam, context: &mut KickContext) -> Result<(), Degeneracy> {
    let rms_angle = checked_rms_angle(rms_angle)?;
    if rms_angle == 0.0 || beam.is_empty() {
        return Ok(());
    }

    for mut row in beam.particles_mut().row_iter_mut() {
        row[PX] += rms_angle * standard_normal(&mut context.rng);
        row[PY] += rms_angle * standard_normal(&mut context.rng);
    }
    Ok(())
}
