use crate::core::utils::sampling::{seeded_rng, standard_normal};
use nalgebra::{Matrix5, MatrixXx5};
use thiserror::Error;

/// Number of coordinates per particle: `x, px, y, py` plus the homogeneous unit.
pub const COORDINATES: usize = 5;

pub const X: usize = 0;
pub const PX: usize = 1;
pub const Y: usize = 2;
pub const PY: usize = 3;
pub const UNIT: usize = 4;

/// Row-major particle storage, one particle per row.
pub type Particles = MatrixXx5<f64>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BeamError {
    #[error("Particle {row}: homogeneous component is {value}, expected 1")]
    InvalidUnitComponent { row: usize, value: f64 },

    #[error("Invalid distribution parameter '{name}': {value}")]
    InvalidDistribution { name: &'static str, value: f64 },
}

/// A collection of particles tracked together.
///
/// The particle count can only decrease over the lifetime of a beam: the only
/// operation that changes it is [`Beam::retain`].
#[derive(Debug, Clone, PartialEq)]
pub struct Beam {
    particles: Particles,
}

impl Beam {
    /// Wraps an `n × 5` matrix. Every row must carry `1.0` in its last column.
    pub fn new(particles: Particles) -> Result<Self, BeamError> {
        if let Some((row, value)) = particles
            .column(UNIT)
            .iter()
            .enumerate()
            .find(|&(_, &v)| v != 1.0)
        {
            return Err(BeamError::InvalidUnitComponent { row, value: *value });
        }
        Ok(Self { particles })
    }

    pub fn empty() -> Self {
        Self {
            particles: Particles::zeros(0),
        }
    }

    /// Builds a beam from `(x, px, y, py)` tuples, appending the unit component.
    pub fn from_phase_space(coordinates: &[[f64; 4]]) -> Self {
        let particles = Particles::from_fn(coordinates.len(), |r, c| {
            if c == UNIT { 1.0 } else { coordinates[r][c] }
        });
        Self { particles }
    }

    /// Draws `n` particles from an uncorrelated Gaussian distribution.
    ///
    /// The same `seed` always yields the same beam.
    pub fn gaussian(n: usize, mean: [f64; 4], sigma: [f64; 4], seed: u64) -> Result<Self, BeamError> {
        const NAMES: [&str; 4] = ["sigma_x", "sigma_px", "sigma_y", "sigma_py"];
        for (&name, &s) in NAMES.iter().zip(&sigma) {
            if !s.is_finite() || s < 0.0 {
                return Err(BeamError::InvalidDistribution { name, value: s });
            }
        }

        let mut rng = seeded_rng(seed);
        let mut particles = Particles::zeros(n);
        for mut row in particles.row_iter_mut() {
            for c in 0..4 {
                row[c] = mean[c] + sigma[c] * standard_normal(&mut rng);
            }
            row[UNIT] = 1.0;
        }
        Ok(Self { particles })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.nrows()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.nrows() == 0
    }

    #[inline]
    pub fn particles(&self) -> &Particles {
        &self.particles
    }

    #[inline]
    pub(crate) fn particles_mut(&mut self) -> &mut Particles {
        &mut self.particles
    }

    pub fn into_particles(self) -> Particles {
        self.particles
    }

    pub fn coordinates(&self, index: usize) -> Option<[f64; COORDINATES]> {
        (index < self.len()).then(|| {
            let row = self.particles.row(index);
            [row[X], row[PX], row[Y], row[PY], row[UNIT]]
        })
    }

    /// Applies a linear map to every particle: `beam ← beam · Mᵀ`.
    pub fn transform(&mut self, matrix: &Matrix5<f64>) {
        self.particles = &self.particles * matrix.transpose();
    }

    /// Keeps the rows whose mask entry is `true`, preserving their order, and returns
    /// how many particles were dropped.
    pub fn retain(&mut self, mask: &[bool]) -> usize {
        debug_assert_eq!(mask.len(), self.len());
        let keep: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(i, &k)| k.then_some(i))
            .collect();
        let lost = self.len() - keep.len();
        if lost > 0 {
            self.particles = self.particles.select_rows(keep.iter());
        }
        lost
    }
}

impl Default for Beam {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn from_phase_space_appends_unit_component() {
        let beam = Beam::from_phase_space(&[[1.0, 2.0, 3.0, 4.0], [5.0, 6.0, 7.0, 8.0]]);
        assert_eq!(beam.len(), 2);
        assert_eq!(beam.coordinates(1), Some([5.0, 6.0, 7.0, 8.0, 1.0]));
        assert_eq!(beam.coordinates(2), None);
    }

    #[test]
    fn new_rejects_rows_without_unit_component() {
        let mut particles = Particles::zeros(3);
        particles.column_mut(UNIT).fill(1.0);
        particles[(2, UNIT)] = 0.0;
        let err = Beam::new(particles).unwrap_err();
        assert_eq!(err, BeamError::InvalidUnitComponent { row: 2, value: 0.0 });
    }

    #[test]
    fn empty_beam_has_no_particles() {
        let beam = Beam::empty();
        assert!(beam.is_empty());
        assert_eq!(beam.particles().ncols(), COORDINATES);
    }

    #[test]
    fn transform_right_multiplies_by_transpose() {
        let mut beam = Beam::from_phase_space(&[[0.1, 0.2, 0.0, 0.0]]);
        let mut m = Matrix5::identity();
        m[(X, PX)] = 2.0;
        m[(Y, UNIT)] = 0.5;
        beam.transform(&m);
        let c = beam.coordinates(0).unwrap();
        assert!((c[X] - 0.5).abs() < TOLERANCE);
        assert!((c[PX] - 0.2).abs() < TOLERANCE);
        assert!((c[Y] - 0.5).abs() < TOLERANCE);
        assert_eq!(c[UNIT], 1.0);
    }

    #[test]
    fn retain_drops_masked_rows_in_order() {
        let mut beam = Beam::from_phase_space(&[
            [1.0, 0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0, 0.0],
            [3.0, 0.0, 0.0, 0.0],
        ]);
        let lost = beam.retain(&[true, false, true]);
        assert_eq!(lost, 1);
        assert_eq!(beam.len(), 2);
        assert_eq!(beam.coordinates(1).unwrap()[X], 3.0);
    }

    #[test]
    fn gaussian_is_reproducible_and_centered() {
        let mean = [0.001, 0.0, -0.002, 0.0];
        let sigma = [0.001, 0.0001, 0.002, 0.0002];
        let a = Beam::gaussian(5_000, mean, sigma, 42).unwrap();
        let b = Beam::gaussian(5_000, mean, sigma, 42).unwrap();
        assert_eq!(a, b);

        let mean_x = a.particles().column(X).mean();
        let mean_y = a.particles().column(Y).mean();
        assert!((mean_x - 0.001).abs() < 1e-4);
        assert!((mean_y + 0.002).abs() < 2e-4);
        assert!(a.particles().column(UNIT).iter().all(|&u| u == 1.0));
    }

    #[test]
    fn gaussian_rejects_negative_sigma() {
        let err = Beam::gaussian(10, [0.0; 4], [0.1, -0.1, 0.1, 0.1], 0).unwrap_err();
        assert!(matches!(
            err,
            BeamError::InvalidDistribution {
                name: "sigma_px",
                ..
            }
        ));
    }
}
