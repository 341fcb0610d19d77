use crate::core::models::beam::{Beam, X, Y};
use crate::core::models::element::Aperture;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Whether a particle at `(x, y)` lies inside the aperture.
///
/// Boundaries are inclusive. A non-finite coordinate is always outside.
#[inline]
pub fn contains(aperture: &Aperture, x: f64, y: f64) -> bool {
    match *aperture {
        Aperture::None => true,
        Aperture::Circle { radius } => x.hypot(y) <= radius,
        Aperture::Rectangle {
            half_width,
            half_height,
        } => x.abs() <= half_width && y.abs() <= half_height,
    }
}

/// Survivor mask of the beam for this aperture, or `None` when the aperture never filters.
pub fn survivors(beam: &Beam, aperture: &Aperture) -> Option<Vec<bool>> {
    if matches!(aperture, Aperture::None) {
        return None;
    }

    let n = beam.len();
    let data = beam.particles().as_slice();
    let xs = &data[X * n..(X + 1) * n];
    let ys = &data[Y * n..(Y + 1) * n];

    #[cfg(not(feature = "parallel"))]
    let mask = xs
        .iter()
        .zip(ys)
        .map(|(&x, &y)| contains(aperture, x, y))
        .collect();

    #[cfg(feature = "parallel")]
    let mask = xs
        .par_iter()
        .zip(ys.par_iter())
        .map(|(&x, &y)| contains(aperture, x, y))
        .collect();

    Some(mask)
}

/// Removes every particle outside the aperture and returns how many were lost.
///
/// Survivors keep their relative order. Filtering an already filtered beam with the
/// same aperture removes nothing.
pub fn filter(beam: &mut Beam, aperture: &Aperture) -> usize {
    match survivors(beam, aperture) {
        Some(mask) => beam.retain(&mask),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spread_beam() -> Beam {
        Beam::from_phase_space(&[
            [0.0, 0.0, 0.0, 0.0],
            [0.03, 0.0, 0.03, 0.0],
            [0.05, 0.1, 0.0, 0.0],
            [-0.02, 0.0, -0.06, 0.0],
            [0.1, 0.0, 0.1, 0.0],
        ])
    }

    #[test]
    fn none_aperture_keeps_every_particle() {
        let mut beam = spread_beam();
        assert_eq!(filter(&mut beam, &Aperture::None), 0);
        assert_eq!(beam, spread_beam());
    }

    #[test]
    fn circle_keeps_particles_within_radius_inclusive() {
        let mut beam = spread_beam();
        let lost = filter(&mut beam, &Aperture::Circle { radius: 0.05 });
        assert_eq!(lost, 2);
        assert_eq!(beam.len(), 3);
        assert_eq!(beam.coordinates(1).unwrap()[X], 0.03);
        assert_eq!(beam.coordinates(2).unwrap()[X], 0.05);
    }

    #[test]
    fn rectangle_checks_each_plane_independently() {
        let mut beam = spread_beam();
        let lost = filter(
            &mut beam,
            &Aperture::Rectangle {
                half_width: 0.05,
                half_height: 0.05,
            },
        );
        assert_eq!(lost, 2);
        let xs: Vec<f64> = (0..beam.len())
            .map(|i| beam.coordinates(i).unwrap()[X])
            .collect();
        assert_eq!(xs, vec![0.0, 0.03, 0.05]);
    }

    #[test]
    fn filter_is_idempotent() {
        let aperture = Aperture::Circle { radius: 0.045 };
        let mut once = spread_beam();
        filter(&mut once, &aperture);
        let mut twice = once.clone();
        assert_eq!(filter(&mut twice, &aperture), 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn non_finite_coordinates_are_lost() {
        let mut beam = Beam::from_phase_space(&[[f64::NAN, 0.0, 0.0, 0.0], [0.0; 4]]);
        assert_eq!(filter(&mut beam, &Aperture::Circle { radius: 1.0 }), 1);
        assert_eq!(beam.len(), 1);
    }

    #[test]
    fn empty_beam_stays_empty() {
        let mut beam = Beam::empty();
        assert_eq!(filter(&mut beam, &Aperture::Circle { radius: 1.0 }), 0);
        assert!(beam.is_empty());
    }
}
