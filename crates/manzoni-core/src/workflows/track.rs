use crate::core::models::beam::Beam;
use crate::core::models::beamline::{Beamline, Variable};
use crate::engine::config::TrackingConfig;
use crate::engine::error::TrackingError;
use crate::engine::observer::Observer;
use crate::engine::tracker::Tracker;
use tracing::{info, instrument};

/// Normalizes `records` and tracks `beam` through them in place.
///
/// Malformed records are reported before any particle is moved.
#[instrument(skip_all, name = "track_workflow")]
pub fn track<R: AsRef<[f64]>>(
    records: impl IntoIterator<Item = R>,
    beam: &mut Beam,
    config: &TrackingConfig,
) -> Result<(), TrackingError> {
    let tracker = Tracker::from_records(records, config.clone())?;
    info!(
        elements = tracker.beamline().len(),
        length = tracker.beamline().total_length(),
        "Beamline normalized."
    );
    tracker.track(beam)
}

/// Same as [`track`], with `observer` attached to the run.
#[instrument(skip_all, name = "track_workflow")]
pub fn track_observed<R: AsRef<[f64]>, O: Observer>(
    records: impl IntoIterator<Item = R>,
    beam: &mut Beam,
    config: &TrackingConfig,
    observer: &mut O,
) -> Result<O::Output, TrackingError> {
    let tracker = Tracker::from_records(records, config.clone())?;
    info!(
        elements = tracker.beamline().len(),
        length = tracker.beamline().total_length(),
        "Beamline normalized."
    );
    tracker.track_observed(beam, observer)
}

/// Tracks through a copy of `line` with `variables` set to `values`.
///
/// `line` is not modified, so a fitting loop can call this repeatedly with new values
/// against the same reference line.
#[instrument(skip_all, name = "adjusted_track_workflow", fields(variables = variables.len()))]
pub fn track_adjusted<O: Observer>(
    line: &Beamline,
    variables: &[Variable],
    values: &[f64],
    beam: &mut Beam,
    config: &TrackingConfig,
    observer: &mut O,
) -> Result<O::Output, TrackingError> {
    let adjusted = line.adjusted(variables, values)?;
    Tracker::new(adjusted, config.clone())?.track_observed(beam, observer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::beamline::BeamlineError;
    use crate::core::models::element::{Element, Parameter};
    use crate::core::models::layout::RecordLayout;
    use crate::engine::config::TrackingConfigBuilder;
    use crate::engine::observers::LossesObserver;

    const TOLERANCE: f64 = 1e-12;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn config(turns: usize) -> TrackingConfig {
        TrackingConfigBuilder::new().turns(turns).build().unwrap()
    }

    #[test]
    fn track_moves_beam_through_numeric_records() {
        let layout = RecordLayout::default();
        let records = vec![
            Element::drift(1.5).to_record(&layout),
            Element::marker().to_record(&layout),
        ];
        let mut beam = Beam::from_phase_space(&[[0.0, 0.002, 0.0, -0.001]]);
        track(&records, &mut beam, &config(2)).unwrap();

        let c = beam.coordinates(0).unwrap();
        assert!(f64_approx_equal(c[0], 0.006));
        assert!(f64_approx_equal(c[2], -0.003));
    }

    #[test]
    fn track_honours_custom_layout() {
        let layout = RecordLayout {
            class_code: 9,
            scattering: 0,
            ..RecordLayout::default()
        };
        let cfg = TrackingConfigBuilder::new()
            .turns(1)
            .layout(layout)
            .build()
            .unwrap();
        let records = vec![Element::drift(2.0).to_record(&layout)];
        let mut beam = Beam::from_phase_space(&[[0.0, 0.001, 0.0, 0.0]]);
        track(&records, &mut beam, &cfg).unwrap();
        assert!(f64_approx_equal(beam.coordinates(0).unwrap()[0], 0.002));
    }

    #[test]
    fn track_leaves_beam_untouched_on_malformed_record() {
        let layout = RecordLayout::default();
        let records = vec![Element::drift(1.0).to_record(&layout), vec![1.0]];
        let start = Beam::from_phase_space(&[[0.001, 0.001, 0.0, 0.0]]);
        let mut beam = start.clone();
        let err = track(&records, &mut beam, &config(1)).unwrap_err();
        assert!(matches!(
            err,
            TrackingError::Configuration {
                source: BeamlineError::MissingColumn { element: 1, .. }
            }
        ));
        assert_eq!(beam, start);
    }

    #[test]
    fn track_observed_returns_observer_output() {
        let layout = RecordLayout::default();
        let records = vec![Element::drift(1.0).to_record(&layout)];
        let mut beam = Beam::from_phase_space(&[[0.0; 4], [0.0; 4]]);
        let report =
            track_observed(&records, &mut beam, &config(3), &mut LossesObserver::new(false))
                .unwrap();
        assert_eq!(report.initial, 2);
        assert_eq!(report.survivors, 2);
        assert_eq!(report.turns.len(), 3);
    }

    #[test]
    fn track_adjusted_uses_new_values_and_keeps_reference_line() {
        let line = Beamline::from_labelled([
            ("D1", Element::drift(1.0)),
            ("QF", Element::quadrupole(0.5, 2.0)),
        ]);
        let variables = line
            .resolve_variables(&[("D1", Parameter::Length)])
            .unwrap();

        let mut beam = Beam::from_phase_space(&[[0.0, 0.001, 0.0, 0.0]]);
        let mut observer = LossesObserver::new(false);
        track_adjusted(&line, &variables, &[0.0], &mut beam, &config(1), &mut observer)
            .unwrap();

        let mut reference = Beam::from_phase_space(&[[0.0, 0.001, 0.0, 0.0]]);
        Tracker::new(
            Beamline::new(vec![Element::quadrupole(0.5, 2.0)]),
            config(1),
        )
        .unwrap()
        .track(&mut reference)
        .unwrap();

        assert_eq!(beam, reference);
        assert_eq!(line.get(0).unwrap().length, 1.0);
    }

    #[test]
    fn track_adjusted_rejects_value_count_mismatch() {
        let line = Beamline::from_labelled([("D1", Element::drift(1.0))]);
        let variables = line
            .resolve_variables(&[("D1", Parameter::Length)])
            .unwrap();
        let mut beam = Beam::from_phase_space(&[[0.0; 4]]);
        let err = track_adjusted(
            &line,
            &variables,
            &[1.0, 2.0],
            &mut beam,
            &config(1),
            &mut LossesObserver::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TrackingError::Configuration {
                source: BeamlineError::VariableCountMismatch {
                    expected: 1,
                    found: 2
                }
            }
        ));
    }
}
