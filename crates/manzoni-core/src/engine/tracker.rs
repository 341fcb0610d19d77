use super::config::TrackingConfig;
use super::error::TrackingError;
use super::observer::Observer;
use crate::core::models::beam::Beam;
use crate::core::models::beamline::Beamline;
use crate::core::models::element::{Dispatch, Element};
use crate::core::optics::{aperture, kick, transfer};
use nalgebra::Matrix5;
use tracing::{debug, info, instrument, trace};

/// How one element acts on the beam, resolved once when the tracker is built.
#[derive(Debug, Clone, PartialEq)]
enum Step {
    Matrix(Matrix5<f64>),
    Kick,
    Passive,
}

/// The turn-by-turn, element-by-element tracking engine.
///
/// Building a tracker validates the whole line: every transfer matrix is computed and
/// every kick parameter is checked up front, so a run either fails before the first
/// particle moves or completes.
#[derive(Debug, Clone)]
pub struct Tracker {
    beamline: Beamline,
    steps: Vec<Step>,
    config: TrackingConfig,
}

impl Tracker {
    pub fn new(beamline: Beamline, config: TrackingConfig) -> Result<Self, TrackingError> {
        config.validate()?;
        if beamline.is_empty() {
            return Err(TrackingError::EmptyBeamline);
        }

        let transfer_options = config.transfer_options();
        let steps = beamline
            .iter()
            .enumerate()
            .map(|(index, element)| {
                let degenerate = |source| TrackingError::NumericDegeneracy {
                    element: index,
                    class: element.class,
                    source,
                };
                match element.class.dispatch() {
                    Dispatch::Matrix => transfer::matrix(element, &transfer_options)
                        .map_err(degenerate)
                        .map(|m| m.map_or(Step::Passive, Step::Matrix)),
                    Dispatch::Kick => kick::validate(element)
                        .map_err(degenerate)
                        .map(|()| Step::Kick),
                    Dispatch::Passive => Ok(Step::Passive),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            beamline,
            steps,
            config,
        })
    }

    /// Normalizes numeric element records with the layout held by `config`, then builds
    /// the tracker.
    pub fn from_records<R: AsRef<[f64]>>(
        records: impl IntoIterator<Item = R>,
        config: TrackingConfig,
    ) -> Result<Self, TrackingError> {
        let beamline = Beamline::from_records(&config.layout, records)?;
        Self::new(beamline, config)
    }

    pub fn beamline(&self) -> &Beamline {
        &self.beamline
    }

    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    /// Tracks `beam` in place without instrumentation.
    ///
    /// Nothing is returned: the final state is whatever `beam` holds afterwards.
    pub fn track(&self, beam: &mut Beam) -> Result<(), TrackingError> {
        self.propagate::<Unobserved>(beam, None)?;
        Ok(())
    }

    /// Tracks `beam` in place while driving `observer`, and returns the value of its
    /// `track_end` hook.
    pub fn track_observed<O: Observer>(
        &self,
        beam: &mut Beam,
        observer: &mut O,
    ) -> Result<O::Output, TrackingError> {
        let (turn, element) = self.propagate(beam, Some(&mut *observer))?;
        Ok(observer.track_end(turn, element, beam))
    }

    /// Runs the turn/element loop and returns the indices of the last turn and element.
    #[instrument(
        skip_all,
        name = "tracking",
        fields(turns = self.config.turns, elements = self.beamline.len(), particles = beam.len())
    )]
    fn propagate<O: Observer>(
        &self,
        beam: &mut Beam,
        mut observer: Option<&mut O>,
    ) -> Result<(usize, usize), TrackingError> {
        info!("Starting tracking run.");
        let initial = beam.len();
        let mut kicks = kick::KickContext::new(&self.config.kicks);

        if let Some(obs) = observer.as_deref_mut() {
            obs.track_start(beam);
        }

        let last_element = self.steps.len() - 1;
        let mut last_turn = 0;
        for turn in 0..self.config.turns {
            for (index, (step, element)) in self.steps.iter().zip(self.beamline.iter()).enumerate() {
                self.apply(index, step, element, beam, &mut kicks)?;

                let lost = aperture::filter(beam, &element.aperture);
                if lost > 0 {
                    debug!(
                        turn,
                        element = index,
                        lost,
                        remaining = beam.len(),
                        "Particles lost on aperture."
                    );
                }

                if let Some(obs) = observer.as_deref_mut() {
                    if obs.element_by_element_is_active() {
                        obs.element_by_element(turn, index, beam);
                    }
                }
            }

            trace!(turn, particles = beam.len(), "Turn complete.");
            if let Some(obs) = observer.as_deref_mut() {
                if obs.turn_by_turn_is_active() {
                    obs.turn_by_turn(turn, last_element, beam);
                }
            }
            last_turn = turn;
        }

        info!(
            survivors = beam.len(),
            lost = initial - beam.len(),
            "Tracking run complete."
        );
        Ok((last_turn, last_element))
    }

    #[inline]
    fn apply(
        &self,
        index: usize,
        step: &Step,
        element: &Element,
        beam: &mut Beam,
        kicks: &mut kick::KickContext,
    ) -> Result<(), TrackingError> {
        match step {
            Step::Kick if !beam.is_empty() => {
                kick::kick(element, beam, kicks).map_err(|source| {
                    TrackingError::NumericDegeneracy {
                        element: index,
                        class: element.class,
                        source,
                    }
                })
            }
            Step::Matrix(m) => {
                beam.transform(m);
                Ok(())
            }
            Step::Kick | Step::Passive => Ok(()),
        }
    }
}

/// Stand-in observer type for uninstrumented runs; never instantiated.
enum Unobserved {}

impl Observer for Unobserved {
    type Output = ();

    fn track_end(&mut self, _turn: usize, _element: usize, _beam: &Beam) {
        match *self {}
    }
}
