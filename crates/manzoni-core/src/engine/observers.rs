//! Ready-made [`Observer`] implementations.

use super::observer::Observer;
use crate::core::models::beam::Beam;

/// Where in the run a snapshot was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Element { turn: usize, element: usize },
    Turn { turn: usize, element: usize },
    End { turn: usize, element: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BeamSnapshot {
    pub stage: Stage,
    pub beam: Beam,
}

/// Records full copies of the beam at the requested granularity.
///
/// The initial and final beams are always recorded. Copying every particle after every
/// element is expensive; enable element-level recording only for short runs.
#[derive(Debug, Clone, Default)]
pub struct BeamObserver {
    element_by_element: bool,
    turn_by_turn: bool,
    snapshots: Vec<BeamSnapshot>,
}

impl BeamObserver {
    pub fn new(element_by_element: bool, turn_by_turn: bool) -> Self {
        Self {
            element_by_element,
            turn_by_turn,
            snapshots: Vec::new(),
        }
    }

    pub fn set_element_by_element(&mut self, active: bool) {
        self.element_by_element = active;
    }

    pub fn set_turn_by_turn(&mut self, active: bool) {
        self.turn_by_turn = active;
    }

    pub fn snapshots(&self) -> &[BeamSnapshot] {
        &self.snapshots
    }

    fn record(&mut self, stage: Stage, beam: &Beam) {
        self.snapshots.push(BeamSnapshot {
            stage,
            beam: beam.clone(),
        });
    }
}

impl Observer for BeamObserver {
    type Output = Vec<BeamSnapshot>;

    fn track_start(&mut self, beam: &Beam) {
        self.snapshots.clear();
        self.record(Stage::Start, beam);
    }

    fn element_by_element_is_active(&self) -> bool {
        self.element_by_element
    }

    fn element_by_element(&mut self, turn: usize, element: usize, beam: &Beam) {
        self.record(Stage::Element { turn, element }, beam);
    }

    fn turn_by_turn_is_active(&self) -> bool {
        self.turn_by_turn
    }

    fn turn_by_turn(&mut self, turn: usize, element: usize, beam: &Beam) {
        self.record(Stage::Turn { turn, element }, beam);
    }

    fn track_end(&mut self, turn: usize, element: usize, beam: &Beam) -> Self::Output {
        self.record(Stage::End { turn, element }, beam);
        std::mem::take(&mut self.snapshots)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticleCount {
    pub turn: usize,
    pub element: usize,
    pub particles: usize,
}

/// Surviving particle counts collected by a [`LossesObserver`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LossesReport {
    pub initial: usize,
    pub survivors: usize,
    /// One entry per element per turn, when element-level recording was active.
    pub elements: Vec<ParticleCount>,
    /// One entry per turn.
    pub turns: Vec<ParticleCount>,
}

impl LossesReport {
    pub fn lost(&self) -> usize {
        self.initial - self.survivors
    }

    /// Fraction of the initial particles that survived the run.
    pub fn transmission(&self) -> f64 {
        if self.initial == 0 {
            1.0
        } else {
            self.survivors as f64 / self.initial as f64
        }
    }
}

/// Counts surviving particles without copying any coordinates.
#[derive(Debug, Clone, Default)]
pub struct LossesObserver {
    element_by_element: bool,
    report: LossesReport,
}

impl LossesObserver {
    pub fn new(element_by_element: bool) -> Self {
        Self {
            element_by_element,
            report: LossesReport::default(),
        }
    }
}

impl Observer for LossesObserver {
    type Output = LossesReport;

    fn track_start(&mut self, beam: &Beam) {
        self.report = LossesReport {
            initial: beam.len(),
            survivors: beam.len(),
            ..LossesReport::default()
        };
    }

    fn element_by_element_is_active(&self) -> bool {
        self.element_by_element
    }

    fn element_by_element(&mut self, turn: usize, element: usize, beam: &Beam) {
        self.report.elements.push(ParticleCount {
            turn,
            element,
            particles: beam.len(),
        });
    }

    fn turn_by_turn_is_active(&self) -> bool {
        true
    }

    fn turn_by_turn(&mut self, turn: usize, element: usize, beam: &Beam) {
        self.report.turns.push(ParticleCount {
            turn,
            element,
            particles: beam.len(),
        });
    }

    fn track_end(&mut self, _turn: usize, _element: usize, beam: &Beam) -> Self::Output {
        self.report.survivors = beam.len();
        std::mem::take(&mut self.report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beam(n: usize) -> Beam {
        Beam::from_phase_space(&vec![[0.0; 4]; n])
    }

    #[test]
    fn beam_observer_records_start_and_end_even_when_inactive() {
        let mut observer = BeamObserver::default();
        observer.track_start(&beam(3));
        assert!(!observer.element_by_element_is_active());
        assert!(!observer.turn_by_turn_is_active());
        let snapshots = observer.track_end(0, 2, &beam(2));

        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].stage, Stage::Start);
        assert_eq!(snapshots[0].beam.len(), 3);
        assert_eq!(snapshots[1].stage, Stage::End { turn: 0, element: 2 });
        assert!(observer.snapshots().is_empty());
    }

    #[test]
    fn beam_observer_copies_the_beam() {
        let mut observer = BeamObserver::new(true, false);
        let mut b = beam(2);
        observer.track_start(&b);
        observer.element_by_element(0, 0, &b);
        b.retain(&[true, false]);
        assert_eq!(observer.snapshots()[1].beam.len(), 2);
    }

    #[test]
    fn losses_report_computes_transmission() {
        let mut observer = LossesObserver::new(false);
        observer.track_start(&beam(4));
        observer.turn_by_turn(0, 5, &beam(3));
        let report = observer.track_end(0, 5, &beam(3));

        assert_eq!(report.initial, 4);
        assert_eq!(report.lost(), 1);
        assert!((report.transmission() - 0.75).abs() < 1e-12);
        assert_eq!(
            report.turns,
            vec![ParticleCount {
                turn: 0,
                element: 5,
                particles: 3
            }]
        );
    }

    #[test]
    fn losses_report_of_empty_beam_has_full_transmission() {
        let mut observer = LossesObserver::default();
        observer.track_start(&Beam::empty());
        let report = observer.track_end(0, 0, &Beam::empty());
        assert_eq!(report.transmission(), 1.0);
    }
}
