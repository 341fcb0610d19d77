use crate::core::models::beam::Beam;

/// Instrumentation attached to a tracking run.
///
/// The engine calls the hooks synchronously, in this order:
///
/// 1. [`track_start`](Observer::track_start) once, with the initial beam;
/// 2. for every turn and every element, after the element and its aperture have been
///    applied, [`element_by_element`](Observer::element_by_element) if
///    [`element_by_element_is_active`](Observer::element_by_element_is_active) returns
///    `true` at that moment;
/// 3. at the end of every turn, [`turn_by_turn`](Observer::turn_by_turn) with the index
///    of the last element if [`turn_by_turn_is_active`](Observer::turn_by_turn_is_active)
///    returns `true` at that moment;
/// 4. [`track_end`](Observer::track_end) once, whose value becomes the result of the run.
///
/// The activity flags are queried at every occurrence, so an observer may switch them
/// from inside its own hooks. The beam is only lent for the duration of a call; the
/// engine keeps mutating the same storage afterwards, so anything worth keeping must be
/// copied out.
pub trait Observer {
    type Output;

    fn track_start(&mut self, _beam: &Beam) {}

    fn element_by_element_is_active(&self) -> bool {
        false
    }

    fn element_by_element(&mut self, _turn: usize, _element: usize, _beam: &Beam) {}

    fn turn_by_turn_is_active(&self) -> bool {
        false
    }

    fn turn_by_turn(&mut self, _turn: usize, _element: usize, _beam: &Beam) {}

    fn track_end(&mut self, turn: usize, element: usize, beam: &Beam) -> Self::Output;
}
