use super::element::{Element, Parameter};
use super::layout::RecordLayout;
use thiserror::Error;

/// Configuration errors found while assembling a beamline.
///
/// All of them are raised before any transform is attempted, so a malformed
/// line never starts tracking.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BeamlineError {
    #[error("Element {element}: class code {code} is not registered")]
    UnknownClassCode { element: usize, code: f64 },

    #[error("Element {element}: aperture type code {code} is not registered")]
    UnknownApertureCode { element: usize, code: f64 },

    #[error("Element {element}: record of width {width} has no '{column}' column")]
    MissingColumn {
        element: usize,
        column: &'static str,
        width: usize,
    },

    #[error("Element {element}: parameter '{column}' does not apply to this element")]
    InapplicableParameter { element: usize, column: &'static str },

    #[error("Element {element} does not exist in a line of {len} elements")]
    IndexOutOfRange { element: usize, len: usize },

    #[error("No element labelled '{0}'")]
    UnknownLabel(String),

    #[error("Expected {expected} parameter values, got {found}")]
    VariableCountMismatch { expected: usize, found: usize },
}

/// A parameter of one specific element, resolved to its position in the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variable {
    pub element: usize,
    pub parameter: Parameter,
}

/// An ordered, immutable sequence of elements.
///
/// Labels are optional and only used to resolve [`Variable`]s by name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Beamline {
    elements: Vec<Element>,
    labels: Vec<Option<String>>,
}

impl Beamline {
    pub fn new(elements: Vec<Element>) -> Self {
        let labels = vec![None; elements.len()];
        Self { elements, labels }
    }

    pub fn from_labelled<S: Into<String>>(elements: impl IntoIterator<Item = (S, Element)>) -> Self {
        let (labels, elements): (Vec<_>, Vec<_>) = elements
            .into_iter()
            .map(|(label, element)| (Some(label.into()), element))
            .unzip();
        Self { elements, labels }
    }

    /// Normalizes a table of numeric records, one row per element, into a beamline.
    ///
    /// The first malformed row aborts the conversion and is reported by index.
    pub fn from_records<R: AsRef<[f64]>>(
        layout: &RecordLayout,
        records: impl IntoIterator<Item = R>,
    ) -> Result<Self, BeamlineError> {
        let elements = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| Element::from_record(i, record.as_ref(), layout))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(elements))
    }

    pub fn to_records(&self, layout: &RecordLayout) -> Vec<Vec<f64>> {
        self.elements.iter().map(|e| e.to_record(layout)).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn get(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).and_then(|l| l.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn total_length(&self) -> f64 {
        self.elements.iter().map(|e| e.length).sum()
    }

    /// Maps `(label, parameter)` pairs to element positions.
    pub fn resolve_variables(
        &self,
        variables: &[(&str, Parameter)],
    ) -> Result<Vec<Variable>, BeamlineError> {
        variables
            .iter()
            .map(|&(label, parameter)| {
                self.labels
                    .iter()
                    .position(|l| l.as_deref() == Some(label))
                    .map(|element| Variable { element, parameter })
                    .ok_or_else(|| BeamlineError::UnknownLabel(label.to_string()))
            })
            .collect()
    }

    /// Returns a new beamline with each variable set to the matching value.
    ///
    /// The receiver is left untouched, so a line owned by a running engine can never
    /// change under it.
    pub fn adjusted(&self, variables: &[Variable], values: &[f64]) -> Result<Self, BeamlineError> {
        if variables.len() != values.len() {
            return Err(BeamlineError::VariableCountMismatch {
                expected: variables.len(),
                found: values.len(),
            });
        }
        let mut adjusted = self.clone();
        for (variable, &value) in variables.iter().zip(values) {
            let element = adjusted.elements.get_mut(variable.element).ok_or(
                BeamlineError::IndexOutOfRange {
                    element: variable.element,
                    len: self.elements.len(),
                },
            )?;
            *element = element.with_parameter(variable.element, variable.parameter, value)?;
        }
        Ok(adjusted)
    }
}

impl<'a> IntoIterator for &'a Beamline {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
