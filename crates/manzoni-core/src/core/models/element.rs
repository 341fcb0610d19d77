use super::beamline::BeamlineError;
use super::layout::{Column, RecordLayout};
use std::fmt;

/// How the engine applies an element to the beam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dispatch {
    /// Linear map: the beam is right-multiplied by the transpose of the transfer matrix.
    Matrix,
    /// In-place mutation of the particle rows.
    Kick,
    /// No transform at all (markers, monitors, unsupported-but-tolerated elements).
    Passive,
}

/// The closed set of element classes understood by the engine.
///
/// Each class belongs to exactly one [`Dispatch`] set. Adding a class forces every
/// `match` on it to be revisited, which is what keeps the matrix and kick libraries
/// complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ElementClass {
    #[default]
    None,
    Drift,
    SBend,
    Quadrupole,
    SRotation,
    Scatterer,
}

impl ElementClass {
    pub const ALL: [ElementClass; 6] = [
        ElementClass::None,
        ElementClass::Drift,
        ElementClass::SBend,
        ElementClass::Quadrupole,
        ElementClass::SRotation,
        ElementClass::Scatterer,
    ];

    pub fn code(self) -> u32 {
        match self {
            ElementClass::None => 0,
            ElementClass::Drift => 1,
            ElementClass::SBend => 2,
            ElementClass::Quadrupole => 3,
            ElementClass::SRotation => 4,
            ElementClass::Scatterer => 5,
        }
    }

    /// Resolves a numeric class code. Non-integral, negative or unknown codes yield `None`.
    pub fn from_code(code: f64) -> Option<Self> {
        if !code.is_finite() || code < 0.0 || code.fract() != 0.0 {
            return None;
        }
        Self::ALL.into_iter().find(|c| f64::from(c.code()) == code)
    }

    pub fn dispatch(self) -> Dispatch {
        match self {
            ElementClass::Drift
            | ElementClass::SBend
            | ElementClass::Quadrupole
            | ElementClass::SRotation => Dispatch::Matrix,
            ElementClass::Scatterer => Dispatch::Kick,
            ElementClass::None => Dispatch::Passive,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ElementClass::None => "NONE",
            ElementClass::Drift => "DRIFT",
            ElementClass::SBend => "SBEND",
            ElementClass::Quadrupole => "QUADRUPOLE",
            ElementClass::SRotation => "SROTATION",
            ElementClass::Scatterer => "SCATTERER",
        }
    }
}

impl fmt::Display for ElementClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Transverse physical boundary of an element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Aperture {
    /// Never filters.
    #[default]
    None,
    /// Keeps particles with `sqrt(x² + y²) <= radius`.
    Circle { radius: f64 },
    /// Keeps particles with `|x| <= half_width` and `|y| <= half_height`.
    Rectangle { half_width: f64, half_height: f64 },
}

impl Aperture {
    pub const CODE_NONE: u32 = 0;
    pub const CODE_CIRCLE: u32 = 1;
    pub const CODE_RECTANGLE: u32 = 2;

    pub fn code(&self) -> u32 {
        match self {
            Aperture::None => Self::CODE_NONE,
            Aperture::Circle { .. } => Self::CODE_CIRCLE,
            Aperture::Rectangle { .. } => Self::CODE_RECTANGLE,
        }
    }

    /// Builds an aperture from its type code and the two dimension columns.
    ///
    /// Dimensions are ignored for `NONE`; a circle only reads the first one.
    pub fn from_code(code: f64, first: f64, second: f64) -> Option<Self> {
        match code {
            c if c == f64::from(Self::CODE_NONE) => Some(Aperture::None),
            c if c == f64::from(Self::CODE_CIRCLE) => Some(Aperture::Circle { radius: first }),
            c if c == f64::from(Self::CODE_RECTANGLE) => Some(Aperture::Rectangle {
                half_width: first,
                half_height: second,
            }),
            _ => None,
        }
    }

    pub fn dimensions(&self) -> (f64, f64) {
        match *self {
            Aperture::None => (0.0, 0.0),
            Aperture::Circle { radius } => (radius, 0.0),
            Aperture::Rectangle {
                half_width,
                half_height,
            } => (half_width, half_height),
        }
    }
}

/// An adjustable numeric parameter of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    Length,
    Angle,
    K1,
    E1,
    E2,
    Aperture,
    Aperture2,
    Scattering,
}

impl Parameter {
    pub fn column(self) -> Column {
        match self {
            Parameter::Length => Column::Length,
            Parameter::Angle => Column::Angle,
            Parameter::K1 => Column::K1,
            Parameter::E1 => Column::E1,
            Parameter::E2 => Column::E2,
            Parameter::Aperture => Column::Aperture,
            Parameter::Aperture2 => Column::Aperture2,
            Parameter::Scattering => Column::Scattering,
        }
    }
}

/// A normalized beamline element.
///
/// Parameters a class does not use are carried as-is and never read by the optics.
/// The `angle` column doubles as the rotation angle of an `SRotation`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Element {
    pub class: ElementClass,
    /// Length in meters.
    pub length: f64,
    /// Bending angle (or roll angle for `SRotation`) in radians.
    pub angle: f64,
    /// Normalized quadrupole gradient in m⁻².
    pub k1: f64,
    /// Entrance edge angle in radians.
    pub e1: f64,
    /// Exit edge angle in radians.
    pub e2: f64,
    /// RMS multiple-scattering angle in radians, read by `Scatterer`.
    pub scattering: f64,
    pub aperture: Aperture,
}

impl Element {
    pub fn marker() -> Self {
        Self::default()
    }

    pub fn drift(length: f64) -> Self {
        Self {
            class: ElementClass::Drift,
            length,
            ..Self::default()
        }
    }

    pub fn sbend(length: f64, angle: f64, e1: f64, e2: f64) -> Self {
        Self {
            class: ElementClass::SBend,
            length,
            angle,
            e1,
            e2,
            ..Self::default()
        }
    }

    pub fn quadrupole(length: f64, k1: f64) -> Self {
        Self {
            class: ElementClass::Quadrupole,
            length,
            k1,
            ..Self::default()
        }
    }

    pub fn srotation(angle: f64) -> Self {
        Self {
            class: ElementClass::SRotation,
            angle,
            ..Self::default()
        }
    }

    /// A thin scattering foil.
    pub fn scatterer(rms_angle: f64) -> Self {
        Self {
            class: ElementClass::Scatterer,
            scattering: rms_angle,
            ..Self::default()
        }
    }

    pub fn with_aperture(mut self, aperture: Aperture) -> Self {
        self.aperture = aperture;
        self
    }

    /// Normalizes one numeric record. `index` is the element's position in the line
    /// and is carried into every error.
    pub fn from_record(
        index: usize,
        record: &[f64],
        layout: &RecordLayout,
    ) -> Result<Self, BeamlineError> {
        let read = |column: Column| {
            layout
                .read(record, column)
                .ok_or(BeamlineError::MissingColumn {
                    element: index,
                    column: column.name(),
                    width: record.len(),
                })
        };

        let code = read(Column::ClassCode)?;
        let class = ElementClass::from_code(code)
            .ok_or(BeamlineError::UnknownClassCode { element: index, code })?;

        let aperture_code = read(Column::ApertureType)?;
        let aperture = Aperture::from_code(
            aperture_code,
            read(Column::Aperture)?,
            read(Column::Aperture2)?,
        )
        .ok_or(BeamlineError::UnknownApertureCode {
            element: index,
            code: aperture_code,
        })?;

        Ok(Self {
            class,
            length: read(Column::Length)?,
            angle: read(Column::Angle)?,
            k1: read(Column::K1)?,
            e1: read(Column::E1)?,
            e2: read(Column::E2)?,
            scattering: read(Column::Scattering)?,
            aperture,
        })
    }

    /// Writes the element back into a record following `layout`.
    pub fn to_record(&self, layout: &RecordLayout) -> Vec<f64> {
        let mut record = vec![0.0; layout.width()];
        let (first, second) = self.aperture.dimensions();
        for column in Column::ALL {
            record[layout.position(column)] = match column {
                Column::ClassCode => f64::from(self.class.code()),
                Column::Length => self.length,
                Column::Angle => self.angle,
                Column::K1 => self.k1,
                Column::E1 => self.e1,
                Column::E2 => self.e2,
                Column::ApertureType => f64::from(self.aperture.code()),
                Column::Aperture => first,
                Column::Aperture2 => second,
                Column::Scattering => self.scattering,
            };
        }
        record
    }

    pub fn parameter(&self, parameter: Parameter) -> f64 {
        let (first, second) = self.aperture.dimensions();
        match parameter {
            Parameter::Length => self.length,
            Parameter::Angle => self.angle,
            Parameter::K1 => self.k1,
            Parameter::E1 => self.e1,
            Parameter::E2 => self.e2,
            Parameter::Aperture => first,
            Parameter::Aperture2 => second,
            Parameter::Scattering => self.scattering,
        }
    }

    /// Returns a copy with `parameter` replaced by `value`.
    ///
    /// Aperture dimensions can only be set on an element whose aperture type uses them.
    pub fn with_parameter(
        mut self,
        index: usize,
        parameter: Parameter,
        value: f64,
    ) -> Result<Self, BeamlineError> {
        match parameter {
            Parameter::Length => self.length = value,
            Parameter::Angle => self.angle = value,
            Parameter::K1 => self.k1 = value,
            Parameter::E1 => self.e1 = value,
            Parameter::E2 => self.e2 = value,
            Parameter::Scattering => self.scattering = value,
            Parameter::Aperture | Parameter::Aperture2 => {
                self.aperture = match (self.aperture, parameter) {
                    (Aperture::Circle { .. }, Parameter::Aperture) => {
                        Aperture::Circle { radius: value }
                    }
                    (Aperture::Rectangle { half_height, .. }, Parameter::Aperture) => {
                        Aperture::Rectangle {
                            half_width: value,
                            half_height,
                        }
                    }
                    (Aperture::Rectangle { half_width, .. }, Parameter::Aperture2) => {
                        Aperture::Rectangle {
                            half_width,
                            half_height: value,
                        }
                    }
                    _ => {
                        return Err(BeamlineError::InapplicableParameter {
                            element: index,
                            column: parameter.column().name(),
                        });
                    }
                };
            }
        }
        Ok(self)
    }
}
