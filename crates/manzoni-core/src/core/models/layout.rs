use serde::Deserialize;

/// A named column of the numeric element record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    ClassCode,
    Length,
    Angle,
    K1,
    E1,
    E2,
    ApertureType,
    Aperture,
    Aperture2,
    Scattering,
}

impl Column {
    pub const ALL: [Column; 10] = [
        Column::ClassCode,
        Column::Length,
        Column::Angle,
        Column::K1,
        Column::E1,
        Column::E2,
        Column::ApertureType,
        Column::Aperture,
        Column::Aperture2,
        Column::Scattering,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::ClassCode => "CLASS_CODE",
            Column::Length => "L",
            Column::Angle => "ANGLE",
            Column::K1 => "K1",
            Column::E1 => "E1",
            Column::E2 => "E2",
            Column::ApertureType => "APERTYPE_CODE",
            Column::Aperture => "APERTURE",
            Column::Aperture2 => "APERTURE_2",
            Column::Scattering => "SCATTERING",
        }
    }
}

/// Column positions of the fixed-width numeric element record.
///
/// Every function that reads a raw record goes through a `RecordLayout`, so the
/// convention is resolved once and injected where it is needed instead of being
/// looked up from global tables. The default layout is the canonical one:
/// `CLASS_CODE, L, ANGLE, K1, E1, E2, APERTYPE_CODE, APERTURE, APERTURE_2, SCATTERING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct RecordLayout {
    pub class_code: usize,
    pub length: usize,
    pub angle: usize,
    pub k1: usize,
    pub e1: usize,
    pub e2: usize,
    pub aperture_type: usize,
    pub aperture: usize,
    pub aperture_2: usize,
    pub scattering: usize,
}

impl Default for RecordLayout {
    fn default() -> Self {
        Self {
            class_code: 0,
            length: 1,
            angle: 2,
            k1: 3,
            e1: 4,
            e2: 5,
            aperture_type: 6,
            aperture: 7,
            aperture_2: 8,
            scattering: 9,
        }
    }
}

impl RecordLayout {
    pub fn position(&self, column: Column) -> usize {
        match column {
            Column::ClassCode => self.class_code,
            Column::Length => self.length,
            Column::Angle => self.angle,
            Column::K1 => self.k1,
            Column::E1 => self.e1,
            Column::E2 => self.e2,
            Column::ApertureType => self.aperture_type,
            Column::Aperture => self.aperture,
            Column::Aperture2 => self.aperture_2,
            Column::Scattering => self.scattering,
        }
    }

    /// Minimum number of values a record must hold to be readable with this layout.
    pub fn width(&self) -> usize {
        Column::ALL
            .iter()
            .map(|&c| self.position(c))
            .max()
            .map_or(0, |max| max + 1)
    }

    #[inline]
    pub fn read(&self, record: &[f64], column: Column) -> Option<f64> {
        record.get(self.position(column)).copied()
    }

    /// Returns the first pair of columns mapped to the same position, if any.
    pub fn find_collision(&self) -> Option<(Column, Column)> {
        for (i, &a) in Column::ALL.iter().enumerate() {
            for &b in &Column::ALL[i + 1..] {
                if self.position(a) == self.position(b) {
                    return Some((a, b));
                }
            }
        }
        None
    }
}
