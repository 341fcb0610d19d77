use thiserror::Error;

use super::config::ConfigError;
use crate::core::models::beamline::BeamlineError;
use crate::core::models::element::ElementClass;
use crate::core::optics::Degeneracy;

#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("Beamline configuration error: {source}")]
    Configuration {
        #[from]
        source: BeamlineError,
    },

    #[error("Tracking configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Numeric degeneracy in element {element} ({class}): {source}")]
    NumericDegeneracy {
        element: usize,
        class: ElementClass,
        #[source]
        source: Degeneracy,
    },

    #[error("Cannot track through a beamline without elements")]
    EmptyBeamline,
}
