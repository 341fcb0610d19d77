use crate::core::models::layout::RecordLayout;
use crate::core::optics::kick::KickOptions;
use crate::core::optics::transfer::{TransferOptions, ZeroStrengthPolicy};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

/// Everything a tracking run needs besides the beamline and the beam.
///
/// ```toml
/// turns = 100
/// zero-strength-quadrupole = "drift"
///
/// [kicks]
/// seed = 42
///
/// [layout]
/// class-code = 0
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct TrackingConfig {
    pub turns: usize,
    #[serde(default)]
    pub zero_strength_quadrupole: ZeroStrengthPolicy,
    #[serde(default)]
    pub kicks: KickOptions,
    #[serde(default)]
    pub layout: RecordLayout,
}

impl TrackingConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.to_string_lossy())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<inline>")
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Toml {
            path: origin.to_string(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.turns == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "turns",
                reason: "at least one turn is required".to_string(),
            });
        }
        if let Some((a, b)) = self.layout.find_collision() {
            return Err(ConfigError::InvalidParameter {
                name: "layout",
                reason: format!(
                    "columns '{}' and '{}' share position {}",
                    a.name(),
                    b.name(),
                    self.layout.position(a)
                ),
            });
        }
        Ok(())
    }

    pub fn transfer_options(&self) -> TransferOptions {
        TransferOptions {
            zero_strength: self.zero_strength_quadrupole,
        }
    }
}

#[derive(Default)]
pub struct TrackingConfigBuilder {
    turns: Option<usize>,
    zero_strength_quadrupole: Option<ZeroStrengthPolicy>,
    seed: Option<u64>,
    layout: Option<RecordLayout>,
}

impl TrackingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(mut self, turns: usize) -> Self {
        self.turns = Some(turns);
        self
    }
    pub fn zero_strength_quadrupole(mut self, policy: ZeroStrengthPolicy) -> Self {
        self.zero_strength_quadrupole = Some(policy);
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
    pub fn layout(mut self, layout: RecordLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn build(self) -> Result<TrackingConfig, ConfigError> {
        let config = TrackingConfig {
            turns: self.turns.ok_or(ConfigError::MissingParameter("turns"))?,
            zero_strength_quadrupole: self.zero_strength_quadrupole.unwrap_or_default(),
            kicks: KickOptions {
                seed: self.seed.unwrap_or_default(),
            },
            layout: self.layout.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }
}
