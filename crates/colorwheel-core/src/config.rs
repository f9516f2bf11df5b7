//! Card configuration as provided by the dashboard host.

use crate::codec::FormatSetting;
use crate::geometry::WheelConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while accepting a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("you need to define an entity")]
    MissingEntity,
    #[error("invalid configuration: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Configuration for one color wheel card.
///
/// Hosts hand this over as JSON; the camelCase keys of the host's
/// configuration form are accepted as aliases.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// The entity this card reads from and writes to. Required.
    pub entity: String,
    pub title: Option<String>,
    /// Output encoding for committed values.
    pub format: FormatSetting,
    /// Wheel radius in pixels (default 150, a 300 px diameter).
    #[serde(alias = "wheelSize", alias = "wheelRadius")]
    pub wheel_radius: f64,
    /// White border between the gradient and its rim.
    pub padding: f64,
    /// Thickness of the outer swatch ring.
    #[serde(alias = "outerThickness")]
    pub outer_thickness: f64,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            entity: String::new(),
            title: None,
            format: FormatSetting::Auto,
            wheel_radius: 150.0,
            padding: 5.0,
            outer_thickness: 15.0,
        }
    }
}

impl CardConfig {
    /// Deserialize and validate a configuration from the host's JSON.
    pub fn from_json(value: serde_json::Value) -> Result<Self, ConfigError> {
        let config: CardConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the fatal constraints. A missing entity rejects the card
    /// outright; numeric ranges are the configuration form's concern.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entity.is_empty() {
            return Err(ConfigError::MissingEntity);
        }
        Ok(())
    }

    /// The editor's prefill stub. Not a valid config until an entity is set.
    pub fn stub() -> Self {
        Self::default()
    }

    /// The wheel dimensions this configuration describes.
    pub fn wheel(&self) -> WheelConfig {
        WheelConfig {
            radius: self.wheel_radius,
            padding: self.padding,
            ring_thickness: self.outer_thickness,
        }
    }
}
