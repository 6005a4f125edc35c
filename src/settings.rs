use serde::{Deserialize, Serialize};

use crate::error::{LimitSetError, Result};
use crate::presets::Geometry;
use crate::primitive::EPS;

/// Parameters of a limit set computation. Every field has a default, so partial JSON
/// objects are accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Uniform scale applied to the mapping primitives.
    pub scale: f64,
    /// Number of image generations, generation 0 included.
    pub generations: usize,
    /// Images of generation 2 and later with a smaller radius are dropped.
    pub min_radius: f64,
    /// Computation stops after the generation that exceeds this image count.
    pub max_elements: usize,
    pub geometry: Geometry,
    /// Absolute tolerance for equality, tangency and fixed point tests.
    pub eps: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scale: 1.0,
            generations: 5,
            min_radius: 0.01,
            max_elements: 1000,
            geometry: Geometry::default(),
            eps: EPS,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Settings> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.scale > 0.0 && self.scale.is_finite()) {
            return Err(LimitSetError::InvalidSetting { name: "scale", value: self.scale });
        }
        if !(self.eps > 0.0 && self.eps.is_finite()) {
            return Err(LimitSetError::InvalidSetting { name: "eps", value: self.eps });
        }
        if !(self.min_radius >= 0.0 && self.min_radius.is_finite()) {
            return Err(LimitSetError::InvalidSetting {
                name: "min_radius",
                value: self.min_radius,
            });
        }
        Ok(())
    }
}
