//! Vial: a liquid container tracked by the workcell. Not a device.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, WorkcellError};
use crate::id::VialId;

/// Where a vial should be dropped off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Site {
    Label(String),
    Coordinate { x: f64, y: f64, z: f64 },
}

impl std::fmt::Display for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Label(label) => f.write_str(label),
            Self::Coordinate { x, y, z } => write!(f, "({x}, {y}, {z})"),
        }
    }
}

/// A vial with a fixed capacity, a drop-off site, a temperature and a cap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vial {
    id: VialId,
    /// Capacity in mL.
    max_volume: f64,
    location: Site,
    /// Degrees Celsius.
    temperature: f64,
    capped: bool,
}

impl Vial {
    /// Create an uncapped vial.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonPositiveVolume`] unless `max_volume` is
    /// a positive finite number.
    pub fn new(max_volume: f64, location: Site, temperature: f64) -> Result<Self, WorkcellError> {
        if !(max_volume.is_finite() && max_volume > 0.0) {
            return Err(ValidationError::NonPositiveVolume(max_volume).into());
        }
        Ok(Self {
            id: VialId::new(),
            max_volume,
            location,
            temperature,
            capped: false,
        })
    }

    #[must_use]
    pub fn id(&self) -> VialId {
        self.id
    }

    #[must_use]
    pub fn max_volume(&self) -> f64 {
        self.max_volume
    }

    #[must_use]
    pub fn location(&self) -> &Site {
        &self.location
    }

    pub fn set_location(&mut self, location: Site) {
        self.location = location;
    }

    #[must_use]
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn set_temperature(&mut self, temperature: f64) {
        self.temperature = temperature;
    }

    #[must_use]
    pub fn is_capped(&self) -> bool {
        self.capped
    }

    pub fn set_capped(&mut self, capped: bool) {
        self.capped = capped;
    }

    pub fn cap(&mut self) {
        self.capped = true;
    }

    pub fn decap(&mut self) {
        self.capped = false;
    }
}
