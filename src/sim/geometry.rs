//! Tube geometry
//!
//! Axial layout along the tube (x axis):
//! - gun at x = 0
//! - deflection plates from `gun_to_plates` to `gun_to_plates + plate_length`
//! - drift region up to the screen at `total_length()`

use serde::{Deserialize, Serialize};

use crate::error::{CrtError, CrtResult};

/// Immutable tube dimensions (meters)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeometry", into = "RawGeometry")]
pub struct TubeGeometry {
    gun_to_plates: f64,
    plate_length: f64,
    plate_to_screen: f64,
    plate_separation: f64,
}

impl Default for TubeGeometry {
    /// Bench tube: plates 5 cm behind the gun, 25 cm drift to the screen
    fn default() -> Self {
        Self {
            gun_to_plates: 0.05,
            plate_length: 0.05,
            plate_to_screen: 0.25,
            plate_separation: 0.01,
        }
    }
}

impl TubeGeometry {
    /// Build a geometry, rejecting non-finite or non-positive lengths
    pub fn new(
        gun_to_plates: f64,
        plate_length: f64,
        plate_to_screen: f64,
        plate_separation: f64,
    ) -> CrtResult<Self> {
        check_length("gun_to_plates", gun_to_plates)?;
        check_length("plate_length", plate_length)?;
        check_length("plate_to_screen", plate_to_screen)?;
        check_length("plate_separation", plate_separation)?;
        Ok(Self {
            gun_to_plates,
            plate_length,
            plate_to_screen,
            plate_separation,
        })
    }

    /// Compact lab tube (2 cm to the plates, 23 cm drift)
    pub fn compact() -> Self {
        Self {
            gun_to_plates: 0.02,
            plate_length: 0.05,
            plate_to_screen: 0.23,
            plate_separation: 0.01,
        }
    }

    #[inline]
    pub fn gun_to_plates(&self) -> f64 {
        self.gun_to_plates
    }

    #[inline]
    pub fn plate_length(&self) -> f64 {
        self.plate_length
    }

    #[inline]
    pub fn plate_to_screen(&self) -> f64 {
        self.plate_to_screen
    }

    #[inline]
    pub fn plate_separation(&self) -> f64 {
        self.plate_separation
    }

    /// Axial position where the beam leaves the plates
    #[inline]
    pub fn plate_exit(&self) -> f64 {
        self.gun_to_plates + self.plate_length
    }

    /// Gun-to-screen distance (always derived)
    #[inline]
    pub fn total_length(&self) -> f64 {
        self.gun_to_plates + self.plate_length + self.plate_to_screen
    }
}

fn check_length(field: &'static str, value: f64) -> CrtResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CrtError::InvalidGeometry { field, value })
    }
}

/// Serialized form; validated on the way in
#[derive(Serialize, Deserialize)]
struct RawGeometry {
    gun_to_plates: f64,
    plate_length: f64,
    plate_to_screen: f64,
    plate_separation: f64,
}

impl TryFrom<RawGeometry> for TubeGeometry {
    type Error = CrtError;

    fn try_from(raw: RawGeometry) -> CrtResult<Self> {
        Self::new(
            raw.gun_to_plates,
            raw.plate_length,
            raw.plate_to_screen,
            raw.plate_separation,
        )
    }
}

impl From<TubeGeometry> for RawGeometry {
    fn from(g: TubeGeometry) -> Self {
        Self {
            gun_to_plates: g.gun_to_plates,
            plate_length: g.plate_length,
            plate_to_screen: g.plate_to_screen,
            plate_separation: g.plate_separation,
        }
    }
}
