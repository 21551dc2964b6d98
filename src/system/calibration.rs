//! Per-run calibration baseline
//!
//! Captured once before the run starts (landmark readings taken while parked on
//! course features, plus the photocell levels) and read-only afterwards.

use crate::system::error::{Error, Result};

/// Landmark and light readings taken before a run
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationBaseline {
    /// Y at the start box, inches
    pub start_y: f32,
    /// X of the DDR light, inches
    pub ddr_light_x: f32,
    /// Y of the foosball wall, inches
    pub foosball_wall_y: f32,
    /// Y of the bump, inches
    pub bump_y: f32,
    /// Photocell voltage with no light source underneath
    pub ambient_light: f32,
    /// Voltage drop the photocell shows over the red light
    pub red_delta: f32,
}

impl CalibrationBaseline {
    pub fn new(
        start_y: f32,
        ddr_light_x: f32,
        foosball_wall_y: f32,
        bump_y: f32,
        ambient_light: f32,
        red_delta: f32,
    ) -> Result<Self> {
        let baseline = Self {
            start_y,
            ddr_light_x,
            foosball_wall_y,
            bump_y,
            ambient_light,
            red_delta,
        };
        baseline.validate()?;
        Ok(baseline)
    }

    pub fn validate(&self) -> Result<()> {
        let all_finite = [
            self.start_y,
            self.ddr_light_x,
            self.foosball_wall_y,
            self.bump_y,
            self.ambient_light,
            self.red_delta,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !all_finite || self.ambient_light <= 0.0 || self.red_delta <= 0.0 {
            warn!("rejecting calibration baseline {:?}", self);
            return Err(Error::InvalidCalibration);
        }
        Ok(())
    }

    /// Photocell drop from ambient for a reading
    pub fn light_delta(&self, reading: f32) -> f32 {
        self.ambient_light - reading
    }
}
