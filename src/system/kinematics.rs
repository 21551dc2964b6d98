//! Displacement to encoder counts

use core::f32::consts::PI;

/// Chassis geometry used for dead reckoning
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Kinematics {
    /// Wheel radius in inches
    pub wheel_radius: f32,
    /// Encoder counts per wheel revolution
    pub counts_per_rev: f32,
    /// Distance from the turning centre to the wheels, in inches
    pub turn_radius: f32,
}

impl Default for Kinematics {
    fn default() -> Self {
        Self {
            wheel_radius: 1.375,
            counts_per_rev: 48.0,
            turn_radius: 4.0,
        }
    }
}

impl Kinematics {
    /// Counts the wheel produces over `inches` of travel, truncated toward zero
    pub fn counts_for_distance(&self, inches: f32) -> i32 {
        let circumference = 2.0 * PI * self.wheel_radius;
        // `as` saturates and maps NaN to zero
        (inches * self.counts_per_rev / circumference) as i32
    }

    /// Counts each wheel produces while the chassis turns in place by `degrees`
    pub fn counts_for_rotation(&self, degrees: f32) -> i32 {
        let arc = self.turn_radius * degrees * PI / 180.0;
        self.counts_for_distance(arc)
    }

    pub fn is_valid(&self) -> bool {
        [self.wheel_radius, self.counts_per_rev, self.turn_radius]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }
}
